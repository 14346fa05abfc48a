//! Program module - which quantum-chemistry package produced a log

use crate::{DomainError, LogStream};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quantum-chemistry program identity
///
/// Passed through unchanged to every extractor, which branches on it to pick
/// program-specific text patterns. Serialized under the same name as
/// [`Program::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Program {
    /// Amsterdam Density Functional
    #[serde(rename = "ADF")]
    Adf,
    /// DALTON
    #[serde(rename = "DALTON")]
    Dalton,
    /// Gaussian formatted checkpoint files
    FChk,
    /// GAMESS (US) and Firefly
    #[serde(rename = "GAMESS")]
    Gamess,
    /// GAMESS-UK
    #[serde(rename = "GAMESSUK")]
    GamessUk,
    /// Gaussian
    Gaussian,
    /// Jaguar
    Jaguar,
    /// (Open)Molcas
    Molcas,
    /// Molpro
    Molpro,
    /// MOPAC
    #[serde(rename = "MOPAC")]
    Mopac,
    /// NWChem
    #[serde(rename = "NWChem")]
    NwChem,
    /// ORCA
    #[serde(rename = "ORCA")]
    Orca,
    /// Psi4
    Psi4,
    /// Q-Chem
    QChem,
    /// Turbomole
    Turbomole,
}

/// Banner fragments that identify a program, checked in this order per line
const SIGNATURES: &[(&str, Program)] = &[
    ("Amsterdam Density Functional", Program::Adf),
    ("Dalton - An Electronic Structure Program", Program::Dalton),
    ("GAMESS-UK", Program::GamessUk),
    ("GAMESS VERSION", Program::Gamess),
    ("Firefly version", Program::Gamess),
    ("Entering Gaussian System", Program::Gaussian),
    ("Gaussian, Inc.", Program::Gaussian),
    ("Jaguar version", Program::Jaguar),
    ("MOLCAS", Program::Molcas),
    ("PROGRAM SYSTEM MOLPRO", Program::Molpro),
    ("MOPAC", Program::Mopac),
    ("Northwest Computational Chemistry Package", Program::NwChem),
    ("O   R   C   A", Program::Orca),
    ("Psi4: An Open-Source Ab Initio", Program::Psi4),
    ("Welcome to Q-Chem", Program::QChem),
    ("TURBOMOLE", Program::Turbomole),
];

impl Program {
    /// Every supported program
    pub const ALL: [Program; 15] = [
        Program::Adf,
        Program::Dalton,
        Program::FChk,
        Program::Gamess,
        Program::GamessUk,
        Program::Gaussian,
        Program::Jaguar,
        Program::Molcas,
        Program::Molpro,
        Program::Mopac,
        Program::NwChem,
        Program::Orca,
        Program::Psi4,
        Program::QChem,
        Program::Turbomole,
    ];

    /// Get the program name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Program::Adf => "ADF",
            Program::Dalton => "DALTON",
            Program::FChk => "FChk",
            Program::Gamess => "GAMESS",
            Program::GamessUk => "GAMESSUK",
            Program::Gaussian => "Gaussian",
            Program::Jaguar => "Jaguar",
            Program::Molcas => "Molcas",
            Program::Molpro => "Molpro",
            Program::Mopac => "MOPAC",
            Program::NwChem => "NWChem",
            Program::Orca => "ORCA",
            Program::Psi4 => "Psi4",
            Program::QChem => "QChem",
            Program::Turbomole => "Turbomole",
        }
    }

    /// Parse a program from its name (case-insensitive, `-`/`_` ignored)
    pub fn parse(s: &str) -> Option<Self> {
        let wanted: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|program| program.as_str().to_lowercase() == wanted)
    }

    /// Recognize the program that wrote a log from its banner lines
    ///
    /// The first line carrying a known banner decides. Formatted checkpoint
    /// files have no banner and are recognized by their typed header lines.
    pub fn detect(log: &LogStream) -> Option<Self> {
        for line in log.lines() {
            if let Some((_, program)) = SIGNATURES.iter().find(|(sig, _)| line.contains(sig)) {
                return Some(*program);
            }
            if line.starts_with("Number of atoms") && line.contains("  I  ") {
                return Some(Program::FChk);
            }
        }
        None
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Program {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| DomainError::UnknownProgram(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!(Program::parse("gaussian"), Some(Program::Gaussian));
        assert_eq!(Program::parse("ORCA"), Some(Program::Orca));
        assert_eq!(Program::parse("gamess-uk"), Some(Program::GamessUk));
        assert_eq!(Program::parse("Q-Chem"), Some(Program::QChem));
        assert_eq!(Program::parse("cp2k"), None);
    }

    #[test]
    fn test_round_trip_names() {
        for program in Program::ALL {
            assert_eq!(Program::parse(program.as_str()), Some(program));
        }
    }

    #[test]
    fn test_serde_uses_display_names() {
        for program in Program::ALL {
            let json = serde_json::to_string(&program).unwrap();
            assert_eq!(json, format!("\"{}\"", program.as_str()));
            assert_eq!(serde_json::from_str::<Program>(&json).unwrap(), program);
        }
        assert!(serde_json::from_str::<Program>("\"Orca\"").is_err());
    }

    #[test]
    fn test_detect_gaussian() {
        let log = LogStream::from(" Entering Gaussian System, Link 0=g16\n NAtoms=    3\n");
        assert_eq!(Program::detect(&log), Some(Program::Gaussian));
    }

    #[test]
    fn test_detect_orca() {
        let log = LogStream::from("                                 * O   R   C   A *\n");
        assert_eq!(Program::detect(&log), Some(Program::Orca));
    }

    #[test]
    fn test_detect_gamess_uk_before_gamess() {
        let log = LogStream::from("  GAMESS-UK  GAMESS VERSION\n");
        assert_eq!(Program::detect(&log), Some(Program::GamessUk));
    }

    #[test]
    fn test_detect_fchk() {
        let log = LogStream::from("water\nSP  RB3LYP  STO-3G\nNumber of atoms                            I                3\n");
        assert_eq!(Program::detect(&log), Some(Program::FChk));
    }

    #[test]
    fn test_detect_unknown() {
        let log = LogStream::from("nothing to see here\n");
        assert_eq!(Program::detect(&log), None);
    }
}
