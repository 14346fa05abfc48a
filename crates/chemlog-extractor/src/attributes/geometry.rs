//! Geometry: coordinates, atomic numbers, atom count and masses

use super::scan::{
    atomic_number, is_rule, keyed_float, keyed_int, label_symbol, malformed, not_found, parse_float,
    parse_int,
};
use crate::error::ExtractError;
use crate::extractor::AttributeExtractor;
use chemlog_domain::{LogStream, Program, PropertyKey, PropertyValue, ResultRecord};

/// One atom row of a coordinate table
#[derive(Debug, Clone, PartialEq)]
struct Atom {
    number: i64,
    xyz: [f64; 3],
}

/// Every coordinate table printed in the log, in order
fn geometries(log: &LogStream, program: Program) -> Result<Vec<Vec<Atom>>, ExtractError> {
    match program {
        Program::Gaussian => {
            // Standard orientation is absent with nosymm; fall back to the input frame
            let standard = gaussian_orientations(log, "Standard orientation:");
            if standard.is_empty() {
                Ok(gaussian_orientations(log, "Input orientation:"))
            } else {
                Ok(standard)
            }
        }
        Program::Orca => orca_coordinates(log),
        _ => Err(ExtractError::Unsupported),
    }
}

/// Read Gaussian orientation tables
///
/// ```text
///                          Standard orientation:
///  ---------------------------------------------------------------------
///  Center     Atomic      Atomic             Coordinates (Angstroms)
///  Number     Number       Type             X           Y           Z
///  ---------------------------------------------------------------------
///       1          8           0        0.000000    0.000000    0.117790
///  ---------------------------------------------------------------------
/// ```
fn gaussian_orientations(log: &LogStream, header: &str) -> Vec<Vec<Atom>> {
    let mut tables = Vec::new();
    let mut lines = log.lines();

    while let Some(line) = lines.next() {
        if !line.contains(header) {
            continue;
        }

        let mut rules = 0;
        let mut atoms = Vec::new();
        for line in lines.by_ref() {
            if is_rule(line) {
                rules += 1;
                if rules == 3 {
                    break;
                }
                continue;
            }
            if rules < 2 {
                continue;
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() < 6 {
                break;
            }
            let number = parse_int(tokens[1]);
            let xyz: Vec<f64> = tokens[tokens.len() - 3..].iter().filter_map(|t| parse_float(t)).collect();
            match (number, xyz.as_slice()) {
                (Some(number), [x, y, z]) => atoms.push(Atom { number, xyz: [*x, *y, *z] }),
                _ => break,
            }
        }
        tables.push(atoms);
    }

    tables
}

/// Read ORCA `CARTESIAN COORDINATES (ANGSTROEM)` tables
///
/// ```text
/// ---------------------------------
/// CARTESIAN COORDINATES (ANGSTROEM)
/// ---------------------------------
///   O      0.000000    0.000000    0.117790
/// ```
fn orca_coordinates(log: &LogStream) -> Result<Vec<Vec<Atom>>, ExtractError> {
    let mut tables = Vec::new();
    let mut lines = log.lines();

    while let Some(line) = lines.next() {
        if line.trim() != "CARTESIAN COORDINATES (ANGSTROEM)" {
            continue;
        }

        let mut atoms = Vec::new();
        for line in lines.by_ref() {
            if is_rule(line) {
                continue;
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != 4 {
                break;
            }
            let symbol = label_symbol(tokens[0]);
            let number = atomic_number(symbol).ok_or_else(|| malformed(format!("unknown element {}", symbol)))?;
            let xyz: Vec<f64> = tokens[1..].iter().filter_map(|t| parse_float(t)).collect();
            match xyz.as_slice() {
                [x, y, z] => atoms.push(Atom { number, xyz: [*x, *y, *z] }),
                _ => return Err(malformed(format!("bad coordinate row: {}", line.trim()))),
            }
        }
        tables.push(atoms);
    }

    Ok(tables)
}

/// Coordinates of every geometry, in Å
pub struct AtomCoords;

impl AttributeExtractor for AtomCoords {
    fn produces(&self) -> PropertyKey {
        PropertyKey::AtomCoords
    }

    fn extract(&self, log: &LogStream, program: Program, _record: &ResultRecord) -> Result<PropertyValue, ExtractError> {
        let tables = geometries(log, program)?;
        if tables.is_empty() {
            return Err(not_found("no coordinate table"));
        }
        Ok(PropertyValue::Trajectory(
            tables
                .into_iter()
                .map(|atoms| atoms.into_iter().map(|atom| atom.xyz).collect())
                .collect(),
        ))
    }
}

/// Atomic numbers, from the first coordinate table
pub struct AtomNos;

impl AttributeExtractor for AtomNos {
    fn produces(&self) -> PropertyKey {
        PropertyKey::AtomNos
    }

    fn extract(&self, log: &LogStream, program: Program, _record: &ResultRecord) -> Result<PropertyValue, ExtractError> {
        let first = geometries(log, program)?
            .into_iter()
            .next()
            .ok_or_else(|| not_found("no coordinate table"))?;
        Ok(PropertyValue::IntList(first.into_iter().map(|atom| atom.number).collect()))
    }
}

/// Number of atoms
pub struct Natom;

impl AttributeExtractor for Natom {
    fn produces(&self) -> PropertyKey {
        PropertyKey::Natom
    }

    fn extract(&self, log: &LogStream, program: Program, _record: &ResultRecord) -> Result<PropertyValue, ExtractError> {
        let natom = match program {
            // NAtoms=      3 NActive=      3 NUniq=      2
            Program::Gaussian => log.lines().find_map(|line| keyed_int(line, "NAtoms=")),
            // Number of atoms                             ...      3
            Program::Orca => log
                .lines()
                .filter(|line| line.trim_start().starts_with("Number of atoms"))
                .find_map(|line| line.split_whitespace().last().and_then(parse_int)),
            _ => return Err(ExtractError::Unsupported),
        };
        natom.map(PropertyValue::Int).ok_or_else(|| not_found("no atom count"))
    }
}

/// Atomic masses in amu, one per atom
pub struct AtomMasses;

impl AtomMasses {
    /// ` Atom     1 has atomic number  8 and mass  15.99491`
    fn gaussian(log: &LogStream) -> Vec<f64> {
        let mut masses = Vec::new();
        for line in log.lines().filter(|line| line.contains("has atomic number")) {
            // Printed once per frequency job; keep the first listing
            if keyed_int(line, "Atom").is_some_and(|index| index == 1) && !masses.is_empty() {
                break;
            }
            if let Some(mass) = keyed_float(line, "and mass") {
                masses.push(mass);
            }
        }
        masses
    }

    /// MASS column of `CARTESIAN COORDINATES (A.U.)`
    ///
    /// ```text
    ///   NO LB      ZA    FRAG     MASS         X           Y           Z
    ///    0 O     8.0000    0    15.999    0.000000    0.000000    0.222588
    /// ```
    fn orca(log: &LogStream) -> Vec<f64> {
        let mut masses = Vec::new();
        let table = log.lines().skip_while(|line| line.trim() != "CARTESIAN COORDINATES (A.U.)");
        for line in table.skip(1) {
            if is_rule(line) || line.trim_start().starts_with("NO LB") {
                continue;
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            match tokens.get(4).and_then(|t| parse_float(t)) {
                Some(mass) if tokens.len() >= 8 => masses.push(mass),
                _ => break,
            }
        }
        masses
    }
}

impl AttributeExtractor for AtomMasses {
    fn produces(&self) -> PropertyKey {
        PropertyKey::AtomMasses
    }

    fn prerequisites(&self) -> &'static [PropertyKey] {
        &[PropertyKey::AtomNos]
    }

    fn extract(&self, log: &LogStream, program: Program, record: &ResultRecord) -> Result<PropertyValue, ExtractError> {
        let masses = match program {
            Program::Gaussian => Self::gaussian(log),
            Program::Orca => Self::orca(log),
            _ => return Err(ExtractError::Unsupported),
        };
        if masses.is_empty() {
            return Err(not_found("no atomic masses"));
        }

        let atoms = record
            .get(PropertyKey::AtomNos)
            .and_then(PropertyValue::as_int_list)
            .map_or(0, <[i64]>::len);
        if masses.len() != atoms {
            return Err(malformed(format!("{} masses for {} atoms", masses.len(), atoms)));
        }
        Ok(PropertyValue::FloatList(masses))
    }
}
