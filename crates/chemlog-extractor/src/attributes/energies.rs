//! Total, coupled-cluster and dispersion energies

use super::scan::{keyed_float, last_float, not_found, HARTREE_TO_EV};
use crate::error::ExtractError;
use crate::extractor::AttributeExtractor;
use chemlog_domain::{LogStream, Program, PropertyKey, PropertyValue, ResultRecord};

/// Converged SCF energy of every SCF run, in eV
pub struct ScfEnergies;

impl AttributeExtractor for ScfEnergies {
    fn produces(&self) -> PropertyKey {
        PropertyKey::ScfEnergies
    }

    fn extract(&self, log: &LogStream, program: Program, _record: &ResultRecord) -> Result<PropertyValue, ExtractError> {
        let energies: Vec<f64> = match program {
            // SCF Done:  E(RB3LYP) =  -76.4089462910     A.U. after   10 cycles
            Program::Gaussian => log
                .lines()
                .filter(|line| line.contains("SCF Done:"))
                .filter_map(|line| keyed_float(line, "="))
                .collect(),
            // Total Energy       :          -76.40894629 Eh           -2079.25426 eV
            Program::Orca => log
                .lines()
                .filter(|line| line.trim_start().starts_with("Total Energy") && line.contains(" Eh"))
                .filter_map(|line| keyed_float(line, ":"))
                .collect(),
            _ => return Err(ExtractError::Unsupported),
        };

        if energies.is_empty() {
            return Err(not_found("no converged SCF energy"));
        }
        Ok(PropertyValue::FloatList(energies.into_iter().map(|e| e * HARTREE_TO_EV).collect()))
    }
}

/// Coupled-cluster energies, in eV
///
/// The perturbative-triples energy is preferred when both are printed.
pub struct CcEnergies;

impl AttributeExtractor for CcEnergies {
    fn produces(&self) -> PropertyKey {
        PropertyKey::CcEnergies
    }

    fn extract(&self, log: &LogStream, program: Program, _record: &ResultRecord) -> Result<PropertyValue, ExtractError> {
        let energies: Vec<f64> = match program {
            // CCSD(T)= -0.76329453D+02
            Program::Gaussian => log
                .lines()
                .filter_map(|line| keyed_float(line, "CCSD(T)="))
                .collect(),
            // E(CCSD(T))                                 ...    -76.241
            Program::Orca => {
                let triples: Vec<f64> = log
                    .lines()
                    .filter(|line| line.trim_start().starts_with("E(CCSD(T))"))
                    .filter_map(last_float)
                    .collect();
                if triples.is_empty() {
                    log.lines()
                        .filter(|line| line.trim_start().starts_with("E(CCSD)"))
                        .filter_map(last_float)
                        .collect()
                } else {
                    triples
                }
            }
            _ => return Err(ExtractError::Unsupported),
        };

        if energies.is_empty() {
            return Err(not_found("no coupled-cluster energy"));
        }
        Ok(PropertyValue::FloatList(energies.into_iter().map(|e| e * HARTREE_TO_EV).collect()))
    }
}

/// Empirical dispersion corrections, in eV
pub struct DispersionEnergies;

impl AttributeExtractor for DispersionEnergies {
    fn produces(&self) -> PropertyKey {
        PropertyKey::DispersionEnergies
    }

    fn extract(&self, log: &LogStream, program: Program, _record: &ResultRecord) -> Result<PropertyValue, ExtractError> {
        let energies: Vec<f64> = match program {
            // R6Disp:  Grimme-D3(BJ) Dispersion energy=       -0.0004216134 Hartrees.
            Program::Gaussian => log
                .lines()
                .filter_map(|line| keyed_float(line, "Dispersion energy="))
                .collect(),
            // Dispersion correction           -0.000421613
            Program::Orca => log
                .lines()
                .filter(|line| line.trim_start().starts_with("Dispersion correction"))
                .filter_map(last_float)
                .collect(),
            _ => return Err(ExtractError::Unsupported),
        };

        if energies.is_empty() {
            return Err(not_found("no dispersion correction"));
        }
        Ok(PropertyValue::FloatList(energies.into_iter().map(|e| e * HARTREE_TO_EV).collect()))
    }
}
