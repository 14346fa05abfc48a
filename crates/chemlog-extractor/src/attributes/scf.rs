//! SCF convergence targets and per-iteration values

use super::scan::{dotted_value, keyed_float, not_found, parse_float, parse_int};
use crate::error::ExtractError;
use crate::extractor::AttributeExtractor;
use chemlog_domain::{LogStream, Program, PropertyKey, PropertyValue, ResultRecord};

/// Convergence targets per SCF run, as `[rms density, max density, energy]`
pub struct ScfTargets;

impl ScfTargets {
    /// ```text
    ///  Requested convergence on RMS density matrix=1.00D-08 within 128 cycles.
    ///  Requested convergence on MAX density matrix=1.00D-06.
    ///  Requested convergence on             energy=1.00D-06.
    /// ```
    fn gaussian(log: &LogStream) -> Vec<Vec<f64>> {
        let mut runs = Vec::new();
        let mut current = [None; 3];

        for line in log.lines().filter(|line| line.contains("Requested convergence on")) {
            if let Some(value) = keyed_float(line, "RMS density matrix=") {
                current = [Some(value), None, None];
            } else if let Some(value) = keyed_float(line, "MAX density matrix=") {
                current[1] = Some(value);
            } else if let Some(value) = keyed_float(line, "energy=") {
                current[2] = Some(value);
            }

            if let [Some(rms), Some(max), Some(energy)] = current {
                runs.push(vec![rms, max, energy]);
                current = [None; 3];
            }
        }

        runs
    }

    /// ```text
    /// Energy Change          TolE            ....  1.0000e-06 Eh
    /// Max Density Change     TolMaxP         ....  1.0000e-05
    /// RMS Density Change     TolRMSP         ....  1.0000e-06
    /// ```
    fn orca(log: &LogStream) -> Vec<Vec<f64>> {
        let mut runs = Vec::new();
        let mut current = [None; 3];

        for line in log.lines() {
            let Some(value) = dotted_value(line).and_then(parse_float) else {
                continue;
            };
            let mut tokens = line.split_whitespace();
            let short = tokens.find(|token| token.starts_with("Tol"));
            match short {
                Some("TolRMSP") => current[0] = Some(value),
                Some("TolMaxP") => current[1] = Some(value),
                Some("TolE") => current[2] = Some(value),
                _ => continue,
            }

            if let [Some(rms), Some(max), Some(energy)] = current {
                runs.push(vec![rms, max, energy]);
                current = [None; 3];
            }
        }

        runs
    }
}

impl AttributeExtractor for ScfTargets {
    fn produces(&self) -> PropertyKey {
        PropertyKey::ScfTargets
    }

    fn extract(&self, log: &LogStream, program: Program, _record: &ResultRecord) -> Result<PropertyValue, ExtractError> {
        let runs = match program {
            Program::Gaussian => Self::gaussian(log),
            Program::Orca => Self::orca(log),
            _ => return Err(ExtractError::Unsupported),
        };
        if runs.is_empty() {
            return Err(not_found("no SCF convergence criteria"));
        }
        Ok(PropertyValue::FloatMatrix(runs))
    }
}

/// Convergence values per iteration, per SCF run, as
/// `[rms density change, max density change, energy change]`
pub struct ScfValues;

impl ScfValues {
    /// ```text
    ///  RMSDP=1.02D-03 MaxDP=1.15D-02 DE=-1.33D-03 OVMax= 0.00D+00
    ///  SCF Done:  E(RHF) =  -74.9620539015     A.U. after    7 cycles
    /// ```
    ///
    /// The first iteration of a run has no energy change and is skipped.
    fn gaussian(log: &LogStream) -> Vec<Vec<[f64; 3]>> {
        let mut runs = Vec::new();
        let mut current = Vec::new();

        for line in log.lines() {
            if line.contains("SCF Done:") {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
                continue;
            }
            let values = (
                keyed_float(line, "RMSDP="),
                keyed_float(line, "MaxDP="),
                keyed_float(line, "DE="),
            );
            if let (Some(rms), Some(max), Some(energy)) = values {
                current.push([rms, max, energy]);
            }
        }

        runs
    }

    /// ```text
    /// ITER       Energy         Delta-E        Max-DP      RMS-DP      [F,P]     Damp
    ///   0    -76.3809823547   0.000000000000 0.03137224  0.00267339  0.1243    0.7000
    ///   1    -76.3910000000  -0.010017645300 0.01200000  0.00100000  0.0500    0.7000
    ///                *** Turning on DIIS ***
    ///   2    -76.3950000000  -0.004000000000 0.00500000  0.00040000  0.0100    0.0000
    ///
    ///                *****************************************************
    ///                *                     SUCCESS                       *
    /// ```
    fn orca(log: &LogStream) -> Vec<Vec<[f64; 3]>> {
        let mut runs = Vec::new();
        let mut current: Option<Vec<[f64; 3]>> = None;

        for line in log.lines() {
            let trimmed = line.trim();
            if trimmed.starts_with("ITER") && trimmed.contains("Delta-E") {
                if current.is_none() {
                    current = Some(Vec::new());
                }
                continue;
            }
            let Some(iterations) = current.as_mut() else {
                continue;
            };
            // Solver switches (`*** Turning on DIIS ***`) keep the table going
            if trimmed.starts_with("***") && trimmed.ends_with("***") && trimmed.chars().any(char::is_alphabetic) {
                continue;
            }

            let tokens: Vec<&str> = trimmed.split_whitespace().collect();
            let row = match tokens.as_slice() {
                [iteration, _energy, delta, max, rms, ..] if parse_int(iteration).is_some() => {
                    match (parse_float(rms), parse_float(max), parse_float(delta)) {
                        (Some(rms), Some(max), Some(delta)) => Some([rms, max, delta]),
                        _ => None,
                    }
                }
                _ => None,
            };
            match row {
                Some(row) => iterations.push(row),
                None if trimmed.is_empty() => {}
                None => {
                    if let Some(iterations) = current.take() {
                        if !iterations.is_empty() {
                            runs.push(iterations);
                        }
                    }
                }
            }
        }

        if let Some(iterations) = current {
            if !iterations.is_empty() {
                runs.push(iterations);
            }
        }
        runs
    }
}

impl AttributeExtractor for ScfValues {
    fn produces(&self) -> PropertyKey {
        PropertyKey::ScfValues
    }

    fn extract(&self, log: &LogStream, program: Program, _record: &ResultRecord) -> Result<PropertyValue, ExtractError> {
        let runs = match program {
            Program::Gaussian => Self::gaussian(log),
            Program::Orca => Self::orca(log),
            _ => return Err(ExtractError::Unsupported),
        };
        if runs.is_empty() {
            return Err(not_found("no SCF iteration values (Gaussian needs #P)"));
        }
        Ok(PropertyValue::Trajectory(runs))
    }
}
