//! Charges, multiplicity and pseudopotential core electrons

use super::scan::{dotted_int, is_rule, keyed_int, label_symbol, malformed, not_found, parse_float, parse_int};
use crate::error::ExtractError;
use crate::extractor::AttributeExtractor;
use chemlog_domain::{LogStream, Program, PropertyKey, PropertyValue, ResultRecord};
use std::collections::BTreeMap;

/// Atomic partial charges keyed by population scheme
///
/// The last population analysis in the log wins, so an optimization reports
/// charges at the final geometry.
pub struct AtomCharges;

impl AtomCharges {
    /// ```text
    ///  Mulliken charges:
    ///                1
    ///      1  O   -0.834
    ///  Sum of Mulliken charges =   0.00000
    /// ```
    fn gaussian(log: &LogStream) -> BTreeMap<String, Vec<f64>> {
        let mut charges = BTreeMap::new();
        let mut current: Option<Vec<f64>> = None;

        for line in log.lines() {
            let trimmed = line.trim_start();
            let is_title = trimmed.starts_with("Mulliken charges") || trimmed.starts_with("Mulliken atomic charges");
            if is_title && !trimmed.contains("hydrogens summed") {
                current = Some(Vec::new());
                continue;
            }
            let Some(values) = current.as_mut() else {
                continue;
            };

            let tokens: Vec<&str> = trimmed.split_whitespace().collect();
            let row = match tokens.as_slice() {
                [index, _symbol, charge, ..] if parse_int(index).is_some() => parse_float(charge),
                _ => None,
            };
            match row {
                Some(charge) => values.push(charge),
                // Column header line directly under the title
                None if values.is_empty() && !trimmed.starts_with("Sum of") => {}
                None => {
                    if let Some(values) = current.take() {
                        charges.insert("mulliken".to_string(), values);
                    }
                }
            }
        }

        charges
    }

    /// ```text
    /// MULLIKEN ATOMIC CHARGES
    /// -----------------------
    ///    0 O :   -0.482
    /// Sum of atomic charges:   -0.0000000
    /// ```
    fn orca(log: &LogStream) -> BTreeMap<String, Vec<f64>> {
        let mut charges = BTreeMap::new();
        let mut current: Option<(&str, Vec<f64>)> = None;

        for line in log.lines() {
            let trimmed = line.trim();
            if trimmed.starts_with("MULLIKEN ATOMIC CHARGES") {
                current = Some(("mulliken", Vec::new()));
                continue;
            }
            if trimmed.starts_with("LOEWDIN ATOMIC CHARGES") {
                current = Some(("lowdin", Vec::new()));
                continue;
            }
            let Some((_, values)) = current.as_mut() else {
                continue;
            };
            if is_rule(trimmed) {
                continue;
            }

            // Open-shell runs append a spin population after the charge
            let charge = trimmed
                .split_once(':')
                .filter(|(label, _)| label.split_whitespace().next().and_then(parse_int).is_some())
                .and_then(|(_, rest)| rest.split_whitespace().next())
                .and_then(parse_float);
            match charge {
                Some(charge) => values.push(charge),
                None => {
                    if let Some((scheme, values)) = current.take() {
                        charges.insert(scheme.to_string(), values);
                    }
                }
            }
        }

        charges
    }
}

impl AttributeExtractor for AtomCharges {
    fn produces(&self) -> PropertyKey {
        PropertyKey::AtomCharges
    }

    fn extract(&self, log: &LogStream, program: Program, _record: &ResultRecord) -> Result<PropertyValue, ExtractError> {
        let charges = match program {
            Program::Gaussian => Self::gaussian(log),
            Program::Orca => Self::orca(log),
            _ => return Err(ExtractError::Unsupported),
        };
        if charges.is_empty() {
            return Err(not_found("no population analysis"));
        }
        Ok(PropertyValue::Charges(charges))
    }
}

/// Total molecular charge
pub struct Charge;

impl AttributeExtractor for Charge {
    fn produces(&self) -> PropertyKey {
        PropertyKey::Charge
    }

    fn extract(&self, log: &LogStream, program: Program, _record: &ResultRecord) -> Result<PropertyValue, ExtractError> {
        let charge = match program {
            // Charge =  0 Multiplicity = 1
            Program::Gaussian => log.lines().find_map(|line| keyed_int(line, "Charge =")),
            // Total Charge           Charge          ....    0
            Program::Orca => dotted_int(log.lines(), "Total Charge"),
            _ => return Err(ExtractError::Unsupported),
        };
        charge.map(PropertyValue::Int).ok_or_else(|| not_found("no molecular charge"))
    }
}

/// Spin multiplicity
pub struct Mult;

impl AttributeExtractor for Mult {
    fn produces(&self) -> PropertyKey {
        PropertyKey::Mult
    }

    fn extract(&self, log: &LogStream, program: Program, _record: &ResultRecord) -> Result<PropertyValue, ExtractError> {
        let mult = match program {
            Program::Gaussian => log.lines().find_map(|line| keyed_int(line, "Multiplicity =")),
            // Multiplicity           Mult            ....    1
            Program::Orca => dotted_int(log.lines(), "Multiplicity"),
            _ => return Err(ExtractError::Unsupported),
        };
        mult.map(PropertyValue::Int).ok_or_else(|| not_found("no multiplicity"))
    }
}

/// Core electrons replaced by a pseudopotential, per atom
///
/// Atoms without a pseudopotential have zero core electrons, so a log with
/// no pseudopotential section yields a list of `natom` zeros.
pub struct CoreElectrons;

impl CoreElectrons {
    /// ```text
    ///  Center     Atomic      Valence      Angular      Power
    ///  Number     Number     Electrons     Momentum     of R      Exponent        Coefficient
    ///  ======================================================================================
    ///     1         78           18
    ///                                       F and up
    ///     2          1                   No pseudopotential on this center.
    ///  ======================================================================================
    /// ```
    fn gaussian(log: &LogStream, core: &mut [i64]) -> Result<(), ExtractError> {
        let mut in_section = false;
        let mut rules = 0;

        for line in log.lines() {
            if line.contains("Pseudopotential Parameters") {
                in_section = true;
                rules = 0;
                continue;
            }
            if !in_section {
                continue;
            }
            if is_rule(line) {
                rules += 1;
                // Title rule, column-header rule, then the closing rule
                if rules == 3 {
                    in_section = false;
                }
                continue;
            }

            let tokens: Vec<&str> = line.split_whitespace().collect();
            let (Some(center), Some(atomic)) = (
                tokens.first().and_then(|t| parse_int(t)),
                tokens.get(1).and_then(|t| parse_int(t)),
            ) else {
                continue;
            };
            let replaced = match tokens.get(2).and_then(|t| parse_int(t)) {
                Some(valence) => atomic - valence,
                None => 0,
            };
            let slot = usize::try_from(center - 1)
                .ok()
                .and_then(|index| core.get_mut(index))
                .ok_or_else(|| malformed(format!("pseudopotential center {} out of range", center)))?;
            *slot = replaced;
        }

        Ok(())
    }

    /// ```text
    ///  Group 1, Type Pt ECP def2-ECP (replacing 60 core electrons, lmax=3)
    /// Atom   0Pt   ECP group => 1
    /// ```
    fn orca(log: &LogStream, core: &mut [i64]) -> Result<(), ExtractError> {
        let mut groups: BTreeMap<i64, i64> = BTreeMap::new();

        for line in log.lines() {
            let trimmed = line.trim();
            if let Some(rest) = trimmed.strip_prefix("Group") {
                let group = rest.split(',').next().and_then(parse_int);
                let replaced = keyed_int(trimmed, "(replacing");
                if let (Some(group), Some(replaced)) = (group, replaced) {
                    groups.insert(group, replaced);
                }
                continue;
            }

            if trimmed.starts_with("Atom") && trimmed.contains("ECP group =>") {
                let index = trimmed
                    .split_whitespace()
                    .nth(1)
                    .map(|label| &label[..label.len() - label_symbol(label).len()])
                    .and_then(parse_int);
                let group = keyed_int(trimmed, "=>");
                let (Some(index), Some(group)) = (index, group) else {
                    return Err(malformed(format!("bad ECP assignment: {}", trimmed)));
                };
                let replaced = groups
                    .get(&group)
                    .copied()
                    .ok_or_else(|| malformed(format!("ECP group {} is not defined", group)))?;
                let slot = usize::try_from(index)
                    .ok()
                    .and_then(|index| core.get_mut(index))
                    .ok_or_else(|| malformed(format!("ECP atom {} out of range", index)))?;
                *slot = replaced;
            }
        }

        Ok(())
    }
}

/// Upper bound on the atom count a per-atom list is built for
const MAX_ATOMS: usize = 1_000_000;

impl AttributeExtractor for CoreElectrons {
    fn produces(&self) -> PropertyKey {
        PropertyKey::CoreElectrons
    }

    fn prerequisites(&self) -> &'static [PropertyKey] {
        &[PropertyKey::Natom]
    }

    fn extract(&self, log: &LogStream, program: Program, record: &ResultRecord) -> Result<PropertyValue, ExtractError> {
        let natom = record
            .get(PropertyKey::Natom)
            .and_then(PropertyValue::as_int)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| malformed("atom count is not a non-negative integer"))?;
        if natom > MAX_ATOMS {
            return Err(malformed(format!("atom count {} exceeds {}", natom, MAX_ATOMS)));
        }

        let mut core = vec![0; natom];
        match program {
            Program::Gaussian => Self::gaussian(log, &mut core)?,
            Program::Orca => Self::orca(log, &mut core)?,
            _ => return Err(ExtractError::Unsupported),
        }
        Ok(PropertyValue::IntList(core))
    }
}
