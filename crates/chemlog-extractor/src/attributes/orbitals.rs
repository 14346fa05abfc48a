//! Molecular orbital energies, symmetries and count

use super::scan::{keyed_int, malformed, not_found, parse_float, parse_int, HARTREE_TO_EV};
use crate::error::ExtractError;
use crate::extractor::AttributeExtractor;
use chemlog_domain::{LogStream, Program, PropertyKey, PropertyValue, ResultRecord};

/// Width of one Gaussian eigenvalue field
const EIGENVALUE_WIDTH: usize = 10;

/// Gaussian eigenvalues of the last orbital printout, per spin, in hartree
///
/// ```text
///  Alpha  occ. eigenvalues --  -20.55143  -1.33514  -0.69743
///  Alpha virt. eigenvalues --    0.18501   0.25627
///  Beta  occ. eigenvalues --  -20.55000
/// ```
fn gaussian_eigenvalues(log: &LogStream) -> Result<Vec<Vec<f64>>, ExtractError> {
    let mut spins: Vec<Vec<f64>> = Vec::new();
    let mut in_block = false;

    for line in log.lines() {
        let Some((label, values)) = line.split_once("eigenvalues --") else {
            in_block = false;
            continue;
        };
        if !in_block {
            spins.clear();
            in_block = true;
        }

        let spin = if label.trim_start().starts_with("Beta") { 1 } else { 0 };
        while spins.len() <= spin {
            spins.push(Vec::new());
        }
        spins[spin].extend(eigenvalue_fields(values)?);
    }

    Ok(spins)
}

/// Split an eigenvalue list, falling back to fixed-width fields when large
/// values run together (`-100.12345-10.12345`)
fn eigenvalue_fields(values: &str) -> Result<Vec<f64>, ExtractError> {
    let tokens: Option<Vec<f64>> = values.split_whitespace().map(parse_float).collect();
    if let Some(tokens) = tokens {
        return Ok(tokens);
    }

    let values = values.trim_end();
    let chars: Vec<char> = values.chars().collect();
    chars
        .chunks(EIGENVALUE_WIDTH)
        .map(|field| {
            let field: String = field.iter().collect();
            parse_float(&field).ok_or_else(|| malformed(format!("bad eigenvalue field {:?}", field)))
        })
        .collect()
}

/// One row of ORCA's `ORBITAL ENERGIES` table
struct OrcaOrbital {
    energy_ev: f64,
    irrep: Option<String>,
}

/// Last ORCA orbital table, per spin
///
/// ```text
/// ORBITAL ENERGIES
/// ----------------
///                  SPIN UP ORBITALS
///   NO   OCC          E(Eh)            E(eV)
///    0   1.0000     -20.550919      -559.2201    1-A1
/// ```
fn orca_orbitals(log: &LogStream) -> Vec<Vec<OrcaOrbital>> {
    let mut spins: Vec<Vec<OrcaOrbital>> = Vec::new();
    let mut in_table = false;

    for line in log.lines() {
        let trimmed = line.trim();
        if trimmed == "ORBITAL ENERGIES" {
            spins = vec![Vec::new()];
            in_table = true;
            continue;
        }
        if !in_table {
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with("---") || trimmed.starts_with("NO ") {
            continue;
        }
        if trimmed.starts_with("SPIN UP ORBITALS") {
            continue;
        }
        if trimmed.starts_with("SPIN DOWN ORBITALS") {
            spins.push(Vec::new());
            continue;
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        let row = match tokens.as_slice() {
            [number, _occ, _hartree, ev, rest @ ..] if parse_int(number).is_some() => {
                parse_float(ev).map(|energy_ev| OrcaOrbital {
                    energy_ev,
                    // `1-A1` → `A1`
                    irrep: rest
                        .first()
                        .map(|irrep| irrep.split_once('-').map_or(*irrep, |(_, label)| label).to_string()),
                })
            }
            _ => None,
        };
        match (row, spins.last_mut()) {
            (Some(row), Some(spin)) => spin.push(row),
            _ => in_table = false,
        }
    }

    spins.retain(|spin| !spin.is_empty());
    spins
}

/// Molecular orbital energies per spin, in eV
pub struct MoEnergies;

impl AttributeExtractor for MoEnergies {
    fn produces(&self) -> PropertyKey {
        PropertyKey::MoEnergies
    }

    fn extract(&self, log: &LogStream, program: Program, _record: &ResultRecord) -> Result<PropertyValue, ExtractError> {
        let spins: Vec<Vec<f64>> = match program {
            Program::Gaussian => gaussian_eigenvalues(log)?
                .into_iter()
                .map(|spin| spin.into_iter().map(|e| e * HARTREE_TO_EV).collect())
                .collect(),
            Program::Orca => orca_orbitals(log)
                .into_iter()
                .map(|spin| spin.into_iter().map(|orbital| orbital.energy_ev).collect())
                .collect(),
            _ => return Err(ExtractError::Unsupported),
        };

        if spins.is_empty() {
            return Err(not_found("no orbital energies"));
        }
        Ok(PropertyValue::FloatMatrix(spins))
    }
}

/// Molecular orbital symmetry labels per spin
///
/// Must line up one-to-one with `moenergies`.
pub struct MoSyms;

impl MoSyms {
    /// ```text
    ///  Orbital symmetries:
    ///        Occupied  (A1) (A1) (B2) (A1) (B1)
    ///        Virtual   (A1) (B2)
    ///  The electronic state is 1-A1.
    /// ```
    fn gaussian(log: &LogStream) -> Vec<Vec<String>> {
        let mut spins: Vec<Vec<String>> = Vec::new();
        let mut in_block = false;

        for line in log.lines() {
            let trimmed = line.trim();
            if trimmed.starts_with("Orbital symmetries:") {
                spins = vec![Vec::new()];
                in_block = true;
                continue;
            }
            if !in_block {
                continue;
            }
            if trimmed.starts_with("Alpha Orbitals:") {
                continue;
            }
            if trimmed.starts_with("Beta  Orbitals:") || trimmed.starts_with("Beta Orbitals:") {
                spins.push(Vec::new());
                continue;
            }
            if !trimmed.contains('(') {
                in_block = false;
                continue;
            }

            let labels = trimmed
                .split_whitespace()
                .filter_map(|token| token.strip_prefix('(').and_then(|t| t.strip_suffix(')')))
                .map(str::to_string);
            if let Some(spin) = spins.last_mut() {
                spin.extend(labels);
            }
        }

        spins.retain(|spin| !spin.is_empty());
        spins
    }

    fn orca(log: &LogStream) -> Vec<Vec<String>> {
        orca_orbitals(log)
            .into_iter()
            .map(|spin| spin.into_iter().filter_map(|orbital| orbital.irrep).collect::<Vec<_>>())
            .filter(|spin| !spin.is_empty())
            .collect()
    }
}

impl AttributeExtractor for MoSyms {
    fn produces(&self) -> PropertyKey {
        PropertyKey::MoSyms
    }

    fn prerequisites(&self) -> &'static [PropertyKey] {
        &[PropertyKey::MoEnergies]
    }

    fn extract(&self, log: &LogStream, program: Program, record: &ResultRecord) -> Result<PropertyValue, ExtractError> {
        let symmetries = match program {
            Program::Gaussian => Self::gaussian(log),
            Program::Orca => Self::orca(log),
            _ => return Err(ExtractError::Unsupported),
        };
        if symmetries.is_empty() {
            return Err(not_found("no orbital symmetries"));
        }

        let energies = record
            .get(PropertyKey::MoEnergies)
            .and_then(PropertyValue::as_float_matrix)
            .unwrap_or_default();
        let expected: Vec<usize> = energies.iter().map(Vec::len).collect();
        let actual: Vec<usize> = symmetries.iter().map(Vec::len).collect();
        if expected != actual {
            return Err(malformed(format!(
                "{:?} symmetry labels for {:?} orbital energies",
                actual, expected
            )));
        }
        Ok(PropertyValue::TextMatrix(symmetries))
    }
}

/// Number of molecular orbitals
///
/// Gaussian reports the count of linearly independent functions directly;
/// otherwise it is the length of the first spin's orbital energies.
pub struct Nmo;

impl AttributeExtractor for Nmo {
    fn produces(&self) -> PropertyKey {
        PropertyKey::Nmo
    }

    fn prerequisites(&self) -> &'static [PropertyKey] {
        &[PropertyKey::MoEnergies]
    }

    fn extract(&self, log: &LogStream, program: Program, record: &ResultRecord) -> Result<PropertyValue, ExtractError> {
        if program == Program::Gaussian {
            // NBsUse=    24 1.00D-06 EigRej= -1.00D+00 NBFU=    24
            if let Some(nmo) = log.lines().find_map(|line| keyed_int(line, "NBsUse=")) {
                return Ok(PropertyValue::Int(nmo));
            }
        }

        let first = record
            .get(PropertyKey::MoEnergies)
            .and_then(PropertyValue::as_float_matrix)
            .and_then(|spins| spins.first())
            .ok_or_else(|| not_found("no orbital energies to count"))?;
        Ok(PropertyValue::Int(first.len() as i64))
    }
}
