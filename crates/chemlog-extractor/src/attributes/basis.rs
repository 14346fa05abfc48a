//! Basis set: function count, shells, overlaps and per-atom function indices

use super::scan::{dotted_int, is_rule, keyed_int, malformed, not_found, parse_float, parse_int};
use crate::error::ExtractError;
use crate::extractor::AttributeExtractor;
use chemlog_domain::{LogStream, Program, PropertyKey, PropertyValue, ResultRecord, Shell};
use std::collections::BTreeMap;

/// Number of basis functions
pub struct Nbasis;

impl AttributeExtractor for Nbasis {
    fn produces(&self) -> PropertyKey {
        PropertyKey::Nbasis
    }

    fn extract(&self, log: &LogStream, program: Program, _record: &ResultRecord) -> Result<PropertyValue, ExtractError> {
        let nbasis = match program {
            //     24 basis functions,    46 primitive gaussians,    24 cartesian basis functions
            //  NBasis=    24 RedAO= T EigKep=  1.00D-06  NBF=    24
            Program::Gaussian => log.lines().find_map(|line| {
                keyed_int(line, "NBasis=").or_else(|| {
                    line.contains("basis functions,")
                        .then(|| line.split_whitespace().next().and_then(parse_int))
                        .flatten()
                })
            }),
            // Number of basis functions                   ...     24
            Program::Orca => log
                .lines()
                .filter(|line| line.trim_start().starts_with("Number of basis functions"))
                .find_map(|line| line.split_whitespace().last().and_then(parse_int))
                .or_else(|| dotted_int(log.lines(), "Basis Dimension")),
            _ => return Err(ExtractError::Unsupported),
        };
        nbasis.map(PropertyValue::Int).ok_or_else(|| not_found("no basis function count"))
    }
}

/// Contracted Gaussian shells per atom
///
/// Read from Gaussian's general-basis echo (`gfinput`). `SP` shells are
/// split into an `S` and a `P` shell sharing exponents.
pub struct Gbasis;

impl Gbasis {
    /// ```text
    ///  AO basis set in the form of general basis input (Overlap normalization):
    ///       1 0
    ///  S   3 1.00       0.000000000000
    ///       0.1307093214D+03  0.1543289673D+00
    ///  ****
    /// ```
    fn gaussian(log: &LogStream) -> Result<Vec<Vec<Shell>>, ExtractError> {
        let mut lines = log
            .lines()
            .skip_while(|line| !line.contains("AO basis set in the form of general basis input"))
            .skip(1);

        let mut atoms: Vec<Vec<Shell>> = Vec::new();
        let mut current: Vec<Shell> = Vec::new();

        while let Some(line) = lines.next() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            match tokens.as_slice() {
                [] => break,
                ["****"] => atoms.push(std::mem::take(&mut current)),
                [center, "0"] if parse_int(center).is_some() => {}
                [kind, count, ..] if kind.chars().all(|c| c.is_ascii_alphabetic()) => {
                    let count: usize = count
                        .parse()
                        .map_err(|_| malformed(format!("bad primitive count in {:?}", line.trim())))?;
                    let mut primitives = Vec::new();
                    for _ in 0..count {
                        let row: Option<Vec<f64>> = lines
                            .next()
                            .and_then(|row| row.split_whitespace().map(parse_float).collect());
                        match row {
                            Some(row) if row.len() >= 2 => primitives.push(row),
                            _ => return Err(malformed(format!("truncated {} shell", kind))),
                        }
                    }

                    if *kind == "SP" {
                        current.push(shell("S", &primitives, 1));
                        current.push(shell("P", &primitives, 2));
                    } else {
                        current.push(shell(kind, &primitives, 1));
                    }
                }
                _ => return Err(malformed(format!("unexpected basis line {:?}", line.trim()))),
            }
        }

        Ok(atoms)
    }
}

fn shell(kind: &str, primitives: &[Vec<f64>], column: usize) -> Shell {
    Shell {
        kind: kind.to_string(),
        primitives: primitives
            .iter()
            .map(|row| (row[0], row.get(column).copied().unwrap_or(0.0)))
            .collect(),
    }
}

impl AttributeExtractor for Gbasis {
    fn produces(&self) -> PropertyKey {
        PropertyKey::Gbasis
    }

    fn extract(&self, log: &LogStream, program: Program, _record: &ResultRecord) -> Result<PropertyValue, ExtractError> {
        if program != Program::Gaussian {
            return Err(ExtractError::Unsupported);
        }
        let atoms = Self::gaussian(log)?;
        if atoms.is_empty() {
            return Err(not_found("no general basis echo (run with gfinput)"));
        }
        Ok(PropertyValue::Basis(atoms))
    }
}

/// Atomic orbital overlap matrix
///
/// Gaussian prints the lower triangle with 1-based indices; ORCA prints the
/// full matrix with 0-based indices. Both are read into a full symmetric
/// matrix.
pub struct AoOverlaps;

impl AoOverlaps {
    fn read<'a>(lines: impl Iterator<Item = &'a str>, base: usize) -> Result<Vec<Vec<f64>>, ExtractError> {
        let mut entries: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        let mut columns: Vec<usize> = Vec::new();
        let mut size = 0;

        for line in lines {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() || is_rule(line) {
                if entries.is_empty() {
                    continue;
                }
                break;
            }

            let indices: Option<Vec<usize>> = tokens.iter().map(|t| t.parse().ok()).collect();
            if let Some(indices) = indices {
                // Column header of the next block
                columns = indices;
                continue;
            }

            let Some(row) = tokens[0].parse::<usize>().ok() else {
                break;
            };
            let values: Option<Vec<f64>> = tokens[1..].iter().map(|t| parse_float(t)).collect();
            let Some(values) = values else {
                break;
            };
            if values.len() > columns.len() {
                return Err(malformed(format!("row {} is wider than its column header", row)));
            }

            let row = row
                .checked_sub(base)
                .ok_or_else(|| malformed(format!("overlap index {} below {}", row, base)))?;
            for (column, value) in columns.iter().zip(values) {
                let column = column
                    .checked_sub(base)
                    .ok_or_else(|| malformed(format!("overlap index {} below {}", column, base)))?;
                entries.insert((row, column), value);
                entries.insert((column, row), value);
                size = size.max(row + 1).max(column + 1);
            }
        }

        // Every index up to the largest must have a full row
        if size.checked_mul(size) != Some(entries.len()) {
            return Err(malformed(format!(
                "overlap matrix of order {} has {} entries",
                size,
                entries.len()
            )));
        }

        let mut matrix = vec![vec![0.0; size]; size];
        for ((row, column), value) in entries {
            matrix[row][column] = value;
        }
        Ok(matrix)
    }
}

impl AttributeExtractor for AoOverlaps {
    fn produces(&self) -> PropertyKey {
        PropertyKey::AoOverlaps
    }

    fn extract(&self, log: &LogStream, program: Program, _record: &ResultRecord) -> Result<PropertyValue, ExtractError> {
        let (header, base): (fn(&str) -> bool, usize) = match program {
            Program::Gaussian => (|line| line.contains("*** Overlap ***"), 1),
            Program::Orca => (|line| line.trim() == "OVERLAP MATRIX", 0),
            _ => return Err(ExtractError::Unsupported),
        };

        let Some(start) = log.lines().position(header) else {
            return Err(not_found("no overlap matrix (needs IOp(3/33=1) or print[p_overlap])"));
        };
        // Gaussian prints the next matrix straight after this one
        let block = log
            .lines()
            .skip(start + 1)
            .take_while(|line| !line.trim_start().starts_with("***"));
        let matrix = Self::read(block, base)?;
        if matrix.is_empty() {
            return Err(malformed("overlap matrix has no entries"));
        }
        Ok(PropertyValue::FloatMatrix(matrix))
    }
}

/// Basis function indices belonging to each atom, derived from `gbasis`
pub struct AtomBasis;

impl AtomBasis {
    /// Functions per shell; Cartesian `D`/`F` when the log says so
    fn functions(kind: &str, cartesian_d: bool, cartesian_f: bool) -> Result<usize, ExtractError> {
        Ok(match kind {
            "S" => 1,
            "P" => 3,
            "D" if cartesian_d => 6,
            "D" => 5,
            "F" if cartesian_f => 10,
            "F" => 7,
            "G" => 9,
            "H" => 11,
            _ => return Err(malformed(format!("unknown shell type {}", kind))),
        })
    }
}

impl AttributeExtractor for AtomBasis {
    fn produces(&self) -> PropertyKey {
        PropertyKey::AtomBasis
    }

    fn prerequisites(&self) -> &'static [PropertyKey] {
        &[PropertyKey::Gbasis]
    }

    fn extract(&self, log: &LogStream, program: Program, record: &ResultRecord) -> Result<PropertyValue, ExtractError> {
        if program != Program::Gaussian {
            return Err(ExtractError::Unsupported);
        }
        let atoms = record
            .get(PropertyKey::Gbasis)
            .and_then(PropertyValue::as_basis)
            .ok_or_else(|| malformed("gbasis is not a basis set"))?;

        // Standard basis: 6-31G(d) (6D, 7F)
        let cartesian_d = log.contains("(6D,");
        let cartesian_f = log.contains("10F)");

        let mut next = 0;
        let mut indices = Vec::with_capacity(atoms.len());
        for shells in atoms {
            let mut owned = Vec::new();
            for shell in shells {
                let count = Self::functions(&shell.kind, cartesian_d, cartesian_f)?;
                owned.extend(next..next + count);
                next += count;
            }
            indices.push(owned);
        }

        if let Some(nbasis) = record.get(PropertyKey::Nbasis).and_then(PropertyValue::as_int) {
            if nbasis != next as i64 {
                return Err(malformed(format!("{} functions from gbasis, nbasis is {}", next, nbasis)));
            }
        }
        Ok(PropertyValue::IndexLists(indices))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GBASIS: &str = "\
 Standard basis: STO-3G (5D, 7F)
 AO basis set in the form of general basis input (Overlap normalization):
      1 0
 S   3 1.00       0.000000000000
      0.1307093214D+03  0.1543289673D+00
      0.2380886605D+02  0.5353281423D+00
      0.6443608313D+01  0.4446345422D+00
 SP   3 1.00       0.000000000000
      0.5033151319D+01 -0.9996722919D-01  0.1559162750D+00
      0.1169596125D+01  0.3995128261D+00  0.6076837186D+00
      0.3803889600D+00  0.7001154689D+00  0.3919573931D+00
 ****
      2 0
 S   3 1.00       0.000000000000
      0.3425250914D+01  0.1543289673D+00
      0.6239137298D+00  0.5353281423D+00
      0.1688554040D+00  0.4446345422D+00
 ****

     6 basis functions,    18 primitive gaussians,     6 cartesian basis functions
";

    fn run(extractor: &dyn AttributeExtractor, program: Program, text: &str, record: &ResultRecord) -> Result<PropertyValue, ExtractError> {
        extractor.extract(&LogStream::new(text), program, record)
    }

    #[test]
    fn test_nbasis() {
        let record = ResultRecord::new();
        assert_eq!(run(&Nbasis, Program::Gaussian, GBASIS, &record).unwrap(), PropertyValue::Int(6));
        assert_eq!(
            run(&Nbasis, Program::Gaussian, " NBasis=    24 RedAO= T\n", &record).unwrap(),
            PropertyValue::Int(24)
        );
        let orca = " Number of basis functions                   ...     24\n";
        assert_eq!(run(&Nbasis, Program::Orca, orca, &record).unwrap(), PropertyValue::Int(24));
    }

    #[test]
    fn test_gbasis_splits_sp_shells() {
        let value = run(&Gbasis, Program::Gaussian, GBASIS, &ResultRecord::new()).unwrap();
        let atoms = value.as_basis().unwrap();
        assert_eq!(atoms.len(), 2);

        let kinds: Vec<&str> = atoms[0].iter().map(|shell| shell.kind.as_str()).collect();
        assert_eq!(kinds, vec!["S", "S", "P"]);
        assert_eq!(atoms[0][2].primitives[0], (5.033151319, 0.1559162750));
        assert_eq!(atoms[1].len(), 1);
    }

    #[test]
    fn test_gbasis_is_gaussian_only() {
        let err = run(&Gbasis, Program::Orca, GBASIS, &ResultRecord::new()).unwrap_err();
        assert_eq!(err, ExtractError::Unsupported);
    }

    #[test]
    fn test_atombasis_from_gbasis() {
        let log = LogStream::new(GBASIS);
        let mut record = ResultRecord::new();
        let gbasis = Gbasis.extract(&log, Program::Gaussian, &record).unwrap();
        record.set(PropertyKey::Gbasis, gbasis);
        record.set(PropertyKey::Nbasis, PropertyValue::Int(6));

        let value = AtomBasis.extract(&log, Program::Gaussian, &record).unwrap();
        assert_eq!(value, PropertyValue::IndexLists(vec![vec![0, 1, 2, 3, 4], vec![5]]));

        record.set(PropertyKey::Nbasis, PropertyValue::Int(9));
        assert!(matches!(AtomBasis.extract(&log, Program::Gaussian, &record), Err(ExtractError::Malformed(_))));
    }

    #[test]
    fn test_gaussian_lower_triangle_overlaps() {
        let text = "\
 *** Overlap ***
                1             2             3
      1  0.100000D+01
      2  0.250000D+00  0.100000D+01
      3  0.000000D+00  0.500000D+00  0.100000D+01
 *** Kinetic Energy ***
      1  0.700000D+01
";
        let value = run(&AoOverlaps, Program::Gaussian, text, &ResultRecord::new()).unwrap();
        assert_eq!(
            value,
            PropertyValue::FloatMatrix(vec![
                vec![1.0, 0.25, 0.0],
                vec![0.25, 1.0, 0.5],
                vec![0.0, 0.5, 1.0],
            ])
        );
    }

    #[test]
    fn test_orca_full_overlaps() {
        let text = "\
------------------
OVERLAP MATRIX
------------------
                  0          1
      0       1.000000   0.250000
      1       0.250000   1.000000

";
        let value = run(&AoOverlaps, Program::Orca, text, &ResultRecord::new()).unwrap();
        assert_eq!(value, PropertyValue::FloatMatrix(vec![vec![1.0, 0.25], vec![0.25, 1.0]]));
    }

    #[test]
    fn test_gbasis_huge_primitive_count_is_malformed() {
        let text = "\
 AO basis set in the form of general basis input (Overlap normalization):
      1 0
 S   9999999999999999999 1.00       0.000000000000
      0.1307093214D+03  0.1543289673D+00
 ****
";
        let err = run(&Gbasis, Program::Gaussian, text, &ResultRecord::new()).unwrap_err();
        assert!(matches!(err, ExtractError::Malformed(_)));
    }

    #[test]
    fn test_sparse_overlap_index_is_malformed() {
        let text = "\
 *** Overlap ***
                1             4611686018427387904
      1  0.100000D+01  0.250000D+00
 *** Kinetic Energy ***
";
        let err = run(&AoOverlaps, Program::Gaussian, text, &ResultRecord::new()).unwrap_err();
        assert!(matches!(err, ExtractError::Malformed(_)));

        let gappy = "\
------------------
OVERLAP MATRIX
------------------
                  0          2
      0       1.000000   0.250000

";
        let err = run(&AoOverlaps, Program::Orca, gappy, &ResultRecord::new()).unwrap_err();
        assert!(matches!(err, ExtractError::Malformed(_)));
    }

    #[test]
    fn test_missing_overlaps() {
        let err = run(&AoOverlaps, Program::Gaussian, "nothing\n", &ResultRecord::new()).unwrap_err();
        assert!(matches!(err, ExtractError::NotFound(_)));
    }
}
