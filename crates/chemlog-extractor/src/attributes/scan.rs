//! Line-scanning helpers shared by the concrete extractors

use crate::error::ExtractError;

/// Hartree to electronvolt (CODATA 2018)
pub const HARTREE_TO_EV: f64 = 27.211386245988;

const ELEMENTS: [&str; 86] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn",
];

/// Parse a float, accepting Fortran `D` exponents
pub fn parse_float(token: &str) -> Option<f64> {
    let token = token.trim();
    if token.contains(['D', 'd']) {
        token.replace(['D', 'd'], "E").parse().ok()
    } else {
        token.parse().ok()
    }
}

/// Parse an integer token
pub fn parse_int(token: &str) -> Option<i64> {
    token.trim().parse().ok()
}

/// First whitespace-delimited token following `key` on `line`
pub fn keyed<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let start = line.find(key)? + key.len();
    line[start..].split_whitespace().next()
}

/// Float following `key` on `line`, with one trailing `.` tolerated
pub fn keyed_float(line: &str, key: &str) -> Option<f64> {
    keyed(line, key).and_then(|token| parse_float(token.strip_suffix('.').unwrap_or(token)))
}

/// Integer following `key` on `line`
pub fn keyed_int(line: &str, key: &str) -> Option<i64> {
    keyed(line, key).and_then(parse_int)
}

/// Value after the `....` leader of an ORCA `Label   Short   ....  value` line
pub fn dotted_value(line: &str) -> Option<&str> {
    keyed(line, "....")
}

/// Integer value of the first ORCA `....` line starting with `label`
pub fn dotted_int(lines: std::str::Lines<'_>, label: &str) -> Option<i64> {
    lines
        .filter(|line| line.trim_start().starts_with(label))
        .find_map(|line| dotted_value(line).and_then(parse_int))
}

/// Last token of a line, parsed as a float
pub fn last_float(line: &str) -> Option<f64> {
    line.split_whitespace().last().and_then(parse_float)
}

/// Whether a line is a table rule (`----`, `====`)
pub fn is_rule(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 4 && trimmed.chars().all(|c| c == '-' || c == '=')
}

/// Atomic number of an element symbol (case-insensitive)
pub fn atomic_number(symbol: &str) -> Option<i64> {
    ELEMENTS
        .iter()
        .position(|element| element.eq_ignore_ascii_case(symbol))
        .map(|index| index as i64 + 1)
}

/// Leading element symbol of an ORCA atom label such as `0Pt` or `Pt`
pub fn label_symbol(label: &str) -> &str {
    label.trim_start_matches(|c: char| c.is_ascii_digit())
}

/// Shorthand for a `NotFound` error
pub fn not_found(what: &str) -> ExtractError {
    ExtractError::NotFound(what.to_string())
}

/// Shorthand for a `Malformed` error
pub fn malformed(what: impl Into<String>) -> ExtractError {
    ExtractError::Malformed(what.into())
}
