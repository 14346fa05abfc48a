//! Property module - the closed set of extractable properties and their values

use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a property that can be extracted from a log
///
/// The set is closed: an extractor, a catalog entry or a CLI argument can
/// only ever name one of these keys, so a typo is caught when the name is
/// parsed rather than when a record is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKey {
    /// SCF energies, one per converged SCF cycle (eV)
    ScfEnergies,
    /// Atom coordinates per geometry (Å)
    AtomCoords,
    /// Atomic partial charges keyed by population scheme
    AtomCharges,
    /// Atomic numbers
    AtomNos,
    /// Total molecular charge
    Charge,
    /// Coupled-cluster energies (eV)
    CcEnergies,
    /// Empirical dispersion corrections (eV)
    DispersionEnergies,
    /// Spin multiplicity
    Mult,
    /// Molecular orbital energies per spin (eV)
    MoEnergies,
    /// Number of atoms
    Natom,
    /// Core electrons replaced by pseudopotentials, per atom
    CoreElectrons,
    /// Number of basis functions
    Nbasis,
    /// Gaussian basis set per atom
    Gbasis,
    /// Atomic orbital overlap matrix
    AoOverlaps,
    /// Atomic masses (amu)
    AtomMasses,
    /// Molecular orbital symmetry labels per spin
    MoSyms,
    /// Number of molecular orbitals
    Nmo,
    /// Basis function indices belonging to each atom
    AtomBasis,
    /// SCF convergence targets per SCF run
    ScfTargets,
    /// SCF convergence values per iteration, per SCF run
    ScfValues,
}

impl PropertyKey {
    /// Every key, in declaration order
    pub const ALL: [PropertyKey; 20] = [
        PropertyKey::ScfEnergies,
        PropertyKey::AtomCoords,
        PropertyKey::AtomCharges,
        PropertyKey::AtomNos,
        PropertyKey::Charge,
        PropertyKey::CcEnergies,
        PropertyKey::DispersionEnergies,
        PropertyKey::Mult,
        PropertyKey::MoEnergies,
        PropertyKey::Natom,
        PropertyKey::CoreElectrons,
        PropertyKey::Nbasis,
        PropertyKey::Gbasis,
        PropertyKey::AoOverlaps,
        PropertyKey::AtomMasses,
        PropertyKey::MoSyms,
        PropertyKey::Nmo,
        PropertyKey::AtomBasis,
        PropertyKey::ScfTargets,
        PropertyKey::ScfValues,
    ];

    /// Number of keys in the closed set
    pub const COUNT: usize = Self::ALL.len();

    /// Dense index of this key, usable for slot tables
    pub fn index(self) -> usize {
        self as usize
    }

    /// Canonical short name (the name records are serialized under)
    pub fn name(self) -> &'static str {
        match self {
            PropertyKey::ScfEnergies => "scfenergies",
            PropertyKey::AtomCoords => "atomcoords",
            PropertyKey::AtomCharges => "atomcharges",
            PropertyKey::AtomNos => "atomnos",
            PropertyKey::Charge => "charge",
            PropertyKey::CcEnergies => "ccenergies",
            PropertyKey::DispersionEnergies => "dispersionenergies",
            PropertyKey::Mult => "mult",
            PropertyKey::MoEnergies => "moenergies",
            PropertyKey::Natom => "natom",
            PropertyKey::CoreElectrons => "coreelectrons",
            PropertyKey::Nbasis => "nbasis",
            PropertyKey::Gbasis => "gbasis",
            PropertyKey::AoOverlaps => "aooverlaps",
            PropertyKey::AtomMasses => "atommasses",
            PropertyKey::MoSyms => "mosyms",
            PropertyKey::Nmo => "nmo",
            PropertyKey::AtomBasis => "atombasis",
            PropertyKey::ScfTargets => "scftargets",
            PropertyKey::ScfValues => "scfvalues",
        }
    }

    /// Descriptive alias, also accepted by [`PropertyKey::parse`]
    pub fn alias(self) -> &'static str {
        match self {
            PropertyKey::ScfEnergies => "scf_energies",
            PropertyKey::AtomCoords => "atom_coordinates",
            PropertyKey::AtomCharges => "atom_charges",
            PropertyKey::AtomNos => "atomic_numbers",
            PropertyKey::Charge => "molecular_charge",
            PropertyKey::CcEnergies => "coupled_cluster_energies",
            PropertyKey::DispersionEnergies => "dispersion_energies",
            PropertyKey::Mult => "multiplicity",
            PropertyKey::MoEnergies => "orbital_energies",
            PropertyKey::Natom => "atom_count",
            PropertyKey::CoreElectrons => "core_electron_count",
            PropertyKey::Nbasis => "basis_function_count",
            PropertyKey::Gbasis => "gaussian_basis",
            PropertyKey::AoOverlaps => "overlap_matrix",
            PropertyKey::AtomMasses => "atom_masses",
            PropertyKey::MoSyms => "orbital_symmetries",
            PropertyKey::Nmo => "orbital_count",
            PropertyKey::AtomBasis => "atom_basis_indices",
            PropertyKey::ScfTargets => "scf_targets",
            PropertyKey::ScfValues => "scf_values",
        }
    }

    /// Parse a key from its short name or alias (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.name() == wanted || key.alias() == wanted)
    }
}

impl PropertyKey {
    /// Whether values of this key grow with each job under `Accumulate`
    ///
    /// Only per-step quantities accumulate. Per-atom, per-orbital and
    /// per-basis-function properties describe the system, not a step, so a
    /// later job replaces them.
    pub fn accumulates(self) -> bool {
        matches!(
            self,
            PropertyKey::ScfEnergies
                | PropertyKey::AtomCoords
                | PropertyKey::CcEnergies
                | PropertyKey::DispersionEnergies
                | PropertyKey::ScfTargets
                | PropertyKey::ScfValues
        )
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for PropertyKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| DomainError::UnknownProperty(s.to_string()))
    }
}

/// One contracted shell of a Gaussian basis set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shell {
    /// Angular momentum label (`S`, `P`, `D`, ...)
    pub kind: String,

    /// `(exponent, coefficient)` pairs
    pub primitives: Vec<(f64, f64)>,
}

/// Value stored in a present slot
///
/// Variants cover the shapes the standard properties take. Serialized
/// untagged, so JSON consumers see plain numbers, arrays and maps.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Scalar integer (counts, charge, multiplicity)
    Int(i64),
    /// Scalar float
    Float(f64),
    /// Integer sequence
    IntList(Vec<i64>),
    /// Float sequence
    FloatList(Vec<f64>),
    /// Rows of floats (per-spin energies, square matrices, per-run values)
    FloatMatrix(Vec<Vec<f64>>),
    /// Runs of triples: xyz per atom per geometry, or convergence values per SCF iteration
    Trajectory(Vec<Vec<[f64; 3]>>),
    /// Rows of labels
    TextMatrix(Vec<Vec<String>>),
    /// Named float sequences
    Charges(BTreeMap<String, Vec<f64>>),
    /// Shells per atom
    Basis(Vec<Vec<Shell>>),
    /// Index sequences per owner
    IndexLists(Vec<Vec<usize>>),
}

impl PropertyValue {
    /// Short name of the variant, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::Int(_) => "int",
            PropertyValue::Float(_) => "float",
            PropertyValue::IntList(_) => "int list",
            PropertyValue::FloatList(_) => "float list",
            PropertyValue::FloatMatrix(_) => "float matrix",
            PropertyValue::Trajectory(_) => "trajectory",
            PropertyValue::TextMatrix(_) => "text matrix",
            PropertyValue::Charges(_) => "charges",
            PropertyValue::Basis(_) => "basis",
            PropertyValue::IndexLists(_) => "index lists",
        }
    }

    /// Whether this value is a sequence that can be extended
    pub fn is_sequence(&self) -> bool {
        !matches!(self, PropertyValue::Int(_) | PropertyValue::Float(_))
    }

    /// Whether [`PropertyValue::extend_with`] would accept `other`
    pub fn can_extend_with(&self, other: &PropertyValue) -> bool {
        self.is_sequence() && std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Integer scalar, if this is one
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Integer sequence, if this is one
    pub fn as_int_list(&self) -> Option<&[i64]> {
        match self {
            PropertyValue::IntList(v) => Some(v),
            _ => None,
        }
    }

    /// Float sequence, if this is one
    pub fn as_float_list(&self) -> Option<&[f64]> {
        match self {
            PropertyValue::FloatList(v) => Some(v),
            _ => None,
        }
    }

    /// Float rows, if this is a matrix
    pub fn as_float_matrix(&self) -> Option<&[Vec<f64>]> {
        match self {
            PropertyValue::FloatMatrix(v) => Some(v),
            _ => None,
        }
    }

    /// Geometries, if this is a trajectory
    pub fn as_trajectory(&self) -> Option<&[Vec<[f64; 3]>]> {
        match self {
            PropertyValue::Trajectory(v) => Some(v),
            _ => None,
        }
    }

    /// Label rows, if this is a text matrix
    pub fn as_text_matrix(&self) -> Option<&[Vec<String>]> {
        match self {
            PropertyValue::TextMatrix(v) => Some(v),
            _ => None,
        }
    }

    /// Named charge sets, if this is one
    pub fn as_charges(&self) -> Option<&BTreeMap<String, Vec<f64>>> {
        match self {
            PropertyValue::Charges(v) => Some(v),
            _ => None,
        }
    }

    /// Per-atom shells, if this is a basis
    pub fn as_basis(&self) -> Option<&[Vec<Shell>]> {
        match self {
            PropertyValue::Basis(v) => Some(v),
            _ => None,
        }
    }

    /// Index sequences, if this is one
    pub fn as_index_lists(&self) -> Option<&[Vec<usize>]> {
        match self {
            PropertyValue::IndexLists(v) => Some(v),
            _ => None,
        }
    }

    /// Append `other` to this value when both are sequences of the same shape
    ///
    /// Returns `false` (leaving `self` untouched) for scalars or mismatched
    /// shapes. Charge maps extend per scheme.
    pub fn extend_with(&mut self, other: PropertyValue) -> bool {
        match (self, other) {
            (PropertyValue::IntList(a), PropertyValue::IntList(b)) => a.extend(b),
            (PropertyValue::FloatList(a), PropertyValue::FloatList(b)) => a.extend(b),
            (PropertyValue::FloatMatrix(a), PropertyValue::FloatMatrix(b)) => a.extend(b),
            (PropertyValue::Trajectory(a), PropertyValue::Trajectory(b)) => a.extend(b),
            (PropertyValue::TextMatrix(a), PropertyValue::TextMatrix(b)) => a.extend(b),
            (PropertyValue::Basis(a), PropertyValue::Basis(b)) => a.extend(b),
            (PropertyValue::IndexLists(a), PropertyValue::IndexLists(b)) => a.extend(b),
            (PropertyValue::Charges(a), PropertyValue::Charges(b)) => {
                for (scheme, values) in b {
                    a.entry(scheme).or_default().extend(values);
                }
            }
            _ => return false,
        }
        true
    }

    /// Short human-readable rendering (scalars in full, sequences by shape)
    pub fn summary(&self) -> String {
        match self {
            PropertyValue::Int(v) => v.to_string(),
            PropertyValue::Float(v) => format!("{:.6}", v),
            PropertyValue::IntList(v) => format!("[{} ints]", v.len()),
            PropertyValue::FloatList(v) => format!("[{} floats]", v.len()),
            PropertyValue::FloatMatrix(v) => {
                let cols = v.first().map_or(0, Vec::len);
                format!("[{} x {}]", v.len(), cols)
            }
            PropertyValue::Trajectory(v) => {
                let inner = v.first().map_or(0, Vec::len);
                format!("[{} x {} triples]", v.len(), inner)
            }
            PropertyValue::TextMatrix(v) => {
                let cols = v.first().map_or(0, Vec::len);
                format!("[{} x {} labels]", v.len(), cols)
            }
            PropertyValue::Charges(v) => {
                let schemes: Vec<&str> = v.keys().map(String::as_str).collect();
                format!("{{{}}}", schemes.join(", "))
            }
            PropertyValue::Basis(v) => {
                let shells: usize = v.iter().map(Vec::len).sum();
                format!("[{} atoms, {} shells]", v.len(), shells)
            }
            PropertyValue::IndexLists(v) => format!("[{} lists]", v.len()),
        }
    }
}
