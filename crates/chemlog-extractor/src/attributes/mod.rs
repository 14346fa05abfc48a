//! Concrete extractors, one per property key
//!
//! Each extractor branches on the program that wrote the log. Gaussian and
//! ORCA are supported; every other program is reported as unsupported so
//! the record slot stays unset.

mod basis;
mod electronic;
mod energies;
mod geometry;
mod orbitals;
pub(crate) mod scan;
mod scf;

pub use basis::{AoOverlaps, AtomBasis, Gbasis, Nbasis};
pub use electronic::{AtomCharges, Charge, CoreElectrons, Mult};
pub use energies::{CcEnergies, DispersionEnergies, ScfEnergies};
pub use geometry::{AtomCoords, AtomMasses, AtomNos, Natom};
pub use orbitals::{MoEnergies, MoSyms, Nmo};
pub use scan::HARTREE_TO_EV;
pub use scf::{ScfTargets, ScfValues};

use crate::extractor::AttributeExtractor;
use std::sync::Arc;

/// Extractors of the standard catalog, in run order
pub(crate) fn standard() -> Vec<Arc<dyn AttributeExtractor>> {
    vec![
        Arc::new(ScfEnergies),
        Arc::new(AtomCoords),
        Arc::new(AtomCharges),
        Arc::new(AtomNos),
        Arc::new(Charge),
        Arc::new(CcEnergies),
        Arc::new(DispersionEnergies),
        Arc::new(Mult),
        Arc::new(MoEnergies),
        Arc::new(Natom),
        Arc::new(CoreElectrons),
        Arc::new(Nbasis),
        Arc::new(Gbasis),
        Arc::new(AoOverlaps),
        Arc::new(AtomMasses),
        Arc::new(MoSyms),
        Arc::new(Nmo),
        Arc::new(AtomBasis),
        Arc::new(ScfTargets),
        Arc::new(ScfValues),
    ]
}
