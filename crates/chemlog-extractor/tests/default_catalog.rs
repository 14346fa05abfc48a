//! Integration tests for chemlog-extractor
//!
//! These tests drive whole logs through the public `ingest` entry point.

use chemlog_domain::{LogStream, MergePolicy, Program, PropertyKey, PropertyValue};
use chemlog_extractor::attributes::HARTREE_TO_EV;
use chemlog_extractor::{ingest, IngestConfig, IngestError, JobSplit};

const GAUSSIAN_OPT: &str = "\
 Entering Gaussian System, Link 0=g16
 Charge =  0 Multiplicity = 1
 NAtoms=      2 NActive=      2 NUniq=      1
                         Standard orientation:
 ---------------------------------------------------------------------
 Center     Atomic      Atomic             Coordinates (Angstroms)
 Number     Number       Type             X           Y           Z
 ---------------------------------------------------------------------
      1          1           0        0.000000    0.000000    0.370000
      2          1           0        0.000000    0.000000   -0.370000
 ---------------------------------------------------------------------
 SCF Done:  E(RHF) =  -1.11000000000     A.U. after    4 cycles
 Normal termination of Gaussian 16 at Mon Jan  1 00:00:00 2024.
 Entering Gaussian System, Link 0=g16
                         Standard orientation:
 ---------------------------------------------------------------------
 Center     Atomic      Atomic             Coordinates (Angstroms)
 Number     Number       Type             X           Y           Z
 ---------------------------------------------------------------------
      1          1           0        0.000000    0.000000    0.360000
      2          1           0        0.000000    0.000000   -0.360000
 ---------------------------------------------------------------------
 SCF Done:  E(RHF) =  -1.12000000000     A.U. after    3 cycles
 Normal termination of Gaussian 16 at Mon Jan  1 00:01:00 2024.
";

const ORCA_WATER: &str = "\
                                 * O   R   C   A *
 Total Charge           Charge          ....    0
 Multiplicity           Mult            ....    1
 Number of atoms                             ...      3
---------------------------------
CARTESIAN COORDINATES (ANGSTROEM)
---------------------------------
  O      0.000000    0.000000    0.117790
  H      0.000000    0.755453   -0.471161
  H      0.000000   -0.755453   -0.471161

Total Energy       :          -76.38098235 Eh           -2078.42245 eV
----------------
ORBITAL ENERGIES
----------------
                 SPIN UP ORBITALS
  NO   OCC          E(Eh)            E(eV)
   0   2.0000     -20.550919      -559.2201    1-A1
   1   2.0000      -1.335305       -36.3356    2-A1
   2   0.0000       0.158490         4.3128    3-A1

                             ****ORCA TERMINATED NORMALLY****
";

#[test]
fn test_gaussian_jobs_keep_first_values() {
    let report = ingest(&LogStream::new(GAUSSIAN_OPT), None, &IngestConfig::default()).unwrap();

    assert_eq!(report.program, Program::Gaussian);
    assert_eq!(report.jobs.len(), 2);
    assert!(report.combinator.contains('2'));

    let energies = report.record.get(PropertyKey::ScfEnergies).unwrap().as_float_list().unwrap();
    assert_eq!(energies.len(), 1);
    assert!((energies[0] - -1.11 * HARTREE_TO_EV).abs() < 1e-9);
    assert_eq!(report.record.get(PropertyKey::Natom), Some(&PropertyValue::Int(2)));
}

#[test]
fn test_gaussian_trajectory_accumulates() {
    let report = ingest(&LogStream::new(GAUSSIAN_OPT), None, &IngestConfig::trajectory()).unwrap();

    assert_eq!(report.record.policy(), MergePolicy::Accumulate);
    let energies = report.record.get(PropertyKey::ScfEnergies).unwrap().as_float_list().unwrap();
    assert_eq!(energies.len(), 2);
    let geometries = report.record.get(PropertyKey::AtomCoords).unwrap().as_trajectory().unwrap();
    assert_eq!(geometries.len(), 2);
    assert_eq!(geometries[1][0], [0.0, 0.0, 0.36]);
}

#[test]
fn test_whole_log_is_one_job() {
    let config = IngestConfig { job_split: JobSplit::Whole, ..IngestConfig::default() };
    let report = ingest(&LogStream::new(GAUSSIAN_OPT), Some(Program::Gaussian), &config).unwrap();

    assert_eq!(report.jobs.len(), 1);
    // One job sees both SCF blocks
    let energies = report.record.get(PropertyKey::ScfEnergies).unwrap().as_float_list().unwrap();
    assert_eq!(energies.len(), 2);
}

#[test]
fn test_orca_water() {
    let report = ingest(&LogStream::new(ORCA_WATER), None, &IngestConfig::single_job()).unwrap();
    let record = &report.record;

    assert_eq!(report.program, Program::Orca);
    assert_eq!(record.get(PropertyKey::Natom), Some(&PropertyValue::Int(3)));
    assert_eq!(record.get(PropertyKey::Charge), Some(&PropertyValue::Int(0)));
    assert_eq!(record.get(PropertyKey::Mult), Some(&PropertyValue::Int(1)));
    assert_eq!(record.get(PropertyKey::AtomNos), Some(&PropertyValue::IntList(vec![8, 1, 1])));
    assert_eq!(record.get(PropertyKey::CoreElectrons), Some(&PropertyValue::IntList(vec![0, 0, 0])));
    assert_eq!(record.get(PropertyKey::Nmo), Some(&PropertyValue::Int(3)));

    let energies = record.get(PropertyKey::ScfEnergies).unwrap().as_float_list().unwrap();
    assert!((energies[0] - -76.38098235 * HARTREE_TO_EV).abs() < 1e-6);

    let orbitals = record.get(PropertyKey::MoEnergies).unwrap().as_float_matrix().unwrap();
    assert_eq!(orbitals, &[vec![-559.2201, -36.3356, 4.3128]]);
    let symmetries = record.get(PropertyKey::MoSyms).unwrap().as_text_matrix().unwrap();
    assert_eq!(symmetries[0], vec!["A1", "A1", "A1"]);

    // Gaussian-only basis echo
    assert!(report.jobs[0].outcome(PropertyKey::Gbasis).unwrap().is_skipped());
    assert!(!record.is_present(PropertyKey::AtomBasis));
}

#[test]
fn test_report_serializes_to_json() {
    let report = ingest(&LogStream::new(ORCA_WATER), None, &IngestConfig::default()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

    assert_eq!(json["program"], "ORCA");
    assert_eq!(json["jobs"].as_array().unwrap().len(), 1);
}

#[test]
fn test_undetected_program_is_an_error() {
    let result = ingest(&LogStream::new("just some text\n"), None, &IngestConfig::default());
    assert!(matches!(result, Err(IngestError::UndetectedProgram)));
}

#[test]
fn test_empty_log_gives_empty_record() {
    let report = ingest(&LogStream::default(), Some(Program::Orca), &IngestConfig::default()).unwrap();

    assert_eq!(report.jobs.len(), 1);
    assert!(report.record.is_empty());
    assert_eq!(report.jobs[0].updated(), 0);
}
