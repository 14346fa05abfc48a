//! Attribute extractor contract

use crate::error::ExtractError;
use chemlog_domain::{LogStream, MergePolicy, Program, PropertyKey, PropertyValue, ResultRecord};
use chemlog_gatekeeper::{Gate, GateDecision};
use serde::Serialize;
use std::fmt;

/// Why an extractor did not run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// Prerequisites are still unset
    DependencyUnmet {
        /// Unset prerequisites
        missing: Vec<PropertyKey>,
    },

    /// The property is already present and the record keeps first values
    AlreadyPresent,

    /// The extractor has no pattern for this program
    UnsupportedProgram {
        /// Program that produced the log
        program: Program,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::DependencyUnmet { missing } => {
                let names: Vec<&str> = missing.iter().map(|key| key.name()).collect();
                write!(f, "dependency unmet: {}", names.join(", "))
            }
            SkipReason::AlreadyPresent => f.write_str("already present"),
            SkipReason::UnsupportedProgram { program } => write!(f, "unsupported program: {}", program),
        }
    }
}

/// Result of running one extractor
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    /// The listed keys were written
    Updated(Vec<PropertyKey>),

    /// The extractor did not consult the log, or found nothing to do
    Skipped(SkipReason),

    /// Prerequisites were met but the log could not provide the property
    Failed(String),
}

impl Outcome {
    /// Whether the record was written
    pub fn is_updated(&self) -> bool {
        matches!(self, Outcome::Updated(_))
    }

    /// Whether the extractor was skipped
    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped(_))
    }

    /// Whether the extractor failed
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// Whether the gate denied the extractor
    pub fn is_dependency_unmet(&self) -> bool {
        matches!(self, Outcome::Skipped(SkipReason::DependencyUnmet { .. }))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Updated(keys) => {
                let names: Vec<&str> = keys.iter().map(|key| key.name()).collect();
                write!(f, "updated {}", names.join(", "))
            }
            Outcome::Skipped(reason) => write!(f, "skipped ({})", reason),
            Outcome::Failed(diagnostic) => write!(f, "failed ({})", diagnostic),
        }
    }
}

/// Reads one property out of a log
///
/// Implemented once per property. Implementations are stateless: they only
/// read the log and the record passed in and return a value for the key
/// they produce. They never write to the record themselves; callers go
/// through [`GatedExtractor::parse`], which checks the gate first and
/// writes only [`AttributeExtractor::produces`].
pub trait AttributeExtractor: Send + Sync {
    /// Key this extractor writes
    fn produces(&self) -> PropertyKey;

    /// Keys that must be present before this extractor may run
    fn prerequisites(&self) -> &'static [PropertyKey] {
        &[]
    }

    /// Scan the log for the property
    ///
    /// `record` is read-only; prerequisites are guaranteed present when this
    /// is called through [`GatedExtractor::parse`].
    fn extract(
        &self,
        log: &LogStream,
        program: Program,
        record: &ResultRecord,
    ) -> Result<PropertyValue, ExtractError>;
}

/// Gated entry point shared by every extractor
///
/// Blanket-implemented for all [`AttributeExtractor`]s, so no implementation
/// can bypass the gate or write a key it is not registered for.
pub trait GatedExtractor {
    /// Run the extractor against `record`
    ///
    /// 1. Gate on prerequisites; closed → `Skipped(DependencyUnmet)`
    /// 2. Key present under `KeepFirst` → `Skipped(AlreadyPresent)`
    /// 3. Extract and merge → `Updated`, `Skipped(UnsupportedProgram)` or `Failed`
    fn parse(&self, log: &LogStream, program: Program, record: &mut ResultRecord) -> Outcome;
}

impl<T: AttributeExtractor + ?Sized> GatedExtractor for T {
    fn parse(&self, log: &LogStream, program: Program, record: &mut ResultRecord) -> Outcome {
        let key = self.produces();

        if let GateDecision::Closed { missing } = Gate::evaluate(self.prerequisites(), record) {
            return Outcome::Skipped(SkipReason::DependencyUnmet { missing });
        }

        if record.policy() == MergePolicy::KeepFirst && record.is_present(key) {
            return Outcome::Skipped(SkipReason::AlreadyPresent);
        }

        match self.extract(log, program, record) {
            Ok(value) => {
                if record.merge(key, value).changed() {
                    Outcome::Updated(vec![key])
                } else {
                    Outcome::Skipped(SkipReason::AlreadyPresent)
                }
            }
            Err(ExtractError::Unsupported) => {
                Outcome::Skipped(SkipReason::UnsupportedProgram { program })
            }
            Err(e) => Outcome::Failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Reports how often the log was consulted
    struct Recorder {
        key: PropertyKey,
        requires: &'static [PropertyKey],
        result: Result<PropertyValue, ExtractError>,
        calls: AtomicUsize,
    }

    impl Recorder {
        fn new(key: PropertyKey, requires: &'static [PropertyKey], result: Result<PropertyValue, ExtractError>) -> Self {
            Self { key, requires, result, calls: AtomicUsize::new(0) }
        }
    }

    impl AttributeExtractor for Recorder {
        fn produces(&self) -> PropertyKey {
            self.key
        }

        fn prerequisites(&self) -> &'static [PropertyKey] {
            self.requires
        }

        fn extract(&self, _log: &LogStream, _program: Program, _record: &ResultRecord) -> Result<PropertyValue, ExtractError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    #[test]
    fn test_dependency_unmet_skips_without_reading_log() {
        let recorder = Recorder::new(PropertyKey::CoreElectrons, &[PropertyKey::Natom], Ok(PropertyValue::IntList(vec![0])));
        let mut record = ResultRecord::new();

        let outcome = recorder.parse(&LogStream::default(), Program::Gaussian, &mut record);

        assert_eq!(
            outcome,
            Outcome::Skipped(SkipReason::DependencyUnmet { missing: vec![PropertyKey::Natom] })
        );
        assert_eq!(recorder.calls.load(Ordering::SeqCst), 0);
        assert!(record.is_empty());
    }

    #[test]
    fn test_updates_only_produced_key() {
        let recorder = Recorder::new(PropertyKey::Natom, &[], Ok(PropertyValue::Int(3)));
        let mut record = ResultRecord::new();

        let outcome = recorder.parse(&LogStream::default(), Program::Gaussian, &mut record);

        assert_eq!(outcome, Outcome::Updated(vec![PropertyKey::Natom]));
        assert_eq!(record.present_keys().collect::<Vec<_>>(), vec![PropertyKey::Natom]);
    }

    #[test]
    fn test_failure_leaves_key_unset() {
        let recorder = Recorder::new(PropertyKey::Nbasis, &[], Err(ExtractError::NotFound("no basis summary".to_string())));
        let mut record = ResultRecord::new();

        let outcome = recorder.parse(&LogStream::default(), Program::Orca, &mut record);

        assert!(outcome.is_failed());
        assert!(outcome.to_string().contains("no basis summary"));
        assert!(!record.is_present(PropertyKey::Nbasis));
    }

    #[test]
    fn test_unsupported_program_is_skipped() {
        let recorder = Recorder::new(PropertyKey::Gbasis, &[], Err(ExtractError::Unsupported));
        let mut record = ResultRecord::new();

        let outcome = recorder.parse(&LogStream::default(), Program::Psi4, &mut record);

        assert_eq!(
            outcome,
            Outcome::Skipped(SkipReason::UnsupportedProgram { program: Program::Psi4 })
        );
    }

    #[test]
    fn test_keep_first_skips_present_key() {
        let recorder = Recorder::new(PropertyKey::Charge, &[], Ok(PropertyValue::Int(1)));
        let mut record = ResultRecord::new();
        record.set(PropertyKey::Charge, PropertyValue::Int(0));

        let outcome = recorder.parse(&LogStream::default(), Program::Gaussian, &mut record);

        assert_eq!(outcome, Outcome::Skipped(SkipReason::AlreadyPresent));
        assert_eq!(recorder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(record.get(PropertyKey::Charge), Some(&PropertyValue::Int(0)));
    }

    #[test]
    fn test_overwrite_replaces_present_key() {
        let recorder = Recorder::new(PropertyKey::Charge, &[], Ok(PropertyValue::Int(1)));
        let mut record = ResultRecord::with_policy(MergePolicy::Overwrite);
        record.set(PropertyKey::Charge, PropertyValue::Int(0));

        let outcome = recorder.parse(&LogStream::default(), Program::Gaussian, &mut record);

        assert!(outcome.is_updated());
        assert_eq!(record.get(PropertyKey::Charge), Some(&PropertyValue::Int(1)));
    }

    #[test]
    fn test_zero_prerequisite_opens_gate() {
        let recorder = Recorder::new(PropertyKey::CoreElectrons, &[PropertyKey::Natom], Ok(PropertyValue::IntList(vec![])));
        let mut record = ResultRecord::new();
        record.set(PropertyKey::Natom, PropertyValue::Int(0));

        let outcome = recorder.parse(&LogStream::default(), Program::Gaussian, &mut record);

        assert!(!outcome.is_dependency_unmet());
        assert!(outcome.is_updated());
    }

    #[test]
    fn test_outcome_display() {
        let outcome = Outcome::Skipped(SkipReason::DependencyUnmet { missing: vec![PropertyKey::Natom] });
        assert_eq!(outcome.to_string(), "skipped (dependency unmet: natom)");
        assert_eq!(Outcome::Updated(vec![PropertyKey::Mult]).to_string(), "updated mult");
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = Outcome::Skipped(SkipReason::AlreadyPresent);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["detail"]["reason"], "already_present");
    }
}
