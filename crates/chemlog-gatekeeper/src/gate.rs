//! Dependency gate logic

use chemlog_domain::{PropertyKey, ResultRecord};

/// Result of evaluating a set of prerequisites against a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Every prerequisite is present
    Open,

    /// Some prerequisites are unset
    Closed {
        /// Unset prerequisites, in the order they were declared
        missing: Vec<PropertyKey>,
    },
}

impl GateDecision {
    /// Whether the extractor may run
    pub fn is_open(&self) -> bool {
        matches!(self, GateDecision::Open)
    }

    /// Unset prerequisites (empty when open)
    pub fn missing(&self) -> &[PropertyKey] {
        match self {
            GateDecision::Open => &[],
            GateDecision::Closed { missing } => missing,
        }
    }
}

/// The Gate checks prerequisites before an extractor touches the log
///
/// Stateless; the record is only ever borrowed immutably.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gate;

impl Gate {
    /// Evaluate `required` against `record`
    ///
    /// # Arguments
    ///
    /// * `required` - Prerequisite keys declared by an extractor
    /// * `record` - The session's result record
    ///
    /// # Returns
    ///
    /// `Open` when every key is present (always for an empty set), otherwise
    /// `Closed` listing the unset keys
    pub fn evaluate(required: &[PropertyKey], record: &ResultRecord) -> GateDecision {
        let mut missing = Vec::new();

        for key in required {
            if !record.is_present(*key) && !missing.contains(key) {
                missing.push(*key);
            }
        }

        if missing.is_empty() {
            GateDecision::Open
        } else {
            GateDecision::Closed { missing }
        }
    }
}

/// Whether every key in `required` is present in `record`
pub fn can_run(required: &[PropertyKey], record: &ResultRecord) -> bool {
    required.iter().all(|key| record.is_present(*key))
}
