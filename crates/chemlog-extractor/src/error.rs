//! Error types for extraction, catalogs, combinators and ingestion

use chemlog_domain::{Program, PropertyKey};
use thiserror::Error;

/// Why a single extractor could not produce its property
///
/// Local to one extractor: surfaced as an [`Outcome`](crate::Outcome),
/// never propagated out of a catalog run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractError {
    /// The extractor has no pattern for this program
    #[error("Unsupported program")]
    Unsupported,

    /// Expected content is absent from this log
    #[error("Not found: {0}")]
    NotFound(String),

    /// Content is present but could not be read
    #[error("Malformed content: {0}")]
    Malformed(String),
}

/// Errors that can occur while constructing a catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A prerequisite is not produced by an earlier entry
    #[error("Catalog order error: {extractor} at position {position} requires {missing}, which no earlier entry produces")]
    Order {
        /// Key produced by the offending extractor
        extractor: PropertyKey,
        /// Position of the offending extractor
        position: usize,
        /// Prerequisite with no earlier producer
        missing: PropertyKey,
    },

    /// An extractor breaks the registration contract
    #[error("Contract violation by {extractor}: {reason}")]
    Contract {
        /// Key produced by the offending extractor
        extractor: PropertyKey,
        /// What was violated
        reason: String,
    },
}

/// Errors that can occur while constructing a combinator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CombinatorError {
    /// Combinator name is empty
    #[error("Combinator name cannot be empty")]
    EmptyName,

    /// Manual combinator without any job
    #[error("Combinator needs at least one job")]
    NoJobs,

    /// Job tree reports zero jobs
    #[error("Job tree has no jobs")]
    EmptyJobTree,
}

/// Errors that abort an ingestion session
#[derive(Error, Debug)]
pub enum IngestError {
    /// Number of log slices does not match the combinator's jobs
    #[error("Job count mismatch: combinator has {expected} jobs, got {actual} log slices")]
    JobCountMismatch {
        /// Jobs in the combinator
        expected: usize,
        /// Log slices supplied
        actual: usize,
    },

    /// Log exceeds the configured size limit
    #[error("Log too large: {0} bytes (max: {1})")]
    LogTooLarge(usize, usize),

    /// Program was neither given nor recognizable from the log
    #[error("Could not detect which program wrote this log")]
    UndetectedProgram,

    /// Catalog construction failed
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Combinator construction failed
    #[error(transparent)]
    Combinator(#[from] CombinatorError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl IngestError {
    /// Program-specific hint for callers rendering errors
    pub fn hint(&self) -> Option<String> {
        match self {
            IngestError::UndetectedProgram => Some(format!(
                "pass the program explicitly; known programs: {}",
                Program::ALL.iter().map(Program::as_str).collect::<Vec<_>>().join(", ")
            )),
            _ => None,
        }
    }
}
