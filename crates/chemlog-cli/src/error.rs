//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Ingestion error
    #[error("Ingestion error: {0}")]
    Ingest(#[from] chemlog_extractor::IngestError),

    /// Unknown property or program name
    #[error(transparent)]
    Domain(#[from] chemlog_domain::DomainError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    /// Follow-up hint printed under the error, if any
    pub fn hint(&self) -> Option<String> {
        match self {
            CliError::Ingest(e) => e.hint(),
            _ => None,
        }
    }
}
