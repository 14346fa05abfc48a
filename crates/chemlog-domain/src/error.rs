//! Domain error types

use thiserror::Error;

/// Errors raised when turning external names into domain values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Property name is not part of the closed key set
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    /// Program name is not part of the supported program set
    #[error("Unknown program: {0}")]
    UnknownProgram(String),
}
