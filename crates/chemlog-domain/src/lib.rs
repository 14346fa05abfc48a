//! chemlog Domain Layer
//!
//! This crate contains the core vocabulary shared by every other chemlog
//! crate: the closed set of property keys, the values they take, the
//! shared result record extractors write into, and the opaque inputs
//! (log stream, program identity, job tree) handed in by callers.
//!
//! ## Key Concepts
//!
//! - **PropertyKey**: closed enumeration of the properties chemlog knows how to extract
//! - **Slot**: an explicit `Unset | Present(value)` cell, so `0` and `[]` are real values
//! - **ResultRecord**: the per-session accumulator of extracted properties
//! - **MergePolicy**: how a second write to a present key is resolved
//! - **Program**: which quantum-chemistry package produced a log
//! - **LogStream**: immutable, line-addressable log text
//!
//! ## Architecture
//!
//! - No I/O beyond `LogStream::from_reader`, which the caller invokes
//! - No parsing logic; extractors live in `chemlog-extractor`
//! - Trait definitions for the external job-tree collaborator

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod log;
pub mod program;
pub mod property;
pub mod record;
pub mod session;
pub mod traits;

// Re-exports for convenience
pub use error::DomainError;
pub use log::LogStream;
pub use program::Program;
pub use property::{PropertyKey, PropertyValue, Shell};
pub use record::{MergeOutcome, MergePolicy, ResultRecord, Slot};
pub use session::SessionId;
pub use traits::{JobCount, JobTree};
