//! chemlog Extractor
//!
//! Pulls named properties out of quantum-chemistry log files into a shared
//! result record.
//!
//! # Overview
//!
//! Each property has one [`AttributeExtractor`], which knows the text patterns
//! a program prints for it. Extractors may depend on properties other
//! extractors produce; the dependency gate skips an extractor until its
//! prerequisites are present. A [`Catalog`] is an ordered, dependency-valid
//! list of extractors, and a [`Combinator`] assigns one catalog to each job
//! of a multi-step calculation.
//!
//! # Architecture
//!
//! ```text
//! Log → JobSlices → Combinator → Catalog (per job) → Gate → Extractor → ResultRecord
//! ```
//!
//! # Key Features
//!
//! - **Gated extraction**: an extractor never reads the log before its prerequisites exist
//! - **Validated ordering**: catalogs are checked for dependency order when built
//! - **Shared catalogs**: every job of an automatic combinator shares one `Arc<Catalog>`
//! - **Explicit merge policy**: keep-first, overwrite or accumulate across jobs
//! - **Local failures**: a missing property is reported, never fatal
//!
//! # Example Usage
//!
//! ```
//! use chemlog_domain::{LogStream, Program, PropertyKey, PropertyValue};
//! use chemlog_extractor::{ingest, IngestConfig};
//!
//! let log = LogStream::new(
//!     " Entering Gaussian System\n NAtoms=      2 NActive=      2\n",
//! );
//!
//! let report = ingest(&log, None, &IngestConfig::default())?;
//!
//! assert_eq!(report.program, Program::Gaussian);
//! assert_eq!(report.record.get(PropertyKey::Natom), Some(&PropertyValue::Int(2)));
//! assert_eq!(
//!     report.record.get(PropertyKey::CoreElectrons),
//!     Some(&PropertyValue::IntList(vec![0, 0]))
//! );
//! # Ok::<(), chemlog_extractor::IngestError>(())
//! ```

#![warn(missing_docs)]

mod error;
mod config;
mod extractor;
mod catalog;
mod combinator;
mod jobs;
mod ingest;
pub mod attributes;


pub use error::{CatalogError, CombinatorError, ExtractError, IngestError};
pub use config::{IngestConfig, JobSplit};
pub use extractor::{AttributeExtractor, GatedExtractor, Outcome, SkipReason};
pub use catalog::{Catalog, CatalogReport};
pub use combinator::Combinator;
pub use jobs::JobSlices;
pub use ingest::{ingest, Ingestion, IngestionReport};
