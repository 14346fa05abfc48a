//! chemlog Gatekeeper
//!
//! Decides whether an extractor may run yet, given which properties are
//! already present in the shared result record.
//!
//! The Gatekeeper provides:
//! - A pure predicate, [`can_run`], answering "are all prerequisites present?"
//! - A richer [`Gate::evaluate`] naming the prerequisites that are still unset
//!
//! Presence is read from the record's tagged slots, so a prerequisite holding
//! `0` or an empty list counts as satisfied.
//!
//! # Examples
//!
//! ```
//! use chemlog_domain::{PropertyKey, PropertyValue, ResultRecord};
//! use chemlog_gatekeeper::can_run;
//!
//! let mut record = ResultRecord::new();
//! assert!(!can_run(&[PropertyKey::Natom], &record));
//!
//! record.set(PropertyKey::Natom, PropertyValue::Int(0));
//! assert!(can_run(&[PropertyKey::Natom], &record));
//! ```

#![warn(missing_docs)]

mod gate;

pub use gate::{can_run, Gate, GateDecision};
