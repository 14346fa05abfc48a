//! Ordered, dependency-valid extractor sequences

use crate::attributes;
use crate::error::CatalogError;
use crate::extractor::{AttributeExtractor, GatedExtractor, Outcome};
use chemlog_domain::{LogStream, Program, PropertyKey, ResultRecord};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// An ordered list of extractors, one per produced key
///
/// Every prerequisite of every entry is produced by an earlier entry; this
/// is checked once, when the catalog is built. Catalogs are immutable and
/// shared between jobs through `Arc`.
#[derive(Clone)]
pub struct Catalog {
    entries: Vec<Arc<dyn AttributeExtractor>>,
}

impl Catalog {
    /// Build a catalog, checking ordering and registration contracts
    ///
    /// # Errors
    ///
    /// * `CatalogError::Contract` - an entry lists its own key as a
    ///   prerequisite, or two entries produce the same key
    /// * `CatalogError::Order` - a prerequisite has no earlier producer
    pub fn new(entries: Vec<Arc<dyn AttributeExtractor>>) -> Result<Self, CatalogError> {
        validate(&entries)?;
        Ok(Self { entries })
    }

    /// The default catalog covering every [`PropertyKey`]
    pub fn standard() -> Self {
        let entries = attributes::standard();
        debug_assert!(validate(&entries).is_ok(), "standard catalog is out of order");
        Self { entries }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Produced keys, in run order
    pub fn keys(&self) -> impl Iterator<Item = PropertyKey> + '_ {
        self.entries.iter().map(|entry| entry.produces())
    }

    /// Entries, in run order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn AttributeExtractor>> + '_ {
        self.entries.iter()
    }

    /// Position of the entry producing `key`
    pub fn position(&self, key: PropertyKey) -> Option<usize> {
        self.keys().position(|produced| produced == key)
    }

    /// Whether some entry produces `key`
    pub fn contains(&self, key: PropertyKey) -> bool {
        self.position(key).is_some()
    }

    /// Copy of this catalog without the entries producing `keys`
    ///
    /// Re-validated: dropping a key other entries depend on fails with
    /// `CatalogError::Order`.
    pub fn without(&self, keys: &[PropertyKey]) -> Result<Self, CatalogError> {
        let entries = self
            .entries
            .iter()
            .filter(|entry| !keys.contains(&entry.produces()))
            .cloned()
            .collect();
        Self::new(entries)
    }

    /// Run every entry, in order, against `record`
    ///
    /// A skipped or failed entry never stops the run; each entry's outcome
    /// is recorded in the report.
    pub fn run(&self, log: &LogStream, program: Program, record: &mut ResultRecord) -> CatalogReport {
        let mut report = CatalogReport::with_capacity(self.entries.len());

        for entry in &self.entries {
            let key = entry.produces();
            let outcome = entry.parse(log, program, record);
            debug!("{}: {}", key, outcome);
            report.entries.push((key, outcome));
        }

        info!(
            "Catalog run complete: {} updated, {} skipped, {} failed",
            report.updated(),
            report.skipped(),
            report.failed()
        );

        report
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}

fn validate(entries: &[Arc<dyn AttributeExtractor>]) -> Result<(), CatalogError> {
    let mut produced: Vec<PropertyKey> = Vec::with_capacity(entries.len());

    for (position, entry) in entries.iter().enumerate() {
        let key = entry.produces();

        if entry.prerequisites().contains(&key) {
            return Err(CatalogError::Contract {
                extractor: key,
                reason: "lists its own key as a prerequisite".to_string(),
            });
        }

        if let Some(&missing) = entry.prerequisites().iter().find(|req| !produced.contains(req)) {
            return Err(CatalogError::Order {
                extractor: key,
                position,
                missing,
            });
        }

        if produced.contains(&key) {
            return Err(CatalogError::Contract {
                extractor: key,
                reason: "key is already produced by an earlier entry".to_string(),
            });
        }

        produced.push(key);
    }

    Ok(())
}

/// Per-entry outcomes of one catalog run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogReport {
    entries: Vec<(PropertyKey, Outcome)>,
}

impl CatalogReport {
    fn with_capacity(capacity: usize) -> Self {
        Self { entries: Vec::with_capacity(capacity) }
    }

    /// `(key, outcome)` pairs in run order
    pub fn entries(&self) -> &[(PropertyKey, Outcome)] {
        &self.entries
    }

    /// Outcome of the entry producing `key`
    pub fn outcome(&self, key: PropertyKey) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|(produced, _)| *produced == key)
            .map(|(_, outcome)| outcome)
    }

    /// Entries that wrote to the record
    pub fn updated(&self) -> usize {
        self.entries.iter().filter(|(_, o)| o.is_updated()).count()
    }

    /// Entries that were skipped
    pub fn skipped(&self) -> usize {
        self.entries.iter().filter(|(_, o)| o.is_skipped()).count()
    }

    /// Entries that failed
    pub fn failed(&self) -> usize {
        self.entries.iter().filter(|(_, o)| o.is_failed()).count()
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        format!(
            "{} entries: {} updated, {} skipped, {} failed",
            self.entries.len(),
            self.updated(),
            self.skipped(),
            self.failed()
        )
    }
}
