//! Assignment of catalogs to the jobs of a calculation

use crate::catalog::Catalog;
use crate::error::CombinatorError;
use chemlog_domain::JobTree;
use std::sync::Arc;

/// A named, immutable list of catalogs, one per job
#[derive(Debug, Clone)]
pub struct Combinator {
    name: String,
    jobs: Vec<Arc<Catalog>>,
}

impl Combinator {
    /// Build a combinator from an explicit per-job catalog list
    ///
    /// # Errors
    ///
    /// * `CombinatorError::EmptyName` - `name` is blank
    /// * `CombinatorError::NoJobs` - `jobs` is empty
    pub fn manual(name: impl Into<String>, jobs: Vec<Arc<Catalog>>) -> Result<Self, CombinatorError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CombinatorError::EmptyName);
        }
        if jobs.is_empty() {
            return Err(CombinatorError::NoJobs);
        }
        Ok(Self { name, jobs })
    }

    /// Assign the same catalog to every job in `tree`
    ///
    /// Each job shares `catalog`; nothing is copied.
    pub fn automatic(tree: &dyn JobTree, catalog: Arc<Catalog>) -> Result<Self, CombinatorError> {
        let count = tree.num_nodes();
        if count == 0 {
            return Err(CombinatorError::EmptyJobTree);
        }

        Ok(Self {
            name: format!("Autogenerated combinator for {} jobs", count),
            jobs: vec![catalog; count],
        })
    }

    /// [`Combinator::automatic`] over [`Catalog::standard`]
    pub fn auto(tree: &dyn JobTree) -> Result<Self, CombinatorError> {
        Self::automatic(tree, Arc::new(Catalog::standard()))
    }

    /// Combinator name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Catalogs, one per job
    pub fn jobs(&self) -> &[Arc<Catalog>] {
        &self.jobs
    }

    /// Catalog for job `index`
    pub fn job(&self, index: usize) -> Option<&Arc<Catalog>> {
        self.jobs.get(index)
    }

    /// Number of jobs
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Always false; a built combinator has at least one job
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chemlog_domain::{JobCount, PropertyKey};

    #[test]
    fn test_automatic_shares_one_catalog() {
        let catalog = Arc::new(Catalog::standard());
        let combinator = Combinator::automatic(&JobCount(4), Arc::clone(&catalog)).unwrap();

        assert_eq!(combinator.len(), 4);
        assert_eq!(combinator.name(), "Autogenerated combinator for 4 jobs");
        for job in combinator.jobs() {
            assert!(Arc::ptr_eq(job, &catalog));
        }
    }

    #[test]
    fn test_automatic_rejects_empty_tree() {
        let err = Combinator::automatic(&JobCount(0), Arc::new(Catalog::standard())).unwrap_err();
        assert_eq!(err, CombinatorError::EmptyJobTree);
    }

    #[test]
    fn test_manual_keeps_order() {
        let full = Arc::new(Catalog::standard());
        let light = Arc::new(full.without(&[PropertyKey::AoOverlaps]).unwrap());

        let combinator =
            Combinator::manual("opt then freq", vec![Arc::clone(&full), Arc::clone(&light)]).unwrap();

        assert_eq!(combinator.name(), "opt then freq");
        assert!(Arc::ptr_eq(combinator.job(0).unwrap(), &full));
        assert!(Arc::ptr_eq(combinator.job(1).unwrap(), &light));
        assert!(combinator.job(2).is_none());
    }

    #[test]
    fn test_manual_validation() {
        let catalog = Arc::new(Catalog::standard());
        assert_eq!(
            Combinator::manual("  ", vec![Arc::clone(&catalog)]).unwrap_err(),
            CombinatorError::EmptyName
        );
        assert_eq!(Combinator::manual("empty", Vec::new()).unwrap_err(), CombinatorError::NoJobs);
    }
}
