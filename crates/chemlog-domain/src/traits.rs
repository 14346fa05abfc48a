//! Trait definitions for external collaborators
//!
//! The job tree describing how a multi-step calculation decomposes into jobs
//! lives outside chemlog; the only thing chemlog reads from it is how many
//! jobs there are.

/// Read-only view of an external job tree
pub trait JobTree {
    /// Number of jobs (nodes) in the tree
    fn num_nodes(&self) -> usize;
}

/// A job tree known only by its size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobCount(pub usize);

impl JobTree for JobCount {
    fn num_nodes(&self) -> usize {
        self.0
    }
}

impl<T: JobTree + ?Sized> JobTree for &T {
    fn num_nodes(&self) -> usize {
        (**self).num_nodes()
    }
}
