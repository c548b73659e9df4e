//! The arithmetic kernel: a scheduler plus copy accounting.
//!
//! Operations are grouped by family in sibling modules (`elementwise`,
//! `product`, `pointwise`, `compose`, `reduce`, `vector_ops`), each adding
//! an `impl` block to [`Kernel`]. Every entry point validates all shapes
//! before mutating anything, and no operation keeps state between calls.

use crate::metrics::CopyMetrics;
use crate::scheduler::Scheduler;
use crate::storage::{MatrixAccess, VectorAccess};

#[cfg(feature = "parallel")]
pub type DefaultScheduler = crate::scheduler::RayonScheduler;

#[cfg(not(feature = "parallel"))]
pub type DefaultScheduler = crate::scheduler::SequentialScheduler;

#[derive(Debug)]
pub struct Kernel<S = DefaultScheduler> {
    scheduler: S,
    metrics: CopyMetrics,
}

impl<S: Scheduler> Kernel<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            metrics: CopyMetrics::default(),
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn metrics(&self) -> &CopyMetrics {
        &self.metrics
    }

    pub(crate) fn clone_matrix<M: MatrixAccess>(&self, source: &M) -> M {
        self.metrics.record_elements(source.rows() * source.columns());
        source.clone()
    }

    pub(crate) fn clone_vector<V: VectorAccess>(&self, source: &V) -> V {
        self.metrics.record_elements(source.len());
        source.clone()
    }

    /// Copies a temporary produced for an aliased call back into its target.
    pub(crate) fn copy_back_matrix<M: MatrixAccess>(&self, temporary: M, target: &mut M) {
        debug_assert_eq!(temporary.shape(), target.shape());
        self.metrics
            .record_elements(temporary.rows() * temporary.columns());
        *target = temporary;
    }

    pub(crate) fn copy_back_vector<V: VectorAccess>(&self, temporary: &V, target: &mut V) {
        self.metrics.record_elements(temporary.len());
        for index in 0..temporary.len() {
            target.set(index, temporary.get(index));
        }
    }
}

impl Default for Kernel<DefaultScheduler> {
    fn default() -> Self {
        Self::new(DefaultScheduler::default())
    }
}

#[cfg(feature = "parallel")]
impl Kernel<crate::scheduler::RayonScheduler> {
    /// Builds a kernel whose scheduler reads its knobs from the `NUMRS_*`
    /// environment variables.
    pub fn from_env() -> Self {
        Self::new(crate::scheduler::RayonScheduler::from_env())
    }
}
