//! Fork-join execution primitives the arithmetic kernel is written against.
//!
//! Every primitive returns only after all of its units of work have
//! completed. Units dispatched by one call carry no ordering guarantee
//! relative to each other, so callers must hand out disjoint output.

use std::sync::OnceLock;

#[cfg(feature = "parallel")]
use crate::threading::SchedulerConfig;

pub trait Scheduler: Send + Sync {
    /// Runs `work(index)` once for every index in `start..end`.
    fn parallel_for<F>(&self, start: usize, end: usize, work: F)
    where
        F: Fn(usize) + Send + Sync;

    /// Runs two independent closures, possibly concurrently, and joins them.
    fn parallel_invoke<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send;

    /// Splits `data` into consecutive lanes of `lane_len` elements and runs
    /// `work(lane_index, lane)` for each. The final lane may be shorter.
    fn for_each_lane<T, F>(&self, data: &mut [T], lane_len: usize, work: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Send + Sync;

    /// Evaluates `work` for every index in `start..end`, returning the
    /// results in index order.
    fn parallel_map<T, F>(&self, start: usize, end: usize, work: F) -> Vec<T>
    where
        T: Send + Sync,
        F: Fn(usize) -> T + Send + Sync,
    {
        if start >= end {
            return Vec::new();
        }
        let slots: Vec<OnceLock<T>> = (start..end).map(|_| OnceLock::new()).collect();
        self.parallel_for(start, end, |index| {
            let _ = slots[index - start].set(work(index));
        });
        slots.into_iter().filter_map(OnceLock::into_inner).collect()
    }
}

/// Runs every unit of work inline, in index order.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialScheduler;

impl Scheduler for SequentialScheduler {
    fn parallel_for<F>(&self, start: usize, end: usize, work: F)
    where
        F: Fn(usize) + Send + Sync,
    {
        (start..end).for_each(work);
    }

    fn parallel_invoke<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send,
    {
        (a(), b())
    }

    fn for_each_lane<T, F>(&self, data: &mut [T], lane_len: usize, work: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Send + Sync,
    {
        if lane_len == 0 {
            return;
        }
        for (index, lane) in data.chunks_mut(lane_len).enumerate() {
            work(index, lane);
        }
    }
}

/// Work-stealing scheduler backed by rayon.
///
/// Without a thread override the global rayon pool is used; with one, the
/// scheduler owns a dedicated pool of that size.
#[cfg(feature = "parallel")]
pub struct RayonScheduler {
    pool: Option<rayon::ThreadPool>,
    config: SchedulerConfig,
}

#[cfg(feature = "parallel")]
impl RayonScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        let pool = match config.threads {
            Some(threads) if !config.parallel_disabled => {
                match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                    Ok(pool) => Some(pool),
                    Err(err) => {
                        tracing::warn!(%err, threads, "falling back to the global rayon pool");
                        None
                    }
                }
            }
            _ => None,
        };
        Self { pool, config }
    }

    pub fn from_env() -> Self {
        Self::new(SchedulerConfig::from_env())
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn current_num_threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    fn run<R, OP>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}

#[cfg(feature = "parallel")]
impl Default for RayonScheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

#[cfg(feature = "parallel")]
impl std::fmt::Debug for RayonScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RayonScheduler")
            .field("dedicated_pool", &self.pool.is_some())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(feature = "parallel")]
impl Scheduler for RayonScheduler {
    fn parallel_for<F>(&self, start: usize, end: usize, work: F)
    where
        F: Fn(usize) + Send + Sync,
    {
        use rayon::prelude::*;

        let units = end.saturating_sub(start);
        if !self.config.should_parallelize(units) {
            tracing::trace!(units, "parallel_for running inline");
            (start..end).for_each(work);
            return;
        }
        self.run(|| (start..end).into_par_iter().for_each(work));
    }

    fn parallel_invoke<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send,
    {
        if self.config.parallel_disabled {
            return (a(), b());
        }
        self.run(|| rayon::join(a, b))
    }

    fn for_each_lane<T, F>(&self, data: &mut [T], lane_len: usize, work: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Send + Sync,
    {
        use rayon::prelude::*;

        if lane_len == 0 {
            return;
        }
        let units = data.len().div_ceil(lane_len);
        if !self.config.should_parallelize(units) {
            tracing::trace!(units, "for_each_lane running inline");
            for (index, lane) in data.chunks_mut(lane_len).enumerate() {
                work(index, lane);
            }
            return;
        }
        self.run(|| {
            data.par_chunks_mut(lane_len)
                .enumerate()
                .for_each(|(index, lane)| work(index, lane));
        });
    }
}
