//! Recurring pool maintenance.
//!
//! Each step sweeps a bounded batch of one pool's slots. Once every pool has
//! completed a sweep the operation shrinks their storage and finishes.

use std::sync::Arc;

use crate::core::{Operation, PoolStats, Poolable, PruneStep, ResourcePool, Spawner, StepStatus};

/// Slots swept per step.
pub const PRUNE_BATCH: usize = 16;

/// Type-erased view of a pool for maintenance and reporting.
pub trait PoolMaintenance: Send + Sync {
    /// Pool name used in logs.
    fn label(&self) -> &'static str;

    /// See [`ResourcePool::prune_unused`].
    fn prune_unused(&self, max_slots: usize) -> PruneStep;

    /// See [`ResourcePool::shrink_to_fit`].
    fn shrink_to_fit(&self) -> usize;

    /// See [`ResourcePool::stats`].
    fn stats(&self) -> PoolStats;
}

/// A pool paired with its log label.
#[derive(Debug)]
pub struct NamedPool<T: Poolable> {
    label: &'static str,
    pool: ResourcePool<T>,
}

impl<T: Poolable> NamedPool<T> {
    /// Label `pool`.
    #[must_use]
    pub const fn new(label: &'static str, pool: ResourcePool<T>) -> Self {
        Self { label, pool }
    }
}

impl<T: Poolable + Send> PoolMaintenance for NamedPool<T> {
    fn label(&self) -> &'static str {
        self.label
    }

    fn prune_unused(&self, max_slots: usize) -> PruneStep {
        self.pool.prune_unused(max_slots)
    }

    fn shrink_to_fit(&self) -> usize {
        self.pool.shrink_to_fit()
    }

    fn stats(&self) -> PoolStats {
        self.pool.stats()
    }
}

/// Shared set of pools swept by [`MaintenanceOp`].
pub type MaintenanceTargets = Arc<[Arc<dyn PoolMaintenance>]>;

/// One maintenance pass over every target pool.
#[derive(Clone)]
pub struct MaintenanceOp {
    targets: MaintenanceTargets,
    index: usize,
    released: usize,
    done: bool,
}

impl MaintenanceOp {
    /// Pass over `targets`.
    #[must_use]
    pub const fn new(targets: MaintenanceTargets) -> Self {
        Self {
            targets,
            index: 0,
            released: 0,
            done: false,
        }
    }
}

impl std::fmt::Debug for MaintenanceOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaintenanceOp")
            .field("targets", &self.targets.len())
            .field("index", &self.index)
            .field("released", &self.released)
            .field("done", &self.done)
            .finish()
    }
}

impl<C> Operation<C> for MaintenanceOp {
    fn step(&mut self, _cx: &mut C, _spawn: &mut Spawner<C>) -> StepStatus {
        if self.done {
            return StepStatus::Complete;
        }
        if let Some(target) = self.targets.get(self.index) {
            let step = target.prune_unused(PRUNE_BATCH);
            self.released += step.released;
            if step.status.is_complete() {
                self.index += 1;
            }
            if self.index < self.targets.len() {
                return StepStatus::Pending;
            }
        }
        let mut shrunk = 0;
        for target in self.targets.iter() {
            shrunk += target.shrink_to_fit();
            tracing::trace!(pool = target.label(), stats = ?target.stats(), "pool maintained");
        }
        tracing::debug!(released = self.released, shrunk, "pool maintenance complete");
        self.done = true;
        StepStatus::Complete
    }

    fn name(&self) -> &'static str {
        "maintenance"
    }
}
