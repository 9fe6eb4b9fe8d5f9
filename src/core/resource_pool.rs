//! Recycling pool for operation instances and scratch collections.
//!
//! The host penalises allocation churn, so per-tick helpers are leased from
//! a [`ResourcePool`] instead of being constructed afresh. The pool is an
//! arena of slots with a free list of indices; every slot carries a
//! generation counter so a lease that outlives a [`ResourcePool::clear`]
//! cannot return its value into a slot that has since been reused.
//!
//! A [`Lease`] returns itself when dropped, after calling the instance's own
//! [`Poolable::reset`]. Dropping is the only way back into the pool, so every
//! exit path (including early returns and `?`) releases.
//!
//! ```rust
//! use doorwarden::core::{Poolable, ResourcePool};
//!
//! #[derive(Default)]
//! struct Scratch(Vec<u32>);
//!
//! impl Poolable for Scratch {
//!     fn reset(&mut self) {
//!         self.0.clear();
//!     }
//! }
//!
//! let pool = ResourcePool::new(Scratch::default);
//! {
//!     let mut lease = pool.acquire();
//!     lease.0.push(7);
//! }
//! assert!(pool.acquire().0.is_empty());
//! ```

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::core::{Operation, Spawner, StepStatus};

/// Instances that can be recycled by a [`ResourcePool`].
pub trait Poolable {
    /// Restore the freshly constructed state. Called when a lease is released,
    /// before the instance can be handed to another borrower.
    fn reset(&mut self);
}

impl<T> Poolable for Vec<T> {
    fn reset(&mut self) {
        self.clear();
    }
}

/// Identifies the slot a lease was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeaseHandle {
    /// Slot index in the arena.
    pub index: usize,
    /// Slot generation at the time of acquisition.
    pub generation: u32,
}

/// Utilization snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Slots in the arena.
    pub slots: usize,
    /// Slots currently leased.
    pub leased: usize,
    /// Slots holding an idle instance ready for reuse.
    pub idle: usize,
    /// Slots whose instance was pruned; reused by constructing a new one.
    pub vacant: usize,
}

/// Outcome of one bounded [`ResourcePool::prune_unused`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PruneStep {
    /// Instances dropped during this call.
    pub released: usize,
    /// `Complete` once the sweep wrapped around the whole arena.
    pub status: StepStatus,
}

enum SlotState<T> {
    Idle(T),
    Leased,
    Vacant,
}

struct Slot<T> {
    generation: u32,
    state: SlotState<T>,
    /// Set by a prune sweep on idle slots, cleared on acquisition. A slot
    /// still marked when the next sweep reaches it has been idle a full cycle.
    idle_marked: bool,
}

struct PoolInner<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    prune_cursor: usize,
}

impl<T> PoolInner<T> {
    fn give_back(&mut self, handle: LeaseHandle, value: T) -> bool {
        let Some(slot) = self.slots.get_mut(handle.index) else {
            return false;
        };
        if slot.generation != handle.generation || !matches!(slot.state, SlotState::Leased) {
            return false;
        }
        slot.state = SlotState::Idle(value);
        slot.generation = slot.generation.wrapping_add(1);
        slot.idle_marked = false;
        self.free.push(handle.index);
        true
    }
}

/// Arena-backed object pool.
///
/// Cloning the pool yields another handle onto the same arena.
pub struct ResourcePool<T> {
    inner: Arc<Mutex<PoolInner<T>>>,
    factory: Arc<dyn Fn() -> T + Send + Sync>,
}

impl<T> Clone for ResourcePool<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<T: Poolable> fmt::Debug for ResourcePool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourcePool")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl<T: Poolable> ResourcePool<T> {
    /// Create an empty pool constructing instances with `factory`.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(PoolInner {
                slots: Vec::new(),
                free: Vec::new(),
                prune_cursor: 0,
            })),
            factory: Arc::new(factory),
        }
    }

    /// Lease an instance, recycling an idle one if available.
    ///
    /// Never looks inside a leased slot.
    pub fn acquire(&self) -> Lease<T> {
        let mut inner = self.inner.lock();
        let popped = inner.free.pop();
        let (index, value) = match popped {
            Some(index) => {
                let slot = &mut inner.slots[index];
                let value = match std::mem::replace(&mut slot.state, SlotState::Leased) {
                    SlotState::Idle(value) => value,
                    SlotState::Vacant | SlotState::Leased => (self.factory)(),
                };
                slot.idle_marked = false;
                (index, value)
            }
            None => {
                inner.slots.push(Slot {
                    generation: 0,
                    state: SlotState::Leased,
                    idle_marked: false,
                });
                (inner.slots.len() - 1, (self.factory)())
            }
        };
        let handle = LeaseHandle {
            index,
            generation: inner.slots[index].generation,
        };
        drop(inner);
        tracing::trace!(index = handle.index, generation = handle.generation, "lease acquired");
        Lease {
            value: Some(value),
            handle,
            pool: Arc::downgrade(&self.inner),
        }
    }

    /// Run `f` with a leased instance, releasing it on every exit path.
    pub fn scoped<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut lease = self.acquire();
        f(&mut lease)
    }

    /// Sweep at most `max_slots` slots, dropping instances that stayed idle
    /// since the previous sweep over them.
    ///
    /// The sweep resumes where the previous call stopped and reports
    /// [`StepStatus::Complete`] when it wraps around the arena.
    pub fn prune_unused(&self, max_slots: usize) -> PruneStep {
        let mut inner = self.inner.lock();
        let mut released = 0;
        let mut visited = 0;
        while visited < max_slots && inner.prune_cursor < inner.slots.len() {
            let cursor = inner.prune_cursor;
            let slot = &mut inner.slots[cursor];
            match slot.state {
                SlotState::Idle(_) if slot.idle_marked => {
                    slot.state = SlotState::Vacant;
                    slot.idle_marked = false;
                    released += 1;
                }
                SlotState::Idle(_) => slot.idle_marked = true,
                SlotState::Leased | SlotState::Vacant => slot.idle_marked = false,
            }
            inner.prune_cursor += 1;
            visited += 1;
        }
        let status = if inner.prune_cursor >= inner.slots.len() {
            inner.prune_cursor = 0;
            StepStatus::Complete
        } else {
            StepStatus::Pending
        };
        if released > 0 {
            tracing::debug!(released, "pruned idle pool instances");
        }
        PruneStep { released, status }
    }

    /// Drop trailing vacant slots and release over-provisioned storage.
    /// Returns the number of slots removed.
    pub fn shrink_to_fit(&self) -> usize {
        let mut inner = self.inner.lock();
        let before = inner.slots.len();
        while matches!(inner.slots.last(), Some(slot) if matches!(slot.state, SlotState::Vacant)) {
            inner.slots.pop();
        }
        let len = inner.slots.len();
        inner.free.retain(|&index| index < len);
        inner.slots.shrink_to_fit();
        inner.free.shrink_to_fit();
        if inner.prune_cursor > len {
            inner.prune_cursor = 0;
        }
        before - len
    }

    /// Drop every idle instance and disown outstanding leases.
    ///
    /// Leases taken before the call drop their instance on release instead
    /// of returning it.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.free.clear();
        for slot in &mut inner.slots {
            slot.generation = slot.generation.wrapping_add(1);
            slot.state = SlotState::Vacant;
            slot.idle_marked = false;
        }
        let len = inner.slots.len();
        inner.free.extend((0..len).rev());
        inner.prune_cursor = 0;
    }

    /// Current utilization.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        let inner = self.inner.lock();
        let mut stats = PoolStats {
            slots: inner.slots.len(),
            ..PoolStats::default()
        };
        for slot in &inner.slots {
            match slot.state {
                SlotState::Idle(_) => stats.idle += 1,
                SlotState::Leased => stats.leased += 1,
                SlotState::Vacant => stats.vacant += 1,
            }
        }
        stats
    }
}

/// A borrowed pool instance. Resets and returns itself when dropped.
pub struct Lease<T: Poolable> {
    value: Option<T>,
    handle: LeaseHandle,
    pool: Weak<Mutex<PoolInner<T>>>,
}

impl<T: Poolable> Lease<T> {
    /// Slot this lease was taken from.
    #[must_use]
    pub const fn handle(&self) -> LeaseHandle {
        self.handle
    }

    /// Return the instance to its pool now.
    pub fn release(self) {
        drop(self);
    }
}

impl<T: Poolable> Deref for Lease<T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.value {
            Some(value) => value,
            None => unreachable!("lease value is only taken on drop"),
        }
    }
}

impl<T: Poolable> DerefMut for Lease<T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.value {
            Some(value) => value,
            None => unreachable!("lease value is only taken on drop"),
        }
    }
}

impl<T: Poolable> Drop for Lease<T> {
    fn drop(&mut self) {
        let Some(mut value) = self.value.take() else {
            return;
        };
        value.reset();
        let returned = self
            .pool
            .upgrade()
            .is_some_and(|pool| pool.lock().give_back(self.handle, value));
        if !returned {
            tracing::trace!(index = self.handle.index, "stale lease dropped");
        }
    }
}

impl<T: Poolable + fmt::Debug> fmt::Debug for Lease<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lease")
            .field("handle", &self.handle)
            .field("value", &self.value)
            .finish()
    }
}

impl<C, T> Operation<C> for Lease<T>
where
    T: Operation<C> + Poolable,
{
    fn step(&mut self, cx: &mut C, spawn: &mut Spawner<C>) -> StepStatus {
        (**self).step(cx, spawn)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
