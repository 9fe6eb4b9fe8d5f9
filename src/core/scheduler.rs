//! Cooperative scheduler for resumable operations.
//!
//! The scheduler owns a FIFO of pending operations and a registry of
//! recurring registrations. The host calls [`Scheduler::tick`] once per
//! invocation; the scheduler promotes due recurring work into the queue and
//! then steps the queue front until it drains or the tick's [`Budget`] runs
//! out. An operation interrupted by the budget stays at the front and is
//! resumed on the next tick.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use crate::core::{Budget, BoxedOperation, Operation, Spawner};

/// How a call to [`Scheduler::run_pending`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The pending queue is empty.
    Drained,
    /// The budget ran out with work still queued.
    Yielded,
}

/// A recurring registration: an interval and a factory for fresh operations.
pub struct RecurringRegistration<C> {
    name: &'static str,
    interval: Duration,
    factory: Box<dyn FnMut() -> BoxedOperation<C>>,
    last_triggered_ms: Option<u128>,
}

impl<C> RecurringRegistration<C> {
    /// Registration name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Trigger interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Host time of the last trigger, if any.
    #[must_use]
    pub const fn last_triggered_ms(&self) -> Option<u128> {
        self.last_triggered_ms
    }

    fn is_due(&self, now_ms: u128) -> bool {
        self.last_triggered_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= self.interval.as_millis())
    }
}

impl<C> fmt::Debug for RecurringRegistration<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecurringRegistration")
            .field("name", &self.name)
            .field("interval", &self.interval)
            .field("last_triggered_ms", &self.last_triggered_ms)
            .finish_non_exhaustive()
    }
}

/// Pending queue plus recurring registry.
pub struct Scheduler<C> {
    pending: VecDeque<BoxedOperation<C>>,
    recurring: Vec<RecurringRegistration<C>>,
    spawner: Spawner<C>,
    retired: u64,
}

impl<C> Scheduler<C> {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            recurring: Vec::new(),
            spawner: Spawner::new(),
            retired: 0,
        }
    }

    /// Append `op` to the pending queue. No deduplication is performed.
    pub fn schedule<O>(&mut self, op: O)
    where
        O: Operation<C> + 'static,
    {
        self.pending.push_back(Box::new(op));
    }

    /// Append an already boxed operation to the pending queue.
    pub fn schedule_boxed(&mut self, op: BoxedOperation<C>) {
        self.pending.push_back(op);
    }

    /// Register work re-instantiated by `factory` every `interval`.
    ///
    /// A new registration is due on the first tick after it is added.
    pub fn register_recurring<F, O>(&mut self, name: &'static str, interval: Duration, mut factory: F)
    where
        C: 'static,
        F: FnMut() -> O + 'static,
        O: Operation<C> + 'static,
    {
        tracing::debug!(name, interval_ms = interval.as_millis(), "recurring operation registered");
        self.recurring.push(RecurringRegistration {
            name,
            interval,
            factory: Box::new(move || Box::new(factory()) as BoxedOperation<C>),
            last_triggered_ms: None,
        });
    }

    /// Drop every recurring registration. Operations already queued keep
    /// running to completion.
    pub fn clear_recurring(&mut self) {
        self.recurring.clear();
    }

    /// Step queued operations in FIFO order until the queue drains or the
    /// budget is exhausted.
    ///
    /// Sub-operations spawned during a step are queued ahead of everything
    /// else, in spawn order, so they run before the spawning operation's
    /// continuation.
    pub fn run_pending<B>(&mut self, cx: &mut C, budget: &mut B) -> RunOutcome
    where
        B: Budget + ?Sized,
    {
        loop {
            if budget.exhausted() {
                return if self.pending.is_empty() {
                    RunOutcome::Drained
                } else {
                    RunOutcome::Yielded
                };
            }
            let Some(op) = self.pending.front_mut() else {
                return RunOutcome::Drained;
            };
            let status = op.step(cx, &mut self.spawner);
            budget.charge(1);

            if status.is_complete() {
                if let Some(done) = self.pending.pop_front() {
                    tracing::debug!(operation = done.name(), "operation retired");
                    self.retired += 1;
                }
            }
            while let Some(spawned) = self.spawner.pop_last() {
                self.pending.push_front(spawned);
            }
        }
    }

    /// Promote due recurring registrations, then run pending work.
    ///
    /// A due registration's trigger time advances to `now_ms`, not by one
    /// interval, so a stalled host does not produce a burst of catch-up work.
    pub fn tick<B>(&mut self, now_ms: u128, cx: &mut C, budget: &mut B) -> RunOutcome
    where
        B: Budget + ?Sized,
    {
        for registration in &mut self.recurring {
            if registration.is_due(now_ms) {
                self.pending.push_back((registration.factory)());
                registration.last_triggered_ms = Some(now_ms);
                tracing::trace!(name = registration.name, now_ms, "recurring operation triggered");
            }
        }
        self.run_pending(cx, budget)
    }

    /// Number of queued operations.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of recurring registrations.
    #[must_use]
    pub fn recurring_len(&self) -> usize {
        self.recurring.len()
    }

    /// Registered recurring work, in registration order.
    #[must_use]
    pub fn recurring(&self) -> &[RecurringRegistration<C>] {
        &self.recurring
    }

    /// Total operations stepped to completion.
    #[must_use]
    pub const fn retired(&self) -> u64 {
        self.retired
    }
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Scheduler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.pending.len())
            .field("recurring", &self.recurring)
            .field("retired", &self.retired)
            .finish()
    }
}
