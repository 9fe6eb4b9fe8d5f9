//! Resumable operations: the unit of work the scheduler steps.
//!
//! An operation performs a bounded slice of work per [`Operation::step`] and
//! keeps its own cursor, so the host may cut a tick short at any step boundary
//! and the next tick resumes exactly where the previous one stopped.
//!
//! Operations are generic over a context `C` that the scheduler lends to every
//! step. The context carries the collaborators (devices, log, settings) the
//! operation acts upon; it is owned by whoever drives the scheduler.

use std::fmt;

/// Result of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// More work remains; step again.
    Pending,
    /// The operation has finished. Stepping again must have no effect.
    Complete,
}

impl StepStatus {
    /// Returns true for [`StepStatus::Complete`].
    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// A unit of work that can be stepped repeatedly, preserving progress.
///
/// Implementations must tolerate being stepped an arbitrary number of times:
/// each step either advances the cursor or reports [`StepStatus::Complete`],
/// and a completed operation stays complete without repeating its effects.
pub trait Operation<C> {
    /// Perform a bounded slice of work.
    ///
    /// `spawn` lets the operation hand an independent sub-operation to the
    /// scheduler; the scheduler decides when it runs relative to the caller.
    fn step(&mut self, cx: &mut C, spawn: &mut Spawner<C>) -> StepStatus;

    /// Short name used in logs.
    fn name(&self) -> &'static str {
        "operation"
    }
}

/// A boxed operation as stored in scheduler queues.
pub type BoxedOperation<C> = Box<dyn Operation<C>>;

/// Collects sub-operations spawned during a step.
pub struct Spawner<C> {
    spawned: Vec<BoxedOperation<C>>,
}

impl<C> Spawner<C> {
    /// Create an empty spawner.
    #[must_use]
    pub const fn new() -> Self {
        Self { spawned: Vec::new() }
    }

    /// Ask the scheduler to run `op`.
    pub fn spawn<O>(&mut self, op: O)
    where
        O: Operation<C> + 'static,
    {
        self.spawned.push(Box::new(op));
    }

    /// Ask the scheduler to run an already boxed operation.
    pub fn spawn_boxed(&mut self, op: BoxedOperation<C>) {
        self.spawned.push(op);
    }

    /// Number of operations spawned so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spawned.len()
    }

    /// True when nothing was spawned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spawned.is_empty()
    }

    pub(crate) fn pop_last(&mut self) -> Option<BoxedOperation<C>> {
        self.spawned.pop()
    }

    /// Take the spawned operations in spawn order, leaving the buffer empty
    /// with its capacity intact.
    pub fn drain(&mut self) -> std::vec::Drain<'_, BoxedOperation<C>> {
        self.spawned.drain(..)
    }
}

impl<C> Default for Spawner<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for Spawner<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spawner")
            .field("spawned", &self.spawned.len())
            .finish()
    }
}

/// Operation built from a closure, stepped until it returns `Complete`.
///
/// Once complete the closure is never called again.
pub struct FnOperation<F> {
    name: &'static str,
    f: F,
    done: bool,
}

impl<F> FnOperation<F> {
    /// Wrap `f` under `name`.
    pub const fn new(name: &'static str, f: F) -> Self {
        Self { name, f, done: false }
    }
}

impl<C, F> Operation<C> for FnOperation<F>
where
    F: FnMut(&mut C, &mut Spawner<C>) -> StepStatus,
{
    fn step(&mut self, cx: &mut C, spawn: &mut Spawner<C>) -> StepStatus {
        if self.done {
            return StepStatus::Complete;
        }
        let status = (self.f)(cx, spawn);
        self.done = status.is_complete();
        status
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
