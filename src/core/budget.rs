//! Per-tick work budgets.
//!
//! The host grants a hard compute allowance per invocation. The scheduler
//! checks the budget before every step and charges it after; operations never
//! look at it themselves.

/// Remaining work allowance for the current tick.
pub trait Budget {
    /// True once no further step may start this tick.
    fn exhausted(&self) -> bool;
    /// Record `units` of spent work.
    fn charge(&mut self, units: u32);
}

/// Budget counting operation steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepBudget {
    remaining: u32,
}

impl StepBudget {
    /// Allow `steps` steps this tick.
    #[must_use]
    pub const fn new(steps: u32) -> Self {
        Self { remaining: steps }
    }

    /// Steps still available.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }
}

impl Budget for StepBudget {
    fn exhausted(&self) -> bool {
        self.remaining == 0
    }

    fn charge(&mut self, units: u32) {
        self.remaining = self.remaining.saturating_sub(units);
    }
}

/// Budget that never runs out. Useful in tests and offline tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unlimited;

impl Budget for Unlimited {
    fn exhausted(&self) -> bool {
        false
    }

    fn charge(&mut self, _units: u32) {}
}
