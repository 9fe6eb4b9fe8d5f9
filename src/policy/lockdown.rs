//! Lockdown mode flag.

use crate::core::LogSink;

/// Logged when lockdown engages.
pub const ENGAGING_LOCKDOWN: &str = "Engaging Lockdown";
/// Logged when lockdown is released.
pub const RELEASING_LOCKDOWN: &str = "Releasing Lockdown";

/// Whether every managed door is being forced shut.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockdownFlag {
    engaged: bool,
}

impl LockdownFlag {
    /// Current state.
    #[must_use]
    pub const fn is_engaged(self) -> bool {
        self.engaged
    }

    /// Set the flag, logging only actual transitions. Returns true when the
    /// value changed.
    pub fn set(&mut self, engaged: bool, log: &mut dyn LogSink, now_ms: u128) -> bool {
        if self.engaged == engaged {
            return false;
        }
        self.engaged = engaged;
        let text = if engaged { ENGAGING_LOCKDOWN } else { RELEASING_LOCKDOWN };
        tracing::info!(engaged, "lockdown changed");
        log.record(now_ms, text.to_string());
        true
    }
}
