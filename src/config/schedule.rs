//! Controller-wide recurrence options.

use std::time::Duration;

use crate::config::{ConfigHandler, ConfigLine, LineClaim};
use crate::core::ConfigError;

/// Option setting the door-management recurrence.
pub const MANAGE_INTERVAL: &str = "manage-interval";
/// Option setting the pool-maintenance recurrence.
pub const MAINTENANCE_INTERVAL: &str = "maintenance-interval";

/// Recurrence intervals for the controller's recurring work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSettings {
    /// How often a door-management pass is started.
    pub manage_interval: Duration,
    /// How often pooled instances are swept.
    pub maintenance_interval: Duration,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            manage_interval: Duration::from_millis(100),
            maintenance_interval: Duration::from_millis(10_000),
        }
    }
}

/// Handler owning `manage-interval` and `maintenance-interval`.
#[derive(Debug, Clone, Default)]
pub struct ScheduleHandler {
    settings: ScheduleSettings,
}

impl ScheduleHandler {
    /// Settings from the most recent pass.
    #[must_use]
    pub const fn settings(&self) -> ScheduleSettings {
        self.settings
    }
}

impl ConfigHandler for ScheduleHandler {
    fn on_starting(&mut self) {
        self.settings = ScheduleSettings::default();
    }

    fn on_parsing(&mut self, line: &ConfigLine) -> Result<LineClaim, ConfigError> {
        if line.is_option(MANAGE_INTERVAL) {
            self.settings.manage_interval = line.millis_param("manage-interval:<milliseconds > 0>")?;
        } else if line.is_option(MAINTENANCE_INTERVAL) {
            self.settings.maintenance_interval =
                line.millis_param("maintenance-interval:<milliseconds > 0>")?;
        } else {
            return Ok(LineClaim::Ignored);
        }
        Ok(LineClaim::Accepted)
    }

    fn on_completed(&mut self) {
        tracing::debug!(
            manage_ms = self.settings.manage_interval.as_millis(),
            maintenance_ms = self.settings.maintenance_interval.as_millis(),
            "schedule settings applied"
        );
    }
}
