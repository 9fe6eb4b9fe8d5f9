//! Door settings and the handlers that parse them.

use std::time::Duration;

use crate::config::{ConfigHandler, ConfigLine, LineClaim};
use crate::core::ConfigError;

/// Option setting how long a door may stay open.
pub const AUTO_CLOSE_INTERVAL: &str = "auto-close-interval";
/// Per-device option excluding a door from management.
pub const IGNORE: &str = "ignore";

const AUTO_CLOSE_USAGE: &str = "auto-close-interval:<milliseconds > 0>";

/// Per-door policy settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorSettings {
    /// Time an opened door may stay open before it is closed.
    pub auto_close: Duration,
}

impl Default for DoorSettings {
    fn default() -> Self {
        Self {
            auto_close: Duration::from_millis(5_000),
        }
    }
}

/// Controller-wide handler owning the fleet default door settings.
#[derive(Debug, Clone, Default)]
pub struct DoorDefaultsHandler {
    settings: DoorSettings,
}

impl DoorDefaultsHandler {
    /// Defaults from the most recent pass.
    #[must_use]
    pub const fn settings(&self) -> DoorSettings {
        self.settings
    }
}

impl ConfigHandler for DoorDefaultsHandler {
    fn on_starting(&mut self) {
        self.settings = DoorSettings::default();
    }

    fn on_parsing(&mut self, line: &ConfigLine) -> Result<LineClaim, ConfigError> {
        if !line.is_option(AUTO_CLOSE_INTERVAL) {
            return Ok(LineClaim::Ignored);
        }
        self.settings.auto_close = line.millis_param(AUTO_CLOSE_USAGE)?;
        Ok(LineClaim::Accepted)
    }
}

/// Per-device handler: starts from the fleet defaults and applies one
/// device's overrides.
#[derive(Debug, Clone, Default)]
pub struct DoorSettingsHandler {
    inherited: DoorSettings,
    settings: DoorSettings,
    ignored: bool,
}

impl DoorSettingsHandler {
    /// Handler inheriting `defaults`.
    #[must_use]
    pub const fn new(defaults: DoorSettings) -> Self {
        Self {
            inherited: defaults,
            settings: defaults,
            ignored: false,
        }
    }

    /// Replace the inherited defaults used by the next pass.
    pub fn inherit(&mut self, defaults: DoorSettings) {
        self.inherited = defaults;
    }

    /// Settings after the most recent pass.
    #[must_use]
    pub const fn settings(&self) -> DoorSettings {
        self.settings
    }

    /// True when the device asked not to be managed.
    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        self.ignored
    }
}

impl ConfigHandler for DoorSettingsHandler {
    fn on_starting(&mut self) {
        self.settings = self.inherited;
        self.ignored = false;
    }

    fn on_parsing(&mut self, line: &ConfigLine) -> Result<LineClaim, ConfigError> {
        if line.is_option(AUTO_CLOSE_INTERVAL) {
            self.settings.auto_close = line.millis_param(AUTO_CLOSE_USAGE)?;
        } else if line.is_option(IGNORE) {
            self.ignored = true;
        } else {
            return Ok(LineClaim::Ignored);
        }
        Ok(LineClaim::Accepted)
    }
}
