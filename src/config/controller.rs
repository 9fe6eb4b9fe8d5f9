//! Bootstrap configuration for a controller instance.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::config::FIELD_SEPARATOR;
use crate::core::{AppResult, ControllerError};

/// Environment variable overriding [`ControllerConfig::tag`].
pub const ENV_TAG: &str = "DOORWARDEN_TAG";
/// Environment variable overriding [`ControllerConfig::log_capacity`].
pub const ENV_LOG_CAPACITY: &str = "DOORWARDEN_LOG_CAPACITY";
/// Environment variable overriding [`ControllerConfig::steps_per_tick`].
pub const ENV_STEPS_PER_TICK: &str = "DOORWARDEN_STEPS_PER_TICK";

/// Settings fixed for the lifetime of a controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Scope tag selecting this controller's configuration lines.
    pub tag: String,
    /// Lines retained by the controller log.
    pub log_capacity: usize,
    /// Operation steps allowed per tick.
    pub steps_per_tick: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            tag: "doorwarden".into(),
            log_capacity: 64,
            steps_per_tick: 200,
        }
    }
}

impl ControllerConfig {
    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// [`ControllerError::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ControllerError> {
        if self.tag.trim().is_empty() {
            return Err(ControllerError::InvalidConfig("tag must not be empty".into()));
        }
        if self.tag.contains(FIELD_SEPARATOR) {
            return Err(ControllerError::InvalidConfig(format!(
                "tag must not contain `{FIELD_SEPARATOR}`"
            )));
        }
        if self.log_capacity == 0 {
            return Err(ControllerError::InvalidConfig(
                "log_capacity must be greater than 0".into(),
            ));
        }
        if self.steps_per_tick == 0 {
            return Err(ControllerError::InvalidConfig(
                "steps_per_tick must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// [`ControllerError::InvalidConfig`] on malformed JSON or bad values.
    pub fn from_json_str(input: &str) -> Result<Self, ControllerError> {
        let cfg: Self = serde_json::from_str(input)
            .map_err(|e| ControllerError::InvalidConfig(format!("parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from defaults overridden by `DOORWARDEN_*`
    /// environment variables, loading a `.env` file first if present.
    ///
    /// # Errors
    ///
    /// Fails when a numeric variable does not parse or validation fails.
    pub fn from_env() -> AppResult<Self> {
        let _ = dotenvy::dotenv();
        let mut cfg = Self::default();
        if let Ok(tag) = std::env::var(ENV_TAG) {
            cfg.tag = tag;
        }
        if let Ok(raw) = std::env::var(ENV_LOG_CAPACITY) {
            cfg.log_capacity = raw
                .parse()
                .map_err(|e| ControllerError::Env(format!("{ENV_LOG_CAPACITY}: {e}")))?;
        }
        if let Ok(raw) = std::env::var(ENV_STEPS_PER_TICK) {
            cfg.steps_per_tick = raw
                .parse()
                .map_err(|e| ControllerError::Env(format!("{ENV_STEPS_PER_TICK}: {e}")))?;
        }
        cfg.validate().context("controller configuration from environment")?;
        Ok(cfg)
    }
}
