//! Host command strings.

use std::fmt;
use std::str::FromStr;

use crate::core::ControllerError;

/// A command passed by the host on invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Execute pending work only. Also selected by an empty argument.
    Run,
    /// Re-read configuration, rediscover devices, replace recurring work.
    Reload,
    /// Engage lockdown.
    Lockdown,
    /// Release lockdown.
    Release,
    /// Log controller statistics.
    Stats,
    /// Ask the host to stop invoking the controller.
    Stop,
}

impl Command {
    /// Canonical lowercase spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Reload => "reload",
            Self::Lockdown => "lockdown",
            Self::Release => "release",
            Self::Stats => "stats",
            Self::Stop => "stop",
        }
    }
}

impl FromStr for Command {
    type Err = ControllerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::Run);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "run" => Ok(Self::Run),
            "reload" => Ok(Self::Reload),
            "lockdown" => Ok(Self::Lockdown),
            "release" => Ok(Self::Release),
            "stats" => Ok(Self::Stats),
            "stop" => Ok(Self::Stop),
            _ => Err(ControllerError::InvalidArgument(trimmed.to_string())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the controller asks of the host after an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateDirective {
    /// Invoke again on the next tick.
    EveryTick,
    /// Stop invoking until told otherwise.
    Stop,
}
