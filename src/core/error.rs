//! Error types for configuration parsing and controller bootstrap.

use thiserror::Error;

/// Errors produced while parsing configuration lines.
///
/// These never abort a parse pass: the pipeline logs them and moves on to the
/// next line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A value was present but could not be interpreted.
    #[error("invalid value for `{option}`: {usage}")]
    Usage {
        /// Option name as written in the line.
        option: String,
        /// Handler-authored usage text.
        usage: String,
    },
    /// The option requires a parameter that was not supplied.
    #[error("missing parameter for `{option}`: {usage}")]
    MissingParameter {
        /// Option name as written in the line.
        option: String,
        /// Handler-authored usage text.
        usage: String,
    },
    /// A raw line did not have the `scope:option[:param]*` shape.
    #[error("malformed line: {0}")]
    Malformed(String),
}

impl ConfigError {
    /// Build a usage error for `option`.
    pub fn usage(option: impl Into<String>, usage: impl Into<String>) -> Self {
        Self::Usage {
            option: option.into(),
            usage: usage.into(),
        }
    }

    /// Build a missing-parameter error for `option`.
    pub fn missing(option: impl Into<String>, usage: impl Into<String>) -> Self {
        Self::MissingParameter {
            option: option.into(),
            usage: usage.into(),
        }
    }
}

/// Errors produced by controller construction and command dispatch.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Bootstrap configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Bootstrap configuration could not be read from the environment.
    #[error("environment error: {0}")]
    Env(String),
    /// The host passed a command the controller does not understand.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
