//! Tokenized configuration lines.

use std::fmt;
use std::time::Duration;

use crate::core::ConfigError;

/// Separator between the fields of a configuration line.
pub const FIELD_SEPARATOR: char = ':';

/// Prefix marking a comment line.
pub const COMMENT_PREFIX: char = '#';

/// One `scope:option[:param]*` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLine {
    scope: String,
    option: String,
    params: Vec<String>,
}

impl ConfigLine {
    /// Build a line from parts.
    pub fn new<I, S>(scope: impl Into<String>, option: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scope: scope.into(),
            option: option.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Tokenize a raw line.
    ///
    /// Returns `Ok(None)` for blank and comment lines. Every field is trimmed.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Malformed`] when the line lacks a scope or an option.
    pub fn parse(raw: &str) -> Result<Option<Self>, ConfigError> {
        let raw = raw.trim();
        if raw.is_empty() || raw.starts_with(COMMENT_PREFIX) {
            return Ok(None);
        }
        let mut fields = raw.split(FIELD_SEPARATOR).map(str::trim);
        let scope = fields.next().unwrap_or_default();
        let option = fields.next().unwrap_or_default();
        if scope.is_empty() || option.is_empty() {
            return Err(ConfigError::Malformed(raw.to_string()));
        }
        Ok(Some(Self::new(scope, option, fields)))
    }

    /// Scope tag.
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Option name as written.
    #[must_use]
    pub fn option(&self) -> &str {
        &self.option
    }

    /// Parameters in order.
    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Parameter at `index`, if present.
    #[must_use]
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    /// Case-insensitive scope comparison.
    #[must_use]
    pub fn in_scope(&self, tag: &str) -> bool {
        self.scope.eq_ignore_ascii_case(tag)
    }

    /// Case-insensitive option comparison.
    #[must_use]
    pub fn is_option(&self, name: &str) -> bool {
        self.option.eq_ignore_ascii_case(name)
    }

    /// Interpret the first parameter as a positive number of milliseconds.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingParameter`] when absent, [`ConfigError::Usage`]
    /// when not a positive integer. Both carry `usage`.
    pub fn millis_param(&self, usage: &str) -> Result<Duration, ConfigError> {
        let raw = self
            .param(0)
            .ok_or_else(|| ConfigError::missing(&self.option, usage))?;
        match raw.parse::<u64>() {
            Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
            _ => Err(ConfigError::usage(&self.option, usage)),
        }
    }
}

impl fmt::Display for ConfigLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{FIELD_SEPARATOR}{}", self.scope, self.option)?;
        for param in &self.params {
            write!(f, "{FIELD_SEPARATOR}{param}")?;
        }
        Ok(())
    }
}
