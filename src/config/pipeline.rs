//! Chain-of-responsibility parsing of configuration text.
//!
//! A pass runs in three phases. Every handler first gets
//! [`ConfigHandler::on_starting`] to restore its defaults. Each in-scope line
//! is then offered to the handlers in registration order until one accepts
//! or rejects it. Finally every handler gets [`ConfigHandler::on_completed`].
//!
//! Bad lines never abort a pass. Rejected lines are logged with the
//! handler's usage text; lines nobody claims are logged as unrecognized.
//! Lines whose leading field is not an accepted scope are skipped silently,
//! including free text without any separator.

use crate::config::{ConfigLine, FIELD_SEPARATOR};
use crate::core::{ConfigError, LogSink};

/// Handler verdict for a line it did not reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClaim {
    /// The handler owns this option and applied it.
    Accepted,
    /// Not this handler's option; offer it to the next one.
    Ignored,
}

/// A subsystem owning a namespace of options.
pub trait ConfigHandler {
    /// Reset owned settings to their defaults.
    fn on_starting(&mut self) {}

    /// Inspect one in-scope line.
    ///
    /// # Errors
    ///
    /// A [`ConfigError`] when the handler owns the option but its value is
    /// unusable. The current setting must be left untouched in that case.
    fn on_parsing(&mut self, line: &ConfigLine) -> Result<LineClaim, ConfigError>;

    /// Finalize after every line has been seen.
    fn on_completed(&mut self) {}
}

/// Counters for one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Lines accepted by a handler.
    pub accepted: usize,
    /// Lines rejected by a handler or malformed.
    pub errors: usize,
    /// In-scope lines no handler claimed.
    pub unrecognized: usize,
    /// Lines skipped because their scope did not match.
    pub out_of_scope: usize,
}

impl ParseReport {
    /// True when every line was either accepted or out of scope.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.errors == 0 && self.unrecognized == 0
    }
}

/// Routes lines whose scope matches one of `scopes` through handlers.
#[derive(Debug, Clone, Copy)]
pub struct ConfigPipeline<'a> {
    scopes: &'a [&'a str],
}

impl<'a> ConfigPipeline<'a> {
    /// Pipeline accepting lines tagged with any of `scopes`.
    #[must_use]
    pub const fn new(scopes: &'a [&'a str]) -> Self {
        Self { scopes }
    }

    /// Run a full pass over `text`.
    pub fn run(
        &self,
        text: &str,
        handlers: &mut [&mut dyn ConfigHandler],
        log: &mut dyn LogSink,
        now_ms: u128,
    ) -> ParseReport {
        let mut report = ParseReport::default();
        for handler in handlers.iter_mut() {
            handler.on_starting();
        }

        for raw in text.lines() {
            let line = match ConfigLine::parse(raw) {
                Ok(Some(line)) => line,
                Ok(None) => continue,
                Err(_) if !self.accepts(scope_token(raw)) => {
                    report.out_of_scope += 1;
                    continue;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "skipping configuration line");
                    log.record(now_ms, format!("Malformed line '{}'", raw.trim()));
                    report.errors += 1;
                    continue;
                }
            };
            if !self.accepts(line.scope()) {
                report.out_of_scope += 1;
                continue;
            }
            self.route(&line, handlers, log, now_ms, &mut report);
        }

        for handler in handlers.iter_mut() {
            handler.on_completed();
        }
        tracing::debug!(?report, "configuration pass complete");
        report
    }

    fn accepts(&self, scope: &str) -> bool {
        self.scopes.iter().any(|tag| scope.eq_ignore_ascii_case(tag))
    }

    fn route(
        &self,
        line: &ConfigLine,
        handlers: &mut [&mut dyn ConfigHandler],
        log: &mut dyn LogSink,
        now_ms: u128,
        report: &mut ParseReport,
    ) {
        for handler in handlers.iter_mut() {
            match handler.on_parsing(line) {
                Ok(LineClaim::Accepted) => {
                    report.accepted += 1;
                    return;
                }
                Ok(LineClaim::Ignored) => {}
                Err(err) => {
                    tracing::warn!(error = %err, %line, "configuration value rejected");
                    log.record(now_ms, format!("Invalid '{line}': {}", usage_of(&err)));
                    report.errors += 1;
                    return;
                }
            }
        }
        tracing::warn!(%line, "unrecognized configuration option");
        log.record(now_ms, format!("Unrecognized option '{line}'"));
        report.unrecognized += 1;
    }
}

/// Leading field of a raw line; the whole trimmed line when it has no
/// separator.
fn scope_token(raw: &str) -> &str {
    raw.split(FIELD_SEPARATOR).next().unwrap_or_default().trim()
}

fn usage_of(err: &ConfigError) -> String {
    match err {
        ConfigError::Usage { usage, .. } | ConfigError::MissingParameter { usage, .. } => {
            format!("usage {usage}")
        }
        ConfigError::Malformed(raw) => format!("malformed {raw}"),
    }
}
