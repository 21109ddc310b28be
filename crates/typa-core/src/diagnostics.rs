//! The exception collector shared between the caller and the pipeline
//!
//! Recoverable problems (a font that would not open, an encoding the face
//! lacks) never abort a call on their own. They land here as warnings and
//! the caller's fallback logic keeps going. Hard failures are recorded as
//! errors next to the `Err` that carries them.

use std::fmt;

use crate::error::TypaError;

/// How bad a recorded problem is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// One recorded problem
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Reason tag such as `UnableToReadFont`
    pub tag: &'static str,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}: {} `{}`", level, self.tag, self.message)
    }
}

/// Collects diagnostics over one or more calls
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, tag: &'static str, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}: {}", tag, message);
        self.entries.push(Diagnostic {
            severity: Severity::Warning,
            tag,
            message,
        });
    }

    pub fn error(&mut self, tag: &'static str, message: impl Into<String>) {
        let message = message.into();
        log::error!("{}: {}", tag, message);
        self.entries.push(Diagnostic {
            severity: Severity::Error,
            tag,
            message,
        });
    }

    /// Records an error value as a warning, keeping its reason tag
    pub fn warn_from(&mut self, err: &TypaError) {
        self.warn(err.tag(), err.to_string());
    }

    /// Records an error value as an error, keeping its reason tag
    pub fn error_from(&mut self, err: &TypaError) {
        self.error(err.tag(), err.to_string());
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Worst severity seen so far
    pub fn severity(&self) -> Option<Severity> {
        self.entries.iter().map(|d| d.severity).max()
    }

    /// True if any entry carries the given tag
    pub fn contains(&self, tag: &str) -> bool {
        self.entries.iter().any(|d| d.tag == tag)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
