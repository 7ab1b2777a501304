//! Per-seed result of the page processor.

use std::fmt;

use super::ProcessError;

/// Severity of a progress note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteLevel {
    /// Progress information, shown in verbose mode.
    Info,
    /// Non-fatal problem, always reported.
    Warning,
}

/// A human-readable progress message attached to an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Severity.
    pub level: NoteLevel,
    /// Message text.
    pub message: String,
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NoteLevel::Info => write!(f, "{}", self.message),
            NoteLevel::Warning => write!(f, "warning: {}", self.message),
        }
    }
}

/// Everything the page processor learned about one seed URL.
///
/// A successful outcome always has a non-empty `prefix`.
#[derive(Debug)]
pub struct ProcessOutcome {
    /// The seed URL as given.
    pub url: String,
    /// Configuration section used, once resolved.
    pub section: Option<String>,
    /// Sanitized naming prefix for this seed's assets.
    pub prefix: String,
    /// Discovered asset URLs; document order within each extraction rule.
    pub asset_urls: Vec<String>,
    /// Progress messages and warnings.
    pub notes: Vec<Note>,
    /// Fatal failure, if any.
    pub error: Option<ProcessError>,
}

impl ProcessOutcome {
    /// Creates an empty outcome for `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            section: None,
            prefix: String::new(),
            asset_urls: Vec::new(),
            notes: Vec::new(),
            error: None,
        }
    }

    /// Creates an outcome that failed before any progress.
    #[must_use]
    pub fn failed(url: impl Into<String>, error: ProcessError) -> Self {
        let mut outcome = Self::new(url);
        outcome.error = Some(error);
        outcome
    }

    /// Whether processing failed.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }

    /// Records a progress message.
    pub fn info(&mut self, message: impl Into<String>) {
        self.notes.push(Note {
            level: NoteLevel::Info,
            message: message.into(),
        });
    }

    /// Records a non-fatal warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.notes.push(Note {
            level: NoteLevel::Warning,
            message: message.into(),
        });
    }
}
