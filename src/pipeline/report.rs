//! Aggregated pipeline results and their human-readable rendering.

use std::io::{self, Write};
use std::process::ExitCode;

use crate::download::DownloadOutcome;
use crate::extract::{NoteLevel, ProcessOutcome};

/// Process exit outcome derived from a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessExit {
    /// Nothing failed.
    Success,
    /// Something failed, but at least one asset was downloaded.
    Partial,
    /// Something failed and nothing was downloaded.
    Failure,
}

impl ProcessExit {
    /// Numeric exit status.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::Partial => 2,
        }
    }
}

impl From<ProcessExit> for ExitCode {
    fn from(exit: ProcessExit) -> Self {
        ExitCode::from(exit.code())
    }
}

/// Maps completion and failure counts to the process exit outcome.
#[must_use]
pub fn determine_exit_outcome(completed: usize, failed: usize) -> ProcessExit {
    if failed == 0 {
        ProcessExit::Success
    } else if completed > 0 {
        ProcessExit::Partial
    } else {
        ProcessExit::Failure
    }
}

/// Everything a pipeline run produced.
#[derive(Debug, Default)]
pub struct PipelineReport {
    /// One outcome per seed that finished processing.
    pub processed: Vec<ProcessOutcome>,
    /// One outcome per attempted asset download.
    pub downloads: Vec<DownloadOutcome>,
}

impl PipelineReport {
    /// Seeds whose processing failed.
    #[must_use]
    pub fn failed_pages(&self) -> usize {
        self.processed.iter().filter(|p| p.is_failure()).count()
    }

    /// Assets written successfully.
    #[must_use]
    pub fn completed_downloads(&self) -> usize {
        self.downloads.iter().filter(|d| d.is_success()).count()
    }

    /// Assets that failed to download.
    #[must_use]
    pub fn failed_downloads(&self) -> usize {
        self.downloads.len() - self.completed_downloads()
    }

    /// Exit outcome for this run; failed pages and failed downloads both count.
    #[must_use]
    pub fn exit_outcome(&self) -> ProcessExit {
        determine_exit_outcome(
            self.completed_downloads(),
            self.failed_pages() + self.failed_downloads(),
        )
    }

    /// Writes the report.
    ///
    /// Successful downloads go to `out`, one path per line (`url -> path (N bytes)`
    /// when `verbose`). Failures and warnings go to `err`. Progress notes and
    /// pages without assets are written to `out` only when `verbose`.
    ///
    /// # Errors
    ///
    /// Returns any write error from `out` or `err`.
    pub fn render<O: Write, E: Write>(
        &self,
        verbose: bool,
        out: &mut O,
        err: &mut E,
    ) -> io::Result<()> {
        for page in &self.processed {
            for note in &page.notes {
                match note.level {
                    NoteLevel::Warning => writeln!(err, "{}: {note}", page.url)?,
                    NoteLevel::Info if verbose => writeln!(out, "{}: {note}", page.url)?,
                    NoteLevel::Info => {}
                }
            }
            if let Some(error) = &page.error {
                writeln!(err, "error: {}: {error}", page.url)?;
            } else if page.asset_urls.is_empty() && verbose {
                writeln!(out, "{}: no assets found", page.url)?;
            }
        }

        for download in &self.downloads {
            match &download.error {
                Some(error) => writeln!(err, "error: {}: {error}", download.url)?,
                None if verbose => writeln!(
                    out,
                    "{} -> {} ({} bytes)",
                    download.url,
                    download.path.display(),
                    download.bytes
                )?,
                None => writeln!(out, "{}", download.path.display())?,
            }
        }

        out.flush()?;
        err.flush()
    }
}
