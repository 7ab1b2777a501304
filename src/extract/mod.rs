//! Page processing: fetch a seed page, derive a naming prefix, and collect
//! asset URLs with the patterns configured for the seed's domain.
//!
//! # Overview
//!
//! - [`PageProcessor`]: async trait turning one seed URL into a [`ProcessOutcome`]
//! - [`HttpPageProcessor`]: the HTTP implementation
//! - [`sanitize_prefix`]: normalizes a raw prefix into a filename-safe form
//! - [`PageSnapshot`]: temporary on-disk copy of a fetched page

mod error;
mod outcome;
mod page;
mod patterns;
mod sanitize;
mod snapshot;

pub use error::ProcessError;
pub use outcome::{Note, NoteLevel, ProcessOutcome};
pub use page::{HttpPageProcessor, PageProcessor};
pub use patterns::{apply_extraction_rules, resolve_prefix};
pub use sanitize::sanitize_prefix;
pub use snapshot::PageSnapshot;
