//! Naming of downloaded assets, fallback prefixes, and retained snapshots.

use std::time::{SystemTime, UNIX_EPOCH};

use url::Url;

/// Extension used when an asset URL has none.
pub const UNKNOWN_EXTENSION: &str = ".unknown";

/// Builds the target filename `<prefix>-<NN><ext>` for the asset at 1-based `index`.
#[must_use]
pub fn asset_filename(prefix: &str, index: usize, asset_url: &str) -> String {
    let extension =
        extension_from_url(asset_url).unwrap_or_else(|| UNKNOWN_EXTENSION.to_string());
    format!("{prefix}-{index:02}{extension}")
}

/// Returns the extension (with its dot) of the last path segment of `url`.
///
/// Query and fragment are ignored. Text that does not parse as a URL is treated
/// as a bare path.
#[must_use]
pub fn extension_from_url(url: &str) -> Option<String> {
    let last_segment = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(str::to_string),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('/').next())
            .map(str::to_string),
    }?;
    let dot_index = last_segment.rfind('.')?;
    let extension = &last_segment[dot_index..];
    (extension.len() > 1).then(|| extension.to_string())
}

/// Prefix used when a section has no prefix pattern or it does not match.
#[must_use]
pub fn fallback_prefix(section: &str) -> String {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("{section}-{seconds}")
}

/// Filename of a retained page snapshot.
#[must_use]
pub fn snapshot_filename(section: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("{section}-{nanos}.html")
}
