//! Applying prefix and extraction patterns to a fetched page.

use regex::bytes::Regex;
use tracing::debug;

use super::{ProcessError, ProcessOutcome, sanitize_prefix};
use crate::config::ExtractionRule;

/// Applies the prefix pattern to `body`.
///
/// The first capture group of the first match becomes the prefix. A pattern
/// that does not match, has no capture group, or captures only text that
/// sanitizes to nothing leaves `fallback` in place. A note is recorded either way.
///
/// # Errors
///
/// Returns [`ProcessError::PrefixPattern`] if the pattern does not compile.
pub fn resolve_prefix(
    section: &str,
    pattern: &str,
    body: &[u8],
    fallback: String,
    outcome: &mut ProcessOutcome,
) -> Result<String, ProcessError> {
    let regex = Regex::new(pattern).map_err(|source| ProcessError::PrefixPattern {
        section: section.to_string(),
        source,
    })?;

    let captured = regex
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned());

    match captured {
        Some(text) if !sanitize_prefix(&text).is_empty() => {
            outcome.info(format!("prefix pattern matched: {text}"));
            Ok(text)
        }
        Some(_) => {
            outcome.info(format!("prefix pattern captured no usable text; using {fallback}"));
            Ok(fallback)
        }
        None => {
            outcome.info(format!("prefix pattern did not match; using {fallback}"));
            Ok(fallback)
        }
    }
}

/// Appends the first capture group of every match of every rule to
/// `outcome.asset_urls`.
///
/// Rules are applied in the order given; matches of one rule keep document
/// order. A rule that fails to compile or has no capture group is skipped
/// with a warning.
pub fn apply_extraction_rules<'a>(
    rules: impl IntoIterator<Item = ExtractionRule<'a>>,
    body: &[u8],
    outcome: &mut ProcessOutcome,
) {
    for rule in rules {
        let regex = match Regex::new(rule.pattern) {
            Ok(regex) => regex,
            Err(e) => {
                outcome.warn(format!("skipping invalid pattern {}: {e}", rule.name));
                continue;
            }
        };
        if regex.captures_len() < 2 {
            outcome.warn(format!("skipping pattern {}: no capture group", rule.name));
            continue;
        }

        let before = outcome.asset_urls.len();
        outcome.asset_urls.extend(
            regex
                .captures_iter(body)
                .filter_map(|caps| caps.get(1))
                .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned()),
        );
        let found = outcome.asset_urls.len() - before;
        debug!(rule = rule.name, found, "applied extraction pattern");
        outcome.info(format!("{}: {found} match(es)", rule.name));
    }
}
