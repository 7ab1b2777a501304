//! Filesystem-safe prefix labels from decoded page text.

use html_escape::decode_html_entities;

/// Turns arbitrary (possibly entity-encoded) text into a filename stem.
///
/// In order: decode HTML entities, drop `/`, `\` and `|`, collapse runs of
/// spaces, tabs and non-breaking spaces into one space, trim surrounding
/// whitespace. The steps repeat until the text stops changing, so the result
/// is a fixed point and `sanitize_prefix(sanitize_prefix(x)) == sanitize_prefix(x)`.
///
/// Every pass that changes the text either shortens it or removes a tab or
/// non-breaking space, so the loop terminates.
#[must_use]
pub fn sanitize_prefix(input: &str) -> String {
    let mut current = sanitize_once(input);
    loop {
        let next = sanitize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn sanitize_once(input: &str) -> String {
    let decoded = decode_html_entities(input);
    let mut out = String::with_capacity(decoded.len());
    let mut pending_space = false;

    for ch in decoded.chars() {
        match ch {
            '/' | '\\' | '|' => {}
            ' ' | '\t' | '\u{a0}' => pending_space = true,
            c => {
                if pending_space && !out.is_empty() {
                    out.push(' ');
                }
                pending_space = false;
                out.push(c);
            }
        }
    }

    out.trim().to_string()
}
