//! Line-oriented parser for the section configuration format.

use super::{ConfigError, ConfigSection, SiteConfig};

/// Parses configuration text into a [`SiteConfig`].
///
/// Format rules:
/// - `[name]` opens a section
/// - `key = value` or `key: value` adds a key to the current section
///   (split at the first separator, so patterns may contain `=` and `:`)
/// - blank lines and lines starting with `#` or `;` are ignored
/// - a value wrapped in double quotes has them stripped
///
/// # Errors
///
/// Returns [`ConfigError::Syntax`] for keys outside a section, lines without a
/// separator, empty keys, and empty or unterminated section headers.
pub fn parse_config_str(raw: &str) -> Result<SiteConfig, ConfigError> {
    let mut config = SiteConfig::new();
    let mut current: Option<ConfigSection> = None;

    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_number = line_index + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let Some(name) = header.strip_suffix(']') else {
                return Err(ConfigError::syntax(line_number, "unterminated section header"));
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(ConfigError::syntax(line_number, "empty section name"));
            }
            if let Some(finished) = current.replace(ConfigSection::new(name)) {
                config.insert_section(finished);
            }
            continue;
        }

        let Some((raw_key, raw_value)) = split_key_value(line) else {
            return Err(ConfigError::syntax(line_number, "expected key = value"));
        };
        let key = raw_key.trim();
        if key.is_empty() {
            return Err(ConfigError::syntax(line_number, "empty key"));
        }
        let Some(section) = current.as_mut() else {
            return Err(ConfigError::syntax(
                line_number,
                format!("key '{key}' appears before any [section] header"),
            ));
        };
        section.set(key, unquote(raw_value.trim()));
    }

    if let Some(finished) = current {
        config.insert_section(finished);
    }
    Ok(config)
}

fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let index = line.find(['=', ':'])?;
    Some((&line[..index], &line[index + 1..]))
}

fn unquote(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}
