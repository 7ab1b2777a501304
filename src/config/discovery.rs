//! Configuration file discovery.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::ConfigError;

const PROGRAM_NAME: &str = env!("CARGO_PKG_NAME");

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "REGEXDOWNLOAD_CONFIG";

/// Returns the configuration file candidates in priority order.
///
/// 1. `explicit` (the `--config` flag)
/// 2. the value of [`CONFIG_ENV_VAR`]
/// 3. `./.regexdownload.conf`
/// 4. `/opt/local/etc/regexdownload.conf`
/// 5. `/etc/regexdownload.conf`
#[must_use]
pub fn config_search_paths(explicit: Option<&Path>, env_value: Option<OsString>) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(5);
    if let Some(explicit) = explicit {
        paths.push(explicit.to_path_buf());
    }
    if let Some(value) = env_value.filter(|v| !v.is_empty()) {
        paths.push(PathBuf::from(value));
    }
    paths.push(PathBuf::from(format!(".{PROGRAM_NAME}.conf")));
    paths.push(Path::new("/opt/local/etc").join(format!("{PROGRAM_NAME}.conf")));
    paths.push(Path::new("/etc").join(format!("{PROGRAM_NAME}.conf")));
    paths
}

/// Finds the first existing configuration file.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] listing every searched location when none exists.
pub fn find_config_file(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let candidates = config_search_paths(explicit, std::env::var_os(CONFIG_ENV_VAR));
    first_existing(&candidates)
}

fn first_existing(candidates: &[PathBuf]) -> Result<PathBuf, ConfigError> {
    for candidate in candidates {
        if candidate.is_file() {
            debug!(path = %candidate.display(), "using configuration file");
            return Ok(candidate.clone());
        }
        debug!(path = %candidate.display(), "configuration candidate not present");
    }
    let searched = candidates
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(ConfigError::NotFound { searched })
}
