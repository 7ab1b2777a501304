//! User-Agent string shared by page and asset requests.

/// Default User-Agent: `regexdownload/<version>`.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
