//! Constants for the download module.

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default overall request timeout (5 minutes for large assets).
pub const REQUEST_TIMEOUT_SECS: u64 = 300;
