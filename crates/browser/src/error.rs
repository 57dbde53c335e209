//! Diagnostic error types.

use thiserror::Error;

/// Errors that can occur while launching the browser or probing a page.
///
/// All of these are caught at the single boundary in [`crate::probe`] and
/// surfaced as one `ERROR:` report line.
#[derive(Debug, Error)]
pub enum Error {
    #[error("browser not available: Chrome/Chromium not found")]
    BrowserNotAvailable,

    #[error("browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("navigation failed: {0}")]
    NavigationFailed(String),

    #[error("navigation timed out after {0}ms")]
    NavigationTimeout(u64),

    #[error("DOM query failed: {0}")]
    DomQueryFailed(String),

    #[error("invalid target URL: {0}")]
    InvalidUrl(String),

    #[error("CDP error: {0}")]
    Cdp(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<chromiumoxide::error::CdpError> for Error {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Error::Cdp(err.to_string())
    }
}
