//! The diagnostic sequence for a single page.
//!
//! Strictly linear: acquire session, open page, register observers, navigate
//! with a bounded wait, settle, extract, scan. Any fault from the sequence is
//! caught at the single boundary in [`run_diagnostic`], reported as one
//! `ERROR:` line, and followed by the unconditional session close.

use std::sync::Arc;

use {
    chromiumoxide::Page,
    tokio::time::{Duration, timeout},
    tracing::{debug, info},
};

use crate::{
    error::Error, events, report::Reporter, session::BrowserSession, types::SessionConfig,
};

/// Matches elements whose class or id attribute contains "error"
/// (case-sensitive substring on the attribute value).
const ERROR_ELEMENT_SELECTOR: &str = r#"[class*="error"], [id*="error"]"#;

/// Run the full diagnostic against `url`, writing the report through
/// `reporter`.
///
/// The fault, if any, is also returned so the caller can log it; the process
/// outcome signal is the report text, not this result.
pub async fn run_diagnostic(
    config: &SessionConfig,
    url: &str,
    reporter: Arc<Reporter>,
) -> Result<(), Error> {
    let session = match BrowserSession::launch(config).await {
        Ok(session) => session,
        Err(error) => {
            reporter.fault(&error.to_string());
            return Err(error);
        },
    };

    let outcome = inspect_page(&session, config, url, Arc::clone(&reporter)).await;

    if let Err(ref error) = outcome {
        reporter.fault(&error.to_string());
    }

    session.close().await;
    outcome
}

async fn inspect_page(
    session: &BrowserSession,
    config: &SessionConfig,
    url: &str,
    reporter: Arc<Reporter>,
) -> Result<(), Error> {
    validate_url(url)?;

    let page = session.new_page().await?;

    // Observers must be live before navigation so no early event is missed.
    let observers = events::register_observers(&page, Arc::clone(&reporter)).await?;

    let result = navigate_and_extract(&page, config, url, &reporter).await;

    // Let already-queued events reach the report before the session goes away.
    observers.shutdown().await;

    result
}

async fn navigate_and_extract(
    page: &Page,
    config: &SessionConfig,
    url: &str,
    reporter: &Reporter,
) -> Result<(), Error> {
    let nav_timeout = Duration::from_millis(config.navigation_timeout_ms);

    timeout(nav_timeout, async {
        page.goto(url)
            .await
            .map_err(|e| Error::NavigationFailed(e.to_string()))?;

        // Best-effort network-idle stabilization, not a readiness guarantee.
        let _ = page.wait_for_navigation().await;

        Ok::<(), Error>(())
    })
    .await
    .map_err(|_| Error::NavigationTimeout(config.navigation_timeout_ms))??;

    info!(url, "page loaded");

    let content = page
        .content()
        .await
        .map_err(|e| Error::DomQueryFailed(e.to_string()))?;
    let title = page
        .get_title()
        .await
        .map_err(|e| Error::DomQueryFailed(e.to_string()))?
        .unwrap_or_default();

    reporter.page_title(&title);
    reporter.content_length(content.chars().count());

    scan_error_elements(page, reporter).await
}

/// Query for error-styled elements and report each one with non-empty
/// rendered text.
async fn scan_error_elements(page: &Page, reporter: &Reporter) -> Result<(), Error> {
    let elements = page
        .find_elements(ERROR_ELEMENT_SELECTOR)
        .await
        .map_err(|e| Error::DomQueryFailed(e.to_string()))?;

    debug!(matches = elements.len(), "scanned for error-styled elements");

    for element in elements {
        let text = element
            .inner_text()
            .await
            .map_err(|e| Error::DomQueryFailed(e.to_string()))?
            .unwrap_or_default();

        if !text.is_empty() {
            reporter.error_element(&text);
        }
    }

    Ok(())
}

/// Reject URLs the browser should never be pointed at.
fn validate_url(url: &str) -> Result<(), Error> {
    if url.is_empty() {
        return Err(Error::InvalidUrl("URL cannot be empty".to_string()));
    }

    let parsed =
        url::Url::parse(url).map_err(|e| Error::InvalidUrl(format!("'{url}': {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(Error::InvalidUrl(format!(
            "unsupported scheme '{scheme}', only http/https allowed"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url_valid() {
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("http://localhost:8080/path").is_ok());
        assert!(validate_url("https://upptime.bandlab.com/history/bandlab").is_ok());
    }

    #[test]
    fn test_validate_url_empty() {
        assert!(validate_url("").is_err());
    }

    #[test]
    fn test_validate_url_bad_scheme() {
        assert!(validate_url("ftp://example.com").is_err());
        assert!(validate_url("file:///etc/passwd").is_err());
        assert!(validate_url("javascript:alert(1)").is_err());
    }

    #[test]
    fn test_validate_url_malformed() {
        assert!(validate_url("not a url").is_err());
        assert!(validate_url("://missing.scheme").is_err());
    }

    #[test]
    fn test_selector_matches_attribute_substring_form() {
        // The selector is handed verbatim to querySelectorAll; keep both
        // attribute clauses present.
        assert!(ERROR_ELEMENT_SELECTOR.contains(r#"[class*="error"]"#));
        assert!(ERROR_ELEMENT_SELECTOR.contains(r#"[id*="error"]"#));
    }
}
