//! Headless page diagnostics over CDP.
//!
//! Launches a managed Chromium, navigates to a single URL, and reports what a
//! human debugging the page would want first: console output, failed network
//! requests, the page title, the serialized content length, and the text of
//! elements styled as errors.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use pagecheck_browser::{Reporter, SessionConfig, run_diagnostic};
//!
//! let config = SessionConfig::default();
//! let reporter = Arc::new(Reporter::stdout());
//! run_diagnostic(&config, "https://example.com", reporter).await;
//! ```

pub mod detect;
pub mod error;
pub mod events;
pub mod probe;
pub mod report;
pub mod session;
pub mod types;

pub use {
    error::Error,
    events::DiagnosticEvent,
    probe::run_diagnostic,
    report::Reporter,
    session::BrowserSession,
    types::SessionConfig,
};
