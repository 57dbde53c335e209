//! Scoped ownership of one headless browser process.

use std::time::Duration;

use {
    chromiumoxide::{
        Browser, BrowserConfig as CdpBrowserConfig, Page, handler::viewport::Viewport,
    },
    futures::StreamExt,
    tokio::task::JoinHandle,
    tracing::{debug, info, warn},
};

use crate::{error::Error, types::SessionConfig};

/// Headroom added to the CDP request timeout so the navigation bound in the
/// probe always fires first on a stalled load and timeouts surface as
/// `NavigationTimeout`, not as an inner CDP request failure.
const REQUEST_TIMEOUT_MARGIN_MS: u64 = 5_000;

fn cdp_request_timeout(navigation_timeout_ms: u64) -> Duration {
    Duration::from_millis(navigation_timeout_ms.saturating_add(REQUEST_TIMEOUT_MARGIN_MS))
}

/// One exclusively owned browser process plus the task draining its CDP
/// connection.
///
/// The session must be released with [`BrowserSession::close`] on every exit
/// path; the diagnostic runner does this unconditionally after the probe,
/// whether it succeeded or faulted.
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl BrowserSession {
    /// Launch a headless browser on the host.
    pub async fn launch(config: &SessionConfig) -> Result<Self, Error> {
        let Some(chrome) = crate::detect::find_chromium(config.chrome_path.as_deref()) else {
            warn!("{}", crate::detect::install_hint());
            return Err(Error::BrowserNotAvailable);
        };

        let mut builder = CdpBrowserConfig::builder();

        // chromiumoxide runs headless by default; with_head() opts out.
        if !config.headless {
            builder = builder.with_head();
        }

        builder = builder
            .chrome_executable(&chrome)
            .viewport(Viewport {
                width: config.viewport_width,
                height: config.viewport_height,
                device_scale_factor: None,
                emulating_mobile: false,
                is_landscape: true,
                has_touch: false,
            })
            .request_timeout(cdp_request_timeout(config.navigation_timeout_ms));

        for arg in &config.chrome_args {
            builder = builder.arg(arg);
        }

        builder = builder
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-software-rasterizer")
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox");

        let cdp_config = builder.build().map_err(|e| {
            Error::LaunchFailed(format!("failed to build browser config: {e}"))
        })?;

        let (browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| Error::LaunchFailed(e.to_string()))?;

        // Drain the CDP websocket until the connection closes.
        let handler_task = tokio::spawn(async move {
            while let Some(message) = handler.next().await {
                if let Err(e) = message {
                    debug!(error = %e, "cdp handler error");
                }
            }
            debug!("cdp handler exited (connection closed)");
        });

        info!(
            chrome = %chrome.display(),
            headless = config.headless,
            viewport_width = config.viewport_width,
            viewport_height = config.viewport_height,
            "launched browser"
        );

        Ok(Self {
            browser,
            handler_task,
        })
    }

    /// Open a fresh page in this session.
    pub async fn new_page(&self) -> Result<Page, Error> {
        self.browser
            .new_page("about:blank")
            .await
            .map_err(|e| Error::LaunchFailed(format!("failed to open page: {e}")))
    }

    /// Close the browser and stop the handler task.
    ///
    /// Shutdown errors are logged, not propagated: by the time this runs the
    /// diagnostic outcome is already decided.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "browser close failed");
        }
        if let Err(e) = self.browser.wait().await {
            debug!(error = %e, "waiting for browser exit failed");
        }
        self.handler_task.abort();
        info!("closed browser session");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cdp_request_timeout_exceeds_navigation_bound() {
        let navigation = SessionConfig::default().navigation_timeout_ms;
        assert!(cdp_request_timeout(navigation) > Duration::from_millis(navigation));
    }

    #[test]
    fn test_cdp_request_timeout_saturates() {
        // A pathological config must not overflow.
        let timeout = cdp_request_timeout(u64::MAX);
        assert_eq!(timeout, Duration::from_millis(u64::MAX));
    }
}
