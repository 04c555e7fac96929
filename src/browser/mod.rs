// SPDX-License-Identifier: MIT
//! Scoped headless-browser session over the Chrome DevTools Protocol.
//!
//! Lifecycle:
//!   1. `detect_browser()` probes PATH for a supported Chromium binary.
//!   2. `BrowserSession::launch()` starts it headless and spawns the CDP
//!      handler drain task.
//!   3. Navigation, waits, attribute reads, in-page evaluation, and the
//!      full-page screenshot all run against a single page.
//!   4. `close()` shuts the browser down and reaps the child process; every
//!      scenario calls it on both the success and the error path.

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::{
    SetDeviceMetricsOverrideParams, SetTouchEmulationEnabledParams, SetUserAgentOverrideParams,
};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::error::CdpError;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::devices::DeviceProfile;

/// Browser binaries to probe, in preference order.
pub const CANDIDATE_BROWSERS: &[&str] =
    &["chromium", "chrome", "google-chrome", "chromium-browser"];

const POLL_INTERVAL: Duration = Duration::from_millis(100);
/// Quiet interval after `readyState === "complete"`, approximating the
/// network-idle heuristic for static local pages.
const SETTLE_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    #[error(
        "no headless browser found on PATH. Install Chromium or Chrome and ensure one of \
         these binaries is available: chromium, chrome, google-chrome, chromium-browser"
    )]
    NoBrowser,

    #[error("failed to launch browser: {0}")]
    Launch(String),

    #[error("navigation to '{url}' failed: {source}")]
    Navigation {
        url: String,
        #[source]
        source: CdpError,
    },

    #[error("timed out after {secs}s waiting for {what}")]
    WaitTimeout { what: String, secs: u64 },

    #[error("in-page evaluation failed: {0}")]
    Evaluate(String),

    #[error("could not write screenshot to '{path}': {detail}")]
    Screenshot { path: String, detail: String },

    #[error(transparent)]
    Cdp(#[from] CdpError),
}

/// One headless Chromium instance with a single page, scoped to one scenario
/// run. Acquired at scenario start, released via `close()` on every path.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    nav_timeout: Duration,
    wait_timeout: Duration,
}

impl BrowserSession {
    /// Launch a headless browser and open a blank page.
    ///
    /// `nav_timeout` bounds the post-navigation settle loop; `wait_timeout`
    /// bounds the element/text poll loops. Individual CDP requests keep the
    /// library's default timeout.
    pub async fn launch(
        nav_timeout: Duration,
        wait_timeout: Duration,
    ) -> Result<Self, BrowserError> {
        let binary = detect_browser().ok_or(BrowserError::NoBrowser)?;
        debug!(browser = %binary.display(), "headless browser detected on PATH");

        let config = BrowserConfig::builder()
            .chrome_executable(binary)
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .window_size(1280, 720)
            .build()
            .map_err(BrowserError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        // Drain CDP messages between us and the browser for the lifetime of
        // the session; the stream ends when the browser closes.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    debug!("CDP handler event loop ended");
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await?;

        Ok(Self {
            browser,
            page,
            handler_task,
            nav_timeout,
            wait_timeout,
        })
    }

    /// Apply a device emulation profile to the page. Must run before
    /// navigation so the page renders with the emulated metrics from the
    /// first request.
    pub async fn emulate(&self, profile: &DeviceProfile) -> Result<(), BrowserError> {
        debug!(device = %profile.name, "applying device emulation profile");
        self.page
            .execute(SetDeviceMetricsOverrideParams::new(
                i64::from(profile.width),
                i64::from(profile.height),
                profile.device_scale_factor,
                profile.is_mobile,
            ))
            .await?;
        self.page
            .execute(SetTouchEmulationEnabledParams::new(profile.has_touch))
            .await?;
        self.page
            .execute(SetUserAgentOverrideParams::new(profile.user_agent.clone()))
            .await?;
        Ok(())
    }

    /// Navigate to `url` and wait for the page to settle: the load lifecycle,
    /// then `document.readyState === "complete"`, then one quiet interval.
    pub async fn navigate(&self, url: &str) -> Result<(), BrowserError> {
        debug!(url = %url, "navigating");
        self.page
            .goto(url)
            .await
            .map_err(|source| BrowserError::Navigation {
                url: url.to_string(),
                source,
            })?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(|source| BrowserError::Navigation {
                url: url.to_string(),
                source,
            })?;

        let start = Instant::now();
        loop {
            let ready = self
                .page
                .evaluate("document.readyState")
                .await
                .map_err(|e| BrowserError::Evaluate(e.to_string()))?
                .into_value::<String>()
                .ok();
            if ready.as_deref() == Some("complete") {
                break;
            }
            if start.elapsed() >= self.nav_timeout {
                return Err(BrowserError::WaitTimeout {
                    what: format!("page load of '{url}'"),
                    secs: self.nav_timeout.as_secs(),
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
        tokio::time::sleep(SETTLE_INTERVAL).await;
        Ok(())
    }

    /// Wait until an element matching the CSS selector exists.
    pub async fn wait_for_selector(&self, selector: &str) -> Result<(), BrowserError> {
        let start = Instant::now();
        loop {
            if self.page.find_element(selector).await.is_ok() {
                debug!(selector = %selector, ms = start.elapsed().as_millis() as u64, "element found");
                return Ok(());
            }
            if start.elapsed() >= self.wait_timeout {
                return Err(BrowserError::WaitTimeout {
                    what: format!("element '{selector}'"),
                    secs: self.wait_timeout.as_secs(),
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Wait until the page body's rendered text contains `needle`.
    pub async fn wait_for_text(&self, needle: &str) -> Result<(), BrowserError> {
        let quoted = serde_json::to_string(needle)
            .map_err(|e| BrowserError::Evaluate(e.to_string()))?;
        let expr = format!("document.body ? document.body.innerText.includes({quoted}) : false");
        let start = Instant::now();
        loop {
            let found = self
                .page
                .evaluate(expr.as_str())
                .await
                .map_err(|e| BrowserError::Evaluate(e.to_string()))?
                .into_value::<bool>()
                .unwrap_or(false);
            if found {
                debug!(needle = %needle, ms = start.elapsed().as_millis() as u64, "text found");
                return Ok(());
            }
            if start.elapsed() >= self.wait_timeout {
                return Err(BrowserError::WaitTimeout {
                    what: format!("text '{needle}'"),
                    secs: self.wait_timeout.as_secs(),
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Read an attribute of the first element matching the CSS selector.
    /// The element must exist; a missing attribute is `None`.
    pub async fn attribute(
        &self,
        selector: &str,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        let element = self.page.find_element(selector).await?;
        Ok(element.attribute(name).await?)
    }

    /// Run an expression in the page, awaiting any returned promise, and hand
    /// back the value. Used for computed styles and the in-page robots fetch.
    pub async fn evaluate(&self, expression: &str) -> Result<serde_json::Value, BrowserError> {
        let params = EvaluateParams::builder()
            .expression(expression)
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(BrowserError::Evaluate)?;
        let result = self
            .page
            .evaluate(params)
            .await
            .map_err(|e| BrowserError::Evaluate(e.to_string()))?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    /// `evaluate`, flattened to a display string.
    pub async fn evaluate_string(&self, expression: &str) -> Result<String, BrowserError> {
        let value = self.evaluate(expression).await?;
        Ok(match value {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
    }

    /// Current page title.
    pub async fn title(&self) -> Result<Option<String>, BrowserError> {
        Ok(self.page.get_title().await?)
    }

    /// Capture a full-page PNG to `path`, creating the parent directory if
    /// needed and overwriting any prior file.
    pub async fn screenshot(&self, path: &Path) -> Result<(), BrowserError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| BrowserError::Screenshot {
                    path: path.display().to_string(),
                    detail: e.to_string(),
                })?;
            }
        }
        self.page
            .save_screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(true)
                    .build(),
                path,
            )
            .await
            .map_err(|e| BrowserError::Screenshot {
                path: path.display().to_string(),
                detail: e.to_string(),
            })?;
        Ok(())
    }

    /// Shut the browser down and reap the child process. Errors here are
    /// logged, not propagated — teardown must not mask the scenario outcome.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!(error = %e, "error closing browser");
        }
        if let Err(e) = self.browser.wait().await {
            debug!(error = %e, "browser process already gone");
        }
        self.handler_task.abort();
    }
}

/// Find the first supported browser binary on PATH.
pub fn detect_browser() -> Option<PathBuf> {
    let path_var = std::env::var("PATH").ok()?;
    detect_in(std::env::split_paths(&path_var))
}

/// PATH-probe over an explicit directory list; split out for testability.
pub fn detect_in(dirs: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    let dirs: Vec<PathBuf> = dirs.into_iter().collect();
    for candidate in CANDIDATE_BROWSERS {
        for dir in &dirs {
            let full = dir.join(candidate);
            if is_executable(&full) {
                return Some(full);
            }
        }
    }
    None
}

/// PATH-lookup semantics: a stray non-executable file with a candidate name
/// must not shadow a real binary later in the search order.
fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        path.metadata()
            .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        path.is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn browser_config_builds() {
        // Structural check only — no browser is launched in tests.
        let config = BrowserConfig::builder()
            .no_sandbox()
            .window_size(1280, 720)
            .build();
        assert!(config.is_ok());
    }

    /// Create an empty file with the executable bit set (PATH-lookup would
    /// only accept an executable).
    fn touch_exec(path: &std::path::Path) {
        fs::write(path, b"").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    #[test]
    fn detect_in_finds_candidate() {
        let dir = TempDir::new().unwrap();
        touch_exec(&dir.path().join("chrome"));
        let found = detect_in([dir.path().to_path_buf()]);
        assert_eq!(found, Some(dir.path().join("chrome")));
    }

    #[test]
    fn detect_in_empty_dir_is_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(detect_in([dir.path().to_path_buf()]), None);
    }

    #[test]
    fn detect_in_prefers_chromium_over_chrome() {
        let dir = TempDir::new().unwrap();
        touch_exec(&dir.path().join("chrome"));
        touch_exec(&dir.path().join("chromium"));
        let found = detect_in([dir.path().to_path_buf()]);
        assert_eq!(found, Some(dir.path().join("chromium")));
    }

    #[test]
    fn detect_in_ignores_directories_with_candidate_names() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("chromium")).unwrap();
        assert_eq!(detect_in([dir.path().to_path_buf()]), None);
    }

    #[cfg(unix)]
    #[test]
    fn detect_in_skips_non_executable_shadow() {
        // A non-executable `chromium` early in the search order must not
        // shadow a real binary in a later directory.
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(first.path().join("chromium"), b"").unwrap();
        touch_exec(&second.path().join("chromium"));

        let found = detect_in([first.path().to_path_buf(), second.path().to_path_buf()]);
        assert_eq!(found, Some(second.path().join("chromium")));

        // Only the non-executable copy present: nothing is detected.
        assert_eq!(detect_in([first.path().to_path_buf()]), None);
    }
}
