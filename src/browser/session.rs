//! Page-level browser operations.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::element::Element;
use chromiumoxide::page::{Page, ScreenshotParams};
use tokio::sync::OwnedSemaphorePermit;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{HarnessError, Result};

/// Interval between element-lookup attempts while waiting.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A single browser session: one browser, one page.
///
/// Dropping the session releases its concurrency permit; call
/// [`BrowserSession::close`] to also shut the browser down cleanly.
#[derive(Debug)]
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: Page,
    wait_timeout: Duration,
    reports_dir: PathBuf,
    _permit: OwnedSemaphorePermit,
}

impl BrowserSession {
    pub(crate) fn new(
        browser: Browser,
        handler_task: JoinHandle<()>,
        page: Page,
        permit: OwnedSemaphorePermit,
        wait_timeout: Duration,
        reports_dir: PathBuf,
    ) -> Self {
        Self {
            browser,
            handler_task,
            page,
            wait_timeout,
            reports_dir,
            _permit: permit,
        }
    }

    /// The default wait applied when no explicit timeout is given.
    pub fn wait_timeout(&self) -> Duration {
        self.wait_timeout
    }

    /// Navigates to a URL and waits for the navigation to settle.
    pub async fn navigate(&self, url: &str) -> Result<()> {
        debug!(%url, "navigate");
        self.page
            .goto(url)
            .await
            .map_err(|e| HarnessError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| HarnessError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// The current page title, empty if the page has none.
    pub async fn title(&self) -> Result<String> {
        Ok(self.page.get_title().await?.unwrap_or_default())
    }

    /// The current page URL.
    pub async fn current_url(&self) -> Result<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    /// Finds an element immediately, without waiting.
    pub async fn find_element(&self, selector: &str) -> Result<Element> {
        self.page
            .find_element(selector)
            .await
            .map_err(|_| HarnessError::ElementNotFound {
                selector: selector.to_string(),
            })
    }

    /// Polls until an element exists or the timeout elapses.
    pub async fn wait_for_element(&self, selector: &str, timeout: Duration) -> Result<Element> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Ok(element) = self.page.find_element(selector).await {
                return Ok(element);
            }
            if Instant::now() >= deadline {
                return Err(HarnessError::Timeout {
                    what: format!("element {selector}"),
                    timeout,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Waits until `document.readyState` reports complete.
    pub async fn wait_for_page_load(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            let state: String = self
                .page
                .evaluate("document.readyState")
                .await?
                .into_value()?;
            if state == "complete" {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(HarnessError::Timeout {
                    what: "page load".to_string(),
                    timeout,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Waits for an input, then types a value into it.
    pub async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        let element = self.wait_for_element(selector, self.wait_timeout).await?;
        element.click().await?;
        element.type_str(value).await?;
        Ok(())
    }

    /// Presses a key (e.g. "Enter") on an element.
    pub async fn press_key(&self, selector: &str, key: &str) -> Result<()> {
        let element = self.wait_for_element(selector, self.wait_timeout).await?;
        element.press_key(key).await?;
        Ok(())
    }

    /// Waits for an element, then clicks it.
    pub async fn click(&self, selector: &str) -> Result<()> {
        let element = self.wait_for_element(selector, self.wait_timeout).await?;
        element.click().await?;
        Ok(())
    }

    /// Number of elements currently matching a selector.
    pub async fn count_elements(&self, selector: &str) -> Result<usize> {
        Ok(self.page.find_elements(selector).await?.len())
    }

    /// Evaluates a JavaScript expression and deserializes the result.
    pub async fn evaluate<T: serde::de::DeserializeOwned>(&self, expr: &str) -> Result<T> {
        Ok(self.page.evaluate(expr).await?.into_value()?)
    }

    /// Saves a full-page PNG screenshot as `{reports_dir}/{name}.png`.
    pub async fn save_screenshot(&self, name: &str) -> Result<PathBuf> {
        let path = self.reports_dir.join(format!("{name}.png"));
        self.save_screenshot_to(&path).await?;
        Ok(path)
    }

    /// Saves a full-page PNG screenshot to an explicit path.
    pub async fn save_screenshot_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();
        self.page.save_screenshot(params, path).await?;
        debug!(path = %path.display(), "screenshot saved");
        Ok(())
    }

    /// Closes the page and browser and stops the event handler.
    pub async fn close(mut self) -> Result<()> {
        self.browser.close().await?;
        self.handler_task.abort();
        Ok(())
    }
}
