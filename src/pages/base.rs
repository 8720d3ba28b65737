use std::path::PathBuf;
use std::time::Duration;

use chromiumoxide::element::Element;

use crate::browser::BrowserSession;
use crate::error::Result;

/// Shared behavior for all page objects: open, title, wait, screenshot.
pub struct BasePage<'a> {
    session: &'a BrowserSession,
    url: String,
}

impl<'a> BasePage<'a> {
    pub fn new(session: &'a BrowserSession, url: impl Into<String>) -> Self {
        Self {
            session,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn session(&self) -> &BrowserSession {
        self.session
    }

    /// Navigates to the page and waits for it to finish loading.
    pub async fn open(&self) -> Result<()> {
        self.session.navigate(&self.url).await?;
        self.session
            .wait_for_page_load(self.session.wait_timeout())
            .await
    }

    pub async fn title(&self) -> Result<String> {
        self.session.title().await
    }

    pub async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<Element> {
        self.session.wait_for_element(selector, timeout).await
    }

    pub async fn screenshot(&self, name: &str) -> Result<PathBuf> {
        self.session.save_screenshot(name).await
    }
}
