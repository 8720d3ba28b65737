use crate::browser::BrowserSession;
use crate::error::Result;

use super::base::BasePage;

/// Selectors for a search engine page. Defaults target Google's markup.
#[derive(Debug, Clone)]
pub struct SearchPageLocators {
    pub search_box: String,
    pub result_heading: String,
}

impl Default for SearchPageLocators {
    fn default() -> Self {
        Self {
            search_box: "textarea[name=\"q\"]".to_string(),
            result_heading: "h3".to_string(),
        }
    }
}

/// Page object for a search engine results flow.
pub struct SearchPage<'a> {
    base: BasePage<'a>,
    locators: SearchPageLocators,
}

impl<'a> SearchPage<'a> {
    pub fn new(session: &'a BrowserSession, url: impl Into<String>) -> Self {
        Self::with_locators(session, url, SearchPageLocators::default())
    }

    pub fn with_locators(
        session: &'a BrowserSession,
        url: impl Into<String>,
        locators: SearchPageLocators,
    ) -> Self {
        Self {
            base: BasePage::new(session, url),
            locators,
        }
    }

    pub fn base(&self) -> &BasePage<'a> {
        &self.base
    }

    pub async fn open(&self) -> Result<()> {
        self.base.open().await
    }

    pub async fn title(&self) -> Result<String> {
        self.base.title().await
    }

    /// Types a query into the search box and submits it.
    pub async fn search(&self, query: &str) -> Result<()> {
        let session = self.base.session();
        session.fill(&self.locators.search_box, query).await?;
        session.press_key(&self.locators.search_box, "Enter").await
    }

    /// Waits for result headings to appear and returns their count.
    pub async fn result_count(&self) -> Result<usize> {
        let session = self.base.session();
        session
            .wait_for_element(&self.locators.result_heading, session.wait_timeout())
            .await?;
        session.count_elements(&self.locators.result_heading).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_locators_target_google_markup() {
        let locators = SearchPageLocators::default();
        assert_eq!(locators.search_box, "textarea[name=\"q\"]");
        assert_eq!(locators.result_heading, "h3");
    }
}
