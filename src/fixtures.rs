//! Static test data and built-in suites.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::suite::{Suite, TestStep};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SearchData {
    pub valid_queries: Vec<String>,
    pub invalid_queries: Vec<String>,
}

impl Default for SearchData {
    fn default() -> Self {
        Self {
            valid_queries: vec![
                "WebDriver".to_string(),
                "Selenium".to_string(),
                "Test Automation".to_string(),
            ],
            invalid_queries: vec![String::new(), "   ".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UrlFixtures {
    pub search_engine: String,
    pub repository: String,
}

impl Default for UrlFixtures {
    fn default() -> Self {
        Self {
            search_engine: "https://www.google.com".to_string(),
            repository: "https://github.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TimeoutFixtures {
    #[serde(with = "humantime_serde")]
    pub short: Duration,
    #[serde(with = "humantime_serde")]
    pub medium: Duration,
    #[serde(with = "humantime_serde")]
    pub long: Duration,
}

impl Default for TimeoutFixtures {
    fn default() -> Self {
        Self {
            short: Duration::from_secs(5),
            medium: Duration::from_secs(10),
            long: Duration::from_secs(30),
        }
    }
}

/// Fixed test data shared across suites.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TestData {
    pub search: SearchData,
    pub urls: UrlFixtures,
    pub timeouts: TimeoutFixtures,
}

impl TestData {
    /// Loads fixture overrides from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// The built-in suites, mirroring the shipped `suites/*.toml` files.
pub fn builtin_suites(data: &TestData) -> Vec<Suite> {
    vec![smoke_suite(data), search_suite(data)]
}

/// Opens the search engine and verifies the title.
pub fn smoke_suite(data: &TestData) -> Suite {
    Suite {
        name: "smoke".to_string(),
        description: "Open the search engine and verify the title".to_string(),
        tags: vec!["smoke".to_string()],
        steps: vec![
            TestStep::Navigate {
                url: data.urls.search_engine.clone(),
                wait_for_selector: None,
            },
            TestStep::AssertTitleContains {
                text: "Google".to_string(),
            },
        ],
    }
}

/// Performs a search and verifies the results page.
pub fn search_suite(data: &TestData) -> Suite {
    let query = data
        .search
        .valid_queries
        .first()
        .cloned()
        .unwrap_or_default();
    Suite {
        name: "search".to_string(),
        description: "Perform a search and verify the results page".to_string(),
        tags: vec!["search".to_string()],
        steps: vec![
            TestStep::Navigate {
                url: data.urls.search_engine.clone(),
                wait_for_selector: Some("textarea[name=\"q\"]".to_string()),
            },
            TestStep::Fill {
                selector: "textarea[name=\"q\"]".to_string(),
                value: query,
            },
            TestStep::Press {
                selector: "textarea[name=\"q\"]".to_string(),
                key: "Enter".to_string(),
            },
            TestStep::AssertUrlContains {
                text: "search".to_string(),
            },
            TestStep::WaitFor {
                selector: "h3".to_string(),
                timeout: data.timeouts.medium,
            },
            TestStep::Screenshot {
                name: "search-results".to_string(),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_data_is_populated() {
        let data = TestData::default();
        assert_eq!(data.search.valid_queries.len(), 3);
        assert_eq!(data.search.invalid_queries.len(), 2);
        assert!(data.urls.search_engine.starts_with("https://"));
        assert_eq!(data.timeouts.short, Duration::from_secs(5));
        assert_eq!(data.timeouts.medium, Duration::from_secs(10));
        assert_eq!(data.timeouts.long, Duration::from_secs(30));
    }

    #[test]
    fn test_builtin_suites_are_runnable_shapes() {
        let suites = builtin_suites(&TestData::default());
        assert_eq!(suites.len(), 2);
        for suite in &suites {
            assert!(!suite.name.is_empty());
            assert!(!suite.steps.is_empty());
            assert!(matches!(suite.steps[0], TestStep::Navigate { .. }));
        }
    }

    #[test]
    fn test_search_suite_uses_first_valid_query() {
        let data = TestData::default();
        let suite = search_suite(&data);
        assert!(suite.steps.iter().any(|s| matches!(
            s,
            TestStep::Fill { value, .. } if value == &data.search.valid_queries[0]
        )));
    }

    #[test]
    fn test_fixture_overrides_from_toml() {
        let data: TestData = toml::from_str(
            r#"
            [search]
            valid-queries = ["rust"]

            [urls]
            search-engine = "https://duckduckgo.com"

            [timeouts]
            short = "2s"
            "#,
        )
        .unwrap();
        assert_eq!(data.search.valid_queries, vec!["rust"]);
        assert_eq!(data.urls.search_engine, "https://duckduckgo.com");
        assert_eq!(data.timeouts.short, Duration::from_secs(2));
        // Unset sections fall back to defaults.
        assert_eq!(data.timeouts.long, Duration::from_secs(30));
        assert_eq!(data.search.invalid_queries.len(), 2);
    }
}
