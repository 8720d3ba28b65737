//! Declarative test suites.
//!
//! A suite is an ordered list of steps executed against a fresh browser
//! session. Suites live as TOML files in a suites directory and can also be
//! built in code (see the built-in fixtures).

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

fn default_wait() -> Duration {
    Duration::from_secs(5)
}

/// A complete test suite parsed from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Suite {
    /// Unique name for this suite.
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Tags for filtering.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Steps executed in order; the first failure stops the suite.
    pub steps: Vec<TestStep>,
}

/// A single step in a suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case", rename_all_fields = "kebab-case")]
pub enum TestStep {
    /// Navigate to a URL (absolute, or relative to the configured base URL).
    Navigate {
        url: String,
        #[serde(default)]
        wait_for_selector: Option<String>,
    },

    /// Wait for an element to exist.
    WaitFor {
        selector: String,
        #[serde(default = "default_wait", with = "humantime_serde")]
        timeout: Duration,
    },

    /// Fill an input field.
    Fill { selector: String, value: String },

    /// Press a key on an element (e.g. "Enter").
    Press { selector: String, key: String },

    /// Click an element.
    Click { selector: String },

    /// Assert the page title contains a substring.
    AssertTitleContains { text: String },

    /// Assert the current URL contains a substring.
    AssertUrlContains { text: String },

    /// Save a screenshot into the reports directory.
    Screenshot { name: String },

    /// Fixed pause. Use sparingly; prefer wait-for.
    Sleep {
        #[serde(with = "humantime_serde")]
        duration: Duration,
    },
}

impl TestStep {
    /// Short label used in step outcomes and failure messages.
    pub fn label(&self) -> String {
        match self {
            TestStep::Navigate { url, .. } => format!("navigate {url}"),
            TestStep::WaitFor { selector, .. } => format!("wait-for {selector}"),
            TestStep::Fill { selector, .. } => format!("fill {selector}"),
            TestStep::Press { selector, key } => format!("press {key} on {selector}"),
            TestStep::Click { selector } => format!("click {selector}"),
            TestStep::AssertTitleContains { text } => format!("assert-title-contains {text:?}"),
            TestStep::AssertUrlContains { text } => format!("assert-url-contains {text:?}"),
            TestStep::Screenshot { name } => format!("screenshot {name}"),
            TestStep::Sleep { duration } => format!("sleep {duration:?}"),
        }
    }
}

impl Suite {
    /// Parses a suite from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Parses a suite from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| HarnessError::SuiteParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Loads all `*.toml` suites from a directory, sorted by file name.
    pub fn load_all(dir: &Path) -> Result<Vec<Self>> {
        let mut entries: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        entries.sort();

        entries.iter().map(|path| Self::from_file(path)).collect()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
