//! Run reporting.
//!
//! Serializable results for steps, suites and whole runs, written as a JSON
//! artifact into the reports directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;

/// File name of the JSON artifact inside the reports directory.
pub const RUN_REPORT_FILE: &str = "run-report.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    pub step: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    pub name: String,
    pub passed: bool,
    pub duration_ms: u64,
    pub steps: Vec<StepOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_screenshot: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub suites: Vec<SuiteReport>,
}

impl RunReport {
    /// Aggregates suite reports into a run report.
    pub fn from_suites(suites: Vec<SuiteReport>, duration_ms: u64) -> Self {
        let passed = suites.iter().filter(|s| s.passed).count();
        Self {
            total: suites.len(),
            passed,
            failed: suites.len() - passed,
            duration_ms,
            suites,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Writes the report as pretty JSON into the reports directory.
    pub fn write(&self, reports_dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(reports_dir)?;
        let path = reports_dir.join(RUN_REPORT_FILE);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        info!(path = %path.display(), "run report written");
        Ok(path)
    }

    /// Logs the pass/fail summary.
    pub fn log_summary(&self) {
        info!(
            "Results: {} passed, {} failed of {} suite(s) ({} ms)",
            self.passed, self.failed, self.total, self.duration_ms
        );
    }
}
