//! Harness lifecycle: setup before a run, teardown after.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::GridConfig;
use crate::error::Result;
use crate::report::RunReport;

pub struct TestHarness {
    reports_dir: PathBuf,
}

impl TestHarness {
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
        }
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    /// Clears previous artifacts and validates the run environment.
    pub fn setup(&self, grid: &GridConfig) -> Result<()> {
        info!("harness setup started");
        self.clear_reports()?;
        self.validate_environment(grid);
        Ok(())
    }

    /// Writes the run report and logs the summary.
    pub fn teardown(&self, report: &RunReport) -> Result<PathBuf> {
        info!("harness teardown");
        let path = report.write(&self.reports_dir)?;
        Ok(path)
    }

    fn clear_reports(&self) -> Result<()> {
        if self.reports_dir.exists() {
            debug!(dir = %self.reports_dir.display(), "clearing previous reports");
            std::fs::remove_dir_all(&self.reports_dir)?;
        }
        std::fs::create_dir_all(&self.reports_dir)?;
        Ok(())
    }

    fn validate_environment(&self, grid: &GridConfig) {
        if grid.is_remote() {
            if grid.target.is_fallback() {
                info!(host = grid.target.host(), "grid override rejected, using fallback host");
            } else {
                info!(host = grid.target.host(), "using remote grid");
            }
        } else {
            info!("no grid override set, using local browser");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::EndpointResolver;
    use crate::report::RunReport;
    use std::sync::Arc;

    #[test]
    fn test_setup_clears_stale_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let reports = dir.path().join("reports");
        std::fs::create_dir_all(&reports).unwrap();
        std::fs::write(reports.join("stale.png"), b"old").unwrap();

        let resolver = EndpointResolver::with_sink(Arc::new(|_| {}));
        let grid = GridConfig::from_override(&resolver, None);
        let harness = TestHarness::new(&reports);
        harness.setup(&grid).unwrap();

        assert!(reports.exists());
        assert!(!reports.join("stale.png").exists());
    }

    #[test]
    fn test_teardown_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let harness = TestHarness::new(dir.path().join("reports"));
        let report = RunReport::from_suites(vec![], 0);
        let path = harness.teardown(&report).unwrap();
        assert!(path.exists());
    }
}
