//! Suite execution.
//!
//! Each suite runs against a fresh browser session. Steps execute in order
//! and the first failure stops the suite; a failing suite never aborts the
//! run, it is recorded in the report. Parallel runs are bounded by the
//! browser manager's instance limit.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use futures::future::join_all;
use tracing::{debug, error, info};

use crate::browser::{BrowserManager, BrowserSession};
use crate::error::{HarnessError, Result};
use crate::report::{RunReport, StepOutcome, SuiteReport};
use crate::suite::{Suite, TestStep};

pub struct SuiteRunner<'a> {
    manager: &'a BrowserManager,
}

impl<'a> SuiteRunner<'a> {
    pub fn new(manager: &'a BrowserManager) -> Self {
        Self { manager }
    }

    /// Runs suites one after another.
    pub async fn run_sequential(&self, suites: &[Suite]) -> RunReport {
        let start = Instant::now();
        let mut reports = Vec::with_capacity(suites.len());
        for suite in suites {
            reports.push(self.run_suite(suite).await);
        }
        self.finish(reports, start)
    }

    /// Runs suites concurrently, bounded by the configured instance limit.
    pub async fn run_parallel(&self, suites: &[Suite]) -> RunReport {
        let start = Instant::now();
        let reports = join_all(suites.iter().map(|suite| self.run_suite(suite))).await;
        self.finish(reports, start)
    }

    fn finish(&self, reports: Vec<SuiteReport>, start: Instant) -> RunReport {
        let report = RunReport::from_suites(reports, start.elapsed().as_millis() as u64);
        report.log_summary();
        report
    }

    /// Runs a single suite in its own session.
    pub async fn run_suite(&self, suite: &Suite) -> SuiteReport {
        let start = Instant::now();
        info!(suite = %suite.name, "running suite");

        let session = match self.manager.session().await {
            Ok(session) => session,
            Err(e) => {
                error!(suite = %suite.name, error = %e, "session setup failed");
                return SuiteReport {
                    name: suite.name.clone(),
                    passed: false,
                    duration_ms: start.elapsed().as_millis() as u64,
                    steps: vec![],
                    error: Some(e.to_string()),
                    failure_screenshot: None,
                };
            }
        };

        let mut steps = Vec::with_capacity(suite.steps.len());
        let mut failure: Option<String> = None;

        for step in &suite.steps {
            let label = step.label();
            let step_start = Instant::now();
            let result = self.execute_step(&session, step).await;
            let duration_ms = step_start.elapsed().as_millis() as u64;

            match result {
                Ok(()) => {
                    debug!(suite = %suite.name, %label, "step ok");
                    steps.push(StepOutcome {
                        step: label,
                        success: true,
                        error: None,
                        duration_ms,
                    });
                }
                Err(e) => {
                    error!(suite = %suite.name, %label, error = %e, "step failed");
                    failure = Some(e.to_string());
                    steps.push(StepOutcome {
                        step: label,
                        success: false,
                        error: Some(e.to_string()),
                        duration_ms,
                    });
                    break;
                }
            }
        }

        let failure_screenshot = if failure.is_some() {
            let name = failure_screenshot_name(&suite.name);
            match session.save_screenshot(&name).await {
                Ok(path) => Some(path),
                Err(e) => {
                    debug!(suite = %suite.name, error = %e, "failure screenshot not captured");
                    None
                }
            }
        } else {
            None
        };

        if let Err(e) = session.close().await {
            debug!(suite = %suite.name, error = %e, "session close failed");
        }

        let passed = failure.is_none();
        if passed {
            info!(suite = %suite.name, "suite passed");
        }

        SuiteReport {
            name: suite.name.clone(),
            passed,
            duration_ms: start.elapsed().as_millis() as u64,
            steps,
            error: failure,
            failure_screenshot,
        }
    }

    async fn execute_step(&self, session: &BrowserSession, step: &TestStep) -> Result<()> {
        let config = self.manager.config();
        match step {
            TestStep::Navigate {
                url,
                wait_for_selector,
            } => {
                session.navigate(&config.absolute_url(url)).await?;
                session.wait_for_page_load(config.timeouts.wait).await?;
                if let Some(selector) = wait_for_selector {
                    session
                        .wait_for_element(selector, config.timeouts.wait)
                        .await?;
                }
                Ok(())
            }
            TestStep::WaitFor { selector, timeout } => {
                session.wait_for_element(selector, *timeout).await?;
                Ok(())
            }
            TestStep::Fill { selector, value } => session.fill(selector, value).await,
            TestStep::Press { selector, key } => session.press_key(selector, key).await,
            TestStep::Click { selector } => session.click(selector).await,
            TestStep::AssertTitleContains { text } => {
                let title = session.title().await?;
                if title.contains(text) {
                    Ok(())
                } else {
                    Err(HarnessError::AssertionFailed(format!(
                        "title {title:?} does not contain {text:?}"
                    )))
                }
            }
            TestStep::AssertUrlContains { text } => {
                let url = session.current_url().await?;
                if url.contains(text) {
                    Ok(())
                } else {
                    Err(HarnessError::AssertionFailed(format!(
                        "url {url:?} does not contain {text:?}"
                    )))
                }
            }
            TestStep::Screenshot { name } => {
                session.save_screenshot(name).await?;
                Ok(())
            }
            TestStep::Sleep { duration } => {
                tokio::time::sleep(*duration).await;
                Ok(())
            }
        }
    }
}

fn failure_screenshot_name(suite: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("failure-{suite}-{millis}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_screenshot_name_has_suite_prefix() {
        let name = failure_screenshot_name("search");
        assert!(name.starts_with("failure-search-"));
        let suffix = name.trim_start_matches("failure-search-");
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }
}
