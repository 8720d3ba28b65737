//! gridrun library
//!
//! A browser end-to-end test harness. Declarative suites run against a
//! Chromium instance that is either launched locally or reached through a
//! remote automation grid; the grid endpoint is validated by the
//! [`endpoint`] resolver before any connection is attempted.
//!
//! # Module Overview
//!
//! - [`endpoint`] - Grid hostname resolution and validation
//! - [`config`] - Harness configuration and grid mode selection
//! - [`browser`] - Session management over the CDP client
//! - [`suite`] - Declarative suite model (TOML)
//! - [`pages`] - Page-object wrappers
//! - [`runner`] - Suite execution, sequential or parallel
//! - [`report`] - Run reporting artifacts
//! - [`harness`] - Setup/teardown lifecycle
//! - [`fixtures`] - Static test data and built-in suites
//!
//! # Example
//!
//! ```no_run
//! use gridrun_lib::{
//!     BrowserManager, EndpointResolver, GridConfig, HarnessConfig, SuiteRunner, TestData,
//! };
//!
//! # async fn example() -> gridrun_lib::Result<()> {
//! let resolver = EndpointResolver::new();
//! let grid = GridConfig::from_env(&resolver);
//! let manager = BrowserManager::new(HarnessConfig::default(), grid);
//!
//! let suites = gridrun_lib::fixtures::builtin_suites(&TestData::default());
//! let report = SuiteRunner::new(&manager).run_parallel(&suites).await;
//! assert!(report.all_passed());
//! # Ok(())
//! # }
//! ```

pub mod browser;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod fixtures;
pub mod harness;
pub mod pages;
pub mod report;
pub mod runner;
pub mod suite;

pub use browser::{BrowserManager, BrowserSession};
pub use config::{GridConfig, GridMode, HarnessConfig, Timeouts, Viewport};
pub use endpoint::{
    ConnectionTarget, EndpointResolver, RejectReason, ALLOWED_HOSTS, FALLBACK_HOST, GRID_URL_ENV,
    LOCAL_HOST,
};
pub use error::{HarnessError, Result};
pub use fixtures::TestData;
pub use harness::TestHarness;
pub use pages::{BasePage, SearchPage};
pub use report::{RunReport, StepOutcome, SuiteReport};
pub use runner::SuiteRunner;
pub use suite::{Suite, TestStep};
