//! Browser session management.
//!
//! Sessions are bounded by a semaphore sized to `max_instances`, so parallel
//! suite runs never start more browsers than configured. Each session gets
//! its own browser: either a locally launched Chromium or a CDP connection
//! to a remote grid node.

use std::sync::Arc;

use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::config::{GridConfig, GridMode, HarnessConfig};
use crate::error::{HarnessError, Result};

use super::session::BrowserSession;

/// Manages concurrent browser sessions with semaphore-based limiting.
#[derive(Debug)]
pub struct BrowserManager {
    config: HarnessConfig,
    grid: GridConfig,
    semaphore: Arc<Semaphore>,
}

impl BrowserManager {
    pub fn new(config: HarnessConfig, grid: GridConfig) -> Self {
        let permits = config.max_instances.max(1);
        Self {
            config,
            grid,
            semaphore: Arc::new(Semaphore::new(permits)),
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    /// Acquires a session, waiting if the instance limit is reached.
    pub async fn session(&self) -> Result<BrowserSession> {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| HarnessError::config("Browser manager unavailable"))?;

        let (browser, mut handler) = match &self.grid.mode {
            GridMode::LocalBrowser => self.launch_local().await?,
            GridMode::Remote { host } => self.connect_remote(host).await?,
        };

        // Drive CDP events for the lifetime of the session.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await?;

        Ok(BrowserSession::new(
            browser,
            handler_task,
            page,
            permit,
            self.config.timeouts.wait,
            self.config.reports_dir.clone(),
        ))
    }

    async fn launch_local(&self) -> Result<(Browser, chromiumoxide::Handler)> {
        let mut builder = BrowserConfig::builder()
            .window_size(self.config.viewport.width, self.config.viewport.height)
            .args(vec!["--no-sandbox", "--disable-dev-shm-usage"]);

        if !self.config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(HarnessError::Launch)?;

        debug!(headless = self.config.headless, "launching local browser");
        let pair = Browser::launch(browser_config)
            .await
            .map_err(|e| HarnessError::Launch(e.to_string()))?;
        Ok(pair)
    }

    async fn connect_remote(&self, host: &str) -> Result<(Browser, chromiumoxide::Handler)> {
        let endpoint = format!("http://{host}:{}", self.config.grid_port);
        let attempts = self.config.timeouts.connection_retry_count.max(1);
        let backoff = self.config.timeouts.connection_retry / attempts;

        info!(%endpoint, "connecting to grid");
        let mut last_error = String::new();
        for attempt in 1..=attempts {
            match Browser::connect(&endpoint).await {
                Ok(pair) => return Ok(pair),
                Err(e) => {
                    last_error = e.to_string();
                    debug!(attempt, %last_error, "grid connection attempt failed");
                    if attempt < attempts {
                        tokio::time::sleep(backoff).await;
                    }
                }
            }
        }

        Err(HarnessError::GridConnection {
            endpoint,
            attempts,
            message: last_error,
        })
    }
}
