//! Harness configuration.
//!
//! Defaults mirror the reference grid setup: two parallel browser instances,
//! a 10 second element wait, and a 120 second / 3 attempt connection retry
//! budget. A TOML config file can override any field; CLI flags override the
//! file.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::endpoint::{grid_override_from_env, ConnectionTarget, EndpointResolver};
use crate::error::Result;

/// Default Chrome DevTools port on a containerized grid node.
pub const DEFAULT_GRID_PORT: u16 = 9222;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Error)]
pub enum ViewportParseError {
    #[error("Invalid viewport format: expected WIDTHxHEIGHT (e.g., 1280x720)")]
    InvalidFormat,
    #[error("Viewport dimensions must be positive integers")]
    InvalidDimension,
}

impl FromStr for Viewport {
    type Err = ViewportParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (w, h) = s.split_once('x').ok_or(ViewportParseError::InvalidFormat)?;
        let width: u32 = w.trim().parse().map_err(|_| ViewportParseError::InvalidDimension)?;
        let height: u32 = h.trim().parse().map_err(|_| ViewportParseError::InvalidDimension)?;
        if width == 0 || height == 0 {
            return Err(ViewportParseError::InvalidDimension);
        }
        Ok(Viewport { width, height })
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Timeouts governing browser interaction and grid connection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Timeouts {
    /// Default wait when polling for elements or page load.
    #[serde(with = "humantime_serde")]
    pub wait: Duration,
    /// Total budget for establishing the grid connection.
    #[serde(with = "humantime_serde")]
    pub connection_retry: Duration,
    /// Attempts within the connection retry budget.
    pub connection_retry_count: u32,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            wait: Duration::from_secs(10),
            connection_retry: Duration::from_secs(120),
            connection_retry_count: 3,
        }
    }
}

/// Top-level harness configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HarnessConfig {
    /// Base URL prepended to relative navigation targets.
    pub base_url: String,
    /// Maximum number of concurrently running browser sessions.
    pub max_instances: usize,
    pub viewport: Viewport,
    /// Headless launch for the local browser; a remote grid node manages
    /// its own browser process.
    pub headless: bool,
    pub timeouts: Timeouts,
    /// Directory receiving screenshots and the run report.
    pub reports_dir: PathBuf,
    /// DevTools port on the grid node.
    pub grid_port: u16,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_string(),
            max_instances: 2,
            viewport: Viewport::default(),
            headless: false,
            timeouts: Timeouts::default(),
            reports_dir: PathBuf::from("reports"),
            grid_port: DEFAULT_GRID_PORT,
        }
    }
}

impl HarnessConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Resolves an absolute URL for a possibly relative navigation target.
    pub fn absolute_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}/{}", self.base_url.trim_end_matches('/'), url.trim_start_matches('/'))
        }
    }
}

/// How the harness reaches a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridMode {
    /// Launch a Chromium process locally.
    LocalBrowser,
    /// Connect to a remote grid node over CDP.
    Remote { host: String },
}

/// The resolved grid connection, pairing the validated target with the
/// execution mode. The mode follows the *presence* of an override, not the
/// resolved hostname: a fallback still means the caller asked for a grid.
#[derive(Debug, Clone)]
pub struct GridConfig {
    pub target: ConnectionTarget,
    pub mode: GridMode,
}

impl GridConfig {
    /// Builds the grid configuration from the process environment.
    ///
    /// Computed once at configuration-load time; resolution itself never
    /// fails, so neither does this.
    pub fn from_env(resolver: &EndpointResolver) -> Self {
        Self::from_override(resolver, grid_override_from_env().as_deref())
    }

    /// Builds the grid configuration from an explicit override value.
    pub fn from_override(resolver: &EndpointResolver, raw: Option<&str>) -> Self {
        let target = resolver.resolve(raw);
        let mode = if raw.is_some() {
            GridMode::Remote {
                host: target.host().to_string(),
            }
        } else {
            GridMode::LocalBrowser
        };
        Self { target, mode }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self.mode, GridMode::Remote { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_setup() {
        let cfg = HarnessConfig::default();
        assert_eq!(cfg.base_url, "http://localhost");
        assert_eq!(cfg.max_instances, 2);
        assert_eq!(cfg.timeouts.wait, Duration::from_secs(10));
        assert_eq!(cfg.timeouts.connection_retry, Duration::from_secs(120));
        assert_eq!(cfg.timeouts.connection_retry_count, 3);
        assert_eq!(cfg.reports_dir, PathBuf::from("reports"));
        assert_eq!(cfg.grid_port, 9222);
        assert!(!cfg.headless);
    }

    #[test]
    fn test_parse_toml_overrides() {
        let cfg: HarnessConfig = toml::from_str(
            r#"
            base-url = "http://app:3000"
            max-instances = 4
            headless = true

            [timeouts]
            wait = "5s"
            connection-retry = "30s"
            connection-retry-count = 2
            "#,
        )
        .unwrap();
        assert_eq!(cfg.base_url, "http://app:3000");
        assert_eq!(cfg.max_instances, 4);
        assert!(cfg.headless);
        assert_eq!(cfg.timeouts.wait, Duration::from_secs(5));
        assert_eq!(cfg.timeouts.connection_retry_count, 2);
        // Unspecified fields keep their defaults.
        assert_eq!(cfg.grid_port, 9222);
    }

    #[test]
    fn test_viewport_parse() {
        let vp: Viewport = "1920x1080".parse().unwrap();
        assert_eq!(vp.width, 1920);
        assert_eq!(vp.height, 1080);
        assert!("1920".parse::<Viewport>().is_err());
        assert!("0x720".parse::<Viewport>().is_err());
        assert!("axb".parse::<Viewport>().is_err());
        assert_eq!(Viewport::default().to_string(), "1280x720");
    }

    #[test]
    fn test_absolute_url() {
        let cfg = HarnessConfig::default();
        assert_eq!(cfg.absolute_url("/login"), "http://localhost/login");
        assert_eq!(cfg.absolute_url("login"), "http://localhost/login");
        assert_eq!(
            cfg.absolute_url("https://example.com/x"),
            "https://example.com/x"
        );
    }

    #[test]
    fn test_grid_mode_follows_override_presence() {
        let resolver = EndpointResolver::with_sink(std::sync::Arc::new(|_| {}));

        let grid = GridConfig::from_override(&resolver, None);
        assert_eq!(grid.mode, GridMode::LocalBrowser);
        assert_eq!(grid.target.host(), "localhost");

        let grid = GridConfig::from_override(&resolver, Some("http://selenium-hub:4444"));
        assert!(grid.is_remote());
        assert_eq!(grid.target.host(), "selenium-hub");

        // A rejected override still selects remote mode, on the fallback host.
        let grid = GridConfig::from_override(&resolver, Some("http://evil.com:9999"));
        assert!(grid.is_remote());
        assert_eq!(grid.target.host(), "selenium-hub");
        assert!(grid.target.is_fallback());
    }
}
