use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Failed to connect to grid at {endpoint} after {attempts} attempts: {message}")]
    GridConnection {
        endpoint: String,
        attempts: u32,
        message: String,
    },

    #[error("Navigation to '{url}' failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("Timed out after {timeout:?} waiting for: {what}")]
    Timeout { what: String, timeout: Duration },

    #[error("Step '{step}' failed: {reason}")]
    StepFailed { step: String, reason: String },

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Suite parse error in {path}: {message}")]
    SuiteParse { path: String, message: String },

    #[error("Suite not found: {0}")]
    SuiteNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HarnessError {
    pub fn config(message: impl Into<String>) -> Self {
        HarnessError::Config(message.into())
    }

    pub fn step_failed(step: impl Into<String>, reason: impl Into<String>) -> Self {
        HarnessError::StepFailed {
            step: step.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
