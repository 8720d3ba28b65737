//! Browser automation module.
//!
//! Thin wrappers over the CDP client: session acquisition with concurrency
//! limiting, local launch or remote grid connection, and the page-level
//! primitives the page objects and the runner build on.
//!
//! - [`manager`] - Session management and grid connection
//! - [`session`] - Page-level operations (navigate, wait, screenshot)

mod manager;
mod session;

pub use manager::BrowserManager;
pub use session::{BrowserSession, POLL_INTERVAL};
