//! Page objects.
//!
//! Thin wrappers giving test code a vocabulary for a page instead of raw
//! selectors. Each page object borrows a [`BrowserSession`] and composes
//! [`BasePage`] for the shared open/title/wait/screenshot operations.
//!
//! [`BrowserSession`]: crate::browser::BrowserSession

mod base;
mod search;

pub use base::BasePage;
pub use search::{SearchPage, SearchPageLocators};
