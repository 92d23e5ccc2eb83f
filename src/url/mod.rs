//! URL handling module for the harvester
//!
//! This module builds catalog page URLs from the configured template and
//! resolves listing links against the page they were found on.

mod resolve;
mod template;

// Re-export main functions
pub use resolve::resolve_link;
pub use template::{page_url, PAGE_PLACEHOLDER};
