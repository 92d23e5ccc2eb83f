//! Listing Harvester: a resumable catalog crawler
//!
//! This crate walks a paginated real-estate catalog one page at a time,
//! extracts the listing cards from each page and appends them to a CSV
//! dataset. The next page to visit is persisted after every page so an
//! interrupted run picks up where it stopped.

pub mod config;
pub mod crawler;
pub mod listing;
pub mod output;
pub mod state;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Page fetcher used after it was closed")]
    FetcherClosed,

    #[error("Corrupt state file {}: {source}", path.display())]
    CorruptState {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("State file {}: {source}", path.display())]
    StateIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write dataset {}: {source}", path.display())]
    SinkWrite { path: PathBuf, source: csv::Error },

    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },
}

impl HarvestError {
    /// Returns true if the error came from fetching a catalog page
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::FetcherClosed
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("URL template is missing the {{page}} placeholder: {0}")]
    MissingPlaceholder(String),

    #[error("Failed to parse URL: {0}")]
    Parse(#[from] ::url::ParseError),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),
}

/// Result type alias for harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use listing::ListingRecord;
pub use output::{RecordSink, RunSummary};
pub use state::{CrawlPhase, CrawlState, StateStore, StopReason};
