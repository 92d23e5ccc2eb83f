//! Cursor persistence
//!
//! The cursor lives in a small JSON file of the form `{"page":N}`. It is
//! created with page 1 the first time it is loaded and overwritten after every
//! completed page.

use crate::state::CrawlState;
use crate::{HarvestError, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Load/save interface for the crawl cursor
pub trait StateStore {
    /// Loads the cursor, creating it at page 1 if it does not exist yet
    fn load(&mut self) -> Result<CrawlState>;

    /// Overwrites the persisted cursor
    fn save(&mut self, state: CrawlState) -> Result<()>;

    /// Rewinds the cursor to the first page
    fn reset(&mut self) -> Result<()> {
        self.save(CrawlState::initial())
    }
}

/// Cursor stored as a JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the cursor without creating the file
    ///
    /// Returns None if the file does not exist.
    pub fn peek(&self) -> Result<Option<CrawlState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        self.read_existing().map(Some)
    }

    fn read_existing(&self) -> Result<CrawlState> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| HarvestError::StateIo {
            path: self.path.clone(),
            source,
        })?;

        let value: Value =
            serde_json::from_str(&content).map_err(|source| HarvestError::CorruptState {
                path: self.path.clone(),
                source,
            })?;

        Ok(state_from_value(&value))
    }
}

impl StateStore for JsonStateStore {
    fn load(&mut self) -> Result<CrawlState> {
        if !self.path.exists() {
            let state = CrawlState::initial();
            self.save(state)?;
            tracing::debug!("Created state file {}", self.path.display());
            return Ok(state);
        }

        self.read_existing()
    }

    fn save(&mut self, state: CrawlState) -> Result<()> {
        let content = serde_json::to_string(&state).map_err(|e| HarvestError::StateIo {
            path: self.path.clone(),
            source: e.into(),
        })?;

        std::fs::write(&self.path, content).map_err(|source| HarvestError::StateIo {
            path: self.path.clone(),
            source,
        })?;

        tracing::trace!("Saved cursor {} to {}", state, self.path.display());
        Ok(())
    }
}

/// Extracts the cursor from parsed JSON
///
/// A missing, fractional, zero or out-of-range `page` falls back to page 1.
/// Whole numbers written as floats (`3.0`) are accepted.
fn state_from_value(value: &Value) -> CrawlState {
    value
        .get("page")
        .and_then(page_number)
        .and_then(|page| u32::try_from(page).ok())
        .and_then(CrawlState::at_page)
        .unwrap_or_default()
}

fn page_number(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|page| page.fract() == 0.0 && *page >= 1.0 && *page <= f64::from(u32::MAX))
            .map(|page| page as u64)
    })
}
