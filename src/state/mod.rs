//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: the persisted cursor (next page to fetch)
//! - `StateStore`: load/save interface for the cursor, with a JSON file backend
//! - `CrawlPhase`: the phases of the per-page crawl loop and their transitions

mod crawl_state;
mod phase;
mod store;

// Re-export main types
pub use crawl_state::CrawlState;
pub use phase::{advance_transition, presence_transition, start_transition, CrawlPhase, StopReason};
pub use store::{JsonStateStore, StateStore};
