//! Crawler module for catalog page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - Page fetching behind the `PageFetcher` capability
//! - Listing card extraction
//! - The crawl loop that ties fetching, extraction, the dataset and the cursor together

mod coordinator;
mod extractor;
mod fetcher;

pub use coordinator::{run_crawl, Coordinator};
pub use extractor::{city_from_location, ListingExtractor, LISTING_SELECTOR};
pub use fetcher::{build_http_client, HttpPageFetcher, PageFetcher, RenderedPage};
