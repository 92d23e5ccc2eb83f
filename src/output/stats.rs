//! Run summary
//!
//! Counts what a single crawl run did and prints it once the run is over.

use crate::state::{CrawlState, StopReason};

/// Summary of one crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Cursor loaded at the start of the run
    pub start_page: u32,

    /// Cursor persisted when the run ended
    pub next_page: u32,

    /// Pages fully processed (appended and cursor saved)
    pub pages_processed: u32,

    /// Records handed to the sink
    pub records_appended: u64,

    /// How the run ended; None while the run is in progress
    pub stop_reason: Option<StopReason>,
}

impl RunSummary {
    /// Starts a summary at the loaded cursor
    pub fn starting_at(state: CrawlState) -> Self {
        Self {
            start_page: state.page(),
            next_page: state.page(),
            ..Self::default()
        }
    }

    /// Records one fully processed page
    pub fn record_page(&mut self, records: usize, next: CrawlState) {
        self.pages_processed += 1;
        self.records_appended += records as u64;
        self.next_page = next.page();
    }

    pub fn finish(&mut self, reason: StopReason) {
        self.stop_reason = Some(reason);
    }

    /// Returns true if the run reached the end of the catalog
    pub fn reached_end(&self) -> bool {
        self.stop_reason == Some(StopReason::EndOfCatalog)
    }
}

/// Prints the run summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("=== Harvest Summary ===\n");
    println!("  Started at page: {}", summary.start_page);
    println!("  Pages processed: {}", summary.pages_processed);
    println!("  Listings saved: {}", summary.records_appended);
    println!("  Next page: {}", summary.next_page);

    match summary.stop_reason {
        Some(StopReason::EndOfCatalog) => println!("  Stopped: no more listings in the catalog"),
        Some(StopReason::SafetyCutoff) => println!("  Stopped: page limit reached"),
        None => println!("  Stopped: run did not finish"),
    }
}
