//! Record sink trait
//!
//! This module defines the interface the crawl loop uses to persist listing
//! records.

use crate::listing::ListingRecord;
use crate::Result;

/// Destination for extracted listing records
pub trait RecordSink {
    /// Appends one page's batch of records
    ///
    /// The batch is handed over by value; the caller keeps nothing once the
    /// call returns. Each call acquires and releases whatever resource it
    /// writes to, so the sink can be called any number of times per run and
    /// across runs.
    fn append(&mut self, records: Vec<ListingRecord>) -> Result<()>;
}
