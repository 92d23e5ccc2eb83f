//! Output module for the harvested dataset
//!
//! This module handles:
//! - The `RecordSink` interface the crawl loop appends batches to
//! - The CSV dataset implementation of that interface
//! - The per-run summary printed at the end of a crawl

mod csv_sink;
pub mod stats;
mod traits;

pub use csv_sink::{CsvSink, DATASET_HEADER};
pub use stats::{print_summary, RunSummary};
pub use traits::RecordSink;
