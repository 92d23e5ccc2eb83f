//! CSV dataset writer
//!
//! Rows are appended to a single CSV file. The header is written only when
//! the file does not exist yet, so the dataset keeps exactly one header row
//! no matter how many runs append to it.

use crate::listing::ListingRecord;
use crate::output::traits::RecordSink;
use crate::{HarvestError, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// Column labels of the dataset, in column order
pub const DATASET_HEADER: [&str; 5] = ["Titlu", "Pret", "Oras", "Suprafata", "Link"];

/// Appends listing records to a CSV file
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_error(&self, source: csv::Error) -> HarvestError {
        HarvestError::SinkWrite {
            path: self.path.clone(),
            source,
        }
    }
}

impl RecordSink for CsvSink {
    fn append(&mut self, records: Vec<ListingRecord>) -> Result<()> {
        let write_header = !self.path.exists();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.write_error(e.into()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if write_header {
            writer
                .write_record(DATASET_HEADER)
                .map_err(|e| self.write_error(e))?;
        }

        for record in &records {
            writer
                .write_record(dataset_row(record))
                .map_err(|e| self.write_error(e))?;
        }

        writer.flush().map_err(|e| self.write_error(e.into()))?;

        tracing::info!(
            "Saved {} listings to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Dataset columns for one record: title, price, city, area, link
///
/// `meta` is not part of the dataset.
fn dataset_row(record: &ListingRecord) -> [&str; 5] {
    [
        record.title.as_str(),
        record.price.as_str(),
        record.city.as_str(),
        record.area.as_deref().unwrap_or(""),
        record.link.as_str(),
    ]
}
