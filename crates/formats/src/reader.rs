//! Unified dataset reader abstraction
//!
//! Provides a common interface for reading different export formats
//! with automatic format detection based on file extensions.

use crate::{csv_reader::CsvReader, jsonl::JsonlReader, record, Error, Record, Result};
use std::fs::File;
use std::path::Path;
use tracing::{info, warn};

/// Trait for dataset readers providing unified interface
pub trait DatasetReader: Iterator<Item = Result<Record>> {
    /// Get total file size in bytes if known
    fn total_bytes(&self) -> Option<u64>;

    /// Get number of bytes processed so far
    fn bytes_processed(&self) -> u64;

    /// Get the number of records processed
    fn records_processed(&self) -> usize;
}

/// JSONL dataset reader wrapper
pub struct JsonlDatasetReader {
    reader: JsonlReader<Box<dyn std::io::Read>>,
}

impl Iterator for JsonlDatasetReader {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next()
    }
}

impl DatasetReader for JsonlDatasetReader {
    fn total_bytes(&self) -> Option<u64> {
        self.reader.total_bytes()
    }

    fn bytes_processed(&self) -> u64 {
        self.reader.bytes_processed()
    }

    fn records_processed(&self) -> usize {
        self.reader.records_processed()
    }
}

/// CSV dataset reader wrapper
pub struct CsvDatasetReader {
    reader: CsvReader<File>,
}

impl Iterator for CsvDatasetReader {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.reader.next()
    }
}

impl DatasetReader for CsvDatasetReader {
    fn total_bytes(&self) -> Option<u64> {
        self.reader.total_bytes()
    }

    fn bytes_processed(&self) -> u64 {
        self.reader.bytes_processed()
    }

    fn records_processed(&self) -> usize {
        self.reader.records_processed()
    }
}

/// Factory function to open a dataset with automatic format detection
///
/// Supported formats:
/// - `.csv` - comma-separated with an `id,title,description` header
/// - `.jsonl`, `.json` - JSON Lines format
/// - `.gz` - Gzip-compressed JSON Lines
pub fn open_dataset<P: AsRef<Path>>(path: P) -> Result<Box<dyn DatasetReader>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| Error::UnsupportedFormat("No file extension found".to_string()))?;

    info!("Opening dataset: {:?} (format: {})", path, extension);

    match extension {
        "csv" => {
            let reader = CsvReader::open(path)?;
            Ok(Box::new(CsvDatasetReader { reader }))
        }
        "jsonl" | "json" | "gz" => {
            let reader = JsonlReader::open(path)?;
            Ok(Box::new(JsonlDatasetReader { reader }))
        }
        _ => Err(Error::UnsupportedFormat(format!(
            "Unsupported file extension: {}",
            extension
        ))),
    }
}

/// Drain a reader into a batch and check id uniqueness.
///
/// With `skip_invalid`, rows rejected at the boundary are logged and dropped;
/// otherwise the first invalid row aborts the read.
pub fn collect_records(reader: &mut dyn DatasetReader, skip_invalid: bool) -> Result<Vec<Record>> {
    collect_records_with(reader, skip_invalid, |_, _| {})
}

/// Like [`collect_records`], calling `observe` with each accepted record and
/// the reader's byte position right after it
pub fn collect_records_with<F>(
    reader: &mut dyn DatasetReader,
    skip_invalid: bool,
    mut observe: F,
) -> Result<Vec<Record>>
where
    F: FnMut(&Record, u64),
{
    let mut records = Vec::new();
    let mut skipped = 0usize;

    while let Some(result) = reader.next() {
        match result {
            Ok(record) => {
                observe(&record, reader.bytes_processed());
                records.push(record);
            }
            Err(e @ Error::InvalidRecord { .. }) if skip_invalid => {
                warn!("Skipping row: {}", e);
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    if skipped > 0 {
        warn!("Skipped {} invalid rows", skipped);
    }

    record::ensure_unique_ids(&records)?;
    Ok(records)
}
