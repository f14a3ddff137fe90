//! Dataset readers for record quality monitoring
//!
//! Exported rows arrive loosely typed (CSV cells, JSON values). This crate
//! maps them into [`Record`] at the boundary so downstream scoring only ever
//! sees a well-typed `id`/`title`/`description` triple.

pub mod csv_reader;
pub mod error;
pub mod jsonl;
pub mod reader;
pub mod record;

pub use error::{Error, Result};
pub use reader::{collect_records, collect_records_with, open_dataset, DatasetReader};
pub use record::{ensure_unique_ids, Record};
