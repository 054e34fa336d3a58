//! # replaycodec-export
//!
//! Writes a finished [`BatchResult`](replaycodec_batch::BatchResult) as a
//! CSV table, one row per decoded replay.

pub mod csv_writer;
pub mod error;

pub use csv_writer::{CsvExporter, ReplayRow};
pub use error::ExportError;
