//! Snapshot ingestion.
//!
//! Ingestion is deliberately untyped: it reads CSV bytes into a
//! [`crate::types::RawDataset`] and leaves all typing decisions to
//! [`crate::processing::normalize`], which commits one type per column for
//! the whole dataset.

pub mod csv;

pub use csv::{ingest_csv_from_path, ingest_csv_from_reader};
