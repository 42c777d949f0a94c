//! Raw CSV ingestion implementation.

use std::path::Path;

use crate::error::SyncResult;
use crate::types::RawDataset;

/// Ingest a CSV file into an untyped [`RawDataset`].
///
/// Rules:
///
/// - CSV must have headers; they become the column names.
/// - Cells are trimmed; empty or all-whitespace cells become missing.
/// - No type interpretation happens here.
pub fn ingest_csv_from_path(path: impl AsRef<Path>) -> SyncResult<RawDataset> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr)
}

/// Ingest CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
) -> SyncResult<RawDataset> {
    let columns: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_owned()).collect();

    let mut rows: Vec<Vec<Option<String>>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row = (0..columns.len())
            .map(|i| {
                let cell = record.get(i).unwrap_or("").trim();
                if cell.is_empty() {
                    None
                } else {
                    Some(cell.to_owned())
                }
            })
            .collect();
        rows.push(row);
    }

    Ok(RawDataset::new(columns, rows))
}
