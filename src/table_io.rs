//! Flat CSV persistence: the sole interface between the generator and the
//! renderer. Writers emit one file per logical table with a header row;
//! readers verify the header against the declared column contract before
//! touching a single row, so a schema drift surfaces as `MalformedInput`
//! instead of a partial render.

use std::fs;
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::errors::DataError;

/// Writes rows to a CSV file, creating parent directories as needed.
/// The header row is derived from the struct field order.
pub fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), DataError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    debug!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Reads a table, failing with `MalformedInput` unless the header matches
/// the expected column names in the expected order.
pub fn read_table<T: DeserializeOwned>(
    path: &Path,
    expected_columns: &[&str],
) -> Result<Vec<T>, DataError> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    verify_columns(path, &headers, expected_columns)?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }

    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn verify_columns(
    path: &Path,
    headers: &[String],
    expected_columns: &[&str],
) -> Result<(), DataError> {
    for (position, expected) in expected_columns.iter().enumerate() {
        match headers.get(position) {
            Some(actual) if actual == expected => {}
            _ => {
                return Err(DataError::MalformedInput {
                    file: path.display().to_string(),
                    column: expected.to_string(),
                    position,
                });
            }
        }
    }
    Ok(())
}
