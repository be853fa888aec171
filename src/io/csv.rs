//! CSV I/O utilities.
//!
//! This module provides:
//! - **Atomic typed writer**: [`write_csv_vec`] serializes rows into a temporary
//!   file next to the target and renames it into place on success.
//! - **Typed reader**: [`read_csv_vec`] deserializes a whole file into `Vec<T>`.
//!
//! # Design notes
//! - All typed I/O is Serde-backed (`DeserializeOwned`/`Serialize`).
//! - Quoting follows the `csv` crate defaults (RFC 4180 style, quote only when
//!   needed).

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result as AnyResult};
use csv::WriterBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{PipelineError, Result};
use crate::io::fs::PARTIAL_PREFIX;

/// Read a CSV file with a header row into a typed `Vec<T>`.
///
/// Errors are annotated with row numbers for easier debugging.
///
/// # Errors
/// Returns an error if the file cannot be opened or if any row fails to
/// deserialize into `T`.
pub fn read_csv_vec<T: DeserializeOwned>(path: impl AsRef<Path>) -> AnyResult<Vec<T>> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(f);
    let mut out = Vec::<T>::new();
    for (i, rec) in rdr.deserialize::<T>().enumerate() {
        let v = rec.with_context(|| format!("parse CSV record #{}", i + 1))?;
        out.push(v);
    }
    Ok(out)
}

/// Write a typed slice to a CSV file, header first.
///
/// The header is taken from `T`'s field names. It is written even when `data`
/// is empty, so an empty table still has its columns.
///
/// # Returns
/// The number of rows written (i.e., `data.len()`).
///
/// # Errors
/// [`PipelineError::WriteFailure`] if the temporary file cannot be created, a
/// row fails to serialize, or the final rename fails.
pub fn write_csv_vec<T: Serialize>(
    path: impl AsRef<Path>,
    header: &[&str],
    data: &[T],
) -> Result<usize> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(PARTIAL_PREFIX)
        .tempfile_in(parent)
        .map_err(|e| PipelineError::write(path, e))?;

    {
        // Header is written explicitly so empty tables still carry it.
        let mut wtr = WriterBuilder::new()
            .has_headers(false)
            .from_writer(tmp.as_file_mut());
        wtr.write_record(header)
            .map_err(|e| PipelineError::write(path, e))?;
        for row in data {
            wtr.serialize(row).map_err(|e| PipelineError::write(path, e))?;
        }
        wtr.flush().map_err(|e| PipelineError::write(path, e))?;
    }
    tmp.as_file_mut()
        .flush()
        .map_err(|e| PipelineError::write(path, e))?;
    tmp.persist(path).map_err(|e| PipelineError::write(path, e))?;
    Ok(data.len())
}
