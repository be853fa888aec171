//! Zip archives of encoded record documents.
//!
//! Each archive stores one XML document per record as an independently named
//! entry (`00000.xml`, `00001.xml`, ...). Entry order is record order.
//!
//! # Design notes
//! - Writes go to a temporary file in the target directory which is renamed
//!   onto the final path only after the zip central directory has been
//!   flushed. A failed write never leaves a partial archive at `path`.
//! - Reads are fail-fast: the first entry that does not decode aborts the
//!   archive and is reported with the archive path and entry name.

use std::fs::{File, read_dir};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{PipelineError, Result};
use crate::io::document::{decode, encode};
use crate::io::fs::PARTIAL_PREFIX;
use crate::record::Record;

/// File extension used for generated archives.
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Upper bound on the buffer reserved up front for one entry.
const READ_HINT_LIMIT: u64 = 1 << 20;

/// Name of the `index`-th entry inside an archive.
pub fn entry_name(index: usize) -> String {
    format!("{index:05}.xml")
}

/// Write `records` into a new zip archive at `path`, one entry per record.
///
/// # Returns
/// The number of entries written (i.e., `records.len()`).
///
/// # Errors
/// [`PipelineError::WriteFailure`] on any I/O, zip, or encoding failure. In
/// that case nothing is created at `path`.
pub fn write_archive(path: impl AsRef<Path>, records: &[Record]) -> Result<usize> {
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
        let mut zip = ZipWriter::new(tmp.as_file_mut());
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for (i, record) in records.iter().enumerate() {
            let doc = encode(record).map_err(|e| {
                PipelineError::write(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            })?;
            zip.start_file(entry_name(i), options)
                .map_err(|e| PipelineError::write(path, e))?;
            zip.write_all(&doc).map_err(|e| PipelineError::write(path, e))?;
        }
        zip.finish().map_err(|e| PipelineError::write(path, e))?;
    }
    tmp.as_file().sync_all().map_err(|e| PipelineError::write(path, e))?;
    tmp.persist(path).map_err(|e| PipelineError::write(path, e))?;

    debug!(path = %path.display(), entries = records.len(), "archive written");
    Ok(records.len())
}

/// Decode every record stored in the archive at `path`, in entry order.
///
/// Directory entries inside the zip are skipped.
///
/// # Errors
/// - [`PipelineError::ArchiveOpen`] if the file cannot be opened or is not a
///   valid zip container, or an entry cannot be read.
/// - [`PipelineError::MalformedDocument`] for the first entry that fails to decode.
pub fn read_archive(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| PipelineError::archive_open(path, e))?;
    let mut archive = ZipArchive::new(file).map_err(|e| PipelineError::archive_open(path, e))?;

    let mut out = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| PipelineError::archive_open(path, e))?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        let mut buf = Vec::with_capacity(read_hint(entry.size()));
        entry
            .read_to_end(&mut buf)
            .map_err(|e| PipelineError::archive_open(path, e))?;
        let record = decode(&buf).map_err(|source| PipelineError::MalformedDocument {
            archive: path.to_path_buf(),
            entry: name,
            source,
        })?;
        out.push(record);
    }

    debug!(path = %path.display(), records = out.len(), "archive read");
    Ok(out)
}

/// The declared size comes from the zip header and is not trusted.
fn read_hint(declared: u64) -> usize {
    usize::try_from(declared.min(READ_HINT_LIMIT)).unwrap_or(0)
}

/// List the regular files in `dir`, sorted by path. Subdirectories are skipped,
/// as are in-flight temporary files left by an atomic writer.
///
/// Every other listed file is treated as an archive by the aggregator; no
/// extension filtering is applied.
///
/// # Errors
/// [`PipelineError::Directory`] if `dir` cannot be read.
pub fn list_archives(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries =
        read_dir(dir).map_err(|e| PipelineError::directory(dir, format!("cannot list: {e}")))?;

    let mut result = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| PipelineError::directory(dir, format!("cannot list: {e}")))?;
        if entry.file_name().to_string_lossy().starts_with(PARTIAL_PREFIX) {
            continue;
        }
        let path = entry.path();
        if path.is_file() {
            result.push(path);
        }
    }
    result.sort();
    Ok(result)
}
