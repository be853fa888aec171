//! Fixture helpers for testing the pipeline.
//!
//! This module provides:
//! - **Sentinel records** whose ids encode their archive and position, so tests
//!   can check per-archive and per-record ordering in the output tables
//! - **Record sources** with fixed payloads for [`generate_archives_with`]
//! - **Corrupt archives** with one undecodable entry for fail-fast tests

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::generate::{GenerationMode, generate_archives_with};
use crate::generator::RecordSource;
use crate::io::archive::entry_name;
use crate::io::document::encode;
use crate::record::Record;

/// Deterministic record tagged with its archive and position.
///
/// The id is `archive << 64 | index`, the level cycles through `1..=100`, and
/// the names are `n0`, `n1`, ... in order.
#[must_use]
pub fn sentinel_record(archive: usize, index: usize, names: usize) -> Record {
    Record::new(
        sentinel_id(archive, index),
        (index % 100) as u8 + 1,
        (0..names).map(|k| format!("n{k}")).collect(),
    )
}

/// Id used by [`sentinel_record`].
#[must_use]
pub fn sentinel_id(archive: usize, index: usize) -> Uuid {
    Uuid::from_u128(((archive as u128) << 64) | index as u128)
}

/// Split a sentinel id back into `(archive, index)`.
#[must_use]
pub fn sentinel_position(id: Uuid) -> (usize, usize) {
    let raw = id.as_u128();
    ((raw >> 64) as usize, (raw & u128::from(u64::MAX)) as usize)
}

/// Record source emitting [`sentinel_record`]s for one archive.
pub struct SentinelSource {
    archive: usize,
    next: usize,
    names: usize,
}

impl SentinelSource {
    #[must_use]
    pub fn new(archive: usize, names: usize) -> Self {
        Self {
            archive,
            next: 0,
            names,
        }
    }
}

impl RecordSource for SentinelSource {
    fn next_record(&mut self) -> Record {
        let r = sentinel_record(self.archive, self.next, self.names);
        self.next += 1;
        r
    }
}

/// Record source with random ids and levels but a fixed list of names.
pub struct FixedNamesSource {
    rng: StdRng,
    names: Vec<String>,
}

impl FixedNamesSource {
    #[must_use]
    pub fn new(seed: u64, names: &[&str]) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            names: names.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl RecordSource for FixedNamesSource {
    fn next_record(&mut self) -> Record {
        let mut bytes = [0u8; 16];
        self.rng.fill(&mut bytes);
        let id = uuid::Builder::from_random_bytes(bytes).into_uuid();
        Record::new(id, self.rng.random_range(1..=100), self.names.clone())
    }
}

/// Generate `archives` archives of sentinel records into `dir`.
///
/// # Errors
/// Propagates any generation failure.
pub fn write_sentinel_archives(
    dir: impl AsRef<Path>,
    archives: usize,
    records_per_archive: usize,
    names_per_record: usize,
) -> Result<Vec<PathBuf>> {
    let paths = generate_archives_with(
        dir,
        archives,
        records_per_archive,
        GenerationMode::Parallel,
        |i| SentinelSource::new(i, names_per_record),
    )?;
    Ok(paths)
}

/// Write an archive holding `good` as valid entries followed by one entry
/// whose payload is `bad_payload`.
///
/// # Returns
/// The name of the corrupt entry.
///
/// # Errors
/// Returns an error if the archive cannot be written.
pub fn write_corrupt_archive(
    path: impl AsRef<Path>,
    good: &[Record],
    bad_payload: &[u8],
) -> Result<String> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    for (i, record) in good.iter().enumerate() {
        zip.start_file(entry_name(i), options)?;
        zip.write_all(&encode(record)?)?;
    }
    let bad = entry_name(good.len());
    zip.start_file(bad.clone(), options)?;
    zip.write_all(bad_payload)?;
    zip.finish()?;
    Ok(bad)
}
