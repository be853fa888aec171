//! Aggregation phase: read every archive in a directory concurrently and merge
//! the decoded records into the levels and names tables.
//!
//! # Execution model
//! - **Fan-out**: one task per archive file is queued on a dedicated, bounded
//!   Rayon [`ThreadPool`] (never the global pool).
//! - **Fan-in**: each task sends its result over a channel; the calling thread
//!   is the single collector and appends rows in the order results arrive.
//!
//! # Ordering
//! Archives contribute rows in *completion* order, which is not deterministic.
//! Within one archive, records keep their entry order, and within one record
//! names keep their sequence order.
//!
//! # Failures
//! Under [`FailurePolicy::FailFast`] (the default) the first failed archive to
//! arrive at the collector aborts the aggregation. Queued tasks that have not
//! started yet observe a shared cancellation flag and skip their read; tasks
//! already running finish and their results are dropped.
//! [`FailurePolicy::SkipAndReport`] instead records each failure in
//! [`Aggregation::skipped`] and keeps going.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::time::Instant;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, warn};

use crate::error::{PipelineError, Result};
use crate::io::archive::{list_archives, read_archive};
use crate::record::Record;
use crate::table::Tables;

/// What to do when an archive fails to open or decode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Abort on the first failed archive; no tables are produced.
    #[default]
    FailFast,
    /// Leave failed archives out of the tables and report them.
    SkipAndReport,
}

/// An archive left out under [`FailurePolicy::SkipAndReport`].
#[derive(Debug)]
pub struct ArchiveFailure {
    pub path: PathBuf,
    pub error: PipelineError,
}

/// Result of a completed aggregation.
#[derive(Debug, Default)]
pub struct Aggregation {
    pub tables: Tables,
    /// Archives whose records made it into `tables`.
    pub archives_read: usize,
    pub skipped: Vec<ArchiveFailure>,
}

/// Worker count used when none is configured: one per logical CPU.
pub fn default_parallelism() -> usize {
    num_cpus::get().max(1)
}

/// Build the bounded pool the aggregator reads archives on.
///
/// # Errors
/// [`PipelineError::WorkerPool`] if the threads cannot be spawned.
pub fn build_pool(parallelism: Option<usize>) -> Result<ThreadPool> {
    let workers = parallelism.unwrap_or_else(default_parallelism).max(1);
    ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("ironarc-worker-{i}"))
        .build()
        .map_err(|e| PipelineError::WorkerPool(e.to_string()))
}

/// Fail-fast aggregation of every archive in `dir` on `parallelism` workers
/// (`None` means one per CPU).
///
/// # Errors
/// [`PipelineError::Directory`] if `dir` cannot be listed, otherwise the first
/// [`PipelineError::ArchiveOpen`] or [`PipelineError::MalformedDocument`] to
/// reach the collector.
pub fn aggregate(dir: impl AsRef<Path>, parallelism: Option<usize>) -> Result<Tables> {
    let pool = build_pool(parallelism)?;
    aggregate_on(&pool, dir, FailurePolicy::FailFast).map(|agg| agg.tables)
}

/// Aggregate with an explicit failure policy.
///
/// # Errors
/// See [`aggregate`]; under [`FailurePolicy::SkipAndReport`] only listing and
/// pool errors are returned.
pub fn aggregate_with(
    dir: impl AsRef<Path>,
    parallelism: Option<usize>,
    policy: FailurePolicy,
) -> Result<Aggregation> {
    let pool = build_pool(parallelism)?;
    aggregate_on(&pool, dir, policy)
}

/// Aggregate using an existing pool.
///
/// # Errors
/// See [`aggregate_with`].
pub fn aggregate_on(
    pool: &ThreadPool,
    dir: impl AsRef<Path>,
    policy: FailurePolicy,
) -> Result<Aggregation> {
    let dir = dir.as_ref();
    let archives = list_archives(dir)?;
    let started = Instant::now();
    let total = archives.len();

    let cancelled = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel::<(PathBuf, Result<Vec<Record>>)>();

    for path in archives {
        let tx = tx.clone();
        let cancelled = Arc::clone(&cancelled);
        pool.spawn(move || {
            if cancelled.load(Ordering::Acquire) {
                return;
            }
            let result = read_archive(&path);
            if result.is_err() && policy == FailurePolicy::FailFast {
                cancelled.store(true, Ordering::Release);
            }
            // The collector may already have returned on an earlier failure.
            let _ = tx.send((path, result));
        });
    }
    // Only worker-held senders remain, so the loop below ends once every task
    // has either reported or been skipped.
    drop(tx);

    let mut agg = Aggregation::default();
    for (path, result) in rx {
        match result {
            Ok(records) => {
                debug!(path = %path.display(), records = records.len(), "archive merged");
                agg.tables.extend_from_records(records);
                agg.archives_read += 1;
            }
            Err(error) => match policy {
                FailurePolicy::FailFast => {
                    cancelled.store(true, Ordering::Release);
                    return Err(error);
                }
                FailurePolicy::SkipAndReport => {
                    warn!(path = %path.display(), %error, "skipping archive");
                    agg.skipped.push(ArchiveFailure { path, error });
                }
            },
        }
    }

    info!(
        dir = %dir.display(),
        archives = total,
        read = agg.archives_read,
        skipped = agg.skipped.len(),
        levels = agg.tables.levels.len(),
        names = agg.tables.names.len(),
        workers = pool.current_num_threads(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "archives aggregated"
    );
    Ok(agg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_directory_gives_empty_tables() {
        let tmp = tempfile::tempdir().unwrap();
        let tables = aggregate(tmp.path(), Some(2)).unwrap();
        assert!(tables.levels.is_empty());
        assert!(tables.names.is_empty());
    }

    #[test]
    fn missing_directory_is_a_directory_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = aggregate(tmp.path().join("nope"), Some(1)).unwrap_err();
        assert!(matches!(err, PipelineError::Directory { .. }));
    }

    #[test]
    fn zero_parallelism_is_clamped_to_one_worker() {
        let pool = build_pool(Some(0)).unwrap();
        assert_eq!(pool.current_num_threads(), 1);
    }
}
