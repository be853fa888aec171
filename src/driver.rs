//! Runs the generation and aggregation phases back to back.

use std::time::{Duration, Instant};

use tracing::{info, info_span};

use crate::aggregate::{aggregate_on, build_pool};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::generate::{generate_archives_with, generator_for};
use crate::table::write_tables;

/// Counts and timings of a completed run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub archives_written: usize,
    pub records_written: usize,
    pub archives_read: usize,
    pub archives_skipped: usize,
    pub level_rows: usize,
    pub name_rows: usize,
    pub generate_time: Duration,
    pub aggregate_time: Duration,
}

/// Generate archives into `cfg.archive_dir`, aggregate them, and write the
/// two tables into `cfg.table_dir`.
///
/// Both phases share one worker pool of `cfg.parallelism` threads. Tables are
/// only written after aggregation succeeds.
///
/// # Errors
/// The first [`PipelineError`](crate::PipelineError) of either phase. A failed
/// run's output directories should be regenerated, not repaired.
pub fn run(cfg: &PipelineConfig) -> Result<RunSummary> {
    let pool = build_pool(cfg.parallelism)?;
    let mut summary = RunSummary::default();

    let started = Instant::now();
    let written = {
        let _span = info_span!("generate", dir = %cfg.archive_dir.display()).entered();
        pool.install(|| {
            generate_archives_with(
                &cfg.archive_dir,
                cfg.archive_count,
                cfg.records_per_archive,
                cfg.generation_mode,
                |i| generator_for(cfg.seed, i),
            )
        })?
    };
    summary.archives_written = written.len();
    summary.records_written = written.len() * cfg.records_per_archive;
    summary.generate_time = started.elapsed();

    let started = Instant::now();
    let agg = {
        let _span = info_span!("aggregate", dir = %cfg.archive_dir.display()).entered();
        aggregate_on(&pool, &cfg.archive_dir, cfg.failure_policy)?
    };
    write_tables(&agg.tables, &cfg.table_dir)?;
    summary.archives_read = agg.archives_read;
    summary.archives_skipped = agg.skipped.len();
    summary.level_rows = agg.tables.levels.len();
    summary.name_rows = agg.tables.names.len();
    summary.aggregate_time = started.elapsed();

    info!(?summary, "pipeline finished");
    Ok(summary)
}
