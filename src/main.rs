//! Ironarc command line
//!
//! Usage:
//!   ironarc <ARCHIVE_DIR> <TABLE_DIR> [--archive-count 50] [--records-per-archive 100]
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;

use ironarc::config::{
    DEFAULT_ARCHIVE_COUNT, DEFAULT_RECORDS_PER_ARCHIVE, FailurePolicy, GenerationMode,
    PipelineConfig,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OnError {
    /// Abort on the first bad archive
    Fail,
    /// Leave bad archives out and report them
    Skip,
}

#[derive(Parser, Debug)]
#[command(name = "ironarc")]
#[command(about = "Generate zipped XML record archives, then aggregate them into CSV tables")]
#[command(version)]
struct Args {
    /// Directory archives are generated into and read from
    archive_dir: PathBuf,

    /// Directory receiving levels.csv and names.csv
    table_dir: PathBuf,

    /// Number of archives to generate
    #[arg(long, default_value_t = DEFAULT_ARCHIVE_COUNT)]
    archive_count: usize,

    /// Records per archive
    #[arg(long, default_value_t = DEFAULT_RECORDS_PER_ARCHIVE)]
    records_per_archive: usize,

    /// Worker threads (default: number of CPUs)
    #[arg(short, long)]
    parallelism: Option<usize>,

    /// Seed for reproducible generation
    #[arg(long)]
    seed: Option<u64>,

    /// Generate archives in parallel
    #[arg(long)]
    parallel_generation: bool,

    /// What to do with archives that fail to read
    #[arg(long, value_enum, default_value_t = OnError::Fail)]
    on_error: OnError,
}

impl From<Args> for PipelineConfig {
    fn from(args: Args) -> Self {
        Self {
            archive_count: args.archive_count,
            records_per_archive: args.records_per_archive,
            parallelism: args.parallelism,
            seed: args.seed,
            generation_mode: if args.parallel_generation {
                GenerationMode::Parallel
            } else {
                GenerationMode::Sequential
            },
            failure_policy: match args.on_error {
                OnError::Fail => FailurePolicy::FailFast,
                OnError::Skip => FailurePolicy::SkipAndReport,
            },
            ..PipelineConfig::new(args.archive_dir, args.table_dir)
        }
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = PipelineConfig::from(Args::parse());
    match execute(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn execute(config: &PipelineConfig) -> Result<()> {
    let summary = ironarc::run(config).with_context(|| {
        format!(
            "pipeline {} -> {}",
            config.archive_dir.display(),
            config.table_dir.display()
        )
    })?;
    println!(
        "{} archives, {} level rows, {} name rows ({} skipped)",
        summary.archives_written, summary.level_rows, summary.name_rows, summary.archives_skipped
    );
    Ok(())
}
