//! Pipeline configuration.

use std::path::PathBuf;

pub use crate::aggregate::FailurePolicy;
pub use crate::generate::GenerationMode;

pub const DEFAULT_ARCHIVE_COUNT: usize = 50;
pub const DEFAULT_RECORDS_PER_ARCHIVE: usize = 100;

/// Everything [`run`](crate::driver::run) needs to execute both phases.
///
/// ```
/// use ironarc::config::{GenerationMode, PipelineConfig};
///
/// let cfg = PipelineConfig {
///     archive_count: 4,
///     generation_mode: GenerationMode::Parallel,
///     seed: Some(7),
///     ..PipelineConfig::new("out/archives", "out/tables")
/// };
/// assert_eq!(cfg.records_per_archive, 100);
/// ```
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Directory archives are generated into and aggregated from.
    pub archive_dir: PathBuf,
    /// Directory receiving `levels.csv` and `names.csv`.
    pub table_dir: PathBuf,
    pub archive_count: usize,
    pub records_per_archive: usize,
    /// Worker pool size; `None` uses one worker per CPU.
    pub parallelism: Option<usize>,
    /// Seed for reproducible generation; `None` draws from the OS.
    pub seed: Option<u64>,
    pub generation_mode: GenerationMode,
    pub failure_policy: FailurePolicy,
}

impl PipelineConfig {
    pub fn new(archive_dir: impl Into<PathBuf>, table_dir: impl Into<PathBuf>) -> Self {
        Self {
            archive_dir: archive_dir.into(),
            table_dir: table_dir.into(),
            ..Self::default()
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            archive_dir: PathBuf::from("archives"),
            table_dir: PathBuf::from("tables"),
            archive_count: DEFAULT_ARCHIVE_COUNT,
            records_per_archive: DEFAULT_RECORDS_PER_ARCHIVE,
            parallelism: None,
            seed: None,
            generation_mode: GenerationMode::Sequential,
            failure_policy: FailurePolicy::FailFast,
        }
    }
}
