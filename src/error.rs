//! Error types for the archive pipeline.
//!
//! [`PipelineError`] is what every public phase returns. Decoding a single
//! document fails with the narrower [`DocumentError`], which the archive reader
//! wraps into [`PipelineError::MalformedDocument`] together with the archive
//! path and entry name.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Reasons an encoded document cannot be turned back into a [`Record`](crate::Record).
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document is not valid XML: {0}")]
    Syntax(String),
    #[error("document could not be serialized: {0}")]
    Serialize(String),
    #[error("missing variable node '{0}'")]
    MissingVariable(&'static str),
    #[error("variable node '{0}' appears more than once")]
    DuplicateVariable(&'static str),
    #[error("unexpected variable node '{0}'")]
    UnknownVariable(String),
    #[error("invalid id '{0}'")]
    InvalidId(String),
    #[error("level '{0}' is not an integer")]
    InvalidLevel(String),
    #[error("level {0} is outside 1..=100")]
    LevelOutOfRange(i64),
    #[error("missing objects container")]
    MissingObjects,
}

/// Failure of a generation, aggregation, or table-writing phase.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("directory {}: {reason}", .path.display())]
    Directory { path: PathBuf, reason: String },
    #[error("write to {} failed", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot open archive {}", .path.display())]
    ArchiveOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed document '{entry}' in archive {}", .archive.display())]
    MalformedDocument {
        archive: PathBuf,
        entry: String,
        #[source]
        source: DocumentError,
    },
    #[error("cannot start worker pool: {0}")]
    WorkerPool(String),
}

impl PipelineError {
    pub(crate) fn directory(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Directory {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: impl Into<io::Error>) -> Self {
        Self::WriteFailure {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn archive_open(path: impl Into<PathBuf>, source: impl Into<io::Error>) -> Self {
        Self::ArchiveOpen {
            path: path.into(),
            source: source.into(),
        }
    }
}

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;
