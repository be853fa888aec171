//! # Ironarc
//!
//! A two-phase **archive-based record pipeline**: generate synthetic records into
//! zipped XML documents, then read the archives back concurrently and project
//! the records into two CSV tables.
//!
//! ## Key Features
//!
//! - **Typed document codec** - fixed XML shape, variables looked up by name
//! - **Atomic writes** - archives and tables are renamed into place on success
//! - **Bounded fan-out/fan-in** - one task per archive on a dedicated Rayon pool,
//!   merged by a single collector in completion order
//! - **Fail-fast by default** - or skip-and-report, as an explicit policy
//! - **Reproducible generation** - explicit, per-archive random streams
//!
//! ## Quick Start
//!
//! ```no_run
//! use ironarc::*;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! // Phase 1: 10 archives of 100 random records each
//! generate_archives("data/archives", 10, 100)?;
//!
//! // Phase 2: read them back on 4 workers and write levels.csv / names.csv
//! let tables = aggregate("data/archives", Some(4))?;
//! write_tables(&tables, "data/tables")?;
//! # Ok(())
//! # }
//! ```
//!
//! Or run both phases from one [`PipelineConfig`]:
//!
//! ```no_run
//! use ironarc::*;
//! # fn main() -> anyhow::Result<()> {
//! let summary = run(&PipelineConfig::new("data/archives", "data/tables"))?;
//! println!("{} level rows", summary.level_rows);
//! # Ok(())
//! # }
//! ```
//!
//! ## Document Format
//!
//! Each record is one XML document inside an archive:
//!
//! ```xml
//! <root>
//!   <var name="id" value="…uuid…"/>
//!   <var name="level" value="42"/>
//!   <objects><object name="alpha"/><object name="beta"/></objects>
//! </root>
//! ```
//!
//! See [`io::document`] for the decoding rules.
//!
//! ## Ordering
//!
//! Rows from different archives appear in the order their reads *complete*.
//! Within one archive, records keep their entry order; within one record, names
//! keep their sequence order.
//!
//! ## Module Overview
//!
//! - [`record`] - The [`Record`] entity and its value ranges
//! - [`generator`] - Random record generation ([`RecordGenerator`], [`RecordSource`])
//! - [`io`] - XML documents, zip archives, CSV files, directory setup
//! - [`generate`] - Generation phase
//! - [`aggregate`] - Parallel aggregation phase
//! - [`table`] - Output rows and the CSV table writer
//! - [`config`] / [`driver`] - End-to-end configuration and execution
//! - [`testing`] - Fixtures for sentinel records and corrupt archives

pub mod aggregate;
pub mod config;
pub mod driver;
pub mod error;
pub mod generate;
pub mod generator;
pub mod io;
pub mod record;
pub mod table;
pub mod testing;

// General re-exports
pub use aggregate::{
    Aggregation, ArchiveFailure, FailurePolicy, aggregate, aggregate_on, aggregate_with,
    default_parallelism,
};
pub use config::PipelineConfig;
pub use driver::{RunSummary, run};
pub use error::{DocumentError, PipelineError};
pub use generate::{GenerationMode, generate_archives, generate_archives_with};
pub use generator::{RecordGenerator, RecordSource};
pub use io::archive::{list_archives, read_archive, write_archive};
pub use io::document::{decode, encode};
pub use record::Record;
pub use table::{LevelRow, NameRow, Tables, read_levels, read_names, write_tables};
