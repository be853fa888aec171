//! The two tabular outputs of aggregation and their CSV files.
//!
//! - `levels.csv`: `id,level`, one row per record.
//! - `names.csv`: `id,object_name`, one row per (record, name) pair.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::Result;
use crate::io::csv::{read_csv_vec, write_csv_vec};
use crate::io::fs::ensure_directory;
use crate::record::Record;

pub const LEVELS_FILE: &str = "levels.csv";
pub const NAMES_FILE: &str = "names.csv";

const LEVELS_HEADER: [&str; 2] = ["id", "level"];
const NAMES_HEADER: [&str; 2] = ["id", "object_name"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRow {
    pub id: Uuid,
    pub level: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRow {
    pub id: Uuid,
    pub object_name: String,
}

/// Levels and names rows accumulated from decoded records.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tables {
    pub levels: Vec<LevelRow>,
    pub names: Vec<NameRow>,
}

impl Tables {
    /// Flatten `records` onto the end of both tables, keeping record order and
    /// each record's name order.
    pub fn extend_from_records(&mut self, records: Vec<Record>) {
        self.levels.reserve(records.len());
        for record in records {
            self.levels.push(LevelRow {
                id: record.id,
                level: record.level,
            });
            self.names
                .extend(record.object_names.into_iter().map(|object_name| NameRow {
                    id: record.id,
                    object_name,
                }));
        }
    }
}

/// Write `levels.csv` and `names.csv` into `dir`, creating it if needed.
///
/// # Errors
/// [`PipelineError::Directory`](crate::PipelineError::Directory) if `dir` is
/// unusable, [`PipelineError::WriteFailure`](crate::PipelineError::WriteFailure)
/// on any I/O error.
pub fn write_tables(tables: &Tables, dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    ensure_directory(dir)?;
    let levels = write_csv_vec(dir.join(LEVELS_FILE), &LEVELS_HEADER, &tables.levels)?;
    let names = write_csv_vec(dir.join(NAMES_FILE), &NAMES_HEADER, &tables.names)?;
    info!(dir = %dir.display(), levels, names, "tables written");
    Ok(())
}

/// Read `levels.csv` back from `dir`.
///
/// # Errors
/// Returns an error if the file is missing or a row does not parse.
pub fn read_levels(dir: impl AsRef<Path>) -> anyhow::Result<Vec<LevelRow>> {
    read_csv_vec(dir.as_ref().join(LEVELS_FILE))
}

/// Read `names.csv` back from `dir`.
///
/// # Errors
/// Returns an error if the file is missing or a row does not parse.
pub fn read_names(dir: impl AsRef<Path>) -> anyhow::Result<Vec<NameRow>> {
    read_csv_vec(dir.as_ref().join(NAMES_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattening_keeps_record_and_name_order() {
        let a = Uuid::from_u128(1);
        let b = Uuid::from_u128(2);
        let mut t = Tables::default();
        t.extend_from_records(vec![
            Record::new(a, 10, vec!["x1".into(), "x2".into()]),
            Record::new(b, 20, vec![]),
        ]);
        assert_eq!(
            t.levels,
            vec![LevelRow { id: a, level: 10 }, LevelRow { id: b, level: 20 }]
        );
        let names: Vec<_> = t.names.iter().map(|r| (r.id, r.object_name.as_str())).collect();
        assert_eq!(names, vec![(a, "x1"), (a, "x2")]);
    }

    #[test]
    fn write_and_read_tables() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        let mut t = Tables::default();
        t.extend_from_records(vec![Record::new(Uuid::from_u128(7), 55, vec!["abcd".into()])]);
        write_tables(&t, &out).unwrap();

        let levels = std::fs::read_to_string(out.join(LEVELS_FILE)).unwrap();
        assert!(levels.starts_with("id,level\n"));
        let names = std::fs::read_to_string(out.join(NAMES_FILE)).unwrap();
        assert!(names.starts_with("id,object_name\n"));

        assert_eq!(read_levels(&out).unwrap(), t.levels);
        assert_eq!(read_names(&out).unwrap(), t.names);
    }
}
