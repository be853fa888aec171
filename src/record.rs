//! The record entity carried through the pipeline.

use std::ops::RangeInclusive;

use uuid::Uuid;

/// Valid values for [`Record::level`].
pub const LEVEL_RANGE: RangeInclusive<u8> = 1..=100;

/// How many object names a generated record carries.
pub const NAME_COUNT_RANGE: RangeInclusive<usize> = 1..=10;

/// Length of each generated object name.
pub const NAME_LEN_RANGE: RangeInclusive<usize> = 4..=10;

/// A single synthetic record.
///
/// Records are created, encoded, and dropped by the generator; on the read side
/// they are decoded only to be flattened into table rows. `object_names` keeps
/// its original order and may contain duplicates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub id: Uuid,
    pub level: u8,
    pub object_names: Vec<String>,
}

impl Record {
    pub fn new(id: Uuid, level: u8, object_names: Vec<String>) -> Self {
        Self {
            id,
            level,
            object_names,
        }
    }
}
