//! Random record generation.
//!
//! The random stream is an explicit value owned by each [`RecordGenerator`], so
//! concurrent generation never shares hidden mutable state: every worker builds
//! its own generator from its own RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::{Builder, Uuid};

use crate::record::{LEVEL_RANGE, NAME_COUNT_RANGE, NAME_LEN_RANGE, Record};

/// Anything that can hand out records to the archive generator.
///
/// [`RecordGenerator`] is the standard implementation; tests and callers with
/// fixed payloads can plug in their own.
pub trait RecordSource {
    fn next_record(&mut self) -> Record;
}

/// Produces uniformly random [`Record`]s from an owned RNG.
pub struct RecordGenerator<R> {
    rng: R,
}

impl<R: Rng> RecordGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generate one record: a fresh v4 id, a level in `1..=100`, and
    /// `1..=10` lowercase names of `4..=10` letters each.
    pub fn generate(&mut self) -> Record {
        let id = random_id(&mut self.rng);
        let level = self.rng.random_range(LEVEL_RANGE);
        let count = self.rng.random_range(NAME_COUNT_RANGE);
        let object_names = (0..count).map(|_| random_name(&mut self.rng)).collect();
        Record::new(id, level, object_names)
    }
}

impl RecordGenerator<StdRng> {
    /// Generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Deterministic generator; equal seeds yield equal record streams.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RecordSource for RecordGenerator<R> {
    fn next_record(&mut self) -> Record {
        self.generate()
    }
}

fn random_id<R: Rng>(rng: &mut R) -> Uuid {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);
    Builder::from_random_bytes(bytes).into_uuid()
}

fn random_name<R: Rng>(rng: &mut R) -> String {
    let len = rng.random_range(NAME_LEN_RANGE);
    (0..len).map(|_| char::from(rng.random_range(b'a'..=b'z'))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_records_respect_bounds() {
        let mut g = RecordGenerator::seeded(7);
        for _ in 0..500 {
            let r = g.generate();
            assert!(LEVEL_RANGE.contains(&r.level));
            assert!(NAME_COUNT_RANGE.contains(&r.object_names.len()));
            for name in &r.object_names {
                assert!(NAME_LEN_RANGE.contains(&name.len()));
                assert!(name.bytes().all(|b| b.is_ascii_lowercase()));
            }
            assert_eq!(r.id.get_version_num(), 4);
        }
    }

    #[test]
    fn same_seed_same_stream() {
        let a: Vec<Record> = {
            let mut g = RecordGenerator::seeded(42);
            (0..20).map(|_| g.generate()).collect()
        };
        let b: Vec<Record> = {
            let mut g = RecordGenerator::seeded(42);
            (0..20).map(|_| g.generate()).collect()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn ids_do_not_collide() {
        let mut g = RecordGenerator::from_entropy();
        let ids: HashSet<Uuid> = (0..2000).map(|_| g.generate().id).collect();
        assert_eq!(ids.len(), 2000);
    }
}
