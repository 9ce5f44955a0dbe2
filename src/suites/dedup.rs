use std::collections::{BTreeSet, HashSet};

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::benchmark::Benchmark;
use crate::candidate::Candidate;
use crate::error::Result;
use crate::harness::{BenchConfig, Profile};

pub const SLUG: &str = "dedup";

/// Values drawn from `0..size/2`, so roughly half of them repeat.
pub(crate) fn with_duplicates(rng: &mut ChaCha8Rng, size: u64) -> Vec<u32> {
    let bound = ((size / 2) as u32).max(1);
    (0..size).map(|_| rng.gen_range(0..bound)).collect()
}

pub fn benchmark(cfg: &BenchConfig) -> Result<Benchmark> {
    let sizes: &[u64] = match cfg.profile {
        Profile::Quick => &[100, 1_000, 10_000],
        Profile::Full => &[100, 1_000, 10_000, 100_000],
    };
    let mut rng = cfg.rng();

    Benchmark::builder::<Vec<u32>>(SLUG, "Counting distinct values")
        .sizes(sizes.iter().copied())
        .size_interpretation("number of u32 values, about half of them duplicates")
        .inputs_per_size(super::inputs_per_size(cfg))
        .generator(move |size| with_duplicates(&mut rng, size))
        .candidate(Candidate::new("hash_set", |values: &Vec<u32>| {
            values.iter().collect::<HashSet<_>>().len()
        }))
        .candidate(Candidate::new("btree_set", |values: &Vec<u32>| {
            values.iter().collect::<BTreeSet<_>>().len()
        }))
        .candidate(Candidate::new("sort_dedup", |values: &Vec<u32>| {
            let mut v = values.clone();
            v.sort_unstable();
            v.dedup();
            v.len()
        }))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;

    #[test]
    fn test_generated_values_repeat() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let values = with_duplicates(&mut rng, 1_000);
        let distinct = values.iter().collect::<HashSet<_>>().len();
        assert!(distinct <= 500);
        assert!(distinct < values.len());

        let mut sorted = values.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), distinct);
    }
}
