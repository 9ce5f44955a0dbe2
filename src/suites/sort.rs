use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::benchmark::Benchmark;
use crate::candidate::Candidate;
use crate::error::Result;
use crate::harness::{BenchConfig, Profile};

pub const SLUG: &str = "sort";

pub(crate) fn random_vec(rng: &mut ChaCha8Rng, size: u64) -> Vec<u32> {
    (0..size).map(|_| rng.gen()).collect()
}

pub(crate) fn insertion_sort(values: &mut [u32]) {
    for i in 1..values.len() {
        let mut j = i;
        while j > 0 && values[j - 1] > values[j] {
            values.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// std stable sort vs unstable sort vs a quadratic insertion sort.
///
/// Sorting is destructive, so every candidate sorts its own copy of the input
/// and the copy is part of each measurement.
pub fn benchmark(cfg: &BenchConfig) -> Result<Benchmark> {
    let sizes: &[u64] = match cfg.profile {
        Profile::Quick => &[10, 100, 1_000],
        Profile::Full => &[10, 100, 1_000, 5_000, 10_000],
    };
    let mut rng = cfg.rng();

    Benchmark::builder::<Vec<u32>>(SLUG, "Sorting random u32 vectors")
        .sizes(sizes.iter().copied())
        .size_interpretation("number of u32 elements in the vector")
        .inputs_per_size(super::inputs_per_size(cfg))
        .generator(move |size| random_vec(&mut rng, size))
        .candidate(Candidate::new("slice::sort", |values: &Vec<u32>| {
            let mut v = values.clone();
            v.sort();
            v
        }))
        .candidate(Candidate::new("slice::sort_unstable", |values: &Vec<u32>| {
            let mut v = values.clone();
            v.sort_unstable();
            v
        }))
        .candidate(Candidate::new("insertion_sort", |values: &Vec<u32>| {
            let mut v = values.clone();
            insertion_sort(&mut v);
            v
        }))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;

    #[test]
    fn test_insertion_sort_matches_std() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut values = random_vec(&mut rng, 257);
        let mut expected = values.clone();
        expected.sort_unstable();

        insertion_sort(&mut values);
        assert_eq!(values, expected);

        let mut empty: Vec<u32> = Vec::new();
        insertion_sort(&mut empty);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_generator_is_seeded() {
        let cfg = BenchConfig {
            profile: Profile::Quick,
            seed: 42,
        };
        let a = random_vec(&mut cfg.rng(), 16);
        let b = random_vec(&mut cfg.rng(), 16);
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
    }
}
