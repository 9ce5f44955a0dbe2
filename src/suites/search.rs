use std::collections::HashSet;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::benchmark::Benchmark;
use crate::candidate::Candidate;
use crate::error::Result;
use crate::harness::{BenchConfig, Profile};

pub const SLUG: &str = "search";

const NEEDLES: usize = 64;

/// Unsorted values plus the lookups to run against them.
#[derive(Clone, Debug)]
pub struct Haystack {
    pub values: Vec<u32>,
    pub needles: Vec<u32>,
}

/// Half of the needles are drawn from `values`, half are random and mostly
/// absent.
pub(crate) fn haystack(rng: &mut ChaCha8Rng, size: u64) -> Haystack {
    let bound = (size as u32).saturating_mul(4).max(1);
    let values: Vec<u32> = (0..size).map(|_| rng.gen_range(0..bound)).collect();
    let needles = (0..NEEDLES)
        .map(|i| {
            if i % 2 == 0 && !values.is_empty() {
                values[rng.gen_range(0..values.len())]
            } else {
                rng.gen_range(0..bound)
            }
        })
        .collect();
    Haystack { values, needles }
}

fn count_hits(needles: &[u32], mut contains: impl FnMut(&u32) -> bool) -> usize {
    needles.iter().filter(|n| contains(n)).count()
}

/// Membership lookups: linear scan over the raw input against binary search
/// and hashing, whose index building happens during adaptation.
pub fn benchmark(cfg: &BenchConfig) -> Result<Benchmark> {
    let sizes: &[u64] = match cfg.profile {
        Profile::Quick => &[16, 256, 4_096],
        Profile::Full => &[16, 256, 4_096, 65_536],
    };
    let mut rng = cfg.rng();

    Benchmark::builder::<Haystack>(SLUG, "Membership lookups in an unsorted haystack")
        .sizes(sizes.iter().copied())
        .size_interpretation(format!(
            "number of u32 values in the haystack; {NEEDLES} lookups per input"
        ))
        .inputs_per_size(super::inputs_per_size(cfg))
        .generator(move |size| haystack(&mut rng, size))
        .candidate(Candidate::new("linear_scan", |h: &Haystack| {
            count_hits(&h.needles, |n| h.values.contains(n))
        }))
        .candidate(Candidate::with_adapter(
            "binary_search",
            |h: &Haystack| {
                let mut sorted = h.values.clone();
                sorted.sort_unstable();
                (sorted, h.needles.clone())
            },
            |(sorted, needles): &(Vec<u32>, Vec<u32>)| {
                count_hits(needles, |n| sorted.binary_search(n).is_ok())
            },
        ))
        .candidate(Candidate::with_adapter(
            "hash_set",
            |h: &Haystack| {
                let set: HashSet<u32> = h.values.iter().copied().collect();
                (set, h.needles.clone())
            },
            |(set, needles): &(HashSet<u32>, Vec<u32>)| count_hits(needles, |n| set.contains(n)),
        ))
        .build()
}
