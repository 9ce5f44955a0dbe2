//! Built-in comparison benchmarks.

use crate::benchmark::Benchmark;
use crate::error::{BenchError, Result};
use crate::harness::{BenchConfig, Profile};

pub mod dedup;
pub mod search;
pub mod sort;

/// Slugs of every built-in benchmark, in run order.
pub const SLUGS: &[&str] = &[sort::SLUG, search::SLUG, dedup::SLUG];

pub fn all(cfg: &BenchConfig) -> Result<Vec<Benchmark>> {
    SLUGS.iter().map(|slug| find(cfg, slug)).collect()
}

pub fn find(cfg: &BenchConfig, slug: &str) -> Result<Benchmark> {
    match slug {
        sort::SLUG => sort::benchmark(cfg),
        search::SLUG => search::benchmark(cfg),
        dedup::SLUG => dedup::benchmark(cfg),
        other => Err(BenchError::UnknownBenchmark(other.to_string())),
    }
}

fn inputs_per_size(cfg: &BenchConfig) -> usize {
    match cfg.profile {
        Profile::Quick => 3,
        Profile::Full => 10,
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::SingleShot;
    use super::*;

    #[test]
    fn test_all_suites_build_with_unique_slugs() {
        let cfg = BenchConfig::default();
        let benches = all(&cfg).unwrap();
        let slugs: Vec<&str> = benches.iter().map(|b| b.slug()).collect();
        assert_eq!(slugs, SLUGS);
    }

    #[test]
    fn test_find_unknown() {
        let err = find(&BenchConfig::default(), "nope").unwrap_err();
        assert!(matches!(err, BenchError::UnknownBenchmark(ref s) if s == "nope"));
    }

    #[test]
    fn test_every_suite_runs() {
        let cfg = BenchConfig::default();
        for mut bench in all(&cfg).unwrap() {
            let info = bench.info().clone();
            let result = bench.run_quiet(&SingleShot).unwrap();
            assert_eq!(result.series.len(), info.candidates.len());
            for (series, name) in result.series.iter().zip(&info.candidates) {
                assert_eq!(&series.name, name);
                let sizes: Vec<u64> = series.results.iter().map(|p| p.size).collect();
                assert_eq!(sizes, info.sizes);
            }
        }
    }
}
