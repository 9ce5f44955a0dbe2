//! Size-scaling comparison benchmarks.
//!
//! A [`Benchmark`] pairs an input generator with several [`Candidate`]
//! implementations. Running it generates inputs for every size, measures each
//! candidate through a [`TimingEngine`], and pivots the measurements into one
//! [`ResultSeries`] per candidate.
//!
//! ```no_run
//! use scaling_bench::{Benchmark, Candidate, SamplingEngine};
//!
//! let mut bench = Benchmark::builder::<Vec<u64>>("sum", "Summing a vector")
//!     .sizes([10, 100, 1_000])
//!     .size_interpretation("vector length")
//!     .inputs_per_size(3)
//!     .generator(|size| (0..size).collect())
//!     .candidate(Candidate::new("iter_sum", |v: &Vec<u64>| v.iter().sum::<u64>()))
//!     .candidate(Candidate::new("fold", |v: &Vec<u64>| v.iter().fold(0u64, |a, b| a + b)))
//!     .build()?;
//!
//! let report = bench.run_quiet(&SamplingEngine::default())?;
//! println!("{}", scaling_bench::output::to_json(&report)?);
//! # Ok::<(), scaling_bench::BenchError>(())
//! ```

pub mod aggregate;
pub mod benchmark;
pub mod candidate;
pub mod error;
pub mod harness;
pub mod output;
pub mod schema;
pub mod suites;

pub use aggregate::aggregate;
pub use benchmark::{Benchmark, BenchmarkBuilder, SizeHook};
pub use candidate::Candidate;
pub use error::{BenchError, BoxError};
pub use harness::{BenchConfig, Profile, SamplingEngine, TimingEngine};
pub use schema::{BenchmarkInfo, BenchmarkResult, DataPoint, ResultSeries, Stats};
