//! Benchmark definition and the run loop.
//!
//! [`BenchmarkBuilder`] is generic over the input type produced by the
//! generator. [`BenchmarkBuilder::build`] hides that type behind a
//! [`Benchmark`], which can be stored next to benchmarks of other input types.

use std::collections::HashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, info};

use crate::aggregate::aggregate;
use crate::candidate::Candidate;
use crate::error::{panic_error, BenchError, BoxError, Result};
use crate::harness::TimingEngine;
use crate::schema::{BenchmarkInfo, BenchmarkResult, CandidateStats, SizeRecord};

type Generator<In> = Box<dyn FnMut(u64) -> std::result::Result<In, BoxError>>;

/// Progress callback: 1-based size index and the size about to run.
pub type SizeHook<'a> = dyn FnMut(usize, u64) -> std::result::Result<(), BoxError> + 'a;

trait ErasedBenchmark {
    fn info(&self) -> &BenchmarkInfo;
    fn run(
        &mut self,
        engine: &dyn TimingEngine,
        on_size_start: &mut SizeHook<'_>,
    ) -> Result<BenchmarkResult>;
}

struct Spec<In> {
    info: BenchmarkInfo,
    generator: Generator<In>,
    candidates: Vec<Candidate<In>>,
}

impl<In> Spec<In> {
    /// Calls the generator `inputs_per_size` times, in order, with `size`.
    fn generate_batch(&mut self, size: u64) -> Result<Vec<In>> {
        let count = self.info.inputs_per_size;
        let generator = &mut self.generator;

        let batch = catch_unwind(AssertUnwindSafe(|| {
            let mut batch = Vec::with_capacity(count);
            for _ in 0..count {
                batch.push(generator(size)?);
            }
            Ok::<_, BoxError>(batch)
        }))
        .unwrap_or_else(|payload| Err(panic_error(payload)));

        batch.map_err(|source| BenchError::Generation { size, source })
    }

    fn run_size(&mut self, size: u64, engine: &dyn TimingEngine) -> Result<SizeRecord> {
        let inputs = self.generate_batch(size)?;

        let mut per_candidate = Vec::with_capacity(self.candidates.len());
        for candidate in &self.candidates {
            let stats = candidate.execute(size, &inputs, engine)?;
            per_candidate.push(CandidateStats {
                name: candidate.name().to_string(),
                stats,
            });
        }

        Ok(SizeRecord {
            size,
            per_candidate,
        })
    }
}

impl<In> ErasedBenchmark for Spec<In> {
    fn info(&self) -> &BenchmarkInfo {
        &self.info
    }

    fn run(
        &mut self,
        engine: &dyn TimingEngine,
        on_size_start: &mut SizeHook<'_>,
    ) -> Result<BenchmarkResult> {
        info!(
            slug = %self.info.slug,
            sizes = self.info.sizes.len(),
            candidates = self.candidates.len(),
            "starting benchmark"
        );

        let sizes = self.info.sizes.clone();
        let mut records = Vec::with_capacity(sizes.len());
        for (idx, size) in sizes.into_iter().enumerate() {
            let index = idx + 1;
            on_size_start(index, size)
                .map_err(|source| BenchError::Progress { index, size, source })?;
            debug!(slug = %self.info.slug, index, size, "running size");

            records.push(self.run_size(size, engine)?);
        }

        let series = aggregate(&records)?;
        info!(slug = %self.info.slug, "benchmark finished");

        Ok(BenchmarkResult {
            title: self.info.title.clone(),
            size_interpretation: self.info.size_interpretation.clone(),
            series,
        })
    }
}

/// A fully described benchmark with its input type erased.
pub struct Benchmark {
    inner: Box<dyn ErasedBenchmark>,
}

impl Benchmark {
    pub fn builder<In: 'static>(
        slug: impl Into<String>,
        title: impl Into<String>,
    ) -> BenchmarkBuilder<In> {
        BenchmarkBuilder {
            slug: slug.into(),
            title: title.into(),
            sizes: Vec::new(),
            size_interpretation: String::new(),
            inputs_per_size: 1,
            generator: None,
            candidates: Vec::new(),
        }
    }

    pub fn slug(&self) -> &str {
        &self.inner.info().slug
    }

    pub fn title(&self) -> &str {
        &self.inner.info().title
    }

    pub fn info(&self) -> &BenchmarkInfo {
        self.inner.info()
    }

    /// Describes the benchmark as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self.info())?)
    }

    /// Runs every size in declared order and pivots the measurements into
    /// one series per candidate.
    ///
    /// `on_size_start` is called before each size's inputs are generated. The
    /// first failure from the hook, the generator, or any candidate aborts the
    /// run and no result is produced.
    pub fn run(
        &mut self,
        engine: &dyn TimingEngine,
        on_size_start: &mut SizeHook<'_>,
    ) -> Result<BenchmarkResult> {
        self.inner.run(engine, on_size_start)
    }

    pub fn run_quiet(&mut self, engine: &dyn TimingEngine) -> Result<BenchmarkResult> {
        self.run(engine, &mut |_, _| Ok(()))
    }
}

impl std::fmt::Debug for Benchmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Benchmark")
            .field("info", self.info())
            .finish_non_exhaustive()
    }
}

pub struct BenchmarkBuilder<In> {
    slug: String,
    title: String,
    sizes: Vec<u64>,
    size_interpretation: String,
    inputs_per_size: usize,
    generator: Option<Generator<In>>,
    candidates: Vec<Candidate<In>>,
}

impl<In: 'static> BenchmarkBuilder<In> {
    pub fn sizes(mut self, sizes: impl IntoIterator<Item = u64>) -> Self {
        self.sizes = sizes.into_iter().collect();
        self
    }

    pub fn size_interpretation(mut self, text: impl Into<String>) -> Self {
        self.size_interpretation = text.into();
        self
    }

    /// Number of independent inputs generated per size (default 1).
    pub fn inputs_per_size(mut self, count: usize) -> Self {
        self.inputs_per_size = count;
        self
    }

    pub fn generator<G>(self, mut generator: G) -> Self
    where
        G: FnMut(u64) -> In + 'static,
    {
        self.try_generator(move |size| Ok(generator(size)))
    }

    pub fn try_generator<G>(mut self, generator: G) -> Self
    where
        G: FnMut(u64) -> std::result::Result<In, BoxError> + 'static,
    {
        self.generator = Some(Box::new(generator));
        self
    }

    pub fn candidate(mut self, candidate: Candidate<In>) -> Self {
        self.candidates.push(candidate);
        self
    }

    pub fn candidates(mut self, candidates: impl IntoIterator<Item = Candidate<In>>) -> Self {
        self.candidates.extend(candidates);
        self
    }

    pub fn build(self) -> Result<Benchmark> {
        let generator = self.generator.ok_or_else(|| {
            BenchError::InvalidSpec(format!("benchmark '{}' has no generator", self.slug))
        })?;

        if self.inputs_per_size == 0 {
            return Err(BenchError::InvalidSpec(format!(
                "benchmark '{}': inputs_per_size must be at least 1",
                self.slug
            )));
        }

        if self.sizes.contains(&0) {
            return Err(BenchError::InvalidSpec(format!(
                "benchmark '{}': sizes must be positive",
                self.slug
            )));
        }

        let mut seen = HashSet::new();
        for candidate in &self.candidates {
            if !seen.insert(candidate.name()) {
                return Err(BenchError::InvalidSpec(format!(
                    "benchmark '{}': duplicate candidate name '{}'",
                    self.slug,
                    candidate.name()
                )));
            }
        }

        let info = BenchmarkInfo {
            slug: self.slug,
            title: self.title,
            sizes: self.sizes,
            size_interpretation: self.size_interpretation,
            inputs_per_size: self.inputs_per_size,
            candidates: self
                .candidates
                .iter()
                .map(|c| c.name().to_string())
                .collect(),
        };

        Ok(Benchmark {
            inner: Box::new(Spec {
                info,
                generator,
                candidates: self.candidates,
            }),
        })
    }
}
