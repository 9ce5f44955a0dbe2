use serde::{Deserialize, Serialize};

/// Timing summary for one candidate at one size, as produced by a
/// [`TimingEngine`](crate::harness::TimingEngine). Durations are seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub deviation: f64,
    pub mean: f64,
    /// Margin of error at 95% confidence.
    pub moe: f64,
    /// `moe / mean`.
    pub rme: f64,
    /// Raw per-invocation measurements, in collection order.
    pub sample: Vec<f64>,
    /// Standard error of the mean.
    pub sem: f64,
    pub variance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub size: u64,
    pub stats: Stats,
}

/// One candidate's measurements across every size of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSeries {
    pub name: String,
    pub results: Vec<DataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkResult {
    pub title: String,
    pub size_interpretation: String,
    pub series: Vec<ResultSeries>,
}

/// Stats tagged with the candidate that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateStats {
    pub name: String,
    pub stats: Stats,
}

/// Raw results for a single size: one entry per candidate, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeRecord {
    pub size: u64,
    pub per_candidate: Vec<CandidateStats>,
}

/// Closure-free description of a benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkInfo {
    pub slug: String,
    pub title: String,
    pub sizes: Vec<u64>,
    pub size_interpretation: String,
    pub inputs_per_size: usize,
    pub candidates: Vec<String>,
}
