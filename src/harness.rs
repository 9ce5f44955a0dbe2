use std::time::{Duration, Instant};

use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::BoxError;
use crate::schema::Stats;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
    Quick,
    Full,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Quick => "quick",
            Profile::Full => "full",
        }
    }
}

#[derive(Clone, Debug)]
pub struct BenchConfig {
    pub profile: Profile,
    pub seed: u64,
}

impl BenchConfig {
    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed)
    }

    pub fn warmup_iters(&self) -> u64 {
        match self.profile {
            Profile::Quick => 2,
            Profile::Full => 10,
        }
    }

    pub fn min_samples(&self) -> usize {
        match self.profile {
            Profile::Quick => 5,
            Profile::Full => 20,
        }
    }

    pub fn max_samples(&self) -> usize {
        match self.profile {
            Profile::Quick => 50,
            Profile::Full => 500,
        }
    }

    pub fn min_sample_time(&self) -> Duration {
        match self.profile {
            Profile::Quick => Duration::from_millis(1),
            Profile::Full => Duration::from_millis(5),
        }
    }

    pub fn max_time(&self) -> Duration {
        match self.profile {
            Profile::Quick => Duration::from_millis(250),
            Profile::Full => Duration::from_secs(2),
        }
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            profile: Profile::Quick,
            seed: 0,
        }
    }
}

/// Repeatedly invokes a thunk and summarizes the observed durations.
///
/// Implementations must call the thunk they are handed; a failure returned by
/// any invocation ends measurement and is returned unchanged.
pub trait TimingEngine {
    fn measure_repeatedly(
        &self,
        thunk: &mut dyn FnMut() -> Result<(), BoxError>,
    ) -> Result<Stats, BoxError>;
}

/// Calibrated sampling engine.
///
/// Each sample times a block of invocations long enough to reach
/// `min_sample_time`, and records the per-invocation average. Sampling stops
/// after `max_samples`, or once `max_time` has elapsed and at least
/// `min_samples` were taken.
#[derive(Clone, Debug)]
pub struct SamplingEngine {
    pub warmup_iters: u64,
    pub min_samples: usize,
    pub max_samples: usize,
    pub min_sample_time: Duration,
    pub max_time: Duration,
}

/// Upper bound on invocations per sample, for thunks too fast to time reliably.
const MAX_ITERS_PER_SAMPLE: u64 = 1 << 20;

impl SamplingEngine {
    pub fn from_config(cfg: &BenchConfig) -> Self {
        Self {
            warmup_iters: cfg.warmup_iters(),
            min_samples: cfg.min_samples(),
            max_samples: cfg.max_samples(),
            min_sample_time: cfg.min_sample_time(),
            max_time: cfg.max_time(),
        }
    }

    fn calibrate(
        &self,
        thunk: &mut dyn FnMut() -> Result<(), BoxError>,
    ) -> Result<u64, BoxError> {
        let mut iters = 1u64;
        loop {
            let elapsed = time_block(iters, thunk)?;
            if elapsed >= self.min_sample_time || iters >= MAX_ITERS_PER_SAMPLE {
                return Ok(iters);
            }
            // Scale towards the target directly when the block was measurable.
            let scaled = if elapsed.as_nanos() > 0 {
                let ratio = self.min_sample_time.as_nanos() / elapsed.as_nanos();
                iters.saturating_mul((ratio.min(u64::MAX as u128) as u64).saturating_add(1))
            } else {
                iters.saturating_mul(10)
            };
            iters = scaled.clamp(iters + 1, MAX_ITERS_PER_SAMPLE);
        }
    }
}

impl Default for SamplingEngine {
    fn default() -> Self {
        Self::from_config(&BenchConfig::default())
    }
}

impl TimingEngine for SamplingEngine {
    fn measure_repeatedly(
        &self,
        thunk: &mut dyn FnMut() -> Result<(), BoxError>,
    ) -> Result<Stats, BoxError> {
        for _ in 0..self.warmup_iters {
            thunk()?;
        }

        let iters = self.calibrate(thunk)?;
        let min_samples = self.min_samples.max(1);
        let max_samples = self.max_samples.max(min_samples);

        let started = Instant::now();
        let mut sample = Vec::with_capacity(min_samples);
        while sample.len() < min_samples
            || (sample.len() < max_samples && started.elapsed() < self.max_time)
        {
            let elapsed = time_block(iters, thunk)?;
            sample.push(elapsed.as_secs_f64() / iters as f64);
        }

        Ok(compute_stats(sample))
    }
}

fn time_block(
    iters: u64,
    thunk: &mut dyn FnMut() -> Result<(), BoxError>,
) -> Result<Duration, BoxError> {
    let start = Instant::now();
    for _ in 0..iters {
        thunk()?;
    }
    Ok(start.elapsed())
}

/// Two-tailed 95% critical value of Student's t with `df` degrees of freedom.
///
/// `df` of 0 (a single sample) is treated as 1; its deviation is 0 anyway.
pub fn t_critical(df: usize) -> f64 {
    StudentsT::new(0.0, 1.0, df.max(1) as f64)
        .map(|t| t.inverse_cdf(0.975))
        .unwrap_or(Z_95)
}

const Z_95: f64 = 1.959_963_984_540_054;

/// Summarizes raw per-invocation durations.
pub fn compute_stats(sample: Vec<f64>) -> Stats {
    let n = sample.len();
    if n == 0 {
        return Stats {
            deviation: 0.0,
            mean: 0.0,
            moe: 0.0,
            rme: 0.0,
            sample,
            sem: 0.0,
            variance: 0.0,
        };
    }

    let mean = sample.iter().sum::<f64>() / n as f64;
    let variance = if n < 2 {
        0.0
    } else {
        sample.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64
    };
    let deviation = variance.sqrt();
    let sem = deviation / (n as f64).sqrt();
    let moe = sem * t_critical(n - 1);
    let rme = if mean == 0.0 { 0.0 } else { moe / mean };

    Stats {
        deviation,
        mean,
        moe,
        rme,
        sample,
        sem,
        variance,
    }
}
