//! Competing implementations within a benchmark.
//!
//! A [`Candidate`] is generic only over the benchmark's input type. Any
//! intermediate type produced by its adapter stays inside the boxed runner.

use std::hint::black_box;
use std::marker::PhantomData;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::debug;

use crate::error::{panic_error, BenchError, BoxError};
use crate::harness::TimingEngine;
use crate::schema::Stats;

trait CandidateRun<In> {
    fn execute(&self, inputs: &[In], engine: &dyn TimingEngine) -> Result<Stats, BoxError>;
}

/// Measures the generated inputs as they are.
struct Direct<R, M> {
    measure: M,
    _out: PhantomData<fn() -> R>,
}

impl<In, R, M> CandidateRun<In> for Direct<R, M>
where
    M: Fn(&In) -> Result<R, BoxError>,
{
    fn execute(&self, inputs: &[In], engine: &dyn TimingEngine) -> Result<Stats, BoxError> {
        engine.measure_repeatedly(&mut || {
            for input in inputs {
                black_box((self.measure)(input)?);
            }
            Ok(())
        })
    }
}

/// Converts every input once, outside the timed region, then measures the
/// converted values.
struct Adapted<Mid, R, A, M> {
    adapt: A,
    measure: M,
    _types: PhantomData<fn() -> (Mid, R)>,
}

impl<In, Mid, R, A, M> CandidateRun<In> for Adapted<Mid, R, A, M>
where
    A: Fn(&In) -> Result<Mid, BoxError>,
    M: Fn(&Mid) -> Result<R, BoxError>,
{
    fn execute(&self, inputs: &[In], engine: &dyn TimingEngine) -> Result<Stats, BoxError> {
        let adapted = inputs
            .iter()
            .map(|input| (self.adapt)(input))
            .collect::<Result<Vec<Mid>, BoxError>>()?;

        engine.measure_repeatedly(&mut || {
            for value in &adapted {
                black_box((self.measure)(value)?);
            }
            Ok(())
        })
    }
}

/// One named implementation taking part in a benchmark.
///
/// Names are used as series keys in the report and must be unique within a
/// benchmark; [`BenchmarkBuilder::build`](crate::BenchmarkBuilder::build)
/// rejects duplicates.
pub struct Candidate<In> {
    name: String,
    run: Box<dyn CandidateRun<In>>,
}

impl<In: 'static> Candidate<In> {
    pub fn new<R, M>(name: impl Into<String>, measure: M) -> Self
    where
        M: Fn(&In) -> R + 'static,
        R: 'static,
    {
        Self::try_new(name, move |input: &In| Ok(measure(input)))
    }

    pub fn try_new<R, M>(name: impl Into<String>, measure: M) -> Self
    where
        M: Fn(&In) -> Result<R, BoxError> + 'static,
        R: 'static,
    {
        Self {
            name: name.into(),
            run: Box::new(Direct {
                measure,
                _out: PhantomData,
            }),
        }
    }

    /// Candidate whose inputs are first converted by `adapt`.
    ///
    /// Adaptation runs once per generated input before timing starts, so its
    /// cost never shows up in the candidate's stats.
    pub fn with_adapter<Mid, R, A, M>(name: impl Into<String>, adapt: A, measure: M) -> Self
    where
        A: Fn(&In) -> Mid + 'static,
        M: Fn(&Mid) -> R + 'static,
        Mid: 'static,
        R: 'static,
    {
        Self::try_with_adapter(
            name,
            move |input: &In| Ok(adapt(input)),
            move |value: &Mid| Ok(measure(value)),
        )
    }

    pub fn try_with_adapter<Mid, R, A, M>(name: impl Into<String>, adapt: A, measure: M) -> Self
    where
        A: Fn(&In) -> Result<Mid, BoxError> + 'static,
        M: Fn(&Mid) -> Result<R, BoxError> + 'static,
        Mid: 'static,
        R: 'static,
    {
        Self {
            name: name.into(),
            run: Box::new(Adapted {
                adapt,
                measure,
                _types: PhantomData,
            }),
        }
    }
}

impl<In> Candidate<In> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adapts and measures `inputs` at `size`.
    ///
    /// Errors and panics from the adapter, the measured function or the
    /// engine come back as [`BenchError::Execution`].
    pub(crate) fn execute(
        &self,
        size: u64,
        inputs: &[In],
        engine: &dyn TimingEngine,
    ) -> Result<Stats, BenchError> {
        debug!(candidate = %self.name, size, inputs = inputs.len(), "measuring candidate");

        let outcome = catch_unwind(AssertUnwindSafe(|| self.run.execute(inputs, engine)))
            .unwrap_or_else(|payload| Err(panic_error(payload)));

        outcome.map_err(|source| BenchError::Execution {
            candidate: self.name.clone(),
            size,
            source,
        })
    }
}

impl<In> std::fmt::Debug for Candidate<In> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Candidate").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::compute_stats;
    use std::cell::{Cell, RefCell};
    use std::error::Error as _;
    use std::rc::Rc;

    /// Calls the thunk a fixed number of times and reports canned stats.
    struct FixedEngine {
        calls: usize,
    }

    impl TimingEngine for FixedEngine {
        fn measure_repeatedly(
            &self,
            thunk: &mut dyn FnMut() -> Result<(), BoxError>,
        ) -> Result<Stats, BoxError> {
            for _ in 0..self.calls {
                thunk()?;
            }
            Ok(compute_stats(vec![1.0, 2.0, 3.0]))
        }
    }

    struct FailingEngine;

    impl TimingEngine for FailingEngine {
        fn measure_repeatedly(
            &self,
            _thunk: &mut dyn FnMut() -> Result<(), BoxError>,
        ) -> Result<Stats, BoxError> {
            Err("engine gave up".into())
        }
    }

    #[test]
    fn test_direct_measures_every_input_per_invocation() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let candidate = Candidate::new("sum", move |input: &u32| log.borrow_mut().push(*input));

        let stats = candidate
            .execute(7, &[1, 2, 3], &FixedEngine { calls: 2 })
            .unwrap();

        assert_eq!(*seen.borrow(), vec![1, 2, 3, 1, 2, 3]);
        assert_eq!(stats.mean, 2.0);
        assert_eq!(candidate.name(), "sum");
    }

    #[test]
    fn test_adapter_runs_once_per_input_before_timing() {
        let adapt_calls = Rc::new(Cell::new(0));
        let measured = Rc::new(RefCell::new(Vec::new()));
        let (a, m) = (Rc::clone(&adapt_calls), Rc::clone(&measured));

        let candidate = Candidate::with_adapter(
            "as_string",
            move |input: &u32| {
                a.set(a.get() + 1);
                input.to_string()
            },
            move |value: &String| m.borrow_mut().push(value.clone()),
        );

        candidate
            .execute(1, &[4, 5], &FixedEngine { calls: 3 })
            .unwrap();

        assert_eq!(adapt_calls.get(), 2);
        assert_eq!(measured.borrow().len(), 6);
        assert_eq!(measured.borrow()[..2], ["4".to_string(), "5".to_string()]);
    }

    #[test]
    fn test_measure_failure_is_wrapped() {
        let candidate: Candidate<u32> =
            Candidate::try_new("broken", |_: &u32| Err::<(), _>("bad input".into()));

        let err = candidate
            .execute(100, &[1], &FixedEngine { calls: 1 })
            .unwrap_err();

        match &err {
            BenchError::Execution {
                candidate, size, ..
            } => {
                assert_eq!(candidate, "broken");
                assert_eq!(*size, 100);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.source().unwrap().to_string(), "bad input");
    }

    #[test]
    fn test_adapter_failure_skips_timing() {
        let measured = Rc::new(Cell::new(false));
        let flag = Rc::clone(&measured);
        let candidate = Candidate::try_with_adapter(
            "adapt_fails",
            |_: &u32| Err::<u32, _>("cannot adapt".into()),
            move |_: &u32| {
                flag.set(true);
                Ok(())
            },
        );

        let err = candidate
            .execute(5, &[1], &FixedEngine { calls: 1 })
            .unwrap_err();
        assert!(matches!(err, BenchError::Execution { size: 5, .. }));
        assert!(!measured.get());
    }

    #[test]
    fn test_panic_is_wrapped() {
        let candidate = Candidate::new("panics", |_: &u32| -> u32 { panic!("overflow") });

        let err = candidate
            .execute(3, &[1], &FixedEngine { calls: 1 })
            .unwrap_err();
        assert_eq!(err.source().unwrap().to_string(), "panicked: overflow");
    }

    #[test]
    fn test_engine_failure_is_wrapped() {
        let candidate = Candidate::new("fine", |x: &u32| *x);
        let err = candidate.execute(9, &[1], &FailingEngine).unwrap_err();
        assert_eq!(err.to_string(), "candidate 'fine' failed at size 9");
        assert_eq!(err.source().unwrap().to_string(), "engine gave up");
    }
}
