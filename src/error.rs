use thiserror::Error;

/// Failure raised by caller-supplied callbacks (generator, adapt, measure,
/// progress hook) and by timing engines.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, BenchError>;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("invalid benchmark: {0}")]
    InvalidSpec(String),

    #[error("input generation failed at size {size}")]
    Generation {
        size: u64,
        #[source]
        source: BoxError,
    },

    #[error("candidate '{candidate}' failed at size {size}")]
    Execution {
        candidate: String,
        size: u64,
        #[source]
        source: BoxError,
    },

    #[error("no result for candidate '{candidate}' at size {size}")]
    AggregationInconsistency { candidate: String, size: u64 },

    #[error("progress hook failed before size #{index} ({size})")]
    Progress {
        index: usize,
        size: u64,
        #[source]
        source: BoxError,
    },

    #[error("unknown benchmark: {0}")]
    UnknownBenchmark(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Turns a caught panic payload into an error value.
pub(crate) fn panic_error(payload: Box<dyn std::any::Any + Send>) -> BoxError {
    let msg = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    };
    format!("panicked: {msg}").into()
}
