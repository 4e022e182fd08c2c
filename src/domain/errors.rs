use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a recorded observation series
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read observations file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Observations file {path} contains no records")]
    EmptySeries { path: PathBuf },

    #[error("Record {index}: expected a JSON object")]
    NotAnObject { index: usize },

    #[error("Record {index}: missing required field '{field}'")]
    MissingField { index: usize, field: String },

    #[error("Record {index}: field '{field}' has non-numeric value '{value}'")]
    NonNumericField {
        index: usize,
        field: String,
        value: String,
    },

    #[error("Record {index}: unparsable timestamp '{value}'")]
    BadTimestamp { index: usize, value: String },

    #[error("Record {index}: timestamp goes backwards ({current} < {previous})")]
    NonMonotonicTimestamp {
        index: usize,
        previous: i64,
        current: i64,
    },
}

/// Errors raised by the metric kernels on degenerate input
#[derive(Debug, Error)]
pub enum MetricError {
    #[error("Cannot derive metrics from an empty series")]
    EmptySeries,

    #[error("Baseline value is zero; percent change is undefined")]
    ZeroBaseline,

    #[error("Growth rate requires at least 2 samples, got {count}")]
    TooFewSamples { count: usize },

    #[error("Series length {values} does not match timestamp count {timestamps}")]
    LengthMismatch { values: usize, timestamps: usize },

    #[error("Zero elapsed time after sample {index}")]
    ZeroTimeDelta { index: usize },

    #[error("Smoothing window must be a positive integer")]
    ZeroWindow,
}
