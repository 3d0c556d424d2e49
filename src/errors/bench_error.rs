//! Error types for predictor construction and benchmark execution.

use std::fmt;

use thiserror::Error;

use super::ShapeParseError;

/// The stage of the run loop an inference call belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Warmup,
    Repeat,
    Reference,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunPhase::Warmup => write!(f, "warmup"),
            RunPhase::Repeat => write!(f, "repeat"),
            RunPhase::Reference => write!(f, "reference"),
        }
    }
}

/// Errors that can occur while configuring or running a benchmark.
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("No model given: set --model_dir, or both --model_file and --param_file")]
    MissingModelPath,

    #[error("Invalid --input_shapes: {0}")]
    InvalidShapes(#[from] ShapeParseError),

    #[error("Invalid number of repeats: {value}. Must be greater than 0")]
    InvalidRepeats { value: u32 },

    #[error("Invalid print limit: {value}. Must be greater than 0")]
    InvalidPrintLimit { value: usize },

    #[error("The inference backend is not available: {reason}")]
    BackendUnavailable { reason: String },

    #[error("Failed to create a {device} predictor: {message}")]
    PredictorCreation { device: String, message: String },

    #[error("The model has {actual} inputs but {expected} input shapes were given")]
    InputCountMismatch { expected: usize, actual: usize },

    #[error("Unknown {kind} tensor '{name}'")]
    UnknownTensor { kind: String, name: String },

    #[error("Buffer for tensor '{name}' holds {actual} elements, expected {expected}")]
    BufferSizeMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Inference failed during {phase} run {iteration}: {message}")]
    InferenceFailed {
        phase: RunPhase,
        iteration: usize,
        message: String,
    },

    #[error("Cannot compare outputs: {message}")]
    OutputMismatch { message: String },

    #[error("Paddle Inference call failed: {message}")]
    Ffi { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize benchmark report: {0}")]
    ReportSerialize(#[from] serde_json::Error),
}

impl BenchError {
    /// Whether the error comes from bad command-line input rather than from
    /// the engine. Usage errors are reported together with the help text.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            BenchError::MissingModelPath
                | BenchError::InvalidShapes(_)
                | BenchError::InvalidRepeats { .. }
                | BenchError::InvalidPrintLimit { .. }
        )
    }
}
