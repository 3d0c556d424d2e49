//! Error types for the benchmark harness.
//!
//! Each failure mode gets a dedicated variant instead of a generic error
//! wrapper, so callers can tell usage mistakes apart from engine failures.

mod bench_error;
mod shape_parse_error;

pub use bench_error::{BenchError, RunPhase};
pub use shape_parse_error::ShapeParseError;

/// Result type alias for harness operations.
pub type BenchResult<T> = std::result::Result<T, BenchError>;

/// Result type alias for shape string parsing.
pub type ShapeParseResult<T> = std::result::Result<T, ShapeParseError>;
