//! Benchmark execution: the timed run loop, latency statistics, output
//! printing and the CPU precision comparison.

pub mod benchmark_runner;
pub mod benchmark_types;
pub mod output_report;
pub mod performance_metrics;
pub mod precision;

pub use benchmark_runner::{
    BenchmarkRunner, TimedRuns, feed_inputs, prepare_inputs, read_outputs, reshape_inputs,
    run_timed,
};
pub use benchmark_types::{
    BenchmarkReport, InputTensor, OutputSummary, OutputTensor, SYNTHETIC_INPUT_VALUE,
};
pub use output_report::{write_all_output_values, write_output_values, write_report_json};
pub use performance_metrics::LatencyStats;
pub use precision::{OutputDiff, PrecisionReport, compare_outputs, max_abs_diff};
