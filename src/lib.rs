//! Latency benchmarking for Paddle Inference models on Kunlun XPU.
//!
//! The harness loads a model through the engine, feeds it inputs filled with
//! `1.0`, runs it a configurable number of times and reports first/min/max/
//! average latency, output shapes and optionally output values. With the
//! precision test enabled it also runs the model on the CPU and reports the
//! largest absolute difference between the two backends.
//!
//! The engine is reached through the [`Predictor`] and [`PredictorBuilder`]
//! traits; the Paddle bindings live behind the `paddle` feature.

pub mod benchmarks;
pub mod cli;
pub mod config;
pub mod errors;
pub mod predictor;
pub mod shape;

pub use benchmarks::{BenchmarkReport, BenchmarkRunner, LatencyStats};
pub use cli::CliArgs;
pub use config::{BenchConfig, EngineOptions, ModelLocation};
pub use errors::{BenchError, BenchResult};
pub use predictor::{Device, Predictor, PredictorBuilder, PredictorOptions};
pub use shape::{InputShapes, Shape};
