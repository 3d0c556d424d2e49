//! The inference engine seen through the operations the harness needs.
//!
//! [`Predictor`] wraps a loaded, ready-to-run model and [`PredictorBuilder`]
//! creates one for a given device. The harness only talks to these traits,
//! so it can run against the Paddle engine or an in-memory stand-in.

#[cfg(feature = "paddle")]
pub mod paddle;

use std::fmt;

use crate::config::{BenchConfig, EngineOptions, ModelLocation};
use crate::errors::{BenchError, BenchResult};
use crate::shape::Shape;

/// Execution target of a predictor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    /// Kunlun XPU accelerator.
    Xpu,
    /// Host CPU, used as the reference for precision comparison.
    Cpu,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Xpu => write!(f, "XPU"),
            Device::Cpu => write!(f, "CPU"),
        }
    }
}

/// Everything needed to construct one predictor.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictorOptions {
    pub model: ModelLocation,
    pub device: Device,
    pub engine: EngineOptions,
}

impl PredictorOptions {
    pub fn from_config(config: &BenchConfig, device: Device) -> Self {
        Self {
            model: config.model.clone(),
            device,
            engine: config.engine.clone(),
        }
    }
}

/// A loaded model that can be fed, run and read back.
///
/// Tensors are addressed by the names the model declares. Buffers passed to
/// [`copy_input`](Predictor::copy_input) and
/// [`copy_output`](Predictor::copy_output) must hold exactly as many elements
/// as the tensor's current shape.
pub trait Predictor {
    fn input_names(&self) -> Vec<String>;

    fn output_names(&self) -> Vec<String>;

    fn reshape_input(&mut self, name: &str, shape: &Shape) -> BenchResult<()>;

    fn copy_input(&mut self, name: &str, data: &[f32]) -> BenchResult<()>;

    /// Runs the model once on the current inputs, blocking until done.
    fn run(&mut self) -> BenchResult<()>;

    fn output_shape(&self, name: &str) -> BenchResult<Shape>;

    fn copy_output(&self, name: &str, data: &mut [f32]) -> BenchResult<()>;
}

/// Constructs predictors. Device resources are released when the returned
/// predictor is dropped.
pub trait PredictorBuilder {
    fn build(&self, options: &PredictorOptions) -> BenchResult<Box<dyn Predictor>>;
}

/// Builder used when the crate is compiled without an engine to link.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableBackend;

impl PredictorBuilder for UnavailableBackend {
    fn build(&self, _options: &PredictorOptions) -> BenchResult<Box<dyn Predictor>> {
        Err(BenchError::BackendUnavailable {
            reason: "xpu_bench was built without the `paddle` feature".to_string(),
        })
    }
}

/// The builder for the engine this binary was compiled against.
pub fn engine_builder() -> Box<dyn PredictorBuilder> {
    #[cfg(feature = "paddle")]
    {
        Box::new(paddle::PaddlePredictorBuilder)
    }
    #[cfg(not(feature = "paddle"))]
    {
        Box::new(UnavailableBackend)
    }
}
