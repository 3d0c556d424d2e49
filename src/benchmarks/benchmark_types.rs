//! Tensors and reports exchanged by the benchmark stages.

use serde::{Deserialize, Serialize};

use super::performance_metrics::LatencyStats;
use super::precision::PrecisionReport;
use crate::config::{BenchConfig, ModelLocation};
use crate::shape::{InputShapes, Shape};

/// Value every synthetic input element is filled with.
pub const SYNTHETIC_INPUT_VALUE: f32 = 1.0;

/// A host-side input tensor bound to one model input.
#[derive(Debug, Clone, PartialEq)]
pub struct InputTensor {
    pub name: String,
    pub shape: Shape,
    pub data: Vec<f32>,
}

impl InputTensor {
    /// Creates a tensor of `shape` with every element set to `value`.
    pub fn filled(name: impl Into<String>, shape: Shape, value: f32) -> Self {
        let data = vec![value; shape.numel()];
        Self {
            name: name.into(),
            shape,
            data,
        }
    }
}

/// An output tensor copied back from the predictor.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTensor {
    pub name: String,
    pub shape: Shape,
    pub data: Vec<f32>,
}

impl OutputTensor {
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    pub fn summary(&self) -> OutputSummary {
        OutputSummary {
            name: self.name.clone(),
            shape: self.shape.clone(),
            numel: self.numel(),
        }
    }
}

/// Shape information of one output, as written to the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSummary {
    pub name: String,
    pub shape: Shape,
    pub numel: usize,
}

/// Everything one benchmark session measured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub model: ModelLocation,
    pub input_shapes: InputShapes,
    pub warmup: u32,
    pub repeats: u32,
    pub latency: LatencyStats,
    pub samples_ms: Vec<f64>,
    pub outputs: Vec<OutputSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<PrecisionReport>,
}

impl BenchmarkReport {
    pub fn new(
        config: &BenchConfig,
        latency: LatencyStats,
        samples_ms: Vec<f64>,
        outputs: &[OutputTensor],
    ) -> Self {
        Self {
            model: config.model.clone(),
            input_shapes: config.input_shapes.clone(),
            warmup: config.warmup,
            repeats: config.repeats,
            latency,
            samples_ms,
            outputs: outputs.iter().map(OutputTensor::summary).collect(),
            precision: None,
        }
    }
}
