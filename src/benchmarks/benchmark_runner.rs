//! Core benchmark execution logic.

use std::io::Write;

use log::{debug, info};

use super::benchmark_types::{BenchmarkReport, InputTensor, OutputTensor, SYNTHETIC_INPUT_VALUE};
use super::output_report::{log_output_summary, write_all_output_values, write_report_json};
use super::performance_metrics::{LatencyStats, time_ms};
use super::precision::compare_outputs;
use crate::config::BenchConfig;
use crate::errors::{BenchError, BenchResult, RunPhase};
use crate::predictor::{Device, Predictor, PredictorBuilder, PredictorOptions};
use crate::shape::InputShapes;

/// Latencies recorded by [`run_timed`].
#[derive(Debug, Clone, PartialEq)]
pub struct TimedRuns {
    /// Latency of the first warmup call, if any warmup ran.
    pub first_warmup_ms: Option<f64>,
    pub samples_ms: Vec<f64>,
    pub stats: LatencyStats,
}

fn run_once(
    predictor: &mut dyn Predictor,
    phase: RunPhase,
    iteration: usize,
) -> BenchResult<f64> {
    let (result, elapsed_ms) = time_ms(|| predictor.run());
    result.map_err(|e| BenchError::InferenceFailed {
        phase,
        iteration,
        message: e.to_string(),
    })?;
    Ok(elapsed_ms)
}

/// Runs `warmup` untimed calls followed by `repeats` timed calls.
///
/// `inputs` are copied in before each batch; their shapes must already be set.
/// The first warmup call is timed separately since it usually pays for lazy
/// initialization. Any failing call aborts the loop.
pub fn run_timed(
    predictor: &mut dyn Predictor,
    inputs: &[InputTensor],
    warmup: u32,
    repeats: u32,
) -> BenchResult<TimedRuns> {
    let mut first_warmup_ms = None;
    if warmup > 0 {
        feed_inputs(predictor, inputs)?;
    }
    for i in 0..warmup as usize {
        let elapsed_ms = run_once(predictor, RunPhase::Warmup, i)?;
        if i == 0 {
            first_warmup_ms = Some(elapsed_ms);
        }
    }

    feed_inputs(predictor, inputs)?;
    let mut samples_ms = Vec::with_capacity(repeats as usize);
    for i in 0..repeats as usize {
        let elapsed_ms = run_once(predictor, RunPhase::Repeat, i)?;
        info!("run_idx: {} / {}: {:.3} ms", i + 1, repeats, elapsed_ms);
        samples_ms.push(elapsed_ms);
    }

    let stats = LatencyStats::from_samples(first_warmup_ms, &samples_ms)
        .ok_or(BenchError::InvalidRepeats { value: repeats })?;

    Ok(TimedRuns {
        first_warmup_ms,
        samples_ms,
        stats,
    })
}

/// Binds one synthetic tensor to each model input, in declaration order.
pub fn prepare_inputs(
    predictor: &dyn Predictor,
    shapes: &InputShapes,
) -> BenchResult<Vec<InputTensor>> {
    let names = predictor.input_names();
    if names.len() != shapes.len() {
        return Err(BenchError::InputCountMismatch {
            expected: shapes.len(),
            actual: names.len(),
        });
    }

    Ok(names
        .into_iter()
        .zip(shapes)
        .map(|(name, shape)| InputTensor::filled(name, shape.clone(), SYNTHETIC_INPUT_VALUE))
        .collect())
}

/// Sets the shape of every input. Shapes do not change between runs, so this
/// is done once per predictor.
pub fn reshape_inputs(predictor: &mut dyn Predictor, inputs: &[InputTensor]) -> BenchResult<()> {
    for input in inputs {
        debug!("Reshaping input {} to [{}]", input.name, input.shape);
        predictor.reshape_input(&input.name, &input.shape)?;
    }
    Ok(())
}

/// Copies every input buffer into the predictor.
pub fn feed_inputs(predictor: &mut dyn Predictor, inputs: &[InputTensor]) -> BenchResult<()> {
    for input in inputs {
        predictor.copy_input(&input.name, &input.data)?;
    }
    Ok(())
}

/// Copies every output back to the host.
pub fn read_outputs(predictor: &dyn Predictor) -> BenchResult<Vec<OutputTensor>> {
    predictor
        .output_names()
        .into_iter()
        .map(|name| -> BenchResult<OutputTensor> {
            let shape = predictor.output_shape(&name)?;
            let numel = shape.checked_numel().ok_or_else(|| BenchError::Ffi {
                message: format!("output '{}' has an oversized shape [{}]", name, shape),
            })?;
            let mut data = vec![0.0f32; numel];
            predictor.copy_output(&name, &mut data)?;
            Ok(OutputTensor { name, shape, data })
        })
        .collect()
}

/// Drives one benchmark session against predictors from `builder`.
pub struct BenchmarkRunner<'a> {
    config: &'a BenchConfig,
    builder: &'a dyn PredictorBuilder,
}

impl<'a> BenchmarkRunner<'a> {
    pub fn new(config: &'a BenchConfig, builder: &'a dyn PredictorBuilder) -> Self {
        Self { config, builder }
    }

    /// Builds the XPU predictor, runs the timed loop and reports the results.
    ///
    /// Output values go to `out` when printing is enabled; everything else
    /// goes to the log.
    pub fn run<W: Write>(&self, out: &mut W) -> BenchResult<BenchmarkReport> {
        let config = self.config;
        config.validate()?;
        self.log_model_messages();

        let mut predictor = self
            .builder
            .build(&PredictorOptions::from_config(config, Device::Xpu))?;

        let inputs = prepare_inputs(predictor.as_ref(), &config.input_shapes)?;
        reshape_inputs(predictor.as_mut(), &inputs)?;

        info!(
            "Running {} warmup and {} timed iterations",
            config.warmup, config.repeats
        );
        let runs = run_timed(predictor.as_mut(), &inputs, config.warmup, config.repeats)?;
        runs.stats.log_summary();

        let outputs = read_outputs(predictor.as_ref())?;
        drop(predictor);

        log_output_summary(&outputs);
        if config.print_outputs {
            write_all_output_values(out, &outputs, config.print_limit)?;
        }

        let mut report = BenchmarkReport::new(config, runs.stats, runs.samples_ms, &outputs);

        if config.precision_test {
            let reference = self.run_reference(&inputs)?;
            let precision = compare_outputs(&reference, &outputs)?;
            precision.log_summary();
            report.precision = Some(precision);
        }

        if let Some(path) = &config.report_json {
            write_report_json(path, &report)?;
        }

        info!("Benchmark complete");
        Ok(report)
    }

    /// Runs the model once on the CPU with the same inputs.
    fn run_reference(&self, inputs: &[InputTensor]) -> BenchResult<Vec<OutputTensor>> {
        info!("Running CPU reference for precision comparison");
        let mut reference = self
            .builder
            .build(&PredictorOptions::from_config(self.config, Device::Cpu))?;
        reshape_inputs(reference.as_mut(), inputs)?;
        feed_inputs(reference.as_mut(), inputs)?;
        run_once(reference.as_mut(), RunPhase::Reference, 0)?;
        read_outputs(reference.as_ref())
    }

    fn log_model_messages(&self) {
        let config = self.config;
        info!("{}", "=".repeat(40));
        info!("Model Messages");
        info!("{}", "=".repeat(40));
        info!("input_shape(s) (NCHW): {}", config.input_shapes);
        info!("model: {}", config.model);
        info!("warmup: {}", config.warmup);
        info!("repeats: {}", config.repeats);
        if config.engine.profile {
            info!("operator profiling: enabled");
        }
    }
}
