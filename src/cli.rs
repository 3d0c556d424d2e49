//! Command-line flags of the `xpu_bench` binary.
//!
//! Flag names keep the underscore spelling used by Paddle's own demo tools
//! (`--model_dir`, `--input_shapes`, ...). Boolean flags accept both
//! `--print_outputs` and `--print_outputs=true`.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::{
    BenchConfig, DEFAULT_PRINT_LIMIT, DEFAULT_REPEATS, DEFAULT_WARMUP,
    DEFAULT_XPU_L3_WORKSPACE_SIZE, EngineOptions, ModelLocation,
};
use crate::errors::BenchResult;
use crate::shape::InputShapes;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "xpu_bench",
    about = "Benchmark a Paddle Inference model on Kunlun XPU",
    long_about = "Loads a Paddle Inference model, feeds it inputs filled with 1.0, runs it\nrepeatedly on the XPU and reports latency statistics and output tensors.",
    version
)]
pub struct CliArgs {
    /// Model file in a PaddlePaddle combined model
    #[arg(long = "model_file", value_name = "PATH")]
    pub model_file: Option<PathBuf>,

    /// Param file in a PaddlePaddle combined model
    #[arg(long = "param_file", value_name = "PATH")]
    pub param_file: Option<PathBuf>,

    /// Path to a PaddlePaddle uncombined model directory
    #[arg(long = "model_dir", value_name = "PATH")]
    pub model_dir: Option<PathBuf>,

    /// Input shapes, e.g. "1,3,224,224:1,10" (one shape per model input)
    #[arg(long = "input_shapes", default_value = "1,3,224,224")]
    pub input_shapes: String,

    /// Number of warmup runs
    #[arg(long, default_value_t = DEFAULT_WARMUP)]
    pub warmup: u32,

    /// Number of timed runs
    #[arg(long, default_value_t = DEFAULT_REPEATS)]
    pub repeats: u32,

    /// Print output tensor elements
    #[arg(
        long = "print_outputs",
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub print_outputs: bool,

    /// Maximum number of elements printed per output tensor
    #[arg(long = "print_limit", default_value_t = DEFAULT_PRINT_LIMIT)]
    pub print_limit: usize,

    /// Compare XPU outputs against a CPU reference run
    #[arg(
        long = "precision_test",
        alias = "percision_test",
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub precision_test: bool,

    /// Enable per-operator profiling in the engine
    #[arg(
        long = "profile_test",
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub profile_test: bool,

    /// Turn off IR graph optimization passes
    #[arg(
        long = "disable_ir_optim",
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub disable_ir_optim: bool,

    /// Dump the intermediate program after every IR pass
    #[arg(
        long = "ir_debug",
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub ir_debug: bool,

    /// Remove an IR pass by name (repeatable)
    #[arg(long = "delete_pass", value_name = "PASS", action = ArgAction::Append)]
    pub delete_pass: Vec<String>,

    /// XPU L3 workspace size in bytes
    #[arg(long = "xpu_l3_size", default_value_t = DEFAULT_XPU_L3_WORKSPACE_SIZE)]
    pub xpu_l3_size: u32,

    /// Write the benchmark report as JSON to this path
    #[arg(long = "report_json", value_name = "PATH")]
    pub report_json: Option<PathBuf>,
}

impl CliArgs {
    /// Turns the raw flags into a validated [`BenchConfig`].
    ///
    /// Fails with a usage error when no model location is given, so no
    /// predictor is ever constructed for an incomplete command line.
    pub fn into_config(self) -> BenchResult<BenchConfig> {
        let model = ModelLocation::from_paths(
            self.model_file.as_deref(),
            self.param_file.as_deref(),
            self.model_dir.as_deref(),
        )?;
        let input_shapes = InputShapes::parse(&self.input_shapes)?;

        let config = BenchConfig {
            model,
            input_shapes,
            warmup: self.warmup,
            repeats: self.repeats,
            print_outputs: self.print_outputs,
            print_limit: self.print_limit,
            precision_test: self.precision_test,
            engine: EngineOptions {
                profile: self.profile_test,
                ir_optim: !self.disable_ir_optim,
                ir_debug: self.ir_debug,
                deleted_passes: self.delete_pass,
                xpu_l3_workspace_size: self.xpu_l3_size,
                ..EngineOptions::default()
            },
            report_json: self.report_json,
        };
        config.validate()?;
        Ok(config)
    }
}
