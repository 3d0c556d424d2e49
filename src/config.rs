//! Benchmark configuration.
//!
//! [`BenchConfig`] is built once from the command line and then passed by
//! reference to every stage of the harness.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{BenchError, BenchResult};
use crate::shape::InputShapes;

pub const DEFAULT_WARMUP: u32 = 5;
pub const DEFAULT_REPEATS: u32 = 20;
/// Maximum number of values printed per output tensor.
pub const DEFAULT_PRINT_LIMIT: usize = 1000;
/// L3 cache workspace reserved on the XPU, the engine's own default.
pub const DEFAULT_XPU_L3_WORKSPACE_SIZE: u32 = 0xfffc00;

/// Where the model lives on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelLocation {
    /// A single program file plus a single parameter file.
    Combined {
        model_file: PathBuf,
        param_file: PathBuf,
    },
    /// A directory holding an uncombined model.
    Uncombined { model_dir: PathBuf },
}

impl ModelLocation {
    /// Picks the model location from the raw path flags.
    ///
    /// The combined file pair wins over the directory when both are given.
    /// Empty paths count as unset.
    pub fn from_paths(
        model_file: Option<&Path>,
        param_file: Option<&Path>,
        model_dir: Option<&Path>,
    ) -> BenchResult<Self> {
        match (given(model_file), given(param_file), given(model_dir)) {
            (Some(model_file), Some(param_file), _) => Ok(ModelLocation::Combined {
                model_file: model_file.to_path_buf(),
                param_file: param_file.to_path_buf(),
            }),
            (_, _, Some(model_dir)) => Ok(ModelLocation::Uncombined {
                model_dir: model_dir.to_path_buf(),
            }),
            _ => Err(BenchError::MissingModelPath),
        }
    }
}

impl fmt::Display for ModelLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelLocation::Combined {
                model_file,
                param_file,
            } => write!(f, "{} + {}", model_file.display(), param_file.display()),
            ModelLocation::Uncombined { model_dir } => write!(f, "{}", model_dir.display()),
        }
    }
}

fn given(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}

/// Engine switches applied to every predictor the harness builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    pub memory_optim: bool,
    pub profile: bool,
    pub ir_optim: bool,
    pub ir_debug: bool,
    pub deleted_passes: Vec<String>,
    pub xpu_l3_workspace_size: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            memory_optim: true,
            profile: false,
            ir_optim: true,
            ir_debug: false,
            deleted_passes: Vec::new(),
            xpu_l3_workspace_size: DEFAULT_XPU_L3_WORKSPACE_SIZE,
        }
    }
}

/// Immutable configuration of one benchmark session.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    pub model: ModelLocation,
    pub input_shapes: InputShapes,
    pub warmup: u32,
    pub repeats: u32,
    pub print_outputs: bool,
    pub print_limit: usize,
    pub precision_test: bool,
    pub engine: EngineOptions,
    pub report_json: Option<PathBuf>,
}

impl BenchConfig {
    /// Creates a configuration with default run settings for `model`.
    pub fn new(model: ModelLocation) -> Self {
        Self {
            model,
            input_shapes: InputShapes::default(),
            warmup: DEFAULT_WARMUP,
            repeats: DEFAULT_REPEATS,
            print_outputs: false,
            print_limit: DEFAULT_PRINT_LIMIT,
            precision_test: false,
            engine: EngineOptions::default(),
            report_json: None,
        }
    }

    pub fn with_input_shapes(mut self, input_shapes: InputShapes) -> Self {
        self.input_shapes = input_shapes;
        self
    }

    pub fn with_warmup(mut self, warmup: u32) -> Self {
        self.warmup = warmup;
        self
    }

    pub fn with_repeats(mut self, repeats: u32) -> Self {
        self.repeats = repeats;
        self
    }

    pub fn with_print_outputs(mut self, print_limit: usize) -> Self {
        self.print_outputs = true;
        self.print_limit = print_limit;
        self
    }

    pub fn with_precision_test(mut self, enabled: bool) -> Self {
        self.precision_test = enabled;
        self
    }

    pub fn with_profile(mut self, enabled: bool) -> Self {
        self.engine.profile = enabled;
        self
    }

    pub fn with_report_json(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_json = Some(path.into());
        self
    }

    /// Validates the run settings.
    pub fn validate(&self) -> BenchResult<()> {
        if self.repeats == 0 {
            return Err(BenchError::InvalidRepeats {
                value: self.repeats,
            });
        }
        if self.print_outputs && self.print_limit == 0 {
            return Err(BenchError::InvalidPrintLimit {
                value: self.print_limit,
            });
        }
        Ok(())
    }
}
