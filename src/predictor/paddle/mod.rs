//! Paddle Inference backend.
//!
//! Safe wrappers over the C API. Every raw handle is owned by a guard whose
//! `Drop` releases it, so engine resources are freed on error paths too.

mod ffi;

use std::ffi::{CStr, CString};
use std::path::Path;
use std::ptr::NonNull;

use log::debug;

use super::{Device, Predictor, PredictorBuilder, PredictorOptions};
use crate::config::{EngineOptions, ModelLocation};
use crate::errors::{BenchError, BenchResult};
use crate::shape::Shape;

const XPU_PRECISION: &CStr = c"int16";
const XPU_AUTOTUNE_FILE: &CStr = c"";

/// Builds predictors backed by `libpaddle_inference_c`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PaddlePredictorBuilder;

impl PredictorBuilder for PaddlePredictorBuilder {
    fn build(&self, options: &PredictorOptions) -> BenchResult<Box<dyn Predictor>> {
        Ok(Box::new(PaddlePredictor::create(options)?))
    }
}

fn to_c_string(text: &str) -> BenchResult<CString> {
    CString::new(text).map_err(|_| BenchError::Ffi {
        message: format!("'{}' contains an interior NUL byte", text.escape_debug()),
    })
}

fn path_to_c_string(path: &Path) -> BenchResult<CString> {
    let text = path.to_str().ok_or_else(|| BenchError::Ffi {
        message: format!("path '{}' is not valid UTF-8", path.display()),
    })?;
    to_c_string(text)
}

fn pd_bool(value: bool) -> ffi::PD_Bool {
    value as ffi::PD_Bool
}

/// Owned `PD_Config` until it is handed to `PD_PredictorCreate`.
struct EngineConfig {
    raw: NonNull<ffi::PD_Config>,
}

impl EngineConfig {
    fn new() -> BenchResult<Self> {
        // SAFETY: no preconditions; a null return is handled below.
        let raw = unsafe { ffi::PD_ConfigCreate() };
        NonNull::new(raw)
            .map(|raw| Self { raw })
            .ok_or_else(|| BenchError::Ffi {
                message: "PD_ConfigCreate returned null".to_string(),
            })
    }

    fn set_model(&mut self, model: &ModelLocation) -> BenchResult<()> {
        match model {
            ModelLocation::Combined {
                model_file,
                param_file,
            } => {
                let model_file = path_to_c_string(model_file)?;
                let param_file = path_to_c_string(param_file)?;
                // SAFETY: config is live; both strings outlive the call.
                unsafe {
                    ffi::PD_ConfigSetModel(
                        self.raw.as_ptr(),
                        model_file.as_ptr(),
                        param_file.as_ptr(),
                    )
                };
            }
            ModelLocation::Uncombined { model_dir } => {
                let model_dir = path_to_c_string(model_dir)?;
                // SAFETY: config is live; the string outlives the call.
                unsafe { ffi::PD_ConfigSetModelDir(self.raw.as_ptr(), model_dir.as_ptr()) };
            }
        }
        Ok(())
    }

    fn set_device(&mut self, device: Device, engine: &EngineOptions) -> BenchResult<()> {
        match device {
            Device::Xpu => {
                let l3_size = i32::try_from(engine.xpu_l3_workspace_size).map_err(|_| {
                    BenchError::Ffi {
                        message: format!(
                            "XPU L3 workspace size {} does not fit the engine's int32",
                            engine.xpu_l3_workspace_size
                        ),
                    }
                })?;
                // SAFETY: config is live; the static strings are NUL terminated.
                unsafe {
                    ffi::PD_ConfigEnableXpu(
                        self.raw.as_ptr(),
                        l3_size,
                        pd_bool(false),
                        pd_bool(true),
                        XPU_AUTOTUNE_FILE.as_ptr(),
                        XPU_PRECISION.as_ptr(),
                        pd_bool(false),
                        pd_bool(false),
                    )
                };
            }
            // SAFETY: config is live.
            Device::Cpu => unsafe { ffi::PD_ConfigDisableGpu(self.raw.as_ptr()) },
        }
        Ok(())
    }

    fn apply_engine_options(&mut self, engine: &EngineOptions) -> BenchResult<()> {
        let raw = self.raw.as_ptr();
        // SAFETY: config is live for all calls in this block.
        unsafe {
            ffi::PD_ConfigEnableMemoryOptim(raw, pd_bool(engine.memory_optim));
            ffi::PD_ConfigSwitchIrOptim(raw, pd_bool(engine.ir_optim));
            if engine.ir_debug {
                ffi::PD_ConfigSwitchIrDebug(raw, pd_bool(true));
            }
            if engine.profile {
                ffi::PD_ConfigEnableProfile(raw);
            }
        }
        for pass in &engine.deleted_passes {
            let pass_name = to_c_string(pass)?;
            debug!("Deleting IR pass {}", pass);
            // SAFETY: config is live; the string outlives the call.
            unsafe { ffi::PD_ConfigDeletePass(raw, pass_name.as_ptr()) };
        }
        Ok(())
    }

    /// Gives up ownership; the caller must pass the pointer to
    /// `PD_PredictorCreate`, which frees it.
    fn into_raw(self) -> *mut ffi::PD_Config {
        let raw = self.raw.as_ptr();
        std::mem::forget(self);
        raw
    }
}

impl Drop for EngineConfig {
    fn drop(&mut self) {
        // SAFETY: still owned, never handed to the predictor.
        unsafe { ffi::PD_ConfigDestroy(self.raw.as_ptr()) };
    }
}

#[derive(Debug, Clone, Copy)]
enum TensorKind {
    Input,
    Output,
}

impl TensorKind {
    fn as_str(self) -> &'static str {
        match self {
            TensorKind::Input => "input",
            TensorKind::Output => "output",
        }
    }
}

/// Owned tensor handle obtained from a predictor.
struct TensorHandle {
    raw: NonNull<ffi::PD_Tensor>,
}

impl TensorHandle {
    fn shape(&self) -> BenchResult<Shape> {
        // SAFETY: tensor is live; the returned array is owned by us.
        let array = unsafe { ffi::PD_TensorGetShape(self.raw.as_ptr()) };
        let Some(array) = NonNull::new(array) else {
            return Err(BenchError::Ffi {
                message: "PD_TensorGetShape returned null".to_string(),
            });
        };

        // SAFETY: the engine guarantees `data` holds `size` elements.
        let dims = unsafe {
            let array_ref = array.as_ref();
            if array_ref.size == 0 || array_ref.data.is_null() {
                Vec::new()
            } else {
                std::slice::from_raw_parts(array_ref.data, array_ref.size).to_vec()
            }
        };
        // SAFETY: array was handed out by the engine and is released once.
        unsafe { ffi::PD_OneDimArrayInt32Destroy(array.as_ptr()) };

        Shape::from_engine_dims(&dims).ok_or_else(|| BenchError::Ffi {
            message: format!("tensor has unresolved extents {:?}", dims),
        })
    }

    fn check_len(&self, name: &str, len: usize) -> BenchResult<()> {
        let shape = self.shape()?;
        let expected = shape.checked_numel().ok_or_else(|| BenchError::Ffi {
            message: format!("tensor '{}' has an oversized shape [{}]", name, shape),
        })?;
        if expected != len {
            return Err(BenchError::BufferSizeMismatch {
                name: name.to_string(),
                expected,
                actual: len,
            });
        }
        Ok(())
    }
}

impl Drop for TensorHandle {
    fn drop(&mut self) {
        // SAFETY: handle is owned and released once.
        unsafe { ffi::PD_TensorDestroy(self.raw.as_ptr()) };
    }
}

fn take_names(array: *mut ffi::PD_OneDimArrayCstr) -> Vec<String> {
    let Some(array) = NonNull::new(array) else {
        return Vec::new();
    };
    // SAFETY: the engine guarantees `data` holds `size` NUL-terminated strings.
    let names = unsafe {
        let array_ref = array.as_ref();
        if array_ref.data.is_null() {
            Vec::new()
        } else {
            std::slice::from_raw_parts(array_ref.data, array_ref.size)
                .iter()
                .map(|&name| CStr::from_ptr(name).to_string_lossy().into_owned())
                .collect()
        }
    };
    // SAFETY: array was handed out by the engine and is released once.
    unsafe { ffi::PD_OneDimArrayCstrDestroy(array.as_ptr()) };
    names
}

/// A predictor owned by the Paddle engine.
pub struct PaddlePredictor {
    raw: NonNull<ffi::PD_Predictor>,
    device: Device,
    input_names: Vec<String>,
    output_names: Vec<String>,
}

impl PaddlePredictor {
    pub fn create(options: &PredictorOptions) -> BenchResult<Self> {
        let mut config = EngineConfig::new()?;
        config.set_model(&options.model)?;
        config.set_device(options.device, &options.engine)?;
        config.apply_engine_options(&options.engine)?;

        // SAFETY: ownership of the config moves into the engine.
        let raw = unsafe { ffi::PD_PredictorCreate(config.into_raw()) };
        let raw = NonNull::new(raw).ok_or_else(|| BenchError::PredictorCreation {
            device: options.device.to_string(),
            message: format!("engine failed to load model {}", options.model),
        })?;

        // SAFETY: predictor is live.
        let input_names = take_names(unsafe { ffi::PD_PredictorGetInputNames(raw.as_ptr()) });
        // SAFETY: predictor is live.
        let output_names = take_names(unsafe { ffi::PD_PredictorGetOutputNames(raw.as_ptr()) });
        debug!(
            "Created {} predictor: inputs {:?}, outputs {:?}",
            options.device, input_names, output_names
        );

        Ok(Self {
            raw,
            device: options.device,
            input_names,
            output_names,
        })
    }

    fn input_handle(&self, name: &str) -> BenchResult<TensorHandle> {
        self.handle(name, TensorKind::Input)
    }

    fn output_handle(&self, name: &str) -> BenchResult<TensorHandle> {
        self.handle(name, TensorKind::Output)
    }

    fn handle(&self, name: &str, kind: TensorKind) -> BenchResult<TensorHandle> {
        let known = match kind {
            TensorKind::Input => &self.input_names,
            TensorKind::Output => &self.output_names,
        };
        if !known.iter().any(|n| n == name) {
            return Err(BenchError::UnknownTensor {
                kind: kind.as_str().to_string(),
                name: name.to_string(),
            });
        }

        let c_name = to_c_string(name)?;
        // SAFETY: predictor is live and `name` is one of its tensors.
        let raw = unsafe {
            match kind {
                TensorKind::Input => {
                    ffi::PD_PredictorGetInputHandle(self.raw.as_ptr(), c_name.as_ptr())
                }
                TensorKind::Output => {
                    ffi::PD_PredictorGetOutputHandle(self.raw.as_ptr(), c_name.as_ptr())
                }
            }
        };
        NonNull::new(raw)
            .map(|raw| TensorHandle { raw })
            .ok_or_else(|| BenchError::Ffi {
                message: format!("no handle for {} tensor '{}'", kind.as_str(), name),
            })
    }
}

impl Predictor for PaddlePredictor {
    fn input_names(&self) -> Vec<String> {
        self.input_names.clone()
    }

    fn output_names(&self) -> Vec<String> {
        self.output_names.clone()
    }

    fn reshape_input(&mut self, name: &str, shape: &Shape) -> BenchResult<()> {
        let tensor = self.input_handle(name)?;
        let mut dims = shape
            .dims()
            .iter()
            .map(|&d| {
                i32::try_from(d).map_err(|_| BenchError::Ffi {
                    message: format!("dimension {} of '{}' does not fit in int32", d, name),
                })
            })
            .collect::<BenchResult<Vec<i32>>>()?;
        // SAFETY: tensor is live; `dims` holds `dims.len()` elements.
        unsafe { ffi::PD_TensorReshape(tensor.raw.as_ptr(), dims.len(), dims.as_mut_ptr()) };
        Ok(())
    }

    fn copy_input(&mut self, name: &str, data: &[f32]) -> BenchResult<()> {
        let tensor = self.input_handle(name)?;
        tensor.check_len(name, data.len())?;
        if data.is_empty() {
            return Ok(());
        }
        // SAFETY: `data` holds exactly as many floats as the tensor.
        unsafe { ffi::PD_TensorCopyFromCpuFloat(tensor.raw.as_ptr(), data.as_ptr()) };
        Ok(())
    }

    fn run(&mut self) -> BenchResult<()> {
        // SAFETY: predictor is live.
        let ok = unsafe { ffi::PD_PredictorRun(self.raw.as_ptr()) };
        if ok == 0 {
            return Err(BenchError::Ffi {
                message: "PD_PredictorRun reported failure".to_string(),
            });
        }
        Ok(())
    }

    fn output_shape(&self, name: &str) -> BenchResult<Shape> {
        self.output_handle(name)?.shape()
    }

    fn copy_output(&self, name: &str, data: &mut [f32]) -> BenchResult<()> {
        let tensor = self.output_handle(name)?;
        tensor.check_len(name, data.len())?;
        if data.is_empty() {
            return Ok(());
        }
        // SAFETY: `data` has room for exactly as many floats as the tensor.
        unsafe { ffi::PD_TensorCopyToCpuFloat(tensor.raw.as_ptr(), data.as_mut_ptr()) };
        Ok(())
    }
}

impl Drop for PaddlePredictor {
    fn drop(&mut self) {
        debug!("Releasing {} predictor", self.device);
        // SAFETY: predictor is owned and released once.
        unsafe { ffi::PD_PredictorDestroy(self.raw.as_ptr()) };
    }
}
