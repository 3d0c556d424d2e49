//! Raw bindings to the Paddle Inference C API (`pd_inference_api.h`).
//!
//! Only the calls used by the harness are declared. Use the safe wrappers in
//! the parent module instead of calling these directly.

#![allow(non_camel_case_types, non_snake_case)]

use std::os::raw::c_char;

pub type PD_Bool = i8;

/// Opaque engine configuration.
#[repr(C)]
pub struct PD_Config {
    _private: [u8; 0],
}

/// Opaque predictor.
#[repr(C)]
pub struct PD_Predictor {
    _private: [u8; 0],
}

/// Opaque tensor handle bound to a predictor.
#[repr(C)]
pub struct PD_Tensor {
    _private: [u8; 0],
}

#[repr(C)]
pub struct PD_OneDimArrayCstr {
    pub size: usize,
    pub data: *mut *mut c_char,
}

#[repr(C)]
pub struct PD_OneDimArrayInt32 {
    pub size: usize,
    pub data: *mut i32,
}

unsafe extern "C" {
    // Config
    pub fn PD_ConfigCreate() -> *mut PD_Config;
    pub fn PD_ConfigDestroy(config: *mut PD_Config);
    pub fn PD_ConfigSetModel(
        config: *mut PD_Config,
        prog_file_path: *const c_char,
        params_file_path: *const c_char,
    );
    pub fn PD_ConfigSetModelDir(config: *mut PD_Config, model_dir: *const c_char);
    pub fn PD_ConfigEnableXpu(
        config: *mut PD_Config,
        l3_workspace_size: i32,
        locked: PD_Bool,
        autotune: PD_Bool,
        autotune_file: *const c_char,
        precision: *const c_char,
        adaptive_seqlen: PD_Bool,
        enable_multi_stream: PD_Bool,
    );
    pub fn PD_ConfigDisableGpu(config: *mut PD_Config);
    pub fn PD_ConfigEnableMemoryOptim(config: *mut PD_Config, enable: PD_Bool);
    pub fn PD_ConfigEnableProfile(config: *mut PD_Config);
    pub fn PD_ConfigSwitchIrOptim(config: *mut PD_Config, enable: PD_Bool);
    pub fn PD_ConfigSwitchIrDebug(config: *mut PD_Config, enable: PD_Bool);
    pub fn PD_ConfigDeletePass(config: *mut PD_Config, pass: *const c_char);

    // Predictor. PD_PredictorCreate takes ownership of the config.
    pub fn PD_PredictorCreate(config: *mut PD_Config) -> *mut PD_Predictor;
    pub fn PD_PredictorDestroy(predictor: *mut PD_Predictor);
    pub fn PD_PredictorGetInputNames(predictor: *mut PD_Predictor) -> *mut PD_OneDimArrayCstr;
    pub fn PD_PredictorGetOutputNames(predictor: *mut PD_Predictor) -> *mut PD_OneDimArrayCstr;
    pub fn PD_PredictorGetInputHandle(
        predictor: *mut PD_Predictor,
        name: *const c_char,
    ) -> *mut PD_Tensor;
    pub fn PD_PredictorGetOutputHandle(
        predictor: *mut PD_Predictor,
        name: *const c_char,
    ) -> *mut PD_Tensor;
    pub fn PD_PredictorRun(predictor: *mut PD_Predictor) -> PD_Bool;

    // Tensor
    pub fn PD_TensorDestroy(tensor: *mut PD_Tensor);
    pub fn PD_TensorReshape(tensor: *mut PD_Tensor, shape_size: usize, shape: *mut i32);
    pub fn PD_TensorGetShape(tensor: *mut PD_Tensor) -> *mut PD_OneDimArrayInt32;
    pub fn PD_TensorCopyFromCpuFloat(tensor: *mut PD_Tensor, data: *const f32);
    pub fn PD_TensorCopyToCpuFloat(tensor: *mut PD_Tensor, data: *mut f32);

    // Arrays handed out by the API
    pub fn PD_OneDimArrayCstrDestroy(array: *mut PD_OneDimArrayCstr);
    pub fn PD_OneDimArrayInt32Destroy(array: *mut PD_OneDimArrayInt32);
}
