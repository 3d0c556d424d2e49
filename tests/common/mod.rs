//! In-memory predictors used by the integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use xpu_infer_bench::errors::{BenchError, BenchResult};
use xpu_infer_bench::{Device, Predictor, PredictorBuilder, PredictorOptions, Shape};

/// Counters shared between a builder and the predictors it hands out.
#[derive(Debug, Default)]
pub struct FakeLog {
    pub builds: RefCell<Vec<Device>>,
    pub runs: Cell<usize>,
    pub input_copies: Cell<usize>,
    pub drops: Cell<usize>,
}

#[derive(Debug, Clone)]
struct FakeTensor {
    name: String,
    shape: Option<Shape>,
    data: Vec<f32>,
}

/// A model whose output `i` is input `i`, plus a per-device offset.
pub struct IdentityPredictor {
    inputs: Vec<FakeTensor>,
    outputs: Vec<FakeTensor>,
    offset: f32,
    fail_at_run: Option<usize>,
    runs_done: usize,
    log: Rc<FakeLog>,
}

impl IdentityPredictor {
    fn find_input(&mut self, name: &str) -> BenchResult<&mut FakeTensor> {
        self.inputs
            .iter_mut()
            .find(|t| t.name == name)
            .ok_or_else(|| BenchError::UnknownTensor {
                kind: "input".to_string(),
                name: name.to_string(),
            })
    }

    fn find_output(&self, name: &str) -> BenchResult<&FakeTensor> {
        self.outputs
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| BenchError::UnknownTensor {
                kind: "output".to_string(),
                name: name.to_string(),
            })
    }
}

pub fn output_name(input: &str) -> String {
    format!("{input}.out")
}

impl Predictor for IdentityPredictor {
    fn input_names(&self) -> Vec<String> {
        self.inputs.iter().map(|t| t.name.clone()).collect()
    }

    fn output_names(&self) -> Vec<String> {
        self.inputs.iter().map(|t| output_name(&t.name)).collect()
    }

    fn reshape_input(&mut self, name: &str, shape: &Shape) -> BenchResult<()> {
        let tensor = self.find_input(name)?;
        tensor.data = vec![0.0; shape.numel()];
        tensor.shape = Some(shape.clone());
        Ok(())
    }

    fn copy_input(&mut self, name: &str, data: &[f32]) -> BenchResult<()> {
        let log = Rc::clone(&self.log);
        let tensor = self.find_input(name)?;
        if tensor.data.len() != data.len() {
            return Err(BenchError::BufferSizeMismatch {
                name: name.to_string(),
                expected: tensor.data.len(),
                actual: data.len(),
            });
        }
        tensor.data.copy_from_slice(data);
        log.input_copies.set(log.input_copies.get() + 1);
        Ok(())
    }

    fn run(&mut self) -> BenchResult<()> {
        if self.fail_at_run == Some(self.runs_done) {
            return Err(BenchError::Ffi {
                message: "device lost".to_string(),
            });
        }
        self.outputs = self
            .inputs
            .iter()
            .map(|t| FakeTensor {
                name: output_name(&t.name),
                shape: t.shape.clone(),
                data: t.data.iter().map(|v| v + self.offset).collect(),
            })
            .collect();
        self.runs_done += 1;
        self.log.runs.set(self.log.runs.get() + 1);
        Ok(())
    }

    fn output_shape(&self, name: &str) -> BenchResult<Shape> {
        let tensor = self.find_output(name)?;
        tensor.shape.clone().ok_or_else(|| BenchError::Ffi {
            message: format!("output {name} has no shape yet"),
        })
    }

    fn copy_output(&self, name: &str, data: &mut [f32]) -> BenchResult<()> {
        let tensor = self.find_output(name)?;
        if tensor.data.len() != data.len() {
            return Err(BenchError::BufferSizeMismatch {
                name: name.to_string(),
                expected: tensor.data.len(),
                actual: data.len(),
            });
        }
        data.copy_from_slice(&tensor.data);
        Ok(())
    }
}

impl Drop for IdentityPredictor {
    fn drop(&mut self) {
        self.log.drops.set(self.log.drops.get() + 1);
    }
}

/// Hands out [`IdentityPredictor`]s with the configured inputs.
pub struct FakeBuilder {
    pub input_names: Vec<String>,
    pub cpu_offset: f32,
    pub fail_at_run: Option<usize>,
    pub log: Rc<FakeLog>,
}

impl FakeBuilder {
    pub fn new(input_names: &[&str]) -> Self {
        Self {
            input_names: input_names.iter().map(|n| n.to_string()).collect(),
            cpu_offset: 0.0,
            fail_at_run: None,
            log: Rc::new(FakeLog::default()),
        }
    }

    pub fn with_cpu_offset(mut self, offset: f32) -> Self {
        self.cpu_offset = offset;
        self
    }

    pub fn failing_at_run(mut self, run: usize) -> Self {
        self.fail_at_run = Some(run);
        self
    }
}

impl PredictorBuilder for FakeBuilder {
    fn build(&self, options: &PredictorOptions) -> BenchResult<Box<dyn Predictor>> {
        self.log.builds.borrow_mut().push(options.device);
        let offset = match options.device {
            Device::Xpu => 0.0,
            Device::Cpu => self.cpu_offset,
        };
        Ok(Box::new(IdentityPredictor {
            inputs: self
                .input_names
                .iter()
                .map(|name| FakeTensor {
                    name: name.clone(),
                    shape: None,
                    data: Vec::new(),
                })
                .collect(),
            outputs: Vec::new(),
            offset,
            fail_at_run: self.fail_at_run,
            runs_done: 0,
            log: Rc::clone(&self.log),
        }))
    }
}
