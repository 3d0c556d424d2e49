//! Element-wise comparison of XPU outputs against a CPU reference run.

use log::info;
use serde::{Deserialize, Serialize};

use super::benchmark_types::OutputTensor;
use crate::errors::{BenchError, BenchResult};

/// JSON has no NaN: serde_json writes non-finite floats as `null`, so `null`
/// reads back as NaN.
mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_some(value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
        Ok(Option::<f32>::deserialize(deserializer)?.unwrap_or(f32::NAN))
    }
}

/// Largest absolute difference found in one output tensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputDiff {
    pub name: String,
    #[serde(with = "nan_as_null")]
    pub max_abs_diff: f32,
}

/// Result of comparing two output sets.
///
/// Differences that are NaN or infinite are written as `null` in the JSON
/// report and read back as NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecisionReport {
    pub outputs: Vec<OutputDiff>,
    #[serde(with = "nan_as_null")]
    pub max_abs_diff: f32,
}

impl PrecisionReport {
    pub fn log_summary(&self) {
        info!("{}", "=".repeat(40));
        info!("Precision Summary (XPU vs CPU)");
        info!("{}", "=".repeat(40));
        for diff in &self.outputs {
            info!("{}: max abs diff = {:e}", diff.name, diff.max_abs_diff);
        }
        info!("Max abs = {:e}", self.max_abs_diff);
    }
}

/// Maximum absolute element-wise difference of two equally long buffers.
///
/// A NaN difference is sticky, so a NaN in either buffer is never hidden.
pub fn max_abs_diff(reference: &[f32], candidate: &[f32]) -> f32 {
    reference
        .iter()
        .zip(candidate)
        .map(|(r, c)| (r - c).abs())
        .fold(0.0f32, |acc, diff| {
            if acc.is_nan() || diff.is_nan() {
                f32::NAN
            } else {
                acc.max(diff)
            }
        })
}

/// Compares `candidate` outputs against `reference` outputs.
///
/// Both sets must list the same outputs, in the same order, with the same
/// shapes.
pub fn compare_outputs(
    reference: &[OutputTensor],
    candidate: &[OutputTensor],
) -> BenchResult<PrecisionReport> {
    if reference.len() != candidate.len() {
        return Err(BenchError::OutputMismatch {
            message: format!(
                "reference has {} outputs, candidate has {}",
                reference.len(),
                candidate.len()
            ),
        });
    }

    let mut outputs = Vec::with_capacity(reference.len());
    for (r, c) in reference.iter().zip(candidate) {
        if r.name != c.name {
            return Err(BenchError::OutputMismatch {
                message: format!("output '{}' is paired with '{}'", r.name, c.name),
            });
        }
        if r.shape != c.shape || r.data.len() != c.data.len() {
            return Err(BenchError::OutputMismatch {
                message: format!(
                    "output '{}' has shape [{}] on the reference and [{}] on the candidate",
                    r.name, r.shape, c.shape
                ),
            });
        }
        outputs.push(OutputDiff {
            name: r.name.clone(),
            max_abs_diff: max_abs_diff(&r.data, &c.data),
        });
    }

    let overall = outputs.iter().fold(0.0f32, |acc, d| {
        if acc.is_nan() || d.max_abs_diff.is_nan() {
            f32::NAN
        } else {
            acc.max(d.max_abs_diff)
        }
    });

    Ok(PrecisionReport {
        outputs,
        max_abs_diff: overall,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_buffers_have_no_difference() {
        assert_eq!(max_abs_diff(&[1.0, -2.0], &[1.0, -2.0]), 0.0);
    }

    #[test]
    fn picks_the_largest_difference() {
        let diff = max_abs_diff(&[1.0, 2.0, 3.0], &[1.5, 2.0, 2.75]);
        assert!((diff - 0.5).abs() < 1e-6);
    }

    #[test]
    fn nan_is_not_hidden() {
        assert!(max_abs_diff(&[1.0, f32::NAN, 3.0], &[1.0, 2.0, 100.0]).is_nan());
    }

    #[test]
    fn nan_survives_the_json_report() {
        let report = PrecisionReport {
            outputs: vec![
                OutputDiff {
                    name: "a".to_string(),
                    max_abs_diff: f32::NAN,
                },
                OutputDiff {
                    name: "b".to_string(),
                    max_abs_diff: 0.5,
                },
            ],
            max_abs_diff: f32::NAN,
        };

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("null"));

        let back: PrecisionReport = serde_json::from_str(&json).unwrap();
        assert!(back.max_abs_diff.is_nan());
        assert!(back.outputs[0].max_abs_diff.is_nan());
        assert_eq!(back.outputs[1].max_abs_diff, 0.5);
    }
}
