//! Tests for error messages and classification.

use xpu_infer_bench::benchmarks::{OutputTensor, compare_outputs};
use xpu_infer_bench::errors::{BenchError, RunPhase, ShapeParseError};
use xpu_infer_bench::{InputShapes, Shape};

fn output(name: &str, dims: Vec<usize>, data: Vec<f32>) -> OutputTensor {
    OutputTensor {
        name: name.to_string(),
        shape: Shape::new(dims),
        data,
    }
}

#[cfg(test)]
mod bench_error_tests {
    use super::*;

    #[test]
    fn test_usage_errors_are_classified() {
        assert!(BenchError::MissingModelPath.is_usage_error());
        assert!(BenchError::InvalidRepeats { value: 0 }.is_usage_error());
        assert!(
            BenchError::InvalidShapes(ShapeParseError::ZeroDimension {
                shape: "0".to_string()
            })
            .is_usage_error()
        );
    }

    #[test]
    fn test_runtime_errors_are_not_usage_errors() {
        let err = BenchError::InferenceFailed {
            phase: RunPhase::Repeat,
            iteration: 3,
            message: "device lost".to_string(),
        };
        assert!(!err.is_usage_error());
        assert_eq!(
            err.to_string(),
            "Inference failed during repeat run 3: device lost"
        );

        let err = BenchError::BackendUnavailable {
            reason: "no engine".to_string(),
        };
        assert!(!err.is_usage_error());
    }

    #[test]
    fn test_shape_error_converts_into_bench_error() {
        let err: BenchError = InputShapes::parse("1,x").unwrap_err().into();
        assert_eq!(
            err.to_string(),
            "Invalid --input_shapes: Invalid dimension 'x' in shape '1,x': expected a positive integer"
        );
    }
}

#[cfg(test)]
mod precision_error_tests {
    use super::*;

    #[test]
    fn test_output_count_mismatch() {
        let reference = vec![output("a", vec![1], vec![1.0])];
        let result = compare_outputs(&reference, &[]);
        assert!(matches!(result, Err(BenchError::OutputMismatch { .. })));
    }

    #[test]
    fn test_output_shape_mismatch() {
        let reference = vec![output("a", vec![2], vec![1.0, 1.0])];
        let candidate = vec![output("a", vec![1, 2], vec![1.0, 1.0])];
        let result = compare_outputs(&reference, &candidate);
        assert!(matches!(result, Err(BenchError::OutputMismatch { .. })));
    }

    #[test]
    fn test_output_name_mismatch() {
        let reference = vec![output("a", vec![1], vec![1.0])];
        let candidate = vec![output("b", vec![1], vec![1.0])];
        assert!(compare_outputs(&reference, &candidate).is_err());
    }

    #[test]
    fn test_known_perturbation_is_reported() {
        let reference = vec![
            output("a", vec![3], vec![1.0, 2.0, 3.0]),
            output("b", vec![1], vec![0.0]),
        ];
        let candidate = vec![
            output("a", vec![3], vec![1.0, 2.5, 3.0]),
            output("b", vec![1], vec![-0.125]),
        ];
        let report = compare_outputs(&reference, &candidate).unwrap();
        assert!((report.outputs[0].max_abs_diff - 0.5).abs() < 1e-6);
        assert!((report.outputs[1].max_abs_diff - 0.125).abs() < 1e-6);
        assert!((report.max_abs_diff - 0.5).abs() < 1e-6);
    }
}
