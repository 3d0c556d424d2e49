//! Runs the `xpu_bench` binary and checks its exit status.

use std::process::Command;

fn xpu_bench() -> Command {
    Command::new(env!("CARGO_BIN_EXE_xpu_bench"))
}

#[test]
fn test_missing_model_exits_with_usage() {
    let output = xpu_bench().output().expect("binary should start");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No model given"));
    assert!(stderr.contains("--model_dir"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_bad_shape_exits_with_usage() {
    let output = xpu_bench()
        .args(["--model_dir=m", "--input_shapes=1,0"])
        .output()
        .expect("binary should start");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Dimension 0"));
}

#[cfg(not(feature = "paddle"))]
#[test]
fn test_without_engine_fails_after_validation() {
    let output = xpu_bench()
        .args(["--model_dir=m"])
        .env("RUST_LOG", "error")
        .output()
        .expect("binary should start");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("paddle"));
}

#[test]
fn test_unparsable_flag_value_exits_with_usage() {
    for args in [
        ["--model_dir=m", "--warmup=abc"],
        ["--model_dir=m", "--repeats=-1"],
        ["--model_dir=m", "--no_such_flag"],
    ] {
        let output = xpu_bench().args(args).output().expect("binary should start");

        assert_eq!(output.status.code(), Some(1), "args {:?}", args);
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.starts_with("[ERROR] "), "stderr: {}", stderr);
        assert!(stderr.contains("--model_dir"), "help missing for {:?}", args);
    }
}

#[test]
fn test_help_exits_successfully() {
    let output = xpu_bench().arg("--help").output().expect("binary should start");

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("--input_shapes"));
}

#[test]
fn test_oversized_shape_exits_with_usage() {
    let output = xpu_bench()
        .args(["--model_dir=m", "--input_shapes=4294967296,4294967296"])
        .output()
        .expect("binary should start");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("int32"));
}
