//! Printing of output tensors and the JSON report.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use log::info;

use super::benchmark_types::{BenchmarkReport, OutputTensor};
use crate::errors::BenchResult;

/// Logs shape and element count of every output.
pub fn log_output_summary(outputs: &[OutputTensor]) {
    for (index, output) in outputs.iter().enumerate() {
        info!("{}", "=".repeat(40));
        info!("Output Summary: {}", output.name);
        info!("{}", "=".repeat(40));
        info!("output shape(NCHW): {}", output.shape);
        info!("output tensor[{}]'s elem num: {}", index, output.numel());
    }
}

/// Writes at most `limit` values of output `index`, one per line, as
/// `out_datas[index][k]:value`. Returns how many values were written.
pub fn write_output_values<W: Write>(
    out: &mut W,
    index: usize,
    values: &[f32],
    limit: usize,
) -> io::Result<usize> {
    let shown = values.len().min(limit);
    for (k, value) in values[..shown].iter().enumerate() {
        writeln!(out, "out_datas[{}][{}]:{}", index, k, value)?;
    }
    Ok(shown)
}

/// Writes the values of every output, each capped at `limit`.
pub fn write_all_output_values<W: Write>(
    out: &mut W,
    outputs: &[OutputTensor],
    limit: usize,
) -> io::Result<()> {
    for (index, output) in outputs.iter().enumerate() {
        let shown = write_output_values(out, index, &output.data, limit)?;
        if shown < output.numel() {
            info!(
                "Output {} truncated: printed {} of {} elements",
                output.name,
                shown,
                output.numel()
            );
        }
    }
    out.flush()
}

/// Saves the report as pretty-printed JSON.
pub fn write_report_json(path: &Path, report: &BenchmarkReport) -> BenchResult<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    info!("Benchmark report written to {}", path.display());
    Ok(())
}
