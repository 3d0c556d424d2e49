//! Latency measurement and summary statistics.

use std::time::Instant;

use log::info;
use serde::{Deserialize, Serialize};

/// Runs `f` once and returns its result with the elapsed wall-clock time in
/// milliseconds.
pub fn time_ms<F, T>(f: F) -> (T, f64)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let value = f();
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    (value, elapsed_ms)
}

/// Summary of a series of latency samples, all in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    /// Latency of the very first inference call, which usually includes lazy
    /// initialization inside the engine.
    pub first_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub avg_ms: f64,
    pub num_samples: usize,
}

impl LatencyStats {
    /// Computes statistics over `samples`.
    ///
    /// `first_ms` is the latency of the first warmup call; when there was no
    /// warmup the first sample stands in for it. Returns `None` for an empty
    /// series.
    pub fn from_samples(first_ms: Option<f64>, samples: &[f64]) -> Option<Self> {
        let (&head, _) = samples.split_first()?;

        let mut min_ms = f64::INFINITY;
        let mut max_ms = f64::NEG_INFINITY;
        let mut sum_ms = 0.0;
        for &sample in samples {
            min_ms = min_ms.min(sample);
            max_ms = max_ms.max(sample);
            sum_ms += sample;
        }

        Some(Self {
            first_ms: first_ms.unwrap_or(head),
            min_ms,
            max_ms,
            avg_ms: sum_ms / samples.len() as f64,
            num_samples: samples.len(),
        })
    }

    /// Writes the time summary block to the log.
    pub fn log_summary(&self) {
        info!("{}", "=".repeat(40));
        info!("Time Summary (ms) over {} runs", self.num_samples);
        info!("{}", "=".repeat(40));
        info!("1st_duration: {:.3}", self.first_ms);
        info!("max_duration: {:.3}", self.max_ms);
        info!("min_duration: {:.3}", self.min_ms);
        info!("avg_duration: {:.3}", self.avg_ms);
    }
}
