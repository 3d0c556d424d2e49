//! Command-line entry point: benchmark a Paddle Inference model on the XPU.

use std::fmt::Display;
use std::io;
use std::process;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use log::error;
use xpu_infer_bench::predictor::engine_builder;
use xpu_infer_bench::{BenchResult, BenchmarkRunner, CliArgs};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let rendered = e.to_string();
            let message = rendered
                .lines()
                .next()
                .unwrap_or_default()
                .trim_start_matches("error: ");
            print_usage(&message);
            process::exit(1);
        }
    };

    if let Err(e) = run(args) {
        if e.is_usage_error() {
            print_usage(&e);
        } else {
            error!("Benchmark execution failed: {}", e);
        }
        process::exit(1);
    }
}

fn run(args: CliArgs) -> BenchResult<()> {
    let config = args.into_config()?;
    let builder = engine_builder();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    BenchmarkRunner::new(&config, builder.as_ref()).run(&mut out)?;
    Ok(())
}

fn print_usage(e: &dyn Display) {
    eprintln!("[ERROR] {}", e);
    eprintln!();
    eprintln!("{}", CliArgs::command().render_help());
}
