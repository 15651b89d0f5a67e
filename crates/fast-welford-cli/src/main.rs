//! fast-welford command-line interface
//!
//! Computes streaming mean and variance of CSV columns.

use clap::Parser;
use fast_welford_cli::args::Args;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.log_level().as_str()),
    )
    .init();

    match fast_welford_cli::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("{err:?}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
