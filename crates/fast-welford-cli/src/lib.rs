//! fast-welford CLI library
//!
//! This module exposes the CLI components for testing and reuse.

pub mod args;
pub mod csv_parser;
pub mod csv_writer;
pub mod error;

pub use error::{CliError, Result};

use std::io::Write;

use args::{Args, Command, StrategyArg};
use csv_writer::{OutputDest, StatsRow};
use fast_welford::reduction::fold_with;
use fast_welford::runtime::{self, Backend, CounterThenLog};
use fast_welford::WelfordOps;

/// Number of `stats` invocations in this process.
pub static STATS_CALLS: CounterThenLog = CounterThenLog::new("cli_stats_calls");

/// Run the command described by `args`.
///
/// # Errors
///
/// Propagates any input, reduction or output error.
pub fn run(args: &Args) -> Result<()> {
    match &args.command {
        Command::Stats {
            input,
            column,
            unbiased,
            take_sqrt,
            strategy,
            partitions,
            output,
        } => {
            let row = compute_stats(
                input,
                column.as_deref(),
                *unbiased,
                *take_sqrt,
                *strategy,
                *partitions,
            )?;
            csv_writer::write_stats(&[row], &OutputDest::from_option(output.as_deref()))
        }
        Command::Info => write_info(&mut std::io::stdout()),
    }
}

/// Read `column` from `input`, fold it with `strategy` and project the result.
///
/// # Errors
///
/// Returns an error if the input cannot be read, the column is missing or
/// malformed, or the strategy parameters are rejected.
pub fn compute_stats(
    input: &str,
    column: Option<&str>,
    unbiased: bool,
    take_sqrt: bool,
    strategy: StrategyArg,
    partitions: usize,
) -> Result<StatsRow> {
    STATS_CALLS.bump(1);

    let samples = csv_parser::read_column(input, column)?;
    let strategy = strategy.resolve(partitions, samples.values.len())?;
    log::info!(
        "reducing {} samples from '{}' with {:?}",
        samples.values.len(),
        samples.name,
        strategy
    );

    let ops: WelfordOps<f64> = WelfordOps::new(unbiased, take_sqrt);
    let state = fold_with(&ops, &samples.values, strategy)?;

    Ok(StatsRow {
        column: samples.name,
        count: state.count(),
        mean: if state.is_empty() {
            f64::NAN
        } else {
            state.mean()
        },
        m2: state.m2(),
        result: ops.project(state),
    })
}

/// Print build options and runtime backend flags.
///
/// # Errors
///
/// Returns `CliError::IoError` if writing fails.
pub fn write_info<W: Write>(out: &mut W) -> Result<()> {
    for (key, value) in runtime::build_options() {
        writeln!(out, "{key}: {value}")?;
    }
    for backend in Backend::ALL {
        let linked = if runtime::has_runtime(backend) {
            "linked"
        } else {
            "not linked"
        };
        writeln!(out, "{}: {linked}", backend.name().to_lowercase())?;
    }
    Ok(())
}
