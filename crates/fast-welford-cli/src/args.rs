//! CLI argument parsing module.
//!
//! The CLI follows the pattern: `fast-welford stats <input.csv> [options]`
//!
//! # Examples
//!
//! ```bash
//! # Population variance of the first numeric column
//! fast-welford stats input.csv
//!
//! # Sample standard deviation of the `latency` column
//! fast-welford stats input.csv -c latency --unbiased --std
//!
//! # Pairwise tree reduction with leaves of 64 samples, written to a file
//! fast-welford stats input.csv --strategy tree --partitions 64 -o out.csv
//!
//! # Build and runtime information
//! fast-welford info
//! ```

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use fast_welford::ReductionStrategy;
use log::LevelFilter;

use crate::error::{CliError, Result};

/// fast-welford: streaming mean and variance
#[derive(Parser, Debug)]
#[command(name = "fast-welford")]
#[command(author, version, about = "Streaming mean and variance with Welford's algorithm")]
#[command(long_about = "fast-welford reads a numeric column from a CSV file, folds it \
    with Welford's online update and Chan's parallel combine, and reports the \
    mean together with the requested variance or standard deviation.")]
pub struct Args {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Default log level implied by the `-v` count.
    #[must_use]
    pub const fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Mean and variance of one CSV column
    #[command(about = "Mean and variance of one CSV column")]
    Stats {
        /// Input CSV file
        input: String,

        /// Column to reduce (first numeric column if not specified)
        #[arg(short, long)]
        column: Option<String>,

        /// Apply Bessel's correction (divide by n - 1)
        #[arg(long)]
        unbiased: bool,

        /// Report the standard deviation instead of the variance
        #[arg(long = "std")]
        take_sqrt: bool,

        /// How the samples are partitioned and recombined
        #[arg(long, value_enum, default_value_t = StrategyArg::Sequential)]
        strategy: StrategyArg,

        /// Leaf size, partition count or lane width, depending on the strategy
        #[arg(long, default_value = "8")]
        partitions: usize,

        /// Output CSV file (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Build options and registered runtime backends
    #[command(about = "Build options and registered runtime backends")]
    Info,
}

/// Reduction strategy names accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyArg {
    /// One accumulator, left to right
    Sequential,
    /// Recursive pairwise halving; `--partitions` is the leaf size
    Tree,
    /// Contiguous chunks; `--partitions` is the chunk count
    Partitioned,
    /// Rayon work-stealing; `--partitions` is the chunk count
    Parallel,
    /// Lockstep lane group; `--partitions` is the lane width
    Lockstep,
}

impl StrategyArg {
    /// Resolves the command-line choice into a library strategy for `len`
    /// samples.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidArgument` if `partitions` is zero for a
    /// strategy that uses it.
    pub fn resolve(self, partitions: usize, len: usize) -> Result<ReductionStrategy> {
        if self != StrategyArg::Sequential && partitions == 0 {
            return Err(CliError::InvalidArgument {
                argument: "partitions".to_string(),
                reason: "must be at least 1".to_string(),
                suggestion: Some("Use a positive integer like 8".to_string()),
            });
        }
        Ok(match self {
            StrategyArg::Sequential => ReductionStrategy::Sequential,
            StrategyArg::Tree => ReductionStrategy::Tree {
                leaf_size: partitions,
            },
            StrategyArg::Partitioned => ReductionStrategy::Partitioned { partitions },
            StrategyArg::Parallel => ReductionStrategy::Parallel {
                min_chunk: len.div_ceil(partitions).max(1),
            },
            StrategyArg::Lockstep => ReductionStrategy::Lockstep { width: partitions },
        })
    }
}
