//! CSV output module for writing reduction results.
//!
//! # Output Format
//!
//! One header row `column,count,mean,m2,result` followed by one row per
//! reduced column. `NaN` values (an undefined mean or statistic) are written
//! as empty cells.

use crate::error::{CliError, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Header of the stats output.
pub const STATS_HEADER: [&str; 5] = ["column", "count", "mean", "m2", "result"];

/// Output destination: either stdout or a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDest {
    /// Write to stdout.
    Stdout,
    /// Write to a file at the given path.
    File(String),
}

impl OutputDest {
    /// Stdout when `path` is `None`, otherwise the named file.
    #[must_use]
    pub fn from_option(path: Option<&str>) -> Self {
        path.map_or(OutputDest::Stdout, |p| OutputDest::File(p.to_string()))
    }

    /// Create a writer for this output destination.
    ///
    /// # Errors
    ///
    /// Returns `CliError::IoError` if the output file cannot be created.
    pub fn writer(&self) -> Result<Box<dyn Write>> {
        match self {
            OutputDest::Stdout => Ok(Box::new(io::stdout())),
            OutputDest::File(path) => {
                let file = File::create(path).map_err(|e| CliError::IoError {
                    source: e,
                    path: Some(path.clone()),
                })?;
                Ok(Box::new(BufWriter::new(file)))
            }
        }
    }
}

/// One output row.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsRow {
    /// Column the samples came from.
    pub column: String,
    /// Number of samples reduced.
    pub count: u64,
    /// Mean (`NaN` for no samples).
    pub mean: f64,
    /// Sum of squared deviations from the mean.
    pub m2: f64,
    /// Projected variance or standard deviation (`NaN` when undefined).
    pub result: f64,
}

/// Format a value for a CSV cell; `NaN` becomes an empty cell.
#[must_use]
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

/// Write stats rows with a header to any writer.
///
/// # Errors
///
/// Returns `CliError::IoError` or `CliError::CsvParseError` if writing fails.
pub fn write_stats_to<W: Write>(rows: &[StatsRow], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(STATS_HEADER)?;
    for row in rows {
        csv_writer.write_record([
            row.column.clone(),
            row.count.to_string(),
            format_value(row.mean),
            format_value(row.m2),
            format_value(row.result),
        ])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write stats rows to `dest`.
///
/// # Errors
///
/// Returns `CliError::IoError` if the destination cannot be opened or written.
pub fn write_stats(rows: &[StatsRow], dest: &OutputDest) -> Result<()> {
    write_stats_to(rows, dest.writer()?)
}
