//! CSV parsing module for reading one numeric sample column.
//!
//! # Column Selection
//!
//! With an explicit column name the header is matched case-insensitively
//! after trimming. Without one, the first column whose non-empty cells all
//! parse as numbers (and that has at least one such cell) is used.
//!
//! Empty cells are skipped. `NaN` and `inf` cells parse as the IEEE values
//! and propagate into the statistics.

use crate::error::{CliError, Result};
use csv::{Position, ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Samples read from one CSV column.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericColumn {
    /// Header of the selected column, as written in the file.
    pub name: String,
    /// Parsed samples in file order.
    pub values: Vec<f64>,
    /// Number of empty cells skipped.
    pub skipped: usize,
}

/// Normalize a column header name for matching.
fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

/// Physical line on which the record read from `position` starts.
///
/// The reader reports the offset where it began scanning, which sits before
/// any blank lines it skipped on the way to the record.
fn line_of(raw: &[u8], position: Option<&Position>) -> Option<usize> {
    let start = usize::try_from(position?.byte()).ok()?.min(raw.len());
    let blank = raw[start..]
        .iter()
        .take_while(|&&b| b == b'\n' || b == b'\r')
        .count();
    Some(count_newlines(&raw[..start + blank]) + 1)
}

fn count_newlines(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b == b'\n').count()
}

/// Parse a cell; `None` for an empty cell.
fn parse_cell(value: &str) -> Option<std::result::Result<f64, std::num::ParseFloatError>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.parse::<f64>())
    }
}

/// Read one numeric column from a CSV file.
///
/// # Errors
///
/// Returns `CliError::IoError` if the file cannot be read,
/// `CliError::InvalidArgument` if the named column does not exist, or
/// `CliError::CsvParseError` if the CSV is malformed or holds no usable column.
pub fn read_column<P: AsRef<Path>>(path: P, column: Option<&str>) -> Result<NumericColumn> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| CliError::IoError {
        source: e,
        path: Some(path.display().to_string()),
    })?;
    read_column_from_reader(BufReader::new(file), column)
}

/// Read one numeric column from any reader.
///
/// This is useful for testing or parsing from non-file sources. The input is
/// buffered whole so that parse errors can name their physical line.
///
/// # Errors
///
/// Same as [`read_column`], minus the file-open errors.
pub fn read_column_from_reader<R: Read>(
    mut reader: R,
    column: Option<&str>,
) -> Result<NumericColumn> {
    let mut raw = Vec::new();
    reader.read_to_end(&mut raw)?;

    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(raw.as_slice());

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| CliError::CsvParseError {
            message: e.to_string(),
            line: Some(1),
        })?
        .iter()
        .map(String::from)
        .collect();

    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(CliError::CsvParseError {
            message: "CSV file has no headers".to_string(),
            line: Some(1),
        });
    }

    let records: Vec<StringRecord> = csv_reader
        .records()
        .map(|result| {
            result.map_err(|e| CliError::CsvParseError {
                line: line_of(&raw, e.position()),
                message: e.to_string(),
            })
        })
        .collect::<Result<_>>()?;

    let idx = match column {
        Some(name) => find_named(&headers, name)?,
        None => first_numeric(&headers, &records)?,
    };
    log::debug!(
        "reading column '{}' ({} rows)",
        headers[idx],
        records.len()
    );

    let mut values = Vec::with_capacity(records.len());
    let mut skipped = 0;
    for record in &records {
        match parse_cell(record.get(idx).unwrap_or("")) {
            None => skipped += 1,
            Some(Ok(v)) => values.push(v),
            Some(Err(_)) => {
                return Err(CliError::CsvParseError {
                    message: format!(
                        "cannot parse '{}' as number in column '{}'",
                        record.get(idx).unwrap_or("").trim(),
                        headers[idx]
                    ),
                    line: line_of(&raw, record.position()),
                })
            }
        }
    }
    if skipped > 0 {
        log::info!("skipped {skipped} empty cells in column '{}'", headers[idx]);
    }

    Ok(NumericColumn {
        name: headers[idx].clone(),
        values,
        skipped,
    })
}

fn find_named(headers: &[String], name: &str) -> Result<usize> {
    let wanted = normalize_header(name);
    headers
        .iter()
        .position(|h| normalize_header(h) == wanted)
        .ok_or_else(|| CliError::InvalidArgument {
            argument: "column".to_string(),
            reason: format!("no column named '{name}'"),
            suggestion: Some(format!("Available columns: {}", headers.join(", "))),
        })
}

fn first_numeric(headers: &[String], records: &[StringRecord]) -> Result<usize> {
    (0..headers.len())
        .find(|&idx| {
            let mut cells = records
                .iter()
                .filter_map(|record| parse_cell(record.get(idx).unwrap_or("")))
                .peekable();
            cells.peek().is_some() && cells.all(|cell| cell.is_ok())
        })
        .ok_or_else(|| CliError::CsvParseError {
            message: "no numeric column found".to_string(),
            line: None,
        })
}
