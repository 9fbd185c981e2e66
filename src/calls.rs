//! Call file parser.
//!
//! A call file lists one patient's observed alleles, one position per line.
//! Position and allele may be separated by `=`, `:`, a tab or spaces.
//! Blank lines and `#` comments are skipped.
//!
//! ## Format
//!
//! ```text
//! # patient 0042
//! 282	T
//! 590=A
//! ```
//!
//! Positions that are not listed are read as wild type (`.`).

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::allele::{AlleleError, CallSet, ObservedAlleles, Position};

/// Errors that can occur while reading a call file.
#[derive(Error, Debug)]
pub enum CallsError {
    #[error("Failed to read call file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid call at line {line}: {source}")]
    InvalidCall { line: usize, source: AlleleError },

    #[error("Position {position} listed twice (line {line})")]
    DuplicatePosition { line: usize, position: Position },
}

/// Result type for call file operations.
pub type CallsResult<T> = Result<T, CallsError>;

/// Reads observed calls from a file.
///
/// # Examples
///
/// ```no_run
/// use nat2dose::calls::parse_calls_file;
///
/// let observed = parse_calls_file("patient.calls").unwrap();
/// println!("{}", observed);
/// ```
pub fn parse_calls_file<P: AsRef<Path>>(path: P) -> CallsResult<ObservedAlleles> {
    let file = File::open(path)?;
    parse_calls(BufReader::new(file))
}

/// Reads observed calls from any buffered reader.
pub fn parse_calls<R: BufRead>(reader: R) -> CallsResult<ObservedAlleles> {
    let mut calls = CallSet::default();

    for (index, line_result) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line_result?;
        let line = match line.split_once('#') {
            Some((content, _)) => content,
            None => line.as_str(),
        }
        .trim();

        if line.is_empty() {
            continue;
        }

        let call = normalize_separator(line);
        let parsed = ObservedAlleles::parse_call(&call).map_err(|source| CallsError::InvalidCall {
            line: line_number,
            source,
        })?;

        match parsed {
            Some((position, allele)) => {
                calls
                    .insert(position, allele)
                    .map_err(|_| CallsError::DuplicatePosition {
                        line: line_number,
                        position,
                    })?;
            }
            None => {
                tracing::warn!(line = line_number, call = line, "ignoring call outside NAT2 marker positions");
            }
        }
    }

    Ok(calls.observed)
}

/// Reads observed calls from a string.
pub fn parse_calls_str(content: &str) -> CallsResult<ObservedAlleles> {
    parse_calls(content.as_bytes())
}

fn is_separator(c: char) -> bool {
    c == '=' || c == ':'
}

/// Rewrites `282 T` / `282\tT` as `282=T`; other lines pass through.
fn normalize_separator(line: &str) -> String {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match fields.as_slice() {
        [position, allele] if !position.ends_with(is_separator) && !allele.starts_with(is_separator) => {
            format!("{}={}", position, allele)
        }
        _ => fields.concat(),
    }
}
