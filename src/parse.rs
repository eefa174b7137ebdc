/*! Reading task sets from delimited text.

The input format has one task per line with three numeric fields, in
this order: execution time, period, deadline. Fields are separated by a
configurable delimiter (a comma by default) and may be surrounded by
whitespace. Blank lines and lines starting with `#` are skipped.

Values are decimal numbers; they are rounded to the configured number of
fractional digits and then held exactly. Zero values are accepted here
and rejected later, during validation of the task set.
*/

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::rational::Rational;
use crate::task::{Field, TaskSet};

/// Error type returned when a task file cannot be read.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot read task file: {0}")]
    Io(#[from] std::io::Error),

    /// A line does not contain exactly three fields.
    #[error("line {line}: expected 3 fields, found {found}")]
    FieldCount { line: usize, found: usize },

    /// A field is not a number.
    #[error("line {line}: {field} {text:?} is not a number")]
    InvalidNumber {
        line: usize,
        field: Field,
        text: String,
    },

    /// A field is a number, but not a usable time value.
    #[error("line {line}: {field} {text:?} must be a finite, non-negative value")]
    InvalidValue {
        line: usize,
        field: Field,
        text: String,
    },

    #[error("unsupported precision of {0} fractional digits")]
    Precision(u32),
}

/// Input format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub delimiter: char,
    /// Number of significant fractional digits.
    pub precision: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            delimiter: ',',
            precision: 3,
        }
    }
}

const FIELDS: [Field; 3] = [Field::ExecutionTime, Field::Period, Field::Deadline];

/// Parse a complete task set. Either every line parses, or an error
/// naming the first bad line is returned.
pub fn parse_task_set(input: &str, options: &ParseOptions) -> Result<TaskSet, ParseError> {
    let scale = 10u64
        .checked_pow(options.precision)
        .ok_or(ParseError::Precision(options.precision))?;
    let mut tasks = TaskSet::new();
    for (lineno, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let [e, p, d] = parse_line(lineno + 1, line, options.delimiter, scale)?;
        tasks.push(e, p, d);
    }
    Ok(tasks)
}

/// Read and parse a task file.
pub fn read_task_set<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<TaskSet, ParseError> {
    let input = fs::read_to_string(path)?;
    parse_task_set(&input, options)
}

fn parse_line(line: usize, text: &str, delimiter: char, scale: u64) -> Result<[Rational; 3], ParseError> {
    let fields: Vec<&str> = text.split(delimiter).map(str::trim).collect();
    if fields.len() != FIELDS.len() {
        return Err(ParseError::FieldCount {
            line,
            found: fields.len(),
        });
    }
    let mut values = [Rational::ZERO; 3];
    for ((value, field), text) in values.iter_mut().zip(FIELDS).zip(fields) {
        let x: f64 = text.parse().map_err(|_| ParseError::InvalidNumber {
            line,
            field,
            text: text.to_string(),
        })?;
        *value = Rational::approximate(x, scale).ok_or_else(|| ParseError::InvalidValue {
            line,
            field,
            text: text.to_string(),
        })?;
    }
    Ok(values)
}
