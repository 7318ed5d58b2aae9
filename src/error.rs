//! Typed errors for loading, schema binding, and numeric parsing.

use std::io;

use thiserror::Error;

/// Failure to read a dataset file into records.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("dataset is not valid UTF-8 near line {line}")]
    Decode { line: u64 },
    #[error("dataset has no header row")]
    Empty,
    #[error("malformed delimited data: {0}")]
    Csv(#[source] csv::Error),
}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        if let csv::ErrorKind::Utf8 { pos, .. } = err.kind() {
            return LoadError::Decode {
                line: pos.as_ref().map_or(0, |p| p.line()),
            };
        }
        LoadError::Csv(err)
    }
}

/// The header of a dataset does not match the columns a profile expects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("column position {position} is outside a header of width {width}")]
    PositionOutOfRange { position: isize, width: usize },
    #[error("expected column '{expected}' at index {index}, found '{found}'")]
    ColumnMismatch {
        index: usize,
        expected: String,
        found: String,
    },
    #[error("profile has no column bound for role '{0}'")]
    UnboundRole(String),
}

/// A field expected to hold a number could not be converted.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot parse '{value}' in column '{column}' as a number")]
pub struct ParseError {
    pub column: String,
    pub value: String,
}

/// Umbrella error for a full analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("settings error: {0}")]
    Settings(String),
}
