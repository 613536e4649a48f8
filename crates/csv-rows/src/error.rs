//! Error types for dataset loading and record validation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a dataset or unpacking a record.
#[derive(Error, Debug)]
pub enum CsvRowsError {
    /// The dataset file could not be opened.
    #[error("Failed to open dataset '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dataset could not be read.
    #[error("Failed to read dataset: {0}")]
    Read(#[source] std::io::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The dataset has no header line.
    #[error("Dataset is empty: no header row")]
    MissingHeader,

    /// A row does not unpack into the fixed schema.
    #[error("Row at line {line} has {found} fields, expected {expected}")]
    FieldCount {
        line: u64,
        expected: usize,
        found: usize,
    },
}
