//! Error types for the DataVista library.

use std::path::PathBuf;
use thiserror::Error;

use crate::schema::DataType;

/// Main error type for DataVista operations.
#[derive(Debug, Error)]
pub enum DataVistaError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error from the spreadsheet reader.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// The source could not be turned into a table.
    #[error("Ingestion error: {0}")]
    Ingestion(String),

    /// The table has no rows.
    #[error("Empty table: {0}")]
    EmptyTable(String),

    /// Columns of unequal length, duplicate names and similar shape problems.
    #[error("Invalid table: {0}")]
    InvalidTable(String),

    /// No column with the requested name.
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    /// A column could not be converted to the requested type.
    #[error(transparent)]
    Coercion(#[from] CoercionError),

    /// Rejected user input, such as an empty replacement value.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Error from the PDF library while building a report.
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Report composer misuse.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a column-wide type change was refused.
///
/// Numeric targets report every failing row, timestamp targets stop at the
/// first value that does not parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    #[error("Cannot convert '{column}' to {target}. Non-numeric values found at rows: {rows:?}")]
    NonNumeric {
        column: String,
        target: DataType,
        rows: Vec<usize>,
    },

    #[error("Error converting '{column}' to timestamp: unparseable value '{value}' at row {row}")]
    InvalidTimestamp {
        column: String,
        row: usize,
        value: String,
    },
}

impl CoercionError {
    /// Row indices (0-based) that caused the rejection.
    pub fn rows(&self) -> Vec<usize> {
        match self {
            CoercionError::NonNumeric { rows, .. } => rows.clone(),
            CoercionError::InvalidTimestamp { row, .. } => vec![*row],
        }
    }
}

/// Out-of-order calls on a report composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("report header has already been written")]
    HeaderAlreadyWritten,

    #[error("report header must be written before body rows")]
    HeaderNotWritten,

    #[error("report has been finalized")]
    Finalized,
}

/// Result type alias for DataVista operations.
pub type Result<T> = std::result::Result<T, DataVistaError>;
