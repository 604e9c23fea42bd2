//! Outcomes of column transformations.

use serde::Serialize;

use crate::error::{CoercionError, DataVistaError, Result};
use crate::schema::{Column, DataType};

/// Outcome of a column-wide type change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CoercionResult {
    /// Every cell converted; carries the column as now stored in the table.
    Success(Column),
    /// Conversion refused; 0-based rows that failed, ascending. The table was
    /// not modified.
    Rejected(Vec<usize>),
}

impl CoercionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, CoercionResult::Success(_))
    }

    /// Failing rows, empty on success.
    pub fn rejected_rows(&self) -> &[usize] {
        match self {
            CoercionResult::Success(_) => &[],
            CoercionResult::Rejected(rows) => rows,
        }
    }

    /// Turn a rejection into a [`CoercionError::NonNumeric`].
    pub fn into_result(self, column: &str, target: DataType) -> Result<Column> {
        match self {
            CoercionResult::Success(column) => Ok(column),
            CoercionResult::Rejected(rows) => Err(DataVistaError::Coercion(
                CoercionError::NonNumeric {
                    column: column.to_string(),
                    target,
                    rows,
                },
            )),
        }
    }
}

/// Record of a null replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NullReplacement {
    /// Column affected.
    pub column: String,
    /// Literal written into each null cell.
    pub value: String,
    /// Rows that were null before the replacement.
    pub rows: Vec<usize>,
}

impl NullReplacement {
    /// Number of cells changed.
    pub fn values_changed(&self) -> usize {
        self.rows.len()
    }

    /// Get a human-readable description of the change.
    pub fn description(&self) -> String {
        format!(
            "Null values in '{}' replaced with '{}' ({} cell(s))",
            self.column,
            self.value,
            self.rows.len()
        )
    }
}
