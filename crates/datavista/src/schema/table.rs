//! In-memory tabular dataset.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{DataVistaError, Result};

use super::column::Column;
use super::value::Value;

/// An ordered set of equally long, uniquely named columns.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create a table, checking that names are unique and lengths agree.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(DataVistaError::InvalidTable(format!(
                    "Duplicate column name '{}'",
                    column.name
                )));
            }
        }

        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
                return Err(DataVistaError::InvalidTable(format!(
                    "Column '{}' has {} rows, expected {}",
                    bad.name,
                    bad.len(),
                    expected
                )));
            }
        }

        Ok(Self { columns })
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// All columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Get all column names.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get a column by name, or a `ColumnNotFound` error.
    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| DataVistaError::ColumnNotFound(name.to_string()))
    }

    /// Mutable access for in-crate transforms. Length is the caller's invariant.
    pub(crate) fn column_mut(&mut self, name: &str) -> Result<&mut Column> {
        self.columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| DataVistaError::ColumnNotFound(name.to_string()))
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, column: usize) -> Option<&Value> {
        self.columns.get(column).and_then(|c| c.get(row))
    }

    /// A new table with only the given rows, in the given order.
    /// Indices past the end are skipped.
    pub fn select_rows(&self, rows: &[usize]) -> Table {
        let row_count = self.row_count();
        let columns = self
            .columns
            .iter()
            .map(|c| {
                let values = rows
                    .iter()
                    .filter(|&&r| r < row_count)
                    .map(|&r| c.values[r].clone())
                    .collect();
                Column::new(c.name.clone(), c.data_type, values)
            })
            .collect();
        Table { columns }
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Table {
        let end = n.min(self.row_count());
        self.select_rows(&(0..end).collect::<Vec<_>>())
    }

    /// The last `n` rows.
    pub fn tail(&self, n: usize) -> Table {
        let total = self.row_count();
        let start = total.saturating_sub(n);
        self.select_rows(&(start..total).collect::<Vec<_>>())
    }
}
