//! Column coercion and null remediation on a table.

use crate::error::{CoercionError, DataVistaError, Result};
use crate::schema::{Column, DataType, Table, Value, infer_type};

use super::coerce::{TimestampFormat, to_boolean, to_float, to_integer, to_text};
use super::operations::{CoercionResult, NullReplacement};

/// Engine for applying column transformations to a table.
///
/// Every operation either succeeds in full or leaves the table untouched.
pub struct TransformEngine;

impl TransformEngine {
    /// Create a new transform engine.
    pub fn new() -> Self {
        Self
    }

    /// Change the type of a whole column.
    ///
    /// Numeric targets collect every failing row and return
    /// [`CoercionResult::Rejected`]. The timestamp target stops at the first
    /// unparseable cell and returns [`CoercionError::InvalidTimestamp`].
    /// Boolean and text targets always succeed. Null cells stay null.
    pub fn coerce(
        &self,
        table: &mut Table,
        column: &str,
        target: DataType,
    ) -> Result<CoercionResult> {
        let source = table.require_column(column)?;

        let converted = match target {
            DataType::Integer => convert_all(source, to_integer),
            DataType::Float => convert_all(source, to_float),
            DataType::Timestamp => Ok(convert_timestamps(source)?),
            DataType::Boolean => Ok(source.values.iter().map(to_boolean).collect()),
            DataType::Text => Ok(source.values.iter().map(to_text).collect()),
            DataType::Unresolved => {
                return Err(DataVistaError::Validation(
                    "'unresolved' is not a coercion target".to_string(),
                ));
            }
        };

        let values = match converted {
            Ok(values) => values,
            Err(rows) => {
                tracing::warn!(
                    column,
                    target = %target,
                    failures = rows.len(),
                    "Coercion rejected"
                );
                return Ok(CoercionResult::Rejected(rows));
            }
        };

        let stored = table.column_mut(column)?;
        stored.values = values;
        stored.data_type = target;

        tracing::info!(column, target = %target, "Coerced column");

        Ok(CoercionResult::Success(stored.clone()))
    }

    /// Ascending row indices of null cells in a column.
    pub fn find_nulls(&self, table: &Table, column: &str) -> Result<Vec<usize>> {
        Ok(table.require_column(column)?.null_rows())
    }

    /// Write `value` into every null cell of a column.
    ///
    /// The literal is stored as text without conversion to the column's type,
    /// and the type tag is re-derived from the resulting cells. An empty
    /// literal is rejected and nothing is changed.
    pub fn replace_nulls(
        &self,
        table: &mut Table,
        column: &str,
        value: &str,
    ) -> Result<NullReplacement> {
        if value.is_empty() {
            return Err(DataVistaError::Validation(
                "Please enter a valid replacement value".to_string(),
            ));
        }

        let stored = table.column_mut(column)?;
        let rows = stored.null_rows();

        for &row in &rows {
            stored.values[row] = Value::text(value);
        }
        if !rows.is_empty() {
            stored.data_type = infer_type(&stored.values);
        }

        tracing::info!(column, replaced = rows.len(), "Replaced null values");

        Ok(NullReplacement {
            column: column.to_string(),
            value: value.to_string(),
            rows,
        })
    }
}

impl Default for TransformEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert every cell, gathering all failing rows.
fn convert_all(
    column: &Column,
    convert: fn(&Value) -> Option<Value>,
) -> std::result::Result<Vec<Value>, Vec<usize>> {
    let mut values = Vec::with_capacity(column.len());
    let mut failures = Vec::new();

    for (row, value) in column.values.iter().enumerate() {
        match convert(value) {
            Some(converted) => values.push(converted),
            None => failures.push(row),
        }
    }

    if failures.is_empty() {
        Ok(values)
    } else {
        Err(failures)
    }
}

/// Convert every cell to a timestamp with one layout, failing on the first
/// cell that does not fit.
fn convert_timestamps(column: &Column) -> std::result::Result<Vec<Value>, CoercionError> {
    let mut format: Option<TimestampFormat> = None;
    let mut values = Vec::with_capacity(column.len());

    for (row, value) in column.values.iter().enumerate() {
        let converted = match value {
            Value::Null => Value::Null,
            Value::Timestamp(ts) => Value::Timestamp(*ts),
            other => {
                let text = other.to_string();
                let text = text.trim();
                let layout = match format {
                    Some(layout) => Some(layout),
                    None => TimestampFormat::detect(text),
                };
                match layout.and_then(|l| l.parse(text).map(|ts| (l, ts))) {
                    Some((layout, ts)) => {
                        format = Some(layout);
                        Value::Timestamp(ts)
                    }
                    None => {
                        return Err(CoercionError::InvalidTimestamp {
                            column: column.name.clone(),
                            row,
                            value: other.to_string(),
                        });
                    }
                }
            }
        };
        values.push(converted);
    }

    Ok(values)
}
