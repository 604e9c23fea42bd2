//! A named, typed column of cells.

use serde::Serialize;

use super::types::DataType;
use super::value::Value;

/// A single column of a [`Table`](super::Table).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    /// Column name, unique within its table.
    pub name: String,
    /// Declared type tag.
    pub data_type: DataType,
    /// Cells in row order.
    pub values: Vec<Value>,
}

impl Column {
    /// Create a column with an explicit type tag.
    pub fn new(name: impl Into<String>, data_type: DataType, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            data_type,
            values,
        }
    }

    /// Create a column and derive its type tag from the values.
    pub fn inferred(name: impl Into<String>, values: Vec<Value>) -> Self {
        let data_type = infer_type(&values);
        Self::new(name, data_type, values)
    }

    /// Number of cells, nulls included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get a cell by row index.
    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row)
    }

    /// Number of null cells.
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Ascending row indices of null cells.
    pub fn null_rows(&self) -> Vec<usize> {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_null())
            .map(|(i, _)| i)
            .collect()
    }
}

/// Derive a type tag from typed cells.
///
/// A single non-null type wins. Integers mixed with floats widen to float.
/// Any other mix, or a column of nulls only, is unresolved.
pub fn infer_type(values: &[Value]) -> DataType {
    let mut found: Option<DataType> = None;

    for value_type in values.iter().filter_map(Value::data_type) {
        found = match (found, value_type) {
            (None, t) => Some(t),
            (Some(a), b) if a == b => Some(a),
            (Some(DataType::Integer), DataType::Float) | (Some(DataType::Float), DataType::Integer) => {
                Some(DataType::Float)
            }
            _ => return DataType::Unresolved,
        };
    }

    found.unwrap_or(DataType::Unresolved)
}
