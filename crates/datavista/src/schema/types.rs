//! Core type definitions for schema representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DataVistaError;

/// Declared data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// Text/string values.
    Text,
    /// Whole numbers.
    Integer,
    /// Floating-point numbers.
    Float,
    /// Boolean values (true/false).
    Boolean,
    /// Calendar date and time values.
    Timestamp,
    /// Mixed or undetermined content.
    #[default]
    Unresolved,
}

impl DataType {
    /// Types a column can be coerced to.
    pub const TARGETS: [DataType; 5] = [
        DataType::Text,
        DataType::Integer,
        DataType::Float,
        DataType::Boolean,
        DataType::Timestamp,
    ];

    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Integer | DataType::Float)
    }

    /// Short lowercase name used in reports and messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Text => "text",
            DataType::Integer => "integer",
            DataType::Float => "float",
            DataType::Boolean => "boolean",
            DataType::Timestamp => "timestamp",
            DataType::Unresolved => "unresolved",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = DataVistaError;

    /// Accepts the short names plus the dtype aliases users tend to type
    /// (`object`, `int64`, `float64`, `bool`, `datetime64[ns]`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "string" | "str" | "object" => Ok(DataType::Text),
            "integer" | "int" | "int64" => Ok(DataType::Integer),
            "float" | "floating-point" | "double" | "float64" => Ok(DataType::Float),
            "boolean" | "bool" => Ok(DataType::Boolean),
            "timestamp" | "datetime" | "date" | "datetime64[ns]" => Ok(DataType::Timestamp),
            "unresolved" | "mixed" => Ok(DataType::Unresolved),
            other => Err(DataVistaError::Validation(format!(
                "Unknown data type '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("int64".parse::<DataType>().unwrap(), DataType::Integer);
        assert_eq!("floating-point".parse::<DataType>().unwrap(), DataType::Float);
        assert_eq!("datetime64[ns]".parse::<DataType>().unwrap(), DataType::Timestamp);
        assert_eq!("Object".parse::<DataType>().unwrap(), DataType::Text);
        assert!("complex".parse::<DataType>().is_err());
    }

    #[test]
    fn test_targets_exclude_unresolved() {
        assert!(!DataType::TARGETS.contains(&DataType::Unresolved));
        assert!(DataType::Float.is_numeric());
        assert!(!DataType::Boolean.is_numeric());
    }
}
