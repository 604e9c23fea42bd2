//! Cell values.

use std::fmt;

use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;

use super::types::DataType;

/// A single cell. `Null` is the explicit missing-value marker.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Timestamp(NaiveDateTime),
    Text(String),
}

/// Hashable identity of a non-null value, used for distinct/duplicate counts.
///
/// Integral floats share the key of the equal integer so `1` and `1.0`
/// count as the same value in mixed columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ValueKey<'a> {
    Boolean(bool),
    Integer(i64),
    Float(u64),
    Timestamp(NaiveDateTime),
    Text(&'a str),
}

impl Value {
    /// Create a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    /// Check if this is the null marker.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The type this value belongs to, or `None` for null.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Boolean(_) => Some(DataType::Boolean),
            Value::Integer(_) => Some(DataType::Integer),
            Value::Float(_) => Some(DataType::Float),
            Value::Timestamp(_) => Some(DataType::Timestamp),
            Value::Text(_) => Some(DataType::Text),
        }
    }

    pub(crate) fn key(&self) -> Option<ValueKey<'_>> {
        match self {
            Value::Null => None,
            Value::Boolean(b) => Some(ValueKey::Boolean(*b)),
            Value::Integer(i) => Some(ValueKey::Integer(*i)),
            Value::Float(f) => Some(float_key(*f)),
            Value::Timestamp(ts) => Some(ValueKey::Timestamp(*ts)),
            Value::Text(s) => Some(ValueKey::Text(s.as_str())),
        }
    }
}

fn float_key(f: f64) -> ValueKey<'static> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        ValueKey::Integer(f as i64)
    } else if f.is_nan() {
        ValueKey::Float(f64::NAN.to_bits())
    } else {
        ValueKey::Float(f.to_bits())
    }
}

impl fmt::Display for Value {
    /// Textual representation used for export, reports and text coercion.
    /// Null renders as an empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => {
                // Keep a trailing ".0" so integral floats re-import as floats.
                if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 {
                    write!(f, "{:.1}", x)
                } else {
                    write!(f, "{}", x)
                }
            }
            Value::Timestamp(ts) => {
                if ts.time().num_seconds_from_midnight() == 0 && ts.time().nanosecond() == 0 {
                    write!(f, "{}", ts.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%.f"))
                }
            }
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::Timestamp(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
