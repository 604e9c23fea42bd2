//! Cell-level conversions used by column coercion.

use chrono::{NaiveDate, NaiveDateTime};

use crate::schema::Value;

/// Timestamp layouts tried, in order, against the first textual cell.
/// The first one that fits is then applied strictly to the whole column.
const TIMESTAMP_FORMATS: &[TimestampFormat] = &[
    TimestampFormat::Date("%Y-%m-%d"),
    TimestampFormat::DateTime("%Y-%m-%d %H:%M:%S%.f"),
    TimestampFormat::DateTime("%Y-%m-%dT%H:%M:%S%.f"),
    TimestampFormat::DateTime("%Y-%m-%d %H:%M"),
    TimestampFormat::DateTime("%Y-%m-%dT%H:%M"),
    TimestampFormat::Date("%Y/%m/%d"),
    TimestampFormat::DateTime("%Y/%m/%d %H:%M:%S"),
    TimestampFormat::Date("%m/%d/%Y"),
    TimestampFormat::DateTime("%m/%d/%Y %H:%M:%S"),
    TimestampFormat::Date("%d.%m.%Y"),
    TimestampFormat::Date("%d %B %Y"),
    TimestampFormat::Date("%B %d, %Y"),
];

/// A single strict timestamp layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// Calendar date; time is midnight.
    Date(&'static str),
    /// Date and time of day.
    DateTime(&'static str),
}

impl TimestampFormat {
    /// Parse with this layout only.
    pub fn parse(&self, text: &str) -> Option<NaiveDateTime> {
        match self {
            TimestampFormat::Date(fmt) => NaiveDate::parse_from_str(text, fmt)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0)),
            TimestampFormat::DateTime(fmt) => NaiveDateTime::parse_from_str(text, fmt).ok(),
        }
    }

    /// The first known layout that parses `text`.
    pub fn detect(text: &str) -> Option<TimestampFormat> {
        TIMESTAMP_FORMATS
            .iter()
            .copied()
            .find(|f| f.parse(text).is_some())
    }
}

/// Integer conversion. `None` means the cell cannot be converted.
///
/// Whole-number floats are accepted; fractional values are failures.
pub fn to_integer(value: &Value) -> Option<Value> {
    match value {
        Value::Null => Some(Value::Null),
        Value::Integer(i) => Some(Value::Integer(*i)),
        Value::Float(f) => whole(*f).map(Value::Integer),
        Value::Boolean(b) => Some(Value::Integer(i64::from(*b))),
        Value::Text(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| parse_float(trimmed).and_then(whole))
                .map(Value::Integer)
        }
        Value::Timestamp(_) => None,
    }
}

/// Floating-point conversion. `None` means the cell cannot be converted.
pub fn to_float(value: &Value) -> Option<Value> {
    match value {
        Value::Null => Some(Value::Null),
        Value::Integer(i) => Some(Value::Float(*i as f64)),
        Value::Float(f) => Some(Value::Float(*f)),
        Value::Boolean(b) => Some(Value::Float(if *b { 1.0 } else { 0.0 })),
        Value::Text(s) => parse_float(s.trim()).map(Value::Float),
        Value::Timestamp(_) => None,
    }
}

/// Boolean conversion; never fails.
///
/// Recognised literals map to their meaning, other text is true unless empty,
/// numbers are true unless zero.
pub fn to_boolean(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Boolean(b) => Value::Boolean(*b),
        Value::Integer(i) => Value::Boolean(*i != 0),
        Value::Float(f) => Value::Boolean(*f != 0.0),
        Value::Timestamp(_) => Value::Boolean(true),
        Value::Text(s) => {
            let lower = s.trim().to_lowercase();
            let b = match lower.as_str() {
                "true" | "t" | "yes" | "y" | "1" => true,
                "false" | "f" | "no" | "n" | "0" | "" => false,
                _ => true,
            };
            Value::Boolean(b)
        }
    }
}

/// Text conversion; never fails. Nulls stay null.
pub fn to_text(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::Text(s) => Value::Text(s.clone()),
        other => Value::Text(other.to_string()),
    }
}

fn parse_float(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|f| !f.is_nan())
}

fn whole(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
