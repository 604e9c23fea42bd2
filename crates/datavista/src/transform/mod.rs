//! Type coercion and null remediation.

mod coerce;
mod engine;
mod operations;

pub use coerce::TimestampFormat;
pub use engine::TransformEngine;
pub use operations::{CoercionResult, NullReplacement};
