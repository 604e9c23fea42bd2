//! Table, column and value types.

mod column;
mod table;
mod types;
mod value;

pub use column::{Column, infer_type};
pub use table::Table;
pub use types::DataType;
pub use value::Value;
