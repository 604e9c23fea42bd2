//! Input parsing and data source handling.

mod parser;
mod source;

pub use parser::{DEFAULT_NA_VALUES, Parser, ParserConfig};
pub use source::{SourceFormat, SourceMetadata};
