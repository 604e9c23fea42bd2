//! Export of transformed tables.

mod delimited;

pub use delimited::{ExportDocument, export, write_csv};
