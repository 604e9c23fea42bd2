//! DataVista: profiling, type coercion and reporting for tabular datasets.
//!
//! Load a CSV or spreadsheet into a [`Table`], look at per-column statistics,
//! change column types with all-or-nothing validation, fill missing values,
//! and export a PDF summary or the updated data as CSV.
//!
//! # Core Principles
//!
//! - **All or nothing**: a failed coercion or replacement leaves the table untouched
//! - **Explicit state**: operations take the table they act on; nothing is global
//! - **Deterministic output**: reports depend only on their inputs and the injected time
//!
//! # Example
//!
//! ```no_run
//! use chrono::Utc;
//! use datavista::{DataType, DataVista};
//!
//! let vista = DataVista::new();
//! let (mut table, source) = vista.load_file("sales.csv").unwrap();
//!
//! let outcome = vista.coerce(&mut table, "price", DataType::Float).unwrap();
//! println!("Rejected rows: {:?}", outcome.rejected_rows());
//!
//! let profile = vista.profile(&table).unwrap();
//! let report = vista
//!     .render_report(&profile, source.row_count, source.column_count, Utc::now())
//!     .unwrap();
//! std::fs::write(report.file_name(), report.bytes()).unwrap();
//! ```

pub mod error;
pub mod input;
pub mod output;
pub mod profile;
pub mod report;
pub mod schema;
pub mod transform;

mod datavista;

pub use crate::datavista::{DataVista, DataVistaConfig};
pub use error::{CoercionError, DataVistaError, ReportError, Result};
pub use input::{Parser, ParserConfig, SourceFormat, SourceMetadata};
pub use output::ExportDocument;
pub use profile::{ColumnProfile, Profile, ProfileConfig, Profiler};
pub use report::{ComposerState, ReportComposer, ReportConfig, ReportDocument};
pub use schema::{Column, DataType, Table, Value};
pub use transform::{CoercionResult, NullReplacement, TransformEngine};
