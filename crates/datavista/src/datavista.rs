//! Main DataVista struct and public API.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::{Parser, ParserConfig, SourceFormat, SourceMetadata};
use crate::output::{ExportDocument, export};
use crate::profile::{Profile, ProfileConfig, Profiler};
use crate::report::{ReportComposer, ReportConfig, ReportDocument};
use crate::schema::{DataType, Table};
use crate::transform::{CoercionResult, NullReplacement, TransformEngine};

/// Configuration for all DataVista operations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DataVistaConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Profiling configuration.
    pub profile: ProfileConfig,
    /// Report layout.
    pub report: ReportConfig,
}

impl DataVistaConfig {
    /// Load configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Entry point for loading, profiling, transforming and reporting on tables.
///
/// Holds no table state: every operation takes the table it works on, and
/// each call either completes or leaves the table as it was.
pub struct DataVista {
    config: DataVistaConfig,
    parser: Parser,
    profiler: Profiler,
    engine: TransformEngine,
}

impl DataVista {
    /// Create a new instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(DataVistaConfig::default())
    }

    /// Create an instance with custom configuration.
    pub fn with_config(config: DataVistaConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        let profiler = Profiler::with_config(config.profile.clone());

        Self {
            config,
            parser,
            profiler,
            engine: TransformEngine::new(),
        }
    }

    pub fn config(&self) -> &DataVistaConfig {
        &self.config
    }

    /// Load a table from in-memory bytes.
    pub fn load_bytes(&self, bytes: &[u8], format: SourceFormat) -> Result<Table> {
        let table = self.parser.parse_bytes(bytes, format)?;
        tracing::info!(
            format = %format,
            rows = table.row_count(),
            columns = table.column_count(),
            "Loaded table"
        );
        Ok(table)
    }

    /// Load a table from a file; the format follows the file extension.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<(Table, SourceMetadata)> {
        let (table, source) = self.parser.parse_file(path)?;
        tracing::info!(
            file = %source.file,
            size_kb = source.size_kb(),
            rows = source.row_count,
            columns = source.column_count,
            "Loaded table"
        );
        Ok((table, source))
    }

    /// Compute per-column statistics.
    pub fn profile(&self, table: &Table) -> Result<Profile> {
        self.profiler.profile(table)
    }

    /// Change a column's type; see [`TransformEngine::coerce`].
    pub fn coerce(
        &self,
        table: &mut Table,
        column: &str,
        target: DataType,
    ) -> Result<CoercionResult> {
        self.engine.coerce(table, column, target)
    }

    /// Rows whose cell in `column` is null.
    pub fn find_nulls(&self, table: &Table, column: &str) -> Result<Vec<usize>> {
        self.engine.find_nulls(table, column)
    }

    /// Full rows whose cell in `column` is null.
    pub fn null_rows(&self, table: &Table, column: &str) -> Result<Table> {
        let rows = self.engine.find_nulls(table, column)?;
        Ok(table.select_rows(&rows))
    }

    /// Fill the null cells of a column with a literal.
    pub fn replace_nulls(
        &self,
        table: &mut Table,
        column: &str,
        value: &str,
    ) -> Result<NullReplacement> {
        self.engine.replace_nulls(table, column, value)
    }

    /// Render a profile as a PDF report stamped with `generated_at`.
    pub fn render_report(
        &self,
        profile: &Profile,
        row_count: usize,
        column_count: usize,
        generated_at: DateTime<Utc>,
    ) -> Result<ReportDocument> {
        ReportComposer::render(
            self.config.report.clone(),
            profile,
            row_count,
            column_count,
            generated_at,
        )
    }

    /// Serialize a table to CSV.
    pub fn export_csv(&self, table: &Table) -> Result<ExportDocument> {
        export(table)
    }
}

impl Default for DataVista {
    fn default() -> Self {
        Self::new()
    }
}
