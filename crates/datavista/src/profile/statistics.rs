//! Per-column profile statistics.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::{DataVistaError, Result};
use crate::schema::{Column, DataType, Table};

/// Profiling options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Count a null that follows an earlier null as a duplicate.
    /// Off by default: nulls never take part in duplicate pairs.
    pub count_null_duplicates: bool,
}

/// Profile row for a single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Column name.
    pub name: String,
    /// Number of distinct non-null values.
    pub unique_count: usize,
    /// Number of non-null values.
    pub total_count: usize,
    /// Number of values equal to a value at an earlier position.
    pub duplicate_count: usize,
    /// Number of null values.
    pub null_count: usize,
    /// Declared type tag at profiling time.
    pub data_type: DataType,
}

impl ColumnProfile {
    /// Grid headings, in field order.
    pub const HEADERS: [&'static str; 6] = [
        "Column Name",
        "Uniques Count",
        "Total Count",
        "Duplicates",
        "Nulls",
        "Data Type",
    ];

    /// The six display cells, in [`HEADERS`](Self::HEADERS) order.
    pub fn cells(&self) -> [String; 6] {
        [
            self.name.clone(),
            self.unique_count.to_string(),
            self.total_count.to_string(),
            self.duplicate_count.to_string(),
            self.null_count.to_string(),
            self.data_type.to_string(),
        ]
    }
}

/// Read-only statistics snapshot of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// One entry per column, in table order.
    pub columns: Vec<ColumnProfile>,
    /// Rows in the profiled table.
    pub row_count: usize,
    /// Columns in the profiled table.
    pub column_count: usize,
}

impl Profile {
    /// Get a column profile by name.
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Computes [`Profile`]s.
#[derive(Debug, Clone, Default)]
pub struct Profiler {
    config: ProfileConfig,
}

impl Profiler {
    /// Create a profiler with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a profiler with custom configuration.
    pub fn with_config(config: ProfileConfig) -> Self {
        Self { config }
    }

    /// Profile every column of a non-empty table, in column order.
    pub fn profile(&self, table: &Table) -> Result<Profile> {
        if table.is_empty() {
            return Err(DataVistaError::EmptyTable(
                "Cannot profile a table with no rows".to_string(),
            ));
        }

        let columns: Vec<ColumnProfile> = table
            .columns()
            .iter()
            .map(|c| self.profile_column(c))
            .collect();

        tracing::debug!(
            rows = table.row_count(),
            columns = columns.len(),
            "Profiled table"
        );

        Ok(Profile {
            columns,
            row_count: table.row_count(),
            column_count: table.column_count(),
        })
    }

    /// Profile a single column.
    pub fn profile_column(&self, column: &Column) -> ColumnProfile {
        let mut distinct = IndexSet::new();
        let mut null_count = 0;

        for value in &column.values {
            match value.key() {
                Some(key) => {
                    distinct.insert(key);
                }
                None => null_count += 1,
            }
        }

        let total_count = column.len() - null_count;
        let unique_count = distinct.len();
        let mut duplicate_count = total_count - unique_count;
        if self.config.count_null_duplicates {
            duplicate_count += null_count.saturating_sub(1);
        }

        ColumnProfile {
            name: column.name.clone(),
            unique_count,
            total_count,
            duplicate_count,
            null_count,
            data_type: column.data_type,
        }
    }
}
