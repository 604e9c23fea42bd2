//! CSV and spreadsheet loading into a [`Table`].

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{DataVistaError, Result};
use crate::schema::{Column, DataType, Table, Value};

use super::source::{SourceFormat, SourceMetadata};

/// Tokens read as missing values.
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Parser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Field delimiter for CSV sources.
    pub delimiter: u8,
    /// Quote character for CSV sources.
    pub quote: u8,
    /// Cell contents that mean "missing". Compared exactly.
    pub na_values: Vec<String>,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Worksheet to read (None = first sheet).
    pub sheet: Option<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            na_values: DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect(),
            max_rows: None,
            sheet: None,
        }
    }
}

/// Parses tabular data files.
pub struct Parser {
    config: ParserConfig,
    na_values: HashSet<String>,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        let na_values = config.na_values.iter().cloned().collect();
        Self { config, na_values }
    }

    /// Parse a file and return the table and metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Table, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| DataVistaError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| DataVistaError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let format = SourceFormat::from_path(path);
        let table = self.parse_bytes(&contents, format)?;

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            contents.len() as u64,
            format,
            table.row_count(),
            table.column_count(),
        );

        Ok((table, metadata))
    }

    /// Parse an in-memory source of the given format.
    pub fn parse_bytes(&self, bytes: &[u8], format: SourceFormat) -> Result<Table> {
        let (headers, rows) = match format {
            SourceFormat::Csv => self.read_csv(bytes)?,
            SourceFormat::Spreadsheet => self.read_spreadsheet(bytes)?,
        };

        let headers = dedupe_headers(headers);

        if rows.is_empty() {
            return Err(DataVistaError::EmptyTable(
                "Uploaded file has no data rows".to_string(),
            ));
        }

        let table = build_table(headers, rows)?;

        tracing::debug!(
            format = %format,
            rows = table.row_count(),
            columns = table.column_count(),
            "Parsed tabular source"
        );

        Ok(table)
    }

    fn read_csv(&self, bytes: &[u8]) -> Result<(Vec<String>, Vec<Vec<Value>>)> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .quote(self.config.quote)
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
        if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
            return Err(DataVistaError::EmptyTable("No columns found".to_string()));
        }

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if self.config.max_rows.is_some_and(|max| row_idx >= max) {
                break;
            }

            let record = result?;
            let row = record
                .iter()
                .map(|cell| {
                    if self.na_values.contains(cell) {
                        Value::Null
                    } else {
                        Value::text(cell)
                    }
                })
                .collect();
            rows.push(row);
        }

        Ok((headers, rows))
    }

    fn read_spreadsheet(&self, bytes: &[u8]) -> Result<(Vec<String>, Vec<Vec<Value>>)> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

        let sheet_name = match &self.config.sheet {
            Some(name) => name.clone(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| DataVistaError::Ingestion("Workbook has no worksheets".to_string()))?,
        };

        let range = workbook.worksheet_range(&sheet_name)?;
        let mut rows_iter = range.rows();

        let headers: Vec<String> = rows_iter
            .next()
            .map(|row| row.iter().map(header_text).collect())
            .unwrap_or_default();
        if headers.is_empty() {
            return Err(DataVistaError::EmptyTable("No columns found".to_string()));
        }

        let limit = self.config.max_rows.unwrap_or(usize::MAX);
        let rows = rows_iter
            .take(limit)
            .map(|row| row.iter().map(|cell| self.spreadsheet_value(cell)).collect())
            .collect();

        Ok((headers, rows))
    }

    fn spreadsheet_value(&self, cell: &Data) -> Value {
        match cell {
            Data::Empty | Data::Error(_) => Value::Null,
            Data::String(s) if self.na_values.contains(s.as_str()) => Value::Null,
            Data::String(s) => Value::text(s.as_str()),
            Data::Int(i) => Value::Integer(*i),
            Data::Float(f) => Value::Float(*f),
            Data::Bool(b) => Value::Boolean(*b),
            Data::DateTime(dt) => dt
                .as_datetime()
                .map(Value::Timestamp)
                .unwrap_or(Value::Float(dt.as_f64())),
            Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .map(Value::Timestamp)
                .unwrap_or_else(|_| Value::text(s.as_str())),
            Data::DurationIso(s) => Value::text(s.as_str()),
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Name blank headers `Unnamed: N` after their position and suffix repeats
/// with `.1`, `.2`, ... skipping any name already in use.
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut next_suffix: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(headers.len());

    for (idx, header) in headers.into_iter().enumerate() {
        let mut name = if header.is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            header
        };

        if taken.contains(&name) {
            let mut suffix = next_suffix.get(&name).copied().unwrap_or(1);
            let mut candidate = format!("{}.{}", name, suffix);
            while taken.contains(&candidate) {
                suffix += 1;
                candidate = format!("{}.{}", name, suffix);
            }
            next_suffix.insert(name, suffix + 1);
            name = candidate;
        }

        taken.insert(name.clone());
        names.push(name);
    }

    names
}

/// Split rows into columns and settle each column's type.
fn build_table(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Table> {
    let width = headers.len();
    let mut cells: Vec<Vec<Value>> = (0..width).map(|_| Vec::with_capacity(rows.len())).collect();

    for (idx, row) in rows.into_iter().enumerate() {
        if row.len() > width {
            return Err(DataVistaError::Ingestion(format!(
                "Expected {} fields in record {}, saw {}",
                width,
                idx + 1,
                row.len()
            )));
        }
        // Short rows are padded with nulls.
        let mut row = row.into_iter();
        for column in cells.iter_mut() {
            column.push(row.next().unwrap_or(Value::Null));
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| settle_column(name, values))
        .collect();

    Table::new(columns)
}

/// Decide a loaded column's type the way a dataframe loader would.
///
/// Text cells are promoted only when every non-null cell in the column
/// reads as the same kind: integer, then float, then boolean literal.
/// Whole-number float columns become integer columns.
fn settle_column(name: String, values: Vec<Value>) -> Column {
    let non_null = || values.iter().filter(|v| !v.is_null());

    if non_null().next().is_none() {
        return Column::new(name, DataType::Unresolved, values);
    }

    if non_null().all(|v| integral(v).is_some()) {
        let values = values
            .iter()
            .map(|v| integral(v).map_or(Value::Null, Value::Integer))
            .collect();
        return Column::new(name, DataType::Integer, values);
    }

    if non_null().all(|v| numeric(v).is_some()) {
        let values = values
            .iter()
            .map(|v| numeric(v).map_or(Value::Null, Value::Float))
            .collect();
        return Column::new(name, DataType::Float, values);
    }

    if non_null().all(|v| boolean(v).is_some()) {
        let values = values
            .iter()
            .map(|v| boolean(v).map_or(Value::Null, Value::Boolean))
            .collect();
        return Column::new(name, DataType::Boolean, values);
    }

    Column::inferred(name, values)
}

fn integral(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(i) => Some(*i),
        Value::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Some(*f as i64),
        Value::Text(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        Value::Text(s) => s.trim().parse::<f64>().ok().filter(|f| !f.is_nan()),
        _ => None,
    }
}

fn boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Boolean(b) => Some(*b),
        Value::Text(s) => match s.as_str() {
            "True" | "TRUE" | "true" => Some(true),
            "False" | "FALSE" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
