//! Delimited-text export of a table.

use crate::error::Result;
use crate::schema::Table;

/// A serialized table, ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    bytes: Vec<u8>,
}

impl ExportDocument {
    /// Suggested download name.
    pub const FILE_NAME: &'static str = "Updated_Data.csv";
    /// MIME type of the bytes.
    pub const MIME_TYPE: &'static str = "text/csv";

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn file_name(&self) -> &'static str {
        Self::FILE_NAME
    }

    pub fn mime_type(&self) -> &'static str {
        Self::MIME_TYPE
    }
}

/// Write a table as comma-separated text with a header row.
/// Null cells are written as empty fields.
pub fn write_csv(table: &Table) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(table.column_names())?;
    for row in 0..table.row_count() {
        let record: Vec<String> = table
            .columns()
            .iter()
            .map(|c| c.values[row].to_string())
            .collect();
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;

    tracing::debug!(rows = table.row_count(), bytes = bytes.len(), "Exported table");

    Ok(bytes)
}

/// Export a table as an [`ExportDocument`].
pub fn export(table: &Table) -> Result<ExportDocument> {
    Ok(ExportDocument {
        bytes: write_csv(table)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, DataType, Value};

    #[test]
    fn test_write_csv() {
        let table = Table::new(vec![
            Column::new(
                "id",
                DataType::Integer,
                vec![Value::Integer(1), Value::Integer(2)],
            ),
            Column::new(
                "note",
                DataType::Text,
                vec![Value::text("a, b"), Value::Null],
            ),
            Column::new(
                "score",
                DataType::Float,
                vec![Value::Float(2.0), Value::Float(0.5)],
            ),
        ])
        .unwrap();

        let bytes = write_csv(&table).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "id,note,score\n1,\"a, b\",2.0\n2,,0.5\n"
        );
    }

    #[test]
    fn test_export_document() {
        let table = Table::new(vec![Column::inferred("x", vec![Value::Integer(1)])]).unwrap();
        let doc = export(&table).unwrap();
        assert_eq!(doc.file_name(), "Updated_Data.csv");
        assert_eq!(doc.mime_type(), "text/csv");
        assert_eq!(doc.bytes(), b"x\n1\n");
    }
}
