//! Delimited file reading and writing.
//!
//! Sources are header-named CSV files. A missing file and a malformed file
//! are signaled distinctly so callers can report the failure and halt
//! gracefully; [`read_table_or_empty`] absorbs both into an empty table for
//! pipelines where a partial report is still useful.

use crate::table::{Field, Table};
use chrono::NaiveDate;
use finreport_common::{ReportError, Result};
use std::fs::File;
use std::path::Path;
use tracing::warn;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Reads a CSV file with a header row into a [`Table`].
///
/// Cells are typed per value: dates first, then numbers (currency symbols
/// and thousands separators stripped), then text. Empty cells become
/// [`Field::Missing`].
pub fn read_table(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ReportError::SourceNotFound(path.display().to_string())
        } else {
            ReportError::SourceMalformed(format!("{}: {e}", path.display()))
        }
    })?;

    let mut reader = csv::Reader::from_reader(file);
    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| ReportError::SourceMalformed(format!("{}: {e}", path.display())))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut table = Table::new(columns);
    for record in reader.records() {
        let record =
            record.map_err(|e| ReportError::SourceMalformed(format!("{}: {e}", path.display())))?;
        let row: Vec<Field> = record.iter().map(parse_cell).collect();
        table.push_row(row)?;
    }
    Ok(table)
}

/// Reads a CSV file, turning any source error into a logged warning and an
/// empty table so the rest of the pipeline can degrade gracefully.
pub fn read_table_or_empty(path: impl AsRef<Path>) -> Table {
    match read_table(path.as_ref()) {
        Ok(table) => table,
        Err(e) => {
            warn!("could not read source, continuing with empty table: {e}");
            Table::default()
        }
    }
}

/// Writes a table to a CSV file with a header row. Reading the file back
/// reproduces the same rows modulo per-cell type coercion.
pub fn write_table(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())
        .map_err(|e| ReportError::SourceMalformed(e.to_string()))?;
    writer
        .write_record(&table.columns)
        .map_err(|e| ReportError::SourceMalformed(e.to_string()))?;
    for row in &table.rows {
        let record: Vec<String> = row.iter().map(|f| f.to_string()).collect();
        writer
            .write_record(&record)
            .map_err(|e| ReportError::SourceMalformed(e.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

fn parse_cell(raw: &str) -> Field {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Field::Missing;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Field::Date(date);
        }
    }
    let cleaned: String = trimmed
        .chars()
        .filter(|c| !matches!(c, '$' | ','))
        .collect();
    if let Ok(number) = cleaned.parse::<f64>() {
        return Field::Number(number);
    }
    Field::Text(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_cell_types() {
        assert_eq!(
            parse_cell("2024-01-15"),
            Field::Date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
        assert_eq!(parse_cell("$1,234.50"), Field::Number(1234.5));
        assert_eq!(parse_cell("-42"), Field::Number(-42.0));
        assert_eq!(parse_cell("us-east-1"), Field::Text("us-east-1".into()));
        assert_eq!(parse_cell("  "), Field::Missing);
    }

    #[test]
    fn test_missing_file_is_distinct() {
        let err = read_table("/nonexistent/costs.csv").unwrap_err();
        assert!(matches!(err, ReportError::SourceNotFound(_)));
    }

    #[test]
    fn test_malformed_file_is_distinct() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ragged.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "a,b,c").unwrap();
        writeln!(file, "1,2").unwrap();
        drop(file);

        let err = read_table(&path).unwrap_err();
        assert!(matches!(err, ReportError::SourceMalformed(_)));
    }

    #[test]
    fn test_read_or_empty_absorbs_missing_source() {
        let table = read_table_or_empty("/nonexistent/costs.csv");
        assert!(table.is_empty());
        assert!(table.columns.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let mut table = Table::new(vec!["date".into(), "service".into(), "cost".into()]);
        table
            .push_row(vec![
                Field::Date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()),
                Field::Text("EC2".into()),
                Field::Number(123.45),
            ])
            .unwrap();
        table
            .push_row(vec![
                Field::Date(NaiveDate::from_ymd_opt(2024, 2, 2).unwrap()),
                Field::Text("S3".into()),
                Field::Number(0.5),
            ])
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("round_trip.csv");
        write_table(&table, &path).unwrap();
        let back = read_table(&path).unwrap();

        assert_eq!(back.columns, table.columns);
        assert_eq!(back.rows, table.rows);
    }
}
