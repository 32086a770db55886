//! In-memory table model shared by every pipeline stage.

use chrono::NaiveDate;
use finreport_common::{ReportError, Result};
use std::fmt;

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Free-form text, including categorical dimensions.
    Text(String),
    /// A numeric measure.
    Number(f64),
    /// A calendar date.
    Date(NaiveDate),
    /// An empty cell.
    Missing,
}

impl Field {
    /// Returns the numeric value, if this cell holds one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Field::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the date value, if this cell holds one.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Field::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Text(s) => write!(f, "{s}"),
            Field::Number(n) => write!(f, "{n}"),
            Field::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Field::Missing => Ok(()),
        }
    }
}

/// An ordered collection of rows sharing a header.
///
/// Every row has exactly as many cells as there are columns. Tables are
/// constructed by acquisition and not mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Column names, in file order.
    pub columns: Vec<String>,
    /// Row data; each row is as wide as `columns`.
    pub rows: Vec<Vec<Field>>,
}

impl Table {
    /// Creates an empty table with the given header.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Appends a row. Fails if the row width does not match the header.
    pub fn push_row(&mut self, row: Vec<Field>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(ReportError::SourceMalformed(format!(
                "row has {} cells, expected {}",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| ReportError::MissingField(name.to_string()))
    }

    /// Borrow a cell by row index and column name.
    pub fn cell(&self, row: usize, column: &str) -> Result<&Field> {
        let idx = self.column_index(column)?;
        Ok(&self.rows[row][idx])
    }
}
