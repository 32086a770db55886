//! Per-group daily time series.

use chrono::NaiveDate;
use finreport_common::Result;
use finreport_data::Table;
use std::collections::BTreeMap;

/// Restricts a series to rows where a dimension equals a value.
#[derive(Debug, Clone)]
pub struct SeriesFilter {
    /// Dimension field name.
    pub field: String,
    /// Required dimension value.
    pub value: String,
}

impl SeriesFilter {
    /// Convenience constructor.
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Distinct values of a dimension, in first-seen row order.
pub fn distinct_values(table: &Table, field: &str) -> Result<Vec<String>> {
    let idx = table.column_index(field)?;
    let mut seen = Vec::new();
    for row in &table.rows {
        let value = row[idx].to_string();
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    Ok(seen)
}

/// Sums a numeric measure per day for rows matching the filter, sorted by
/// date. Rows without a parseable date or numeric measure are skipped.
pub fn time_series(
    table: &Table,
    date_field: &str,
    filter: Option<&SeriesFilter>,
    measure: &str,
) -> Result<Vec<(NaiveDate, f64)>> {
    let date_idx = table.column_index(date_field)?;
    let measure_idx = table.column_index(measure)?;
    let filter_idx = match filter {
        Some(f) => Some(table.column_index(&f.field)?),
        None => None,
    };

    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for row in &table.rows {
        if let (Some(f), Some(idx)) = (filter, filter_idx) {
            if row[idx].to_string() != f.value {
                continue;
            }
        }
        let (Some(date), Some(value)) = (row[date_idx].as_date(), row[measure_idx].as_number())
        else {
            continue;
        };
        *by_date.entry(date).or_insert(0.0) += value;
    }
    Ok(by_date.into_iter().collect())
}
