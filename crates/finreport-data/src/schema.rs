//! Column-name normalization applied once at the acquisition boundary.

use crate::table::Table;

/// Normalizes a raw header name: trimmed, lowercased, with spaces, currency
/// symbols, parentheses, and percent signs stripped. `"EC2 Monthly Cost ($)"`
/// becomes `"ec2monthlycost"`.
pub fn normalize_column_name(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '$' | '(' | ')' | '%'))
        .collect()
}

/// Normalizes every column name of a table in place.
pub fn normalize_columns(table: &mut Table) {
    for column in &mut table.columns {
        *column = normalize_column_name(column);
    }
}
