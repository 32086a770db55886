//! Group-by reductions.

use finreport_common::{ReportError, Result};
use finreport_data::{Field, Table};
use std::collections::HashMap;

/// How a group's numeric values are reduced to a single number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    /// Sum of the measure over the group.
    Sum,
    /// Arithmetic mean; zero for an empty group.
    Mean,
    /// Number of rows in the group. Ignores the measure's type.
    Count,
}

/// A mapping from a group key (one or more dimension values) to a reduced
/// numeric value. Keys appear in first-observed row order.
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    /// Names of the grouping dimensions.
    pub key_fields: Vec<String>,
    /// `(group key, reduced value)` pairs in first-seen order.
    pub entries: Vec<(Vec<String>, f64)>,
}

impl Aggregate {
    /// Number of distinct group keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no groups were observed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all reduced values.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }

    /// Looks up the value for a single-dimension key.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k.len() == 1 && k[0] == key)
            .map(|(_, v)| *v)
    }
}

/// Groups rows by one or more dimension fields and reduces a numeric
/// measure into one value per group.
///
/// Every row is assigned to exactly one group; the group keys are the
/// distinct value tuples observed in the grouping dimensions. A grouping or
/// measure field absent from the table fails with
/// [`ReportError::MissingField`]; a measure with no numeric values fails
/// with [`ReportError::NonNumericField`]. An empty table yields an empty
/// aggregate.
pub fn group_reduce(
    table: &Table,
    keys: &[&str],
    measure: &str,
    reduction: Reduction,
) -> Result<Aggregate> {
    let key_indices: Vec<usize> = keys
        .iter()
        .map(|k| table.column_index(k))
        .collect::<Result<_>>()?;
    let measure_index = match reduction {
        Reduction::Count => None,
        _ => Some(table.column_index(measure)?),
    };

    let mut order: Vec<Vec<String>> = Vec::new();
    let mut sums: HashMap<Vec<String>, (f64, u64)> = HashMap::new();
    let mut saw_numeric = false;

    for row in &table.rows {
        let key: Vec<String> = key_indices.iter().map(|&i| row[i].to_string()).collect();
        let entry = sums.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            (0.0, 0)
        });
        entry.1 += 1;
        if let Some(idx) = measure_index {
            if let Field::Number(n) = row[idx] {
                entry.0 += n;
                saw_numeric = true;
            }
        }
    }

    if measure_index.is_some() && !table.is_empty() && !saw_numeric {
        return Err(ReportError::NonNumericField(measure.to_string()));
    }

    let entries = order
        .into_iter()
        .map(|key| {
            let (sum, count) = sums[&key];
            let value = match reduction {
                Reduction::Sum => sum,
                Reduction::Count => count as f64,
                Reduction::Mean => {
                    if count == 0 {
                        0.0
                    } else {
                        sum / count as f64
                    }
                }
            };
            (key, value)
        })
        .collect();

    Ok(Aggregate {
        key_fields: keys.iter().map(|k| k.to_string()).collect(),
        entries,
    })
}

/// Returns the `n` largest entries by value, descending. Ties are broken by
/// input order (stable sort).
pub fn top_n(aggregate: &Aggregate, n: usize) -> Aggregate {
    let mut entries = aggregate.entries.clone();
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    entries.truncate(n);
    Aggregate {
        key_fields: aggregate.key_fields.clone(),
        entries,
    }
}

/// Percentage of rows whose numeric `field` value is strictly below
/// `threshold`. Returns 0 for an empty table, never a division error.
pub fn percent_below(table: &Table, field: &str, threshold: f64) -> Result<f64> {
    if table.is_empty() {
        return Ok(0.0);
    }
    let idx = table.column_index(field)?;
    let below = table
        .rows
        .iter()
        .filter(|row| row[idx].as_number().is_some_and(|n| n < threshold))
        .count();
    Ok(below as f64 / table.len() as f64 * 100.0)
}
