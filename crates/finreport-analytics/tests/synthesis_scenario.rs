//! End-to-end aggregation scenarios over synthesized tables.

use chrono::NaiveDate;
use finreport_analytics::{group_reduce, Reduction};
use finreport_data::{read_table_or_empty, synthesize, SynthSpec};

fn spec() -> SynthSpec {
    SynthSpec {
        days: 30,
        end_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        seed: Some(42),
        ..SynthSpec::default()
    }
}

#[test]
fn grouping_synthesized_month_by_category() {
    // 30 days x 4 services x 3 regions, grouped by service, summed.
    let table = synthesize(&spec());
    assert_eq!(table.len(), 360);

    let agg = group_reduce(&table, &["service"], "cost", Reduction::Sum).unwrap();
    assert_eq!(agg.len(), 4);

    let cost_idx = table.column_index("cost").unwrap();
    let table_total: f64 = table
        .rows
        .iter()
        .filter_map(|r| r[cost_idx].as_number())
        .sum();
    assert!((agg.total() - table_total).abs() < 1e-6);
}

#[test]
fn missing_source_degrades_to_empty_aggregate() {
    let table = read_table_or_empty("/definitely/not/here.csv");
    assert!(table.is_empty());

    // Downstream aggregation on the empty-column table reports the schema
    // gap instead of panicking.
    let result = group_reduce(&table, &["service"], "cost", Reduction::Sum);
    assert!(result.is_err());

    // An empty table that still carries a schema aggregates to nothing.
    let empty = finreport_data::Table::new(vec!["service".into(), "cost".into()]);
    let agg = group_reduce(&empty, &["service"], "cost", Reduction::Sum).unwrap();
    assert!(agg.is_empty());
}
