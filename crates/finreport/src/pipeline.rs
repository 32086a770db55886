//! The report pipeline: acquire, aggregate, render, write.
//!
//! Strictly sequential and single-threaded. Recoverable conditions degrade
//! the report (fewer charts, a "no data" narrative) instead of aborting;
//! only an unwritable output path fails the run. Scratch chart images live
//! in a [`tempfile::TempDir`] and are removed on every exit path.

use chrono::Utc;
use finreport_analytics::{
    distinct_values, group_reduce, percent_below, time_series, top_n, Aggregate, Reduction,
    SeriesFilter,
};
use finreport_common::{format_count, format_currency, format_percent, Result};
use finreport_config::Config;
use finreport_data::{normalize_columns, read_table_or_empty, write_table, Field, Table};
use finreport_render::{
    render_bar_chart, render_histogram, render_line_chart, ChartArtifact, ChartStyle,
    ReportDocument,
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Local artifacts produced by one pipeline run.
#[derive(Debug)]
pub struct PipelineArtifacts {
    /// The paginated report document.
    pub pdf: PathBuf,
    /// The key-metrics summary table.
    pub summary_csv: PathBuf,
}

impl PipelineArtifacts {
    /// All artifact paths, for publication.
    pub fn paths(&self) -> Vec<PathBuf> {
        vec![self.pdf.clone(), self.summary_csv.clone()]
    }
}

/// Reads the configured source, absorbing source errors into an empty
/// table, and normalizes column names at the boundary.
pub fn acquire(config: &Config) -> Table {
    let mut table = read_table_or_empty(&config.data.csv_path);
    normalize_columns(&mut table);
    info!(
        "acquired {} rows from {}",
        table.len(),
        config.data.csv_path.display()
    );
    table
}

/// Runs aggregation, rendering, and local publication over a table.
pub fn run_report(config: &Config, table: &Table) -> Result<PipelineArtifacts> {
    let scratch = tempfile::tempdir()?;
    let style = ChartStyle {
        width: config.charts.width,
        height: config.charts.height,
        grid: config.charts.grid,
    };

    // Aggregation. Schema gaps skip the dependent section with a warning.
    let cost_by_service = section("cost by service", || {
        group_reduce(table, &["service"], "cost", Reduction::Sum)
    });
    let cost_by_region = section("cost by region", || {
        group_reduce(table, &["region"], "cost", Reduction::Sum)
    });
    let cost_by_group = section("cost by resource group", || {
        group_reduce(table, &["resourcegroup"], "cost", Reduction::Sum)
    });
    let daily_cost = section("daily cost", || {
        group_reduce(table, &["date"], "cost", Reduction::Sum)
    });
    let low_usage_pct = section("low usage share", || {
        percent_below(table, "usage", config.report.low_usage_threshold)
    });

    let total_cost = cost_by_service.as_ref().map(Aggregate::total);
    let avg_daily_cost = daily_cost.as_ref().and_then(|agg| {
        if agg.is_empty() {
            None
        } else {
            Some(agg.total() / agg.len() as f64)
        }
    });

    // Rendering. Each chart failure is logged and the chart skipped.
    let mut charts: Vec<ChartArtifact> = Vec::new();
    for (dimension, measure, unit) in [
        ("service", "cost", "Cost (USD)"),
        ("region", "cost", "Cost (USD)"),
        ("service", "usage", "Usage (Units)"),
    ] {
        charts.extend(dimension_series_charts(
            table,
            dimension,
            measure,
            unit,
            scratch.path(),
            &style,
        ));
    }

    if let Some(agg) = &cost_by_service {
        if !agg.is_empty() {
            let path = scratch.path().join("cost_by_service.png");
            match render_bar_chart(&path, "Total Cost by Service", "Cost (USD)", agg, &style) {
                Ok(()) => charts.push(ChartArtifact {
                    title: "Total Cost by Service".into(),
                    path,
                }),
                Err(e) => warn!("skipping bar chart: {e}"),
            }
        }
    }

    if let Ok(idx) = table.column_index("usage") {
        let usage: Vec<f64> = table.rows.iter().filter_map(|r| r[idx].as_number()).collect();
        let path = scratch.path().join("usage_histogram.png");
        match render_histogram(
            &path,
            "Usage Distribution",
            "Usage (Units)",
            &usage,
            config.charts.histogram_bins,
            &style,
        ) {
            Ok(()) => charts.push(ChartArtifact {
                title: "Usage Distribution".into(),
                path,
            }),
            Err(e) => warn!("skipping histogram: {e}"),
        }
    }

    // Document assembly.
    let generated = Utc::now().format("%Y-%m-%d %H:%M UTC");
    let mut document = ReportDocument::new(
        &config.report.title,
        format!("Prepared by {} on {generated}", config.report.prepared_by),
    );

    document.heading("Report Summary");
    if table.is_empty() {
        document.paragraph(
            "No source data was available for this reporting window. \
             Metrics and charts are omitted.",
        );
    } else {
        document.paragraph(&config.report.summary);
    }

    let metrics = metric_rows(
        table.len(),
        total_cost,
        avg_daily_cost,
        low_usage_pct,
        cost_by_region.as_ref(),
    );
    document.heading("Key Metrics");
    document.table(
        vec!["Metric".into(), "Value".into()],
        metrics.clone(),
    );

    if let Some(agg) = &cost_by_group {
        let ranked = top_n(agg, config.report.top_n);
        if !ranked.is_empty() {
            document.heading(format!(
                "Top {} Resource Groups by Cost",
                ranked.len()
            ));
            document.table(
                vec!["Resource Group".into(), "Total Cost".into()],
                ranked
                    .entries
                    .iter()
                    .map(|(key, value)| vec![key.join(" / "), format_currency(*value)])
                    .collect(),
            );
        }
    }

    if !charts.is_empty() {
        document.push(finreport_render::Block::PageBreak);
        for chart in charts {
            document.chart(chart);
        }
    }

    document.save(&config.report.output_pdf)?;
    info!("report written to {}", config.report.output_pdf.display());

    write_summary_csv(&metrics, &config.report.summary_csv)?;
    info!("summary written to {}", config.report.summary_csv.display());

    Ok(PipelineArtifacts {
        pdf: config.report.output_pdf.clone(),
        summary_csv: config.report.summary_csv.clone(),
    })
}

/// Runs one aggregation step, downgrading its failure to a warning.
fn section<T>(name: &str, run: impl FnOnce() -> Result<T>) -> Option<T> {
    match run() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("skipping {name}: {e}");
            None
        }
    }
}

/// One daily line chart of a measure per distinct value of a dimension.
fn dimension_series_charts(
    table: &Table,
    dimension: &str,
    measure: &str,
    unit: &str,
    scratch: &Path,
    style: &ChartStyle,
) -> Vec<ChartArtifact> {
    let values = match distinct_values(table, dimension) {
        Ok(values) => values,
        Err(e) => {
            warn!("skipping {dimension} charts: {e}");
            return Vec::new();
        }
    };

    let mut artifacts = Vec::new();
    for value in values {
        let filter = SeriesFilter::equals(dimension, value.clone());
        let series = match time_series(table, "date", Some(&filter), measure) {
            Ok(series) if !series.is_empty() => series,
            Ok(_) => continue,
            Err(e) => {
                warn!("skipping {value} series: {e}");
                continue;
            }
        };
        let title = format!("{value} Daily {unit}");
        let path = scratch.join(format!("{measure}_{dimension}_{value}.png"));
        match render_line_chart(&path, &title, unit, &[(value, series)], style) {
            Ok(()) => artifacts.push(ChartArtifact { title, path }),
            Err(e) => warn!("skipping chart: {e}"),
        }
    }
    artifacts
}

fn metric_rows(
    rows: usize,
    total_cost: Option<f64>,
    avg_daily_cost: Option<f64>,
    low_usage_pct: Option<f64>,
    cost_by_region: Option<&Aggregate>,
) -> Vec<Vec<String>> {
    let fmt = |value: Option<f64>, f: fn(f64) -> String| {
        value.map(f).unwrap_or_else(|| "N/A".to_string())
    };
    let mut out = vec![
        vec!["Rows analyzed".to_string(), format_count(rows as u64)],
        vec!["Total cost".to_string(), fmt(total_cost, format_currency)],
        vec![
            "Average daily cost".to_string(),
            fmt(avg_daily_cost, format_currency),
        ],
        vec![
            "Low usage share".to_string(),
            low_usage_pct
                .map(|p| format_percent(p, 2))
                .unwrap_or_else(|| "N/A".to_string()),
        ],
    ];
    if let Some(agg) = cost_by_region {
        for (key, value) in &agg.entries {
            out.push(vec![
                format!("Total cost ({})", key.join(" / ")),
                format_currency(*value),
            ]);
        }
    }
    out
}

fn write_summary_csv(metrics: &[Vec<String>], path: &Path) -> Result<()> {
    let mut summary = Table::new(vec!["metric".into(), "value".into()]);
    for row in metrics {
        summary.push_row(vec![
            Field::Text(row[0].clone()),
            Field::Text(row[1].clone()),
        ])?;
    }
    write_table(&summary, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use finreport_data::{synthesize, SynthSpec};

    fn test_config(dir: &Path) -> Config {
        let mut config = Config::default();
        config.report.output_pdf = dir.join("report.pdf");
        config.report.summary_csv = dir.join("summary.csv");
        config.data.csv_path = dir.join("input.csv");
        config
    }

    fn seeded_table() -> Table {
        synthesize(&SynthSpec {
            days: 10,
            end_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            seed: Some(3),
            ..SynthSpec::default()
        })
    }

    #[test]
    fn test_report_from_synthesized_table() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let table = seeded_table();

        let artifacts = run_report(&config, &table).unwrap();
        assert!(artifacts.pdf.exists());
        assert!(artifacts.summary_csv.exists());

        let bytes = std::fs::read(&artifacts.pdf).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_missing_source_still_produces_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        // Source file never written: acquisition degrades to empty.
        let table = acquire(&config);
        assert!(table.is_empty());

        let artifacts = run_report(&config, &table).unwrap();
        assert!(artifacts.pdf.exists());
    }

    #[test]
    fn test_summary_csv_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let table = seeded_table();

        run_report(&config, &table).unwrap();
        let summary = finreport_data::read_table(&config.report.summary_csv).unwrap();
        assert_eq!(summary.columns, vec!["metric", "value"]);
        assert!(summary.len() >= 4);
    }
}
