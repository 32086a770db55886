//! Chart artifacts rendered with plotters' bitmap backend.

use chrono::NaiveDate;
use finreport_analytics::Aggregate;
use finreport_common::{ReportError, Result};
use plotters::prelude::*;
use std::path::{Path, PathBuf};

const SERIES_COLORS: [RGBColor; 5] = [BLUE, RED, GREEN, MAGENTA, CYAN];

/// A rendered chart image plus the caption it is filed under in the report.
#[derive(Debug, Clone)]
pub struct ChartArtifact {
    /// Caption drawn above the embedded image.
    pub title: String,
    /// Location of the PNG in the scratch directory.
    pub path: PathBuf,
}

/// Bitmap dimensions and styling shared by all chart kinds.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Whether to draw a background mesh.
    pub grid: bool,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 960,
            height: 480,
            grid: true,
        }
    }
}

fn render_err(e: impl std::fmt::Display) -> ReportError {
    ReportError::Render(e.to_string())
}

/// Renders one or more dated line series. A legend is drawn when more than
/// one series is present.
pub fn render_line_chart(
    path: &Path,
    title: &str,
    y_label: &str,
    series: &[(String, Vec<(NaiveDate, f64)>)],
    style: &ChartStyle,
) -> Result<()> {
    let mut dates: Vec<NaiveDate> = series
        .iter()
        .flat_map(|(_, points)| points.iter().map(|(d, _)| *d))
        .collect();
    dates.sort_unstable();
    dates.dedup();
    if dates.is_empty() {
        return Err(ReportError::Render(format!("no data points for '{title}'")));
    }
    let max_y = series
        .iter()
        .flat_map(|(_, points)| points.iter().map(|(_, v)| *v))
        .fold(0.0_f64, f64::max);

    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let x_dates = dates.clone();
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(48)
        .y_label_area_size(64)
        .build_cartesian_2d(0..dates.len() as i32, 0f64..max_y * 1.1)
        .map_err(render_err)?;

    let x_label_formatter = move |i: &i32| {
        x_dates
            .get(*i as usize)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    };
    let mut mesh = chart.configure_mesh();
    mesh.x_desc("Date")
        .y_desc(y_label)
        .x_label_formatter(&x_label_formatter);
    if !style.grid {
        mesh.disable_mesh();
    }
    mesh.draw().map_err(render_err)?;

    for (s, (name, points)) in series.iter().enumerate() {
        let color = SERIES_COLORS[s % SERIES_COLORS.len()];
        let line: Vec<(i32, f64)> = points
            .iter()
            .filter_map(|(d, v)| {
                dates
                    .binary_search(d)
                    .ok()
                    .map(|i| (i as i32, *v))
            })
            .collect();
        chart
            .draw_series(LineSeries::new(line, &color))
            .map_err(render_err)?
            .label(name.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    if series.len() > 1 {
        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(WHITE.mix(0.8))
            .draw()
            .map_err(render_err)?;
    }
    root.present().map_err(render_err)?;
    Ok(())
}

/// Renders a vertical bar chart from an aggregate, one bar per group key.
pub fn render_bar_chart(
    path: &Path,
    title: &str,
    y_label: &str,
    aggregate: &Aggregate,
    style: &ChartStyle,
) -> Result<()> {
    if aggregate.is_empty() {
        return Err(ReportError::Render(format!("no groups for '{title}'")));
    }
    let labels: Vec<String> = aggregate
        .entries
        .iter()
        .map(|(key, _)| key.join(" / "))
        .collect();
    let max_y = aggregate
        .entries
        .iter()
        .map(|(_, v)| *v)
        .fold(0.0_f64, f64::max);

    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let x_labels = labels.clone();
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(48)
        .y_label_area_size(64)
        .build_cartesian_2d(0..labels.len() as i32, 0f64..max_y * 1.1)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .y_desc(y_label)
        .x_labels(labels.len())
        .x_label_formatter(&move |i| {
            x_labels.get(*i as usize).cloned().unwrap_or_default()
        })
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(aggregate.entries.iter().enumerate().map(|(i, (_, v))| {
            Rectangle::new([(i as i32, 0.0), (i as i32 + 1, *v)], BLUE.mix(0.6).filled())
        }))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}

/// Renders a histogram of a numeric field over a fixed number of bins.
pub fn render_histogram(
    path: &Path,
    title: &str,
    x_label: &str,
    values: &[f64],
    bins: usize,
    style: &ChartStyle,
) -> Result<()> {
    if values.is_empty() || bins == 0 {
        return Err(ReportError::Render(format!("no values for '{title}'")));
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = if max > min { max - min } else { 1.0 };
    let width = span / bins as f64;

    let mut counts = vec![0u32; bins];
    for v in values {
        let bin = (((v - min) / width) as usize).min(bins - 1);
        counts[bin] += 1;
    }
    let tallest = *counts.iter().max().unwrap_or(&1);

    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(48)
        .y_label_area_size(64)
        .build_cartesian_2d(min..max, 0u32..tallest + 1)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc("Rows")
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(counts.iter().enumerate().map(|(i, count)| {
            let x0 = min + i as f64 * width;
            Rectangle::new([(x0, 0), (x0 + width, *count)], GREEN.mix(0.6).filled())
        }))
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    Ok(())
}
