use crate::application::analysis::{GrowthRateReport, PerformanceReport};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use plotters::prelude::*;
use std::fs;
use std::path::Path;
use tracing::info;

/// Renders the strategy-comparison chart: one percent-change line per
/// series over block time.
pub fn render_performance_chart(
    path: &Path,
    width: u32,
    height: u32,
    report: &PerformanceReport,
) -> Result<()> {
    ensure_parent_dir(path)?;

    let (t_min, t_max) = time_range(&report.timestamps)?;
    let (y_min, y_max) = value_range(report.series.iter().flat_map(|s| s.points.iter().copied()));

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(16)
        .caption("Strategy Performance", ("sans-serif", 28))
        .x_label_area_size(48)
        .y_label_area_size(64)
        .build_cartesian_2d(t_min..t_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Block Timestamp")
        .y_desc("Percent Change [%]")
        .x_labels(8)
        .x_label_formatter(&|t| t.format("%Y-%m-%d").to_string())
        .label_style(("sans-serif", 14))
        .draw()?;

    for (idx, series) in report.series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let legend_color = color.clone();
        chart
            .draw_series(LineSeries::new(
                report
                    .timestamps
                    .iter()
                    .cloned()
                    .zip(series.points.iter().cloned()),
                color.stroke_width(2),
            ))?
            .label(series.label.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 18, y)], legend_color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .label_font(("sans-serif", 14))
        .draw()?;

    root.present()
        .with_context(|| format!("Failed to write chart to {}", path.display()))?;

    info!("Chart saved to {}", path.display());
    Ok(())
}

/// Renders the raw and smoothed annualized growth-rate lines.
pub fn render_growth_rate_chart(
    path: &Path,
    width: u32,
    height: u32,
    report: &GrowthRateReport,
) -> Result<()> {
    ensure_parent_dir(path)?;

    let (t_min, t_max) = time_range(&report.timestamps)?;
    let (y_min, y_max) = value_range(
        report
            .rate_pct
            .iter()
            .chain(report.smoothed_pct.iter())
            .copied(),
    );

    let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(16)
        .caption(
            format!("Annualized Growth Rate: {}", report.column_label),
            ("sans-serif", 28),
        )
        .x_label_area_size(48)
        .y_label_area_size(64)
        .build_cartesian_2d(t_min..t_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Date where the measurement window ends")
        .y_desc("gAPR [%]")
        .x_labels(8)
        .x_label_formatter(&|t| t.format("%Y-%m-%d").to_string())
        .label_style(("sans-serif", 14))
        .draw()?;

    let raw = Palette99::pick(0).to_rgba();
    let raw_legend = raw.clone();
    chart
        .draw_series(LineSeries::new(
            report
                .timestamps
                .iter()
                .cloned()
                .zip(report.rate_pct.iter().cloned()),
            raw.stroke_width(1),
        ))?
        .label("gAPR")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], raw_legend.stroke_width(1)));

    let smooth = Palette99::pick(1).to_rgba();
    let smooth_legend = smooth.clone();
    chart
        .draw_series(LineSeries::new(
            report
                .timestamps
                .iter()
                .cloned()
                .zip(report.smoothed_pct.iter().cloned()),
            smooth.stroke_width(2),
        ))?
        .label(format!("smoothed (window {})", report.window))
        .legend(move |(x, y)| {
            PathElement::new(vec![(x, y), (x + 18, y)], smooth_legend.stroke_width(2))
        });

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .label_font(("sans-serif", 14))
        .draw()?;

    root.present()
        .with_context(|| format!("Failed to write chart to {}", path.display()))?;

    info!("Chart saved to {}", path.display());
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
        }
    }
    Ok(())
}

fn time_range(timestamps: &[DateTime<Utc>]) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let first = *timestamps.first().context("Nothing to plot")?;
    let last = *timestamps.last().context("Nothing to plot")?;
    if first == last {
        // A single sample still needs a non-degenerate axis.
        return Ok((first, last + Duration::seconds(1)));
    }
    Ok((first, last))
}

fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if !min.is_finite() || !max.is_finite() {
        return (-1.0, 1.0);
    }
    if min == max {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}
