use crate::application::analysis::{GrowthRateReport, PerformanceReport};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

/// Writes the percent-change table as CSV: epoch-second timestamps in the
/// first column, one labeled column per series.
pub fn export_percent_csv(path: &Path, report: &PerformanceReport) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
        }
    }

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV export {}", path.display()))?;

    let mut header = vec!["Timestamp".to_string()];
    header.extend(report.series.iter().map(|s| format!("{} % Change", s.label)));
    writer.write_record(&header)?;

    for (row, timestamp) in report.timestamps.iter().enumerate() {
        let mut record = vec![timestamp.timestamp().to_string()];
        record.extend(report.series.iter().map(|s| s.points[row].to_string()));
        writer.write_record(&record)?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write CSV export {}", path.display()))?;

    info!("CSV export saved to {}", path.display());
    Ok(())
}

pub fn print_performance_summary(report: &PerformanceReport) {
    println!("\n{}", "=".repeat(72));
    println!("📊 PERFORMANCE SUMMARY ({} observations)", report.timestamps.len());
    println!("{}", "=".repeat(72));
    println!(
        "{:<28} | {:>11} | {:>11} | {:>11}",
        "Series", "Final %", "Min %", "Max %"
    );
    println!("{}", "-".repeat(72));

    for series in &report.series {
        let last = series.points.last().copied().unwrap_or(0.0);
        let min = series.points.iter().copied().fold(f64::INFINITY, f64::min);
        let max = series
            .points
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        println!(
            "{:<28} | {:>10.2}% | {:>10.2}% | {:>10.2}%",
            series.label, last, min, max
        );
    }
    println!("{}", "=".repeat(72));
}

pub fn print_growth_rate_summary(report: &GrowthRateReport) {
    println!("\n{}", "=".repeat(72));
    println!("📈 ANNUALIZED GROWTH RATE: {}", report.column_label);
    println!("{}", "=".repeat(72));
    println!("Samples:          {}", report.rate_pct.len());
    println!("Smoothing window: {}", report.window);
    println!("Mean gAPR:        {:.2}%", report.mean * 100.0);
    println!("Std deviation:    {:.2}%", report.std_dev * 100.0);
    println!("{}", "=".repeat(72));
}
