use crate::domain::series::{ColumnSpec, SeriesSchema};
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Runtime configuration, resolved from `PERFCHART_*` environment variables
/// with documented defaults. CLI flags override individual fields after
/// loading.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON recording to analyze
    pub input_path: PathBuf,
    /// Rendered chart destination (PNG)
    pub chart_path: PathBuf,
    /// Optional percent-change CSV export destination
    pub csv_path: Option<PathBuf>,
    /// Column the growth-rate report is computed over
    pub rate_column: String,
    /// Moving-average window for the smoothed rate series
    pub smoothing_window: usize,
    /// Year length used for annualization, in seconds
    pub year_seconds: f64,
    pub chart_width: u32,
    pub chart_height: u32,
    /// Price columns expected in each record
    pub schema: SeriesSchema,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let input_path = env::var("PERFCHART_INPUT")
            .unwrap_or_else(|_| "results/comparison.json".to_string())
            .into();

        let chart_path = env::var("PERFCHART_CHART")
            .unwrap_or_else(|_| "results/performance.png".to_string())
            .into();

        let csv_path = env::var("PERFCHART_CSV").ok().map(PathBuf::from);

        let rate_column =
            env::var("PERFCHART_RATE_COLUMN").unwrap_or_else(|_| "pricePerShareBlend".to_string());

        let smoothing_window = env::var("PERFCHART_SMOOTHING_WINDOW")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<usize>()
            .context("Failed to parse PERFCHART_SMOOTHING_WINDOW")?;

        let year_seconds = env::var("PERFCHART_YEAR_SECONDS")
            .unwrap_or_else(|_| "31536000".to_string())
            .parse::<f64>()
            .context("Failed to parse PERFCHART_YEAR_SECONDS")?;

        let chart_width = env::var("PERFCHART_CHART_WIDTH")
            .unwrap_or_else(|_| "1600".to_string())
            .parse::<u32>()
            .context("Failed to parse PERFCHART_CHART_WIDTH")?;

        let chart_height = env::var("PERFCHART_CHART_HEIGHT")
            .unwrap_or_else(|_| "1000".to_string())
            .parse::<u32>()
            .context("Failed to parse PERFCHART_CHART_HEIGHT")?;

        let schema = match env::var("PERFCHART_STRATEGIES") {
            Ok(list) => schema_with_strategies(&list)?,
            Err(_) => SeriesSchema::comparison_default(),
        };

        Ok(Config {
            input_path,
            chart_path,
            csv_path,
            rate_column,
            smoothing_window,
            year_seconds,
            chart_width,
            chart_height,
            schema,
        })
    }
}

/// Parses `PERFCHART_STRATEGIES` into the strategy columns of the schema.
///
/// Format: comma-separated `jsonKey:Label` entries; a trailing `?` on the
/// key marks the column optional (absent samples default to 1.0), e.g.
/// `pricePerShareBlend:Blend Vault,pricePerShareCharm?:Charm Vault`.
/// The two spot price columns are always present.
fn schema_with_strategies(list: &str) -> Result<SeriesSchema> {
    let mut columns = vec![
        ColumnSpec::required("price0", "Token0 Price"),
        ColumnSpec::required("price1", "Token1 Price"),
    ];

    for entry in list.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (key, label) = entry
            .split_once(':')
            .with_context(|| format!("Strategy entry '{}' must be 'jsonKey:Label'", entry))?;
        let key = key.trim();
        let label = label.trim();
        match key.strip_suffix('?') {
            Some(key) => columns.push(ColumnSpec::optional(key, label)),
            None => columns.push(ColumnSpec::required(key, label)),
        }
    }

    if columns.len() == 2 {
        anyhow::bail!("PERFCHART_STRATEGIES must name at least one strategy column");
    }

    Ok(SeriesSchema { columns })
}
