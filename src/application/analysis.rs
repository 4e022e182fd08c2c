use crate::config::Config;
use crate::domain::metrics::{annualized_growth_rate, geometric_mean, moving_average, percent_change};
use crate::domain::series::ObservationSeries;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// One labeled percent-change line, in percent units (5.0 == +5%).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PercentSeries {
    pub label: String,
    pub points: Vec<f64>,
}

/// Everything the comparison chart and CSV export are built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub timestamps: Vec<DateTime<Utc>>,
    pub series: Vec<PercentSeries>,
}

/// Raw and smoothed annualized growth rate of one column, in percent units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthRateReport {
    /// Start of each consecutive-sample pair; one shorter than the input
    pub timestamps: Vec<DateTime<Utc>>,
    pub rate_pct: Vec<f64>,
    pub smoothed_pct: Vec<f64>,
    /// Mean rate in fractional-year units (0.1 == 10% APR)
    pub mean: f64,
    pub std_dev: f64,
    pub column_label: String,
    pub window: usize,
}

/// Computes the derived series for one loaded recording.
pub struct AnalysisEngine {
    config: Config,
}

impl AnalysisEngine {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Percent change of both spot prices, their geometric mean, and every
    /// strategy column, all against the first observation.
    ///
    /// The geometric mean `sqrt(price0 * price1)` is the value of holding a
    /// continuously rebalanced 50/50 position in both tokens, which is the
    /// baseline the vault strategies compete with.
    pub fn performance(&self, series: &ObservationSeries) -> Result<PerformanceReport> {
        let spot0 = self.column(series, "price0")?;
        let spot1 = self.column(series, "price1")?;

        let mut out = Vec::with_capacity(series.schema.columns.len() + 1);
        out.push(self.percent_series(&series.schema.columns[0].label, &spot0)?);
        out.push(self.percent_series(&series.schema.columns[1].label, &spot1)?);
        out.push(self.percent_series("sqrt(price0*price1)", &geometric_mean(&spot0, &spot1))?);

        for column in series.schema.columns.iter().skip(2) {
            let values = self.column(series, &column.key)?;
            out.push(self.percent_series(&column.label, &values)?);
        }

        Ok(PerformanceReport {
            timestamps: series.timestamps(),
            series: out,
        })
    }

    /// Annualized growth rate of the configured column, with its smoothed
    /// companion and summary statistics.
    pub fn growth_rate(&self, series: &ObservationSeries) -> Result<GrowthRateReport> {
        let key = &self.config.rate_column;
        let column = series
            .schema
            .column_index(key)
            .and_then(|i| series.schema.columns.get(i))
            .with_context(|| {
                let known: Vec<&str> = series
                    .schema
                    .columns
                    .iter()
                    .map(|c| c.key.as_str())
                    .collect();
                format!(
                    "Rate column '{}' is not in the schema (known columns: {})",
                    key,
                    known.join(", ")
                )
            })?
            .clone();

        let values = self.column(series, key)?;
        let seconds = series.epoch_seconds();

        let rates = annualized_growth_rate(&values, &seconds, self.config.year_seconds)
            .with_context(|| format!("Failed to compute growth rate for '{}'", key))?;
        let smoothed = moving_average(&rates, self.config.smoothing_window)
            .context("Failed to smooth growth rate")?;

        let mean = rates.as_slice().mean();
        let std_dev = rates.as_slice().std_dev();

        // The rate between samples i and i+1 is plotted at sample i.
        let timestamps = series.timestamps()[..series.len() - 1].to_vec();

        Ok(GrowthRateReport {
            timestamps,
            rate_pct: rates.iter().map(|r| r * 100.0).collect(),
            smoothed_pct: smoothed.iter().map(|r| r * 100.0).collect(),
            mean,
            std_dev,
            column_label: column.label,
            window: self.config.smoothing_window,
        })
    }

    fn column(&self, series: &ObservationSeries, key: &str) -> Result<Vec<f64>> {
        series
            .column(key)
            .with_context(|| format!("Schema has no column '{}'", key))
    }

    fn percent_series(&self, label: &str, values: &[f64]) -> Result<PercentSeries> {
        let changes = percent_change(values)
            .with_context(|| format!("Failed to compute percent change for '{}'", label))?;
        Ok(PercentSeries {
            label: label.to_string(),
            points: changes.iter().map(|c| c * 100.0).collect(),
        })
    }
}
