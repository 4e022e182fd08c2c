//! Normalized performance metrics over recorded price series
//!
//! This module provides the derived series the reports are built from:
//! - Percent change against the first observation
//! - Annualized growth rate (gAPR) from consecutive-sample ratios
//! - Uniform moving-average smoothing

use crate::domain::errors::MetricError;

/// Seconds in the fixed 365-day year used for annualization.
pub const YEAR_SECONDS: f64 = 365.0 * 24.0 * 3600.0;

/// Percent change of every sample relative to the first.
///
/// Returns a series of the same length as the input with
/// `out[i] = (values[i] - values[0]) / values[0]`, so `out[0]` is exactly
/// zero. The result is scale-invariant: multiplying the whole input by a
/// positive constant does not change it.
///
/// Fails on an empty input or a zero baseline rather than producing
/// NaN/Inf.
pub fn percent_change(values: &[f64]) -> Result<Vec<f64>, MetricError> {
    let baseline = *values.first().ok_or(MetricError::EmptySeries)?;
    if baseline == 0.0 {
        return Err(MetricError::ZeroBaseline);
    }

    Ok(values.iter().map(|v| (v - baseline) / baseline).collect())
}

/// Annualized instantaneous growth rate between each consecutive pair of
/// observations.
///
/// For every adjacent pair the per-step relative return
/// `values[i+1]/values[i] - 1` is divided by the elapsed wall-clock seconds
/// and scaled to `year_seconds`, yielding `values.len() - 1` samples in
/// fractional-year units (0.1 = 10% APR).
///
/// Two samples with identical timestamps make the rate undefined; that is
/// reported as `MetricError::ZeroTimeDelta` instead of letting an infinity
/// leak into the output.
pub fn annualized_growth_rate(
    values: &[f64],
    epoch_seconds: &[f64],
    year_seconds: f64,
) -> Result<Vec<f64>, MetricError> {
    if values.len() != epoch_seconds.len() {
        return Err(MetricError::LengthMismatch {
            values: values.len(),
            timestamps: epoch_seconds.len(),
        });
    }
    if values.len() < 2 {
        return Err(MetricError::TooFewSamples {
            count: values.len(),
        });
    }

    let mut rates = Vec::with_capacity(values.len() - 1);
    for i in 0..values.len() - 1 {
        let delta_t = epoch_seconds[i + 1] - epoch_seconds[i];
        if delta_t == 0.0 {
            return Err(MetricError::ZeroTimeDelta { index: i });
        }
        let step_return = values[i + 1] / values[i] - 1.0;
        rates.push(year_seconds * step_return / delta_t);
    }

    Ok(rates)
}

/// Smooths a series with a uniform kernel of `window` equal weights.
///
/// Output length equals input length ("same" convolution). Samples within
/// `window / 2` of either edge average fewer true neighbors against the
/// full `1/window` weight, so they are biased toward zero. A window of 1
/// is the identity.
pub fn moving_average(values: &[f64], window: usize) -> Result<Vec<f64>, MetricError> {
    if window == 0 {
        return Err(MetricError::ZeroWindow);
    }

    let n = values.len();
    // "same" convolution alignment: even windows reach one sample further
    // back than forward.
    let forward = (window - 1) / 2;
    let back = window - 1 - forward;

    let smoothed = (0..n)
        .map(|i| {
            let lo = i.saturating_sub(back);
            let hi = (i + forward).min(n.saturating_sub(1));
            values[lo..=hi].iter().sum::<f64>() / window as f64
        })
        .collect();

    Ok(smoothed)
}

/// Element-wise geometric mean of two spot price series, `sqrt(a * b)`.
///
/// Used as the rebalanced 50/50 hold benchmark the strategy vaults are
/// compared against. Trailing samples of the longer input are ignored.
pub fn geometric_mean(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| (x * y).sqrt()).collect()
}
