//! Descriptive diagnostics for a raw light curve.
//!
//! Purely informational: none of these numbers feed the detection gates.

use serde::Serialize;

use crate::error::DetectError;
use crate::math::{LinearTrend, linear_trend, mad, mean, median, std_dev};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightCurveDiagnostics {
    pub n_points: usize,
    pub time_span: f64,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub mad: f64,
    pub coefficient_of_variation: f64,
    /// `1 - min(flux / median)`.
    pub naive_depth: f64,
    /// `naive_depth / (mad / median)`, 0 when the MAD is 0.
    pub naive_snr: f64,
    pub max_jump: f64,
    pub mean_abs_change: f64,
    pub jump_ratio: f64,
    pub trend_slope: f64,
    pub trend_r_squared: f64,
}

/// Compute diagnostics over the finite, time-sorted points of `(time, flux)`.
pub fn diagnose(time: &[f64], flux: &[f64]) -> Result<LightCurveDiagnostics, DetectError> {
    if time.len() != flux.len() {
        return Err(DetectError::input("time and flux must have equal length."));
    }

    let mut points: Vec<(f64, f64)> = time
        .iter()
        .zip(flux)
        .filter(|(t, f)| t.is_finite() && f.is_finite())
        .map(|(&t, &f)| (t, f))
        .collect();
    if points.len() < 2 {
        return Err(DetectError::input("Need at least 2 finite points for diagnostics."));
    }
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    let (t, f): (Vec<f64>, Vec<f64>) = points.into_iter().unzip();

    // Non-empty from here on, so the `Option`s below are all `Some`.
    let mean_flux = mean(&f).unwrap_or(f64::NAN);
    let median_flux = median(&f).unwrap_or(f64::NAN);
    let std_flux = std_dev(&f).unwrap_or(f64::NAN);
    let mad_flux = mad(&f).unwrap_or(f64::NAN);

    let min_flux = f.iter().copied().fold(f64::INFINITY, f64::min);
    let naive_depth = 1.0 - min_flux / median_flux;
    let noise = mad_flux / median_flux;
    let naive_snr = if noise > 0.0 { naive_depth / noise } else { 0.0 };

    let changes: Vec<f64> = f.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
    let max_jump = changes.iter().copied().fold(0.0, f64::max);
    let mean_abs_change = mean(&changes).unwrap_or(0.0);
    let jump_ratio = if mean_abs_change > 0.0 {
        max_jump / mean_abs_change
    } else {
        0.0
    };

    let trend = linear_trend(&t, &f).unwrap_or(LinearTrend {
        slope: 0.0,
        intercept: mean_flux,
        r_squared: 0.0,
    });

    Ok(LightCurveDiagnostics {
        n_points: t.len(),
        time_span: t[t.len() - 1] - t[0],
        mean: mean_flux,
        median: median_flux,
        std: std_flux,
        mad: mad_flux,
        coefficient_of_variation: std_flux / mean_flux,
        naive_depth,
        naive_snr,
        max_jump,
        mean_abs_change,
        jump_ratio,
        trend_slope: trend.slope,
        trend_r_squared: trend.r_squared,
    })
}
