//! Search grid generation.
//!
//! The BLS scan is a deterministic grid search over three axes:
//! - trial period (log-spaced, so short periods get finer resolution)
//! - transit duration as a fraction of the period (linear)
//! - transit center as a fraction of phase (linear, both ends included)

use crate::domain::DetectConfig;
use crate::error::DetectError;

/// Generate `steps` log-spaced points between `min` and `max` (inclusive).
pub fn log_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, DetectError> {
    if !(min.is_finite() && max.is_finite() && min > 0.0 && max > 0.0 && max > min) {
        return Err(DetectError::input(format!(
            "Invalid period range: min={min}, max={max} (must be finite, >0, and max>min)."
        )));
    }
    if steps < 2 {
        return Err(DetectError::input("Period steps must be >= 2."));
    }

    let ln_min = min.ln();
    let ln_max = max.ln();
    let step = (ln_max - ln_min) / (steps as f64 - 1.0);

    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        out.push((ln_min + step * i as f64).exp());
    }
    // Pin the endpoints against exp/ln round-off.
    out[0] = min;
    out[steps - 1] = max;
    Ok(out)
}

/// Generate `steps` evenly spaced points between `min` and `max` (inclusive).
pub fn lin_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, DetectError> {
    if !(min.is_finite() && max.is_finite() && max >= min) {
        return Err(DetectError::input(format!("Invalid linear range: min={min}, max={max}.")));
    }
    if steps < 2 {
        return Err(DetectError::input("Grid steps must be >= 2."));
    }
    let step = (max - min) / (steps as f64 - 1.0);
    let mut out: Vec<f64> = (0..steps).map(|i| min + step * i as f64).collect();
    out[steps - 1] = max;
    Ok(out)
}

/// The three BLS axes, each ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct BlsGrid {
    pub periods: Vec<f64>,
    pub duration_fractions: Vec<f64>,
    pub phase_offsets: Vec<f64>,
    pub min_points_in_transit: usize,
}

impl BlsGrid {
    pub fn from_config(config: &DetectConfig) -> Result<Self, DetectError> {
        Ok(Self {
            periods: log_space(config.min_period, config.max_period, config.period_steps)?,
            duration_fractions: lin_space(
                config.min_duration_fraction,
                config.max_duration_fraction,
                config.duration_steps,
            )?,
            phase_offsets: lin_space(0.0, 1.0, config.phase_steps)?,
            min_points_in_transit: config.min_points_in_transit.max(1),
        })
    }

    /// Number of (period, duration, phase) combinations.
    pub fn size(&self) -> usize {
        self.periods.len() * self.duration_fractions.len() * self.phase_offsets.len()
    }
}
