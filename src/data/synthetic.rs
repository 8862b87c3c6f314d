//! Synthetic light-curve generation.
//!
//! Used by the `simulate` command and by tests that need a light curve with a
//! known transit. Output is deterministic for a given seed.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::error::DetectError;
use crate::models::BoxTransit;

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticConfig {
    pub n_points: usize,
    /// Observation window (days), sampled uniformly from 0.
    pub baseline_days: f64,
    pub period: f64,
    /// Fractional transit depth; 0 disables the transit.
    pub depth: f64,
    pub duration: f64,
    pub t0: f64,
    pub noise_sigma: f64,
    /// Linear flux drift per day.
    pub drift_per_day: f64,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            n_points: 200,
            baseline_days: 20.0,
            period: 3.0,
            depth: 0.01,
            duration: 0.1,
            t0: 1.0,
            noise_sigma: 0.0005,
            drift_per_day: 0.0,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SyntheticCurve {
    pub time: Vec<f64>,
    pub flux: Vec<f64>,
    /// Noise-free flux (transit and drift only).
    pub truth: Vec<f64>,
}

pub fn generate_light_curve(config: &SyntheticConfig) -> Result<SyntheticCurve, DetectError> {
    if config.n_points == 0 {
        return Err(DetectError::input("Point count must be > 0."));
    }
    if !(config.baseline_days.is_finite() && config.baseline_days > 0.0) {
        return Err(DetectError::input("Baseline must be finite and > 0 days."));
    }
    if !(config.period.is_finite() && config.period > 0.0) {
        return Err(DetectError::input("Period must be finite and > 0."));
    }
    if !(config.depth.is_finite() && (0.0..1.0).contains(&config.depth)) {
        return Err(DetectError::input("Depth must be in [0, 1)."));
    }
    if !(config.duration.is_finite() && config.duration > 0.0) {
        return Err(DetectError::input("Transit duration must be finite and > 0 days."));
    }
    if !(config.noise_sigma.is_finite() && config.noise_sigma >= 0.0) {
        return Err(DetectError::input("Noise sigma must be finite and >= 0."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, config.noise_sigma)
        .map_err(|e| DetectError::input(format!("Noise distribution error: {e}")))?;

    let model = BoxTransit {
        depth: config.depth,
        period: config.period,
        t0: config.t0,
        duration: config.duration,
    };

    let step = config.baseline_days / config.n_points as f64;
    let time: Vec<f64> = (0..config.n_points).map(|i| i as f64 * step).collect();
    let truth: Vec<f64> = time
        .iter()
        .map(|&t| model.flux_at(t) + config.drift_per_day * t)
        .collect();
    let flux = truth.iter().map(|&f| f + normal.sample(&mut rng)).collect();

    Ok(SyntheticCurve { time, flux, truth })
}
