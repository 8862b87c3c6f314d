//! Shared domain types.
//!
//! These types flow through the detection pipeline in order:
//!
//! - `TimeSeries` (cleaned light curve, immutable)
//! - `BlsCandidate` (best grid point of the period search)
//! - `TransitFit` (refined box model)
//! - `SignificanceResult` / `PlanetProperties`
//! - `DetectionResult` (terminal aggregate, one `Verdict`)

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::DetectError;

pub const DEFAULT_MIN_PERIOD: f64 = 0.5;
pub const DEFAULT_MAX_PERIOD: f64 = 50.0;
pub const DEFAULT_MIN_TRANSIT_DURATION: f64 = 0.01;
pub const DEFAULT_DETECTION_THRESHOLD: f64 = 7.0;
pub const DEFAULT_STELLAR_RADIUS: f64 = 1.0;

/// Raw rows required by the ingestion layer before the core is invoked.
pub const MIN_RAW_ROWS: usize = 100;

/// Which side(s) of the median the outlier clip applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ClipMode {
    /// Drop only bright outliers (`flux - median >= k·std`); transit dips survive.
    Upper,
    /// Drop outliers on both sides (`|flux - median| >= k·std`).
    Symmetric,
}

/// A cleaned, time-ordered light curve.
///
/// Invariants (checked by [`TimeSeries::new`]): equal lengths, all values finite,
/// time non-decreasing.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    time: Vec<f64>,
    flux: Vec<f64>,
}

impl TimeSeries {
    pub fn new(time: Vec<f64>, flux: Vec<f64>) -> Result<Self, DetectError> {
        if time.len() != flux.len() {
            return Err(DetectError::input(format!(
                "time and flux must have equal length (got {} and {}).",
                time.len(),
                flux.len()
            )));
        }
        if time.iter().chain(flux.iter()).any(|v| !v.is_finite()) {
            return Err(DetectError::input("time series contains non-finite values."));
        }
        if time.windows(2).any(|w| w[1] < w[0]) {
            return Err(DetectError::input("time series is not sorted by time."));
        }
        Ok(Self { time, flux })
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn flux(&self) -> &[f64] {
        &self.flux
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Best grid point of the BLS period search.
///
/// `power` is an unbounded detection statistic; `t0` and `duration` are in days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlsCandidate {
    pub period: f64,
    pub power: f64,
    pub t0: f64,
    pub duration: f64,
}

/// Refined box-transit parameters and goodness of fit.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitFit {
    pub depth: f64,
    pub period: f64,
    pub t0: f64,
    pub duration: f64,
    pub chi2: f64,
    pub reduced_chi2: f64,
    pub model_flux: Vec<f64>,
    pub evaluations: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignificanceResult {
    pub snr: f64,
    pub false_alarm_probability: f64,
    pub confidence_percent: f64,
    pub noise_std: f64,
    pub signal_depth: f64,
}

/// Physical quantities derived from an accepted fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetProperties {
    pub radius_earth: f64,
    pub period_days: f64,
    pub semi_major_axis_au: f64,
    pub equilibrium_temp_k: f64,
    pub orbital_velocity_kms: f64,
}

/// Terminal state of one detection run.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// BLS power stayed below the detection threshold; no fit was attempted.
    RejectedNoSignal,
    /// The optimizer or the significance stage failed numerically.
    FitFailed { reason: String },
    /// A fit exists but its SNR/confidence did not clear the post-fit gate.
    RejectedLowSignificance {
        fit: TransitFit,
        significance: SignificanceResult,
    },
    Accepted {
        fit: TransitFit,
        significance: SignificanceResult,
        properties: PlanetProperties,
    },
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::RejectedNoSignal => "rejected: no signal",
            Verdict::FitFailed { .. } => "rejected: fit failed",
            Verdict::RejectedLowSignificance { .. } => "rejected: low significance",
            Verdict::Accepted { .. } => "accepted",
        }
    }

    pub fn fit(&self) -> Option<&TransitFit> {
        match self {
            Verdict::RejectedLowSignificance { fit, .. } | Verdict::Accepted { fit, .. } => Some(fit),
            _ => None,
        }
    }

    pub fn significance(&self) -> Option<&SignificanceResult> {
        match self {
            Verdict::RejectedLowSignificance { significance, .. }
            | Verdict::Accepted { significance, .. } => Some(significance),
            _ => None,
        }
    }
}

/// Aggregate produced by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResult {
    /// Points left after preprocessing.
    pub n_points: usize,
    pub candidate: BlsCandidate,
    /// Periods actually scanned (less than `periods_total` if a time budget expired).
    pub periods_evaluated: usize,
    pub periods_total: usize,
    pub verdict: Verdict,
}

impl DetectionResult {
    pub fn planet_detected(&self) -> bool {
        matches!(self.verdict, Verdict::Accepted { .. })
    }
}

/// Full configuration of the detection core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectConfig {
    pub min_period: f64,
    pub max_period: f64,
    pub period_steps: usize,

    /// Transit duration grid, as fractions of the trial period.
    pub min_duration_fraction: f64,
    pub max_duration_fraction: f64,
    pub duration_steps: usize,
    /// Transit-center offsets per period (fractions of phase, inclusive of 0 and 1).
    pub phase_steps: usize,
    pub min_points_in_transit: usize,

    /// Lower bound (days) on the fitted duration.
    pub min_transit_duration: f64,
    /// Upper bound on the fitted fractional depth.
    pub max_depth: f64,

    /// BLS power gate.
    pub detection_threshold: f64,
    /// Post-fit gate: `snr > snr_threshold && confidence > confidence_threshold`.
    pub snr_threshold: f64,
    pub confidence_threshold: f64,

    /// Host star radius (solar radii).
    pub stellar_radius: f64,

    pub min_clean_points: usize,
    pub clip_sigma: f64,
    pub clip_mode: ClipMode,

    /// Objective-evaluation cap for the transit fit.
    pub max_fit_iterations: usize,

    /// Optional wall-clock budget for the period scan (seconds).
    pub time_budget_secs: Option<f64>,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            min_period: DEFAULT_MIN_PERIOD,
            max_period: DEFAULT_MAX_PERIOD,
            period_steps: 1000,
            min_duration_fraction: 0.01,
            max_duration_fraction: 0.2,
            duration_steps: 20,
            phase_steps: 50,
            min_points_in_transit: 3,
            min_transit_duration: DEFAULT_MIN_TRANSIT_DURATION,
            max_depth: 0.1,
            detection_threshold: DEFAULT_DETECTION_THRESHOLD,
            snr_threshold: 5.0,
            confidence_threshold: 70.0,
            stellar_radius: DEFAULT_STELLAR_RADIUS,
            min_clean_points: 50,
            clip_sigma: 3.0,
            clip_mode: ClipMode::Upper,
            max_fit_iterations: 800,
            time_budget_secs: None,
        }
    }
}

impl DetectConfig {
    pub fn validate(&self) -> Result<(), DetectError> {
        if !(self.min_period.is_finite() && self.max_period.is_finite() && self.min_period > 0.0) {
            return Err(DetectError::input(format!(
                "Invalid period range: min={}, max={} (must be finite and > 0).",
                self.min_period, self.max_period
            )));
        }
        if self.max_period <= self.min_period {
            return Err(DetectError::input("max_period must be greater than min_period."));
        }
        if self.period_steps < 2 || self.duration_steps < 2 || self.phase_steps < 2 {
            return Err(DetectError::input("Grid step counts must be >= 2."));
        }
        let fractions_ok = self.min_duration_fraction > 0.0
            && self.max_duration_fraction <= 1.0
            && self.min_duration_fraction < self.max_duration_fraction;
        if !fractions_ok {
            return Err(DetectError::input(
                "Duration fractions must satisfy 0 < min < max <= 1.",
            ));
        }
        if self.min_points_in_transit == 0 {
            return Err(DetectError::input("min_points_in_transit must be >= 1."));
        }
        if !(self.min_transit_duration.is_finite() && self.min_transit_duration > 0.0) {
            return Err(DetectError::input("min_transit_duration must be finite and > 0."));
        }
        if !(self.max_depth.is_finite() && self.max_depth > 0.0 && self.max_depth < 1.0) {
            return Err(DetectError::input("max_depth must be in (0, 1)."));
        }
        let thresholds = [
            self.detection_threshold,
            self.snr_threshold,
            self.confidence_threshold,
            self.clip_sigma,
        ];
        if thresholds.iter().any(|v| !v.is_finite()) {
            return Err(DetectError::input("Thresholds must be finite."));
        }
        if !(self.clip_sigma > 0.0) {
            return Err(DetectError::input("clip_sigma must be > 0."));
        }
        if !(self.stellar_radius.is_finite() && self.stellar_radius > 0.0) {
            return Err(DetectError::input("stellar_radius must be finite and > 0."));
        }
        if self.max_fit_iterations == 0 {
            return Err(DetectError::input("max_fit_iterations must be >= 1."));
        }
        if let Some(secs) = self.time_budget_secs {
            if !(secs.is_finite() && secs >= 0.0) {
                return Err(DetectError::input("time budget must be finite and >= 0 seconds."));
            }
        }
        Ok(())
    }
}
