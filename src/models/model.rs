//! Box-shaped transit model.
//!
//! The fitter and the search rely on two primitive operations:
//! - fold a timestamp by a trial period (phase in `[0, 1)`)
//! - evaluate the box model flux at a timestamp
//!
//! The model is flat at 1 and drops to `1 - depth` while the centered phase,
//! expressed in days, is within half a duration of the transit center.

/// Fold `t` by `period` into `[0, 1)`.
///
/// Negative times fold into the same range.
pub fn fold_phase(t: f64, period: f64) -> f64 {
    let phase = t.rem_euclid(period) / period;
    // `rem_euclid` can round up to exactly `period` for tiny negative inputs.
    if phase >= 1.0 { 0.0 } else { phase }
}

/// Phase of `t` relative to a transit at `t0`, centered on 0 (range `(-0.5, 0.5]`).
pub fn centered_phase(t: f64, period: f64, t0: f64) -> f64 {
    let phase = fold_phase(t - t0, period);
    if phase > 0.5 { phase - 1.0 } else { phase }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxTransit {
    pub depth: f64,
    pub period: f64,
    pub t0: f64,
    pub duration: f64,
}

impl BoxTransit {
    pub fn in_transit(&self, t: f64) -> bool {
        (centered_phase(t, self.period, self.t0) * self.period).abs() < self.duration / 2.0
    }

    pub fn flux_at(&self, t: f64) -> f64 {
        if self.in_transit(t) { 1.0 - self.depth } else { 1.0 }
    }

    pub fn evaluate(&self, time: &[f64]) -> Vec<f64> {
        time.iter().map(|&t| self.flux_at(t)).collect()
    }

    /// Sum of squared residuals of `flux` against this model.
    pub fn sse(&self, time: &[f64], flux: &[f64]) -> f64 {
        time.iter()
            .zip(flux)
            .map(|(&t, &f)| {
                let r = f - self.flux_at(t);
                r * r
            })
            .sum()
    }
}
