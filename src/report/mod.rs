//! Reporting utilities: per-point residuals and formatted terminal output.

pub mod format;

use crate::domain::{TimeSeries, TransitFit};
use crate::error::DetectError;
use crate::models::centered_phase;

/// One cleaned measurement against the fitted model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointResidual {
    pub time: f64,
    pub flux: f64,
    /// Phase relative to the fitted transit center, in `(-0.5, 0.5]`.
    pub phase: f64,
    pub model: f64,
    pub residual: f64,
}

/// Pair every point of `series` with the fitted model flux.
pub fn compute_residuals(series: &TimeSeries, fit: &TransitFit) -> Result<Vec<PointResidual>, DetectError> {
    if fit.model_flux.len() != series.len() {
        return Err(DetectError::numerical("Model length does not match the light curve."));
    }
    let out = series
        .time()
        .iter()
        .zip(series.flux())
        .zip(&fit.model_flux)
        .map(|((&time, &flux), &model)| PointResidual {
            time,
            flux,
            phase: centered_phase(time, fit.period, fit.t0),
            model,
            residual: flux - model,
        })
        .collect();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn residuals_follow_the_model() {
        let ts = TimeSeries::new(vec![0.0, 1.0, 1.5], vec![1.001, 0.991, 0.999]).unwrap();
        let fit = TransitFit {
            depth: 0.01,
            period: 3.0,
            t0: 1.0,
            duration: 0.2,
            chi2: 0.0,
            reduced_chi2: 0.0,
            model_flux: vec![1.0, 0.99, 1.0],
            evaluations: 1,
        };
        let r = compute_residuals(&ts, &fit).unwrap();
        assert_eq!(r.len(), 3);
        assert!((r[1].residual - 0.001).abs() < 1e-12);
        assert_eq!(r[1].phase, 0.0);
        assert!((r[2].phase - 0.5 / 3.0).abs() < 1e-12);
        assert!((r[0].phase + 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn mismatched_model_is_rejected() {
        let ts = TimeSeries::new(vec![0.0, 1.0], vec![1.0, 1.0]).unwrap();
        let fit = TransitFit {
            depth: 0.0,
            period: 1.0,
            t0: 0.0,
            duration: 0.1,
            chi2: 0.0,
            reduced_chi2: 0.0,
            model_flux: vec![1.0],
            evaluations: 0,
        };
        assert!(compute_residuals(&ts, &fit).is_err());
    }
}
