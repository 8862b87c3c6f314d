//! Detection significance and the accept/reject gates.
//!
//! - `snr = (max(model) - min(model)) / std(flux - model)`
//! - `false_alarm_probability = 1 / (1 + exp(snr - 5))`
//! - `confidence = clamp((snr - 3) / 7 * 100, 0, 100)`

use crate::domain::{BlsCandidate, DetectConfig, SignificanceResult, TimeSeries, TransitFit};
use crate::error::DetectError;
use crate::math::std_dev;

const FAP_CENTER_SNR: f64 = 5.0;
const CONFIDENCE_FLOOR_SNR: f64 = 3.0;
const CONFIDENCE_SNR_SPAN: f64 = 7.0;

pub fn evaluate_significance(series: &TimeSeries, fit: &TransitFit) -> Result<SignificanceResult, DetectError> {
    let flux = series.flux();
    if fit.model_flux.len() != flux.len() {
        return Err(DetectError::numerical(format!(
            "model has {} points but the light curve has {}",
            fit.model_flux.len(),
            flux.len()
        )));
    }

    let residuals: Vec<f64> = flux.iter().zip(&fit.model_flux).map(|(f, m)| f - m).collect();
    let noise_std = std_dev(&residuals).unwrap_or(0.0);
    if !(noise_std > 0.0) {
        return Err(DetectError::numerical("residual noise is zero; SNR is undefined"));
    }

    let max_model = fit.model_flux.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min_model = fit.model_flux.iter().copied().fold(f64::INFINITY, f64::min);
    let signal_depth = max_model - min_model;
    let snr = signal_depth / noise_std;

    Ok(SignificanceResult {
        snr,
        false_alarm_probability: false_alarm_probability(snr),
        confidence_percent: confidence_percent(snr),
        noise_std,
        signal_depth,
    })
}

/// Logistic in SNR, 0.5 at SNR 5.
pub fn false_alarm_probability(snr: f64) -> f64 {
    1.0 / (1.0 + (snr - FAP_CENTER_SNR).exp())
}

pub fn confidence_percent(snr: f64) -> f64 {
    ((snr - CONFIDENCE_FLOOR_SNR) / CONFIDENCE_SNR_SPAN * 100.0).clamp(0.0, 100.0)
}

/// Pre-fit gate on BLS power.
pub fn passes_bls_gate(candidate: &BlsCandidate, config: &DetectConfig) -> bool {
    candidate.power >= config.detection_threshold
}

/// Post-fit gate; both conditions are strict.
pub fn passes_fit_gate(significance: &SignificanceResult, config: &DetectConfig) -> bool {
    significance.snr > config.snr_threshold && significance.confidence_percent > config.confidence_threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fit_with(model_flux: Vec<f64>) -> TransitFit {
        TransitFit {
            depth: 0.01,
            period: 3.0,
            t0: 0.0,
            duration: 0.1,
            chi2: 0.0,
            reduced_chi2: 0.0,
            model_flux,
            evaluations: 1,
        }
    }

    #[test]
    fn snr_is_depth_over_residual_std() {
        let time: Vec<f64> = (0..8).map(f64::from).collect();
        let model = vec![1.0, 1.0, 0.99, 1.0, 1.0, 1.0, 0.99, 1.0];
        let noise = [0.001, -0.001, 0.001, -0.001, 0.001, -0.001, 0.001, -0.001];
        let flux: Vec<f64> = model.iter().zip(noise).map(|(m, n)| m + n).collect();
        let ts = TimeSeries::new(time, flux).unwrap();

        let sig = evaluate_significance(&ts, &fit_with(model)).unwrap();
        assert_relative_eq!(sig.noise_std, 0.001, max_relative = 1e-9);
        assert_relative_eq!(sig.signal_depth, 0.01, max_relative = 1e-9);
        assert_relative_eq!(sig.snr, 10.0, max_relative = 1e-6);
        assert_relative_eq!(sig.confidence_percent, 100.0);
    }

    #[test]
    fn zero_noise_is_numerical_error() {
        let ts = TimeSeries::new(vec![0.0, 1.0, 2.0], vec![1.0, 0.99, 1.0]).unwrap();
        let err = evaluate_significance(&ts, &fit_with(vec![1.0, 0.99, 1.0])).unwrap_err();
        assert!(matches!(err, DetectError::Numerical(_)));
    }

    #[test]
    fn probability_and_confidence_curves() {
        assert_relative_eq!(false_alarm_probability(5.0), 0.5);
        assert!(false_alarm_probability(20.0) < 1e-6);
        assert!(false_alarm_probability(0.0) > 0.99);

        assert_eq!(confidence_percent(2.0), 0.0);
        assert_relative_eq!(confidence_percent(6.5), 50.0);
        assert_eq!(confidence_percent(12.0), 100.0);
    }

    #[test]
    fn gates_use_configured_thresholds() {
        let config = DetectConfig::default();
        let candidate = BlsCandidate {
            period: 3.0,
            power: 7.0,
            t0: 0.0,
            duration: 0.1,
        };
        assert!(passes_bls_gate(&candidate, &config));
        assert!(!passes_bls_gate(&BlsCandidate { power: 6.99, ..candidate }, &config));

        let sig = |snr: f64| SignificanceResult {
            snr,
            false_alarm_probability: false_alarm_probability(snr),
            confidence_percent: confidence_percent(snr),
            noise_std: 1.0,
            signal_depth: snr,
        };
        assert!(!passes_fit_gate(&sig(7.8), &config));
        assert!(passes_fit_gate(&sig(8.0), &config));
        assert!(!passes_fit_gate(&sig(5.0), &config));
    }
}
