//! JSON output shapes.
//!
//! A run emits exactly one of:
//!
//! - `{ planet_detected, confidence, analysis, planet_properties, transit_parameters }`
//! - `{ error }` when the input could not be analysed at all
//!
//! Values are rounded for presentation here; the in-memory results keep full precision.

use serde::{Deserialize, Serialize};

use crate::domain::types::{DetectionResult, PlanetProperties, Verdict};
use crate::error::DetectError;
use crate::math::round_to;

/// Confidence reported when the BLS gate rejects the light curve.
pub const NO_SIGNAL_CONFIDENCE: f64 = 15.0;
/// Confidence reported when the transit fit fails.
pub const FIT_FAILED_CONFIDENCE: f64 = 25.0;

pub const NO_SIGNAL_MESSAGE: &str = "No significant periodic signal detected";
pub const FIT_FAILED_MESSAGE: &str = "Transit model fitting failed";
pub const LOW_SIGNIFICANCE_MESSAGE: &str = "Fit did not meet significance threshold";

/// Either a completed analysis or an input failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetectionReport {
    Completed(DetectionOutput),
    Failed(ErrorOutput),
}

impl DetectionReport {
    pub fn error(message: impl Into<String>) -> Self {
        DetectionReport::Failed(ErrorOutput {
            error: message.into(),
        })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DetectionReport::Failed(_))
    }
}

impl From<&DetectionResult> for DetectionReport {
    fn from(result: &DetectionResult) -> Self {
        DetectionReport::Completed(DetectionOutput::from(result))
    }
}

impl From<DetectError> for DetectionReport {
    fn from(err: DetectError) -> Self {
        DetectionReport::error(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorOutput {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionOutput {
    pub planet_detected: bool,
    pub confidence: f64,
    pub analysis: Analysis,
    pub planet_properties: Option<PlanetProperties>,
    pub transit_parameters: Option<TransitParameters>,
}

/// Analysis metrics. Fields that do not apply to a terminal state are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bls_power: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_period: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal_to_noise: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection_significance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub false_alarm_probability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitParameters {
    pub depth_ppm: f64,
    pub period_days: f64,
    pub duration_hours: f64,
    pub reduced_chi_squared: f64,
}

impl From<&DetectionResult> for DetectionOutput {
    fn from(result: &DetectionResult) -> Self {
        let bls_power = Some(round_to(result.candidate.power, 2));

        match &result.verdict {
            Verdict::RejectedNoSignal => DetectionOutput {
                planet_detected: false,
                confidence: NO_SIGNAL_CONFIDENCE,
                analysis: Analysis {
                    bls_power,
                    best_period: Some(round_to(result.candidate.period, 3)),
                    message: Some(NO_SIGNAL_MESSAGE.to_string()),
                    ..Analysis::default()
                },
                planet_properties: None,
                transit_parameters: None,
            },
            Verdict::FitFailed { reason } => DetectionOutput {
                planet_detected: false,
                confidence: FIT_FAILED_CONFIDENCE,
                analysis: Analysis {
                    bls_power,
                    message: Some(format!("{FIT_FAILED_MESSAGE}: {reason}")),
                    ..Analysis::default()
                },
                planet_properties: None,
                transit_parameters: None,
            },
            Verdict::RejectedLowSignificance { significance, .. } => DetectionOutput {
                planet_detected: false,
                confidence: round_to(significance.confidence_percent, 1),
                analysis: Analysis {
                    message: Some(LOW_SIGNIFICANCE_MESSAGE.to_string()),
                    ..significance_analysis(bls_power, significance)
                },
                planet_properties: None,
                transit_parameters: None,
            },
            Verdict::Accepted {
                fit,
                significance,
                properties,
            } => DetectionOutput {
                planet_detected: true,
                confidence: round_to(significance.confidence_percent, 1),
                analysis: significance_analysis(bls_power, significance),
                planet_properties: Some(PlanetProperties {
                    radius_earth: round_to(properties.radius_earth, 2),
                    period_days: round_to(properties.period_days, 3),
                    semi_major_axis_au: round_to(properties.semi_major_axis_au, 4),
                    equilibrium_temp_k: round_to(properties.equilibrium_temp_k, 1),
                    orbital_velocity_kms: round_to(properties.orbital_velocity_kms, 2),
                }),
                transit_parameters: Some(TransitParameters {
                    depth_ppm: round_to(fit.depth * 1e6, 1),
                    period_days: round_to(fit.period, 3),
                    duration_hours: round_to(fit.duration * 24.0, 2),
                    reduced_chi_squared: round_to(fit.reduced_chi2, 3),
                }),
            },
        }
    }
}

fn significance_analysis(
    bls_power: Option<f64>,
    significance: &crate::domain::types::SignificanceResult,
) -> Analysis {
    Analysis {
        bls_power,
        signal_to_noise: Some(round_to(significance.snr, 2)),
        detection_significance: Some(round_to(significance.snr, 1)),
        false_alarm_probability: Some(round_to(significance.false_alarm_probability, 6)),
        ..Analysis::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{BlsCandidate, SignificanceResult, TransitFit};

    fn candidate(power: f64) -> BlsCandidate {
        BlsCandidate {
            period: 3.0004,
            power,
            t0: 1.0,
            duration: 0.1,
        }
    }

    fn fit() -> TransitFit {
        TransitFit {
            depth: 0.0099,
            period: 2.9993,
            t0: 1.0039,
            duration: 0.061,
            chi2: 5e-5,
            reduced_chi2: 2.5e-7,
            model_flux: vec![1.0, 0.9901],
            evaluations: 51,
        }
    }

    fn significance(snr: f64, confidence: f64) -> SignificanceResult {
        SignificanceResult {
            snr,
            false_alarm_probability: 1.0 / (1.0 + (snr - 5.0).exp()),
            confidence_percent: confidence,
            noise_std: 0.0005,
            signal_depth: 0.0099,
        }
    }

    fn result(verdict: Verdict, power: f64) -> DetectionResult {
        DetectionResult {
            n_points: 200,
            candidate: candidate(power),
            periods_evaluated: 1000,
            periods_total: 1000,
            verdict,
        }
    }

    #[test]
    fn no_signal_shape_has_message_and_null_sections() {
        let out = DetectionReport::from(&result(Verdict::RejectedNoSignal, 4.512));
        let json = serde_json::to_value(&out).unwrap();

        assert_eq!(json["planet_detected"], false);
        assert_eq!(json["confidence"], 15.0);
        assert_eq!(json["analysis"]["bls_power"], 4.51);
        assert_eq!(json["analysis"]["message"], NO_SIGNAL_MESSAGE);
        assert!(json["analysis"].get("signal_to_noise").is_none());
        assert!(json["planet_properties"].is_null());
        assert!(json["transit_parameters"].is_null());
    }

    #[test]
    fn fit_failure_uses_fixed_confidence() {
        let verdict = Verdict::FitFailed {
            reason: "optimizer did not converge".to_string(),
        };
        let DetectionReport::Completed(out) = DetectionReport::from(&result(verdict, 9.0)) else {
            panic!("expected completed output");
        };
        assert!(!out.planet_detected);
        assert_eq!(out.confidence, FIT_FAILED_CONFIDENCE);
        assert!(out.analysis.message.unwrap().starts_with(FIT_FAILED_MESSAGE));
    }

    #[test]
    fn accepted_shape_rounds_transit_parameters() {
        let verdict = Verdict::Accepted {
            fit: fit(),
            significance: significance(19.674, 100.0),
            properties: PlanetProperties {
                radius_earth: 10.8654,
                period_days: 2.99934,
                semi_major_axis_au: 0.040_123_4,
                equilibrium_temp_k: 1_389.27,
                orbital_velocity_kms: 0.1457,
            },
        };
        let json = serde_json::to_value(DetectionReport::from(&result(verdict, 51.29))).unwrap();

        assert_eq!(json["planet_detected"], true);
        assert_eq!(json["confidence"], 100.0);
        assert_eq!(json["analysis"]["signal_to_noise"], 19.67);
        assert_eq!(json["analysis"]["detection_significance"], 19.7);
        assert_eq!(json["transit_parameters"]["depth_ppm"], 9900.0);
        assert_eq!(json["transit_parameters"]["duration_hours"], 1.46);
        assert_eq!(json["planet_properties"]["radius_earth"], 10.87);
        assert!(json["analysis"].get("message").is_none());
    }

    #[test]
    fn low_significance_keeps_metrics_and_reason() {
        let verdict = Verdict::RejectedLowSignificance {
            fit: fit(),
            significance: significance(1.81, 0.0),
        };
        let json = serde_json::to_value(DetectionReport::from(&result(verdict, 22.38))).unwrap();
        assert_eq!(json["planet_detected"], false);
        assert_eq!(json["confidence"], 0.0);
        assert_eq!(json["analysis"]["signal_to_noise"], 1.81);
        assert_eq!(json["analysis"]["message"], LOW_SIGNIFICANCE_MESSAGE);
        assert!(json["transit_parameters"].is_null());
    }

    #[test]
    fn error_report_has_only_error_field() {
        let err = DetectError::InsufficientData { actual: 30, minimum: 50 };
        let json = serde_json::to_value(DetectionReport::from(err)).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert!(obj["error"].as_str().unwrap().starts_with("Insufficient data points"));
    }

    #[test]
    fn report_reloads_from_json() {
        let original = DetectionReport::from(&result(Verdict::RejectedNoSignal, 3.2));
        let text = serde_json::to_string(&original).unwrap();
        let back: DetectionReport = serde_json::from_str(&text).unwrap();
        assert_eq!(back, original);

        let err: DetectionReport = serde_json::from_str(r#"{"error":"bad"}"#).unwrap();
        assert!(err.is_error());
    }
}
