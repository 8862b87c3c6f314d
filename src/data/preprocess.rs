//! Light-curve cleaning.
//!
//! Order matters:
//! 1. drop indices where time or flux is non-finite
//! 2. stable sort by time
//! 3. divide flux by its median
//! 4. one-pass sigma clip around the median of the normalized flux
//!
//! The input slices are never modified; a new `TimeSeries` is returned.

use log::debug;

use crate::domain::{ClipMode, DetectConfig, TimeSeries};
use crate::error::DetectError;
use crate::math::{median, std_dev};

/// Clean a raw light curve into a `TimeSeries`.
///
/// Fails with `InsufficientData` when fewer than `config.min_clean_points`
/// survive, and with an input error for mismatched lengths or a zero median.
///
/// Running it again on its own output keeps the same points, but the flux is
/// divided by the new median, which is only close to 1 after clipping. Values
/// are bit-identical only when that median is exactly 1.
pub fn preprocess(time: &[f64], flux: &[f64], config: &DetectConfig) -> Result<TimeSeries, DetectError> {
    if time.len() != flux.len() {
        return Err(DetectError::input(format!(
            "time and flux must have equal length (got {} and {}).",
            time.len(),
            flux.len()
        )));
    }

    let mut points: Vec<(f64, f64)> = time
        .iter()
        .zip(flux)
        .filter(|(t, f)| t.is_finite() && f.is_finite())
        .map(|(&t, &f)| (t, f))
        .collect();
    let n_finite = points.len();
    if n_finite == 0 {
        return Err(DetectError::InsufficientData {
            actual: 0,
            minimum: config.min_clean_points,
        });
    }

    // `sort_by` is stable, so equal timestamps keep their input order.
    points.sort_by(|a, b| a.0.total_cmp(&b.0));

    let raw_flux: Vec<f64> = points.iter().map(|p| p.1).collect();
    let scale = median(&raw_flux).unwrap_or(0.0);
    if scale == 0.0 || !scale.is_finite() {
        return Err(DetectError::input("Median flux is zero; cannot normalize the light curve."));
    }
    for p in &mut points {
        p.1 /= scale;
    }

    let normalized: Vec<f64> = points.iter().map(|p| p.1).collect();
    let center = median(&normalized).unwrap_or(1.0);
    let spread = std_dev(&normalized).unwrap_or(0.0);
    let limit = config.clip_sigma * spread;

    // A flat series has no outliers.
    let kept: Vec<(f64, f64)> = if spread > 0.0 {
        points
            .into_iter()
            .filter(|&(_, f)| !is_outlier(f - center, limit, config.clip_mode))
            .collect()
    } else {
        points
    };

    debug!(
        "preprocess: {} raw, {} finite, {} kept (median scale {scale:.6}, clip {:.6})",
        time.len(),
        n_finite,
        kept.len(),
        limit
    );

    if kept.len() < config.min_clean_points {
        return Err(DetectError::InsufficientData {
            actual: kept.len(),
            minimum: config.min_clean_points,
        });
    }

    let (t, f): (Vec<f64>, Vec<f64>) = kept.into_iter().unzip();
    TimeSeries::new(t, f)
}

fn is_outlier(deviation: f64, limit: f64, mode: ClipMode) -> bool {
    match mode {
        ClipMode::Upper => deviation >= limit,
        ClipMode::Symmetric => deviation.abs() >= limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SyntheticConfig, generate_light_curve};
    use approx::assert_relative_eq;

    fn config() -> DetectConfig {
        DetectConfig::default()
    }

    /// Flux pattern whose median is exactly the base level.
    fn patterned(n: usize, base: f64) -> (Vec<f64>, Vec<f64>) {
        let time: Vec<f64> = (0..n).map(|i| i as f64 * 0.1).collect();
        let flux: Vec<f64> = (0..n)
            .map(|i| match i % 3 {
                0 => base,
                1 => base * 1.001,
                _ => base * 0.999,
            })
            .collect();
        (time, flux)
    }

    #[test]
    fn drops_non_finite_and_sorts() {
        let (mut time, mut flux) = patterned(90, 1.0);
        time.reverse();
        flux[5] = f64::NAN;
        time[7] = f64::INFINITY;

        let ts = preprocess(&time, &flux, &config()).unwrap();
        assert_eq!(ts.len(), 88);
        assert!(ts.time().windows(2).all(|w| w[0] <= w[1]));
        assert!(ts.flux().iter().all(|f| f.is_finite()));
    }

    #[test]
    fn normalizes_by_median() {
        let (time, flux) = patterned(90, 2500.0);
        let ts = preprocess(&time, &flux, &config()).unwrap();
        let m = median(ts.flux()).unwrap();
        assert!((m - 1.0).abs() < 1e-12);
    }

    #[test]
    fn upper_clip_removes_spike_but_keeps_dips() {
        let (time, mut flux) = patterned(120, 1.0);
        flux[10] = 1.5;
        flux[20] = 0.95;

        let ts = preprocess(&time, &flux, &config()).unwrap();
        assert_eq!(ts.len(), 119);
        assert!(ts.flux().iter().all(|&f| f < 1.1));
        assert!(ts.flux().iter().any(|&f| f < 0.96));
    }

    #[test]
    fn symmetric_clip_removes_both_sides() {
        let (time, mut flux) = patterned(120, 1.0);
        flux[10] = 1.5;
        flux[20] = 0.5;

        let cfg = DetectConfig {
            clip_mode: ClipMode::Symmetric,
            ..config()
        };
        let ts = preprocess(&time, &flux, &cfg).unwrap();
        assert_eq!(ts.len(), 118);
    }

    #[test]
    fn does_not_mutate_input() {
        let (time, mut flux) = patterned(60, 3.0);
        flux[3] = f64::NAN;
        let before = flux.clone();
        let _ = preprocess(&time, &flux, &config()).unwrap();
        assert_eq!(flux.len(), before.len());
        assert!(flux[3].is_nan());
        assert_eq!(flux[4], before[4]);
    }

    #[test]
    fn is_idempotent_when_median_is_exactly_one() {
        let (time, mut flux) = patterned(150, 1.0);
        flux[42] = 1.3;

        let once = preprocess(&time, &flux, &config()).unwrap();
        let twice = preprocess(once.time(), once.flux(), &config()).unwrap();
        assert_eq!(once.len(), 149);
        assert_eq!(once, twice);
    }

    #[test]
    fn second_pass_on_noisy_output_keeps_points() {
        let curve = generate_light_curve(&SyntheticConfig {
            n_points: 2000,
            depth: 0.0,
            noise_sigma: 0.01,
            seed: 7,
            ..SyntheticConfig::default()
        })
        .unwrap();

        let cfg = DetectConfig::default();
        let once = preprocess(&curve.time, &curve.flux, &cfg).unwrap();
        let twice = preprocess(once.time(), once.flux(), &cfg).unwrap();

        assert_eq!(twice.len(), once.len());
        assert_eq!(twice.time(), once.time());
        for (a, b) in once.flux().iter().zip(twice.flux()) {
            assert_relative_eq!(*a, *b, max_relative = 1e-3);
        }
    }

    #[test]
    fn flat_series_keeps_every_point() {
        let time: Vec<f64> = (0..60).map(f64::from).collect();
        let flux = vec![5.0; 60];
        let ts = preprocess(&time, &flux, &config()).unwrap();
        assert_eq!(ts.len(), 60);
        assert!(ts.flux().iter().all(|&f| f == 1.0));
    }

    #[test]
    fn too_few_points_is_insufficient_data() {
        let (time, flux) = patterned(30, 1.0);
        let err = preprocess(&time, &flux, &config()).unwrap_err();
        assert_eq!(err, DetectError::InsufficientData { actual: 30, minimum: 50 });
    }

    #[test]
    fn zero_median_is_input_error() {
        let time: Vec<f64> = (0..60).map(f64::from).collect();
        let flux = vec![0.0; 60];
        let err = preprocess(&time, &flux, &config()).unwrap_err();
        assert!(matches!(err, DetectError::Input(_)));
    }
}
