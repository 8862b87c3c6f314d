//! Small descriptive statistics over `f64` slices.
//!
//! Conventions:
//! - standard deviations are population (`ddof = 0`) values
//! - every function returns `None` on empty input instead of `NaN`

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median (average of the two middle values for even lengths).
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    median_mut(&mut sorted)
}

/// Median that sorts `values` in place.
pub fn median_mut(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

/// Population standard deviation.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}

/// Median absolute deviation (unscaled).
pub fn mad(values: &[f64]) -> Option<f64> {
    let m = median(values)?;
    let mut abs: Vec<f64> = values.iter().map(|v| (v - m).abs()).collect();
    median_mut(&mut abs)
}

/// Ordinary least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Fit a straight line through `(x, y)`.
///
/// Returns `None` for mismatched/short input or when `x` has no spread.
pub fn linear_trend(x: &[f64], y: &[f64]) -> Option<LinearTrend> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }
    let x_bar = mean(x)?;
    let y_bar = mean(y)?;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - x_bar;
        let dy = yi - y_bar;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    if sxx <= 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let r_squared = if syy > 0.0 { (sxy * sxy) / (sxx * syy) } else { 0.0 };
    Some(LinearTrend {
        slope,
        intercept: y_bar - slope * x_bar,
        r_squared,
    })
}

/// Round to a fixed number of decimals (half away from zero).
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn median_handles_odd_and_even_lengths() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn std_dev_is_population() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_abs_diff_eq!(std_dev(&v).unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn mad_ignores_single_outlier() {
        let v = [1.0, 1.0, 2.0, 2.0, 4.0, 6.0, 9.0];
        assert_abs_diff_eq!(mad(&v).unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn linear_trend_recovers_exact_line() {
        let x: Vec<f64> = (0..10).map(f64::from).collect();
        let y: Vec<f64> = x.iter().map(|v| 0.5 * v - 2.0).collect();
        let trend = linear_trend(&x, &y).unwrap();
        assert_abs_diff_eq!(trend.slope, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(trend.intercept, -2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(trend.r_squared, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn linear_trend_rejects_constant_x() {
        assert!(linear_trend(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_none());
    }

    #[test]
    fn round_to_matches_decimal_places() {
        assert_abs_diff_eq!(round_to(3.14159, 2), 3.14, epsilon = 1e-12);
        assert_abs_diff_eq!(round_to(10_012.46, 1), 10_012.5, epsilon = 1e-9);
    }
}
