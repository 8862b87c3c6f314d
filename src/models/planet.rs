//! Closed-form planet properties from an accepted transit fit.
//!
//! Assumes a Sun-like host (1 solar mass, 5778 K) with a configurable radius.
//! Non-finite inputs propagate to non-finite outputs.

use std::f64::consts::PI;

use crate::domain::PlanetProperties;

const EARTH_RADII_PER_SOLAR_RADIUS: f64 = 109.2;
const DAYS_PER_YEAR: f64 = 365.25;
const STELLAR_MASS_SOLAR: f64 = 1.0;
const STELLAR_TEMP_K: f64 = 5778.0;
const SOLAR_RADII_PER_AU: f64 = 215.0;
const KM_PER_AU: f64 = 149.6e6;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Derive planet properties from fractional `depth`, `period` (days) and the
/// stellar radius (solar radii).
pub fn planet_properties(depth: f64, period: f64, stellar_radius: f64) -> PlanetProperties {
    let radius_earth = depth.sqrt() * stellar_radius * EARTH_RADII_PER_SOLAR_RADIUS;

    // Kepler's third law in solar units.
    let semi_major_axis_au = ((period / DAYS_PER_YEAR).powi(2) * STELLAR_MASS_SOLAR).cbrt();

    let equilibrium_temp_k =
        STELLAR_TEMP_K * (stellar_radius / (2.0 * semi_major_axis_au * SOLAR_RADII_PER_AU)).sqrt();

    let orbital_velocity_kms =
        2.0 * PI * semi_major_axis_au * KM_PER_AU / (period * SECONDS_PER_DAY) / 1000.0;

    PlanetProperties {
        radius_earth,
        period_days: period,
        semi_major_axis_au,
        equilibrium_temp_k,
        orbital_velocity_kms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn earth_like_orbit() {
        let props = planet_properties(8.4e-5, 365.25, 1.0);
        assert_relative_eq!(props.semi_major_axis_au, 1.0, max_relative = 1e-12);
        assert_relative_eq!(props.radius_earth, 8.4e-5_f64.sqrt() * 109.2, max_relative = 1e-12);
        assert_relative_eq!(
            props.equilibrium_temp_k,
            5778.0 * (1.0 / 430.0_f64).sqrt(),
            max_relative = 1e-12
        );
        let v = 2.0 * PI * 149.6e6 / (365.25 * 86_400.0) / 1000.0;
        assert_relative_eq!(props.orbital_velocity_kms, v, max_relative = 1e-12);
    }

    #[test]
    fn hot_jupiter_scales_with_stellar_radius() {
        let sun = planet_properties(0.01, 3.0, 1.0);
        let big = planet_properties(0.01, 3.0, 2.0);
        assert_relative_eq!(sun.radius_earth, 10.92, max_relative = 1e-12);
        assert_relative_eq!(big.radius_earth, 2.0 * sun.radius_earth, max_relative = 1e-12);
        assert_relative_eq!(big.semi_major_axis_au, sun.semi_major_axis_au, max_relative = 1e-12);
        assert!(big.equilibrium_temp_k > sun.equilibrium_temp_k);
    }

    #[test]
    fn non_finite_inputs_propagate() {
        let props = planet_properties(f64::NAN, 3.0, 1.0);
        assert!(props.radius_earth.is_nan());
        assert!(props.semi_major_axis_au.is_finite());
    }
}
