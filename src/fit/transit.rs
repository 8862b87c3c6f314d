//! Box transit refinement.
//!
//! Starting from the BLS candidate, minimize the sum of squared residuals of
//! the box model over `(depth, period, t0, duration)` with COBYLA, a
//! derivative-free method that works from a simplex of `n + 1` trial points.
//!
//! Bounds are enforced through the objective: any parameter vector outside
//! - `depth ∈ [0, max_depth]`
//! - `period ∈ [min_period, max_period]`
//! - `duration ∈ [min_transit_duration, period / 2]`
//!
//! costs [`INFEASIBLE_COST`] instead of being clamped. The solver itself only
//! gets a loose box around the seed.

use std::cell::Cell;

use cobyla::{Func, RhoBeg, StopTols, SuccessStatus, minimize};
use log::debug;

use crate::domain::{BlsCandidate, DetectConfig, TimeSeries, TransitFit};
use crate::error::DetectError;
use crate::models::BoxTransit;

pub const INFEASIBLE_COST: f64 = 1e10;

/// Number of free model parameters.
const N_PARAMS: usize = 4;

/// Smallest depth used as the initial guess.
const MIN_INITIAL_DEPTH: f64 = 0.001;

/// Initial step: 5% of each seed value, or `ZERO_STEP` when the value is zero.
const INITIAL_STEP: f64 = 0.05;
const ZERO_STEP: f64 = 0.00025;

/// Half-width of the solver box, in units of `max(|seed|, 1)`.
const SEARCH_HALF_WIDTH: f64 = 10.0;

const X_TOLERANCE_REL: f64 = 1e-4;
const F_TOLERANCE_REL: f64 = 1e-10;

#[derive(Debug, Clone, Copy)]
struct Bounds {
    max_depth: f64,
    min_period: f64,
    max_period: f64,
    min_duration: f64,
}

impl Bounds {
    fn contains(&self, m: &BoxTransit) -> bool {
        (0.0..=self.max_depth).contains(&m.depth)
            && (self.min_period..=self.max_period).contains(&m.period)
            && m.duration >= self.min_duration
            && m.duration <= m.period / 2.0
    }
}

fn to_model(x: &[f64]) -> BoxTransit {
    BoxTransit {
        depth: x[0],
        period: x[1],
        t0: x[2],
        duration: x[3],
    }
}

/// Refine `seed` against `series`.
///
/// Errors are all `Numerical`: too few points for the degrees of freedom, a
/// solver that stopped before converging (including the evaluation cap
/// `max_fit_iterations`), or one that never left the infeasible region.
pub fn fit_transit(series: &TimeSeries, seed: &BlsCandidate, config: &DetectConfig) -> Result<TransitFit, DetectError> {
    let n = series.len();
    if n <= N_PARAMS {
        return Err(DetectError::numerical(format!(
            "{n} points leave no degrees of freedom for a {N_PARAMS}-parameter fit"
        )));
    }

    let time = series.time();
    let flux = series.flux();
    let bounds = Bounds {
        max_depth: config.max_depth,
        min_period: config.min_period,
        max_period: config.max_period,
        min_duration: config.min_transit_duration,
    };

    let min_flux = flux.iter().copied().fold(f64::INFINITY, f64::min);
    let x0 = [
        (1.0 - min_flux).max(MIN_INITIAL_DEPTH),
        seed.period,
        seed.t0,
        seed.duration,
    ];

    let evaluations = Cell::new(0usize);
    let cost = |x: &[f64], _: &mut ()| {
        evaluations.set(evaluations.get() + 1);
        let model = to_model(x);
        if !bounds.contains(&model) {
            return INFEASIBLE_COST;
        }
        let sse = model.sse(time, flux);
        if sse.is_finite() { sse } else { INFEASIBLE_COST }
    };

    let search_box = solver_box(&x0);
    let steps = initial_steps(&x0);
    let stop = StopTols {
        ftol_rel: F_TOLERANCE_REL,
        xtol_rel: X_TOLERANCE_REL,
        ..StopTols::default()
    };
    let no_constraints: Vec<&dyn Func<()>> = vec![];

    let outcome = minimize(
        cost,
        &x0,
        &search_box,
        &no_constraints,
        (),
        config.max_fit_iterations,
        RhoBeg::Set(steps),
        Some(stop),
    );
    let evaluations = evaluations.get();

    let (x, fx) = match outcome {
        Ok((status, x, fx)) => {
            debug!("cobyla: {status:?} after {evaluations} evaluations, cost {fx:.6e}");
            let converged = matches!(
                status,
                SuccessStatus::Success | SuccessStatus::FtolReached | SuccessStatus::XtolReached
            );
            if !converged {
                return Err(DetectError::numerical(format!(
                    "optimizer did not converge after {evaluations} evaluations ({status:?})"
                )));
            }
            (x, fx)
        }
        Err((status, _, _)) => {
            return Err(DetectError::numerical(format!(
                "optimizer did not converge: {status:?} after {evaluations} evaluations"
            )));
        }
    };
    if fx >= INFEASIBLE_COST || x.len() != N_PARAMS {
        return Err(DetectError::numerical("optimizer found no feasible parameters"));
    }

    let model = to_model(&x);
    let model_flux = model.evaluate(time);
    let chi2: f64 = flux
        .iter()
        .zip(&model_flux)
        .map(|(f, m)| (f - m) * (f - m))
        .sum();

    Ok(TransitFit {
        depth: model.depth,
        period: model.period,
        t0: model.t0,
        duration: model.duration,
        chi2,
        reduced_chi2: chi2 / (n - N_PARAMS) as f64,
        model_flux,
        evaluations,
    })
}

fn initial_steps(x0: &[f64; N_PARAMS]) -> Vec<f64> {
    x0.iter()
        .map(|&v| if v != 0.0 { INITIAL_STEP * v.abs() } else { ZERO_STEP })
        .collect()
}

fn solver_box(x0: &[f64; N_PARAMS]) -> Vec<(f64, f64)> {
    x0.iter()
        .map(|&v| {
            let half = SEARCH_HALF_WIDTH * v.abs().max(1.0);
            (v - half, v + half)
        })
        .collect()
}
