//! Box-Least-Squares period search.
//!
//! For every trial period the light curve is folded to phase `[0, 1)` and every
//! (duration, center) box on the grid is scored with
//!
//! `power = (mean_out - mean_in) * sqrt(n_in * n_out / (n_in + n_out)) / std_out`
//!
//! clamped at 0. A box needs at least `min_points_in_transit` points inside
//! `|phase - center| < duration / 2` (no wrap-around at phase 0/1).
//!
//! Implementation notes:
//! - Each period is independent, so periods are scanned in parallel. Every
//!   worker returns its own local best and the results are merged afterwards.
//! - Within a period the points are sorted by phase once, and prefix sums of
//!   flux and flux² give each box's in/out statistics in `O(log N)`.
//! - Ties on power resolve to the smallest (period, duration, center), so the
//!   result does not depend on the number of threads.

use std::time::Instant;

use log::{debug, warn};
use rayon::prelude::*;

use crate::domain::{BlsCandidate, TimeSeries};
use crate::error::DetectError;
use crate::fit::grid::BlsGrid;
use crate::math::mean;
use crate::models::fold_phase;

/// Outcome of a full (or time-limited) scan.
#[derive(Debug, Clone, PartialEq)]
pub struct BlsSearch {
    pub best: BlsCandidate,
    pub periods_evaluated: usize,
    pub periods_total: usize,
}

impl BlsSearch {
    pub fn truncated(&self) -> bool {
        self.periods_evaluated < self.periods_total
    }
}

/// Fold every timestamp by `period`.
pub fn fold_phases(time: &[f64], period: f64) -> Vec<f64> {
    time.iter().map(|&t| fold_phase(t, period)).collect()
}

/// Scan the grid and return the highest-power candidate.
///
/// When `deadline` passes, the remaining periods are skipped and the best of
/// what was scanned is returned. The first period is always scanned.
pub fn search(series: &TimeSeries, grid: &BlsGrid, deadline: Option<Instant>) -> Result<BlsSearch, DetectError> {
    if series.is_empty() {
        return Err(DetectError::input("Cannot search an empty light curve."));
    }
    if grid.periods.is_empty() || grid.duration_fractions.is_empty() || grid.phase_offsets.is_empty() {
        return Err(DetectError::input("BLS grid is empty."));
    }

    debug!(
        "BLS grid: {} periods x {} durations x {} phases over {} points",
        grid.periods.len(),
        grid.duration_fractions.len(),
        grid.phase_offsets.len(),
        series.len()
    );

    // Power is shift invariant; centering keeps the prefix sums well conditioned.
    let offset = mean(series.flux()).unwrap_or(0.0);
    let centered: Vec<f64> = series.flux().iter().map(|f| f - offset).collect();

    let candidates: Vec<(usize, BlsCandidate)> = grid
        .periods
        .par_iter()
        .enumerate()
        .filter_map(|(idx, &period)| {
            if idx > 0 && deadline.is_some_and(|d| Instant::now() >= d) {
                return None;
            }
            Some((idx, best_for_period(series.time(), &centered, period, grid)))
        })
        .collect();

    // Deterministic merge: highest power; exact ties go to the smaller period index.
    let mut best = &candidates[0];
    for c in &candidates[1..] {
        if c.1.power > best.1.power || (c.1.power == best.1.power && c.0 < best.0) {
            best = c;
        }
    }

    let result = BlsSearch {
        best: best.1,
        periods_evaluated: candidates.len(),
        periods_total: grid.periods.len(),
    };
    if result.truncated() {
        warn!(
            "BLS time budget expired: scanned {}/{} periods",
            result.periods_evaluated, result.periods_total
        );
    }
    Ok(result)
}

/// Best box for one period. Iteration order makes the first of equal powers
/// the one with the smallest duration, then the smallest center.
fn best_for_period(time: &[f64], flux: &[f64], period: f64, grid: &BlsGrid) -> BlsCandidate {
    let n = time.len();
    let phase = fold_phases(time, period);

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| phase[a].total_cmp(&phase[b]));
    let sorted_phase: Vec<f64> = order.iter().map(|&i| phase[i]).collect();

    let mut s1 = Vec::with_capacity(n + 1);
    let mut s2 = Vec::with_capacity(n + 1);
    s1.push(0.0);
    s2.push(0.0);
    for &i in &order {
        let f = flux[i];
        s1.push(s1[s1.len() - 1] + f);
        s2.push(s2[s2.len() - 1] + f * f);
    }
    let (total1, total2) = (s1[n], s2[n]);

    let mut best = BlsCandidate {
        period,
        power: 0.0,
        t0: grid.phase_offsets[0] * period,
        duration: grid.duration_fractions[0] * period,
    };

    for &d in &grid.duration_fractions {
        let half = d / 2.0;
        for &c in &grid.phase_offsets {
            let lo = sorted_phase.partition_point(|&p| p <= c - half);
            let hi = sorted_phase.partition_point(|&p| p < c + half);
            let n_in = hi.saturating_sub(lo);
            if n_in < grid.min_points_in_transit || n_in >= n {
                continue;
            }
            let n_out = n - n_in;

            let sum_in = s1[hi] - s1[lo];
            let sum_out = total1 - sum_in;
            let sq_out = total2 - (s2[hi] - s2[lo]);

            let n_in_f = n_in as f64;
            let n_out_f = n_out as f64;
            let mean_in = sum_in / n_in_f;
            let mean_out = sum_out / n_out_f;
            let var_out = sq_out / n_out_f - mean_out * mean_out;
            // Cancellation floor: a constant out-of-transit flux has no spread.
            if var_out <= 16.0 * f64::EPSILON * (sq_out / n_out_f) || !(var_out > 0.0) {
                continue;
            }

            let power = (mean_out - mean_in) * (n_in_f * n_out_f / (n_in_f + n_out_f)).sqrt() / var_out.sqrt();
            if power > best.power {
                best = BlsCandidate {
                    period,
                    power,
                    t0: c * period,
                    duration: d * period,
                };
            }
        }
    }
    best
}
