//! Shared detection pipeline used by the CLI commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV ingest -> preprocess -> BLS search -> transit fit -> significance -> properties
//!
//! The stages form a one-way state machine:
//! `Raw -> Cleaned -> Searched -> {Fitted | FitFailed} -> terminal verdict`.
//! Input problems stop the run with a `DetectError`; numerical trouble in the
//! fit or significance stage becomes `Verdict::FitFailed`.

use std::path::Path;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::data::preprocess;
use crate::domain::{
    BlsCandidate, DetectConfig, DetectionReport, DetectionResult, MIN_RAW_ROWS, TimeSeries, Verdict,
};
use crate::error::DetectError;
use crate::fit::{BlsGrid, evaluate_significance, fit_transit, passes_bls_gate, passes_fit_gate, search};
use crate::io::ingest::{IngestedCurve, load_light_curve};
use crate::models::planet_properties;
use crate::report::{PointResidual, compute_residuals};

/// All computed outputs of a single `transit detect` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub source: String,
    pub ingest: IngestedCurve,
    pub series: TimeSeries,
    pub result: DetectionResult,
    /// Per-point residuals, present when a fit exists.
    pub residuals: Option<Vec<PointResidual>>,
}

impl RunOutput {
    pub fn report(&self) -> DetectionReport {
        DetectionReport::from(&self.result)
    }
}

/// Human-readable name of an input source.
pub fn source_label(input: Option<&Path>) -> String {
    input.map_or_else(|| "stdin".to_string(), |p| p.display().to_string())
}

/// Read, clean, and analyse a light curve from a file (or stdin).
pub fn run_detect(input: Option<&Path>, config: &DetectConfig) -> Result<RunOutput, DetectError> {
    let source = source_label(input);
    let ingest = load_light_curve(input, MIN_RAW_ROWS)?;
    info!(
        "read {} rows from {source} ({} skipped)",
        ingest.rows_read,
        ingest.row_errors.len()
    );
    for e in &ingest.row_errors {
        debug!("line {}: {}", e.line, e.message);
    }

    let series = clean(&ingest.time, &ingest.flux, config)?;
    let result = detect_cleaned(&series, config)?;

    let residuals = match result.verdict.fit() {
        Some(fit) => Some(compute_residuals(&series, fit)?),
        None => None,
    };

    Ok(RunOutput {
        source,
        ingest,
        series,
        result,
        residuals,
    })
}

/// Run the whole core and always produce a report.
///
/// Input errors become the `{ "error": ... }` shape.
pub fn run_detection(time: &[f64], flux: &[f64], config: &DetectConfig) -> DetectionReport {
    match detect(time, flux, config) {
        Ok(result) => DetectionReport::from(&result),
        Err(err) => {
            warn!("detection aborted: {err}");
            DetectionReport::from(err)
        }
    }
}

/// Preprocess and analyse a raw `(time, flux)` pair.
pub fn detect(time: &[f64], flux: &[f64], config: &DetectConfig) -> Result<DetectionResult, DetectError> {
    let series = clean(time, flux, config)?;
    detect_cleaned(&series, config)
}

/// Validate the configuration and clean the raw series.
pub fn clean(time: &[f64], flux: &[f64], config: &DetectConfig) -> Result<TimeSeries, DetectError> {
    config.validate()?;
    let series = preprocess(time, flux, config)?;
    info!("cleaned light curve: {} of {} points kept", series.len(), time.len());
    Ok(series)
}

/// Search, fit, and decide on an already cleaned series.
pub fn detect_cleaned(series: &TimeSeries, config: &DetectConfig) -> Result<DetectionResult, DetectError> {
    config.validate()?;
    let grid = BlsGrid::from_config(config)?;
    debug!("BLS grid size: {} combinations", grid.size());

    let start = Instant::now();
    let deadline = config
        .time_budget_secs
        .map(|secs| start + Duration::from_secs_f64(secs));
    let search = search(series, &grid, deadline)?;
    let candidate = search.best;
    info!(
        "best BLS candidate: period={:.4}d power={:.2} t0={:.4} duration={:.4} ({:.2?})",
        candidate.period,
        candidate.power,
        candidate.t0,
        candidate.duration,
        start.elapsed()
    );

    let verdict = decide(series, &candidate, config);
    info!("verdict: {}", verdict.label());

    Ok(DetectionResult {
        n_points: series.len(),
        candidate,
        periods_evaluated: search.periods_evaluated,
        periods_total: search.periods_total,
        verdict,
    })
}

fn decide(series: &TimeSeries, candidate: &BlsCandidate, config: &DetectConfig) -> Verdict {
    if !passes_bls_gate(candidate, config) {
        return Verdict::RejectedNoSignal;
    }

    let fitted = fit_transit(series, candidate, config).and_then(|fit| {
        let significance = evaluate_significance(series, &fit)?;
        Ok((fit, significance))
    });
    let (fit, significance) = match fitted {
        Ok(pair) => pair,
        Err(err) => {
            warn!("transit fit failed: {err}");
            let reason = match err {
                DetectError::Numerical(msg) => msg,
                other => other.to_string(),
            };
            return Verdict::FitFailed { reason };
        }
    };
    info!(
        "transit fit: depth={:.6} period={:.4}d t0={:.4} duration={:.4}d snr={:.2} ({} evaluations)",
        fit.depth, fit.period, fit.t0, fit.duration, significance.snr, fit.evaluations
    );

    if !passes_fit_gate(&significance, config) {
        return Verdict::RejectedLowSignificance { fit, significance };
    }

    let properties = planet_properties(fit.depth, fit.period, config.stellar_radius);
    Verdict::Accepted {
        fit,
        significance,
        properties,
    }
}
