//! Read/write result JSON files.
//!
//! A result file is the portable record of one detection run:
//! - the JSON report exactly as printed by `detect`
//! - the configuration that produced it, the input source, and a UTC timestamp
//! - the fitted box model sampled on a centered phase grid, plus the observed
//!   points folded on the fitted ephemeris (both absent when no fit exists)
//!
//! `plot --result` renders from this file without re-running the search.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DetectConfig, DetectionReport, TimeSeries, TransitFit};
use crate::error::AppError;
use crate::fit::lin_space;
use crate::models::centered_phase;

pub const TOOL_NAME: &str = "transit";

const MODEL_GRID_POINTS: usize = 201;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub config: DetectConfig,
    pub report: DetectionReport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_grid: Option<ModelGrid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed: Option<PhasedPoints>,
}

/// Box model sampled over centered phase `[-0.5, 0.5]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelGrid {
    pub depth: f64,
    pub period: f64,
    pub t0: f64,
    pub duration: f64,
    pub phase: Vec<f64>,
    pub flux: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhasedPoints {
    pub phase: Vec<f64>,
    pub flux: Vec<f64>,
}

impl ResultFile {
    pub fn new(
        source: &str,
        config: &DetectConfig,
        report: DetectionReport,
        fit: Option<&TransitFit>,
        series: Option<&TimeSeries>,
    ) -> Self {
        let model_grid = fit.map(build_model_grid);
        let observed = match (fit, series) {
            (Some(fit), Some(series)) => Some(PhasedPoints {
                phase: series
                    .time()
                    .iter()
                    .map(|&t| centered_phase(t, fit.period, fit.t0))
                    .collect(),
                flux: series.flux().to_vec(),
            }),
            _ => None,
        };

        Self {
            tool: TOOL_NAME.to_string(),
            generated_at: Utc::now(),
            source: source.to_string(),
            config: config.clone(),
            report,
            model_grid,
            observed,
        }
    }
}

/// Write a result JSON file.
pub fn write_result_json(path: &Path, result: &ResultFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create result JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, result)
        .map_err(|e| AppError::new(2, format!("Failed to write result JSON: {e}")))?;
    Ok(())
}

/// Read a result JSON file.
pub fn read_result_json(path: &Path) -> Result<ResultFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open result JSON '{}': {e}", path.display())))?;
    let result: ResultFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid result JSON: {e}")))?;
    Ok(result)
}

fn build_model_grid(fit: &TransitFit) -> ModelGrid {
    let phase = lin_space(-0.5, 0.5, MODEL_GRID_POINTS).unwrap_or_default();
    let flux = phase
        .iter()
        .map(|&ph| {
            if (ph * fit.period).abs() < fit.duration / 2.0 {
                1.0 - fit.depth
            } else {
                1.0
            }
        })
        .collect();

    ModelGrid {
        depth: fit.depth,
        period: fit.period,
        t0: fit.t0,
        duration: fit.duration,
        phase,
        flux,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit() -> TransitFit {
        TransitFit {
            depth: 0.01,
            period: 3.0,
            t0: 1.0,
            duration: 0.3,
            chi2: 1e-4,
            reduced_chi2: 1e-6,
            model_flux: vec![1.0, 0.99, 1.0],
            evaluations: 40,
        }
    }

    #[test]
    fn model_grid_is_centered_on_transit() {
        let grid = build_model_grid(&fit());
        assert_eq!(grid.phase.len(), MODEL_GRID_POINTS);
        assert_eq!(grid.phase[0], -0.5);
        assert_eq!(grid.phase[MODEL_GRID_POINTS - 1], 0.5);
        assert_eq!(grid.flux[MODEL_GRID_POINTS / 2], 0.99);
        assert_eq!(grid.flux[0], 1.0);
        // In transit while |phase| < 0.05; grid spacing is 0.005.
        let in_transit = grid.flux.iter().filter(|&&f| f < 1.0).count();
        assert!((15..=21).contains(&in_transit), "in_transit={in_transit}");
    }

    #[test]
    fn result_file_round_trips_through_disk() {
        let series = TimeSeries::new(vec![0.0, 1.0, 2.0], vec![1.0, 0.99, 1.0]).unwrap();
        let report = DetectionReport::error("example");
        let file = ResultFile::new("stdin", &DetectConfig::default(), report, Some(&fit()), Some(&series));
        assert_eq!(file.observed.as_ref().unwrap().phase[1], 0.0);

        let path = std::env::temp_dir().join(format!("transit-result-{}.json", std::process::id()));
        write_result_json(&path, &file).unwrap();
        let back = read_result_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(back.tool, TOOL_NAME);
        let (a, b) = (back.model_grid.unwrap(), file.model_grid.unwrap());
        assert_eq!(a.phase.len(), b.phase.len());
        assert!(a.flux.iter().zip(&b.flux).all(|(x, y)| (x - y).abs() < 1e-12));
        assert_eq!(back.report, file.report);
    }

    #[test]
    fn no_fit_means_no_grid() {
        let file = ResultFile::new("x.csv", &DetectConfig::default(), DetectionReport::error("e"), None, None);
        assert!(file.model_grid.is_none());
        let json = serde_json::to_value(&file).unwrap();
        assert!(json.get("model_grid").is_none());
        assert!(json["generated_at"].is_string());
    }
}
