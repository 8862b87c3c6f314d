//! Command-line parsing for the transit search tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the search/fit code.
//!
//! Detection settings can also come from the environment (or a `.env` file);
//! explicit flags win.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::{
    ClipMode, DEFAULT_DETECTION_THRESHOLD, DEFAULT_MAX_PERIOD, DEFAULT_MIN_PERIOD, DEFAULT_MIN_TRANSIT_DURATION,
    DEFAULT_STELLAR_RADIUS,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "transit", version, about = "Periodic transit search in stellar light curves (BLS)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search a `time,flux` CSV for a periodic transit and report the decision.
    Detect(DetectArgs),
    /// Print descriptive diagnostics for a light curve (no detection).
    Inspect(InspectArgs),
    /// Write a synthetic light curve with an injected box transit.
    Simulate(SimulateArgs),
    /// Plot a previously exported result JSON.
    Plot(PlotArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The machine-readable detection report.
    Json,
    /// A human-readable summary.
    Text,
}

/// Options for `detect`.
#[derive(Debug, Parser, Clone)]
pub struct DetectArgs {
    /// Input CSV with `time` and `flux` columns (reads stdin when omitted).
    #[arg(short = 'i', long, value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// Shortest trial period (days).
    #[arg(long, env = "TRANSIT_MIN_PERIOD", default_value_t = DEFAULT_MIN_PERIOD)]
    pub min_period: f64,

    /// Longest trial period (days).
    #[arg(long, env = "TRANSIT_MAX_PERIOD", default_value_t = DEFAULT_MAX_PERIOD)]
    pub max_period: f64,

    /// Shortest transit duration the fit may use (days).
    #[arg(long, env = "TRANSIT_MIN_DURATION", default_value_t = DEFAULT_MIN_TRANSIT_DURATION)]
    pub min_duration: f64,

    /// BLS power required before a transit fit is attempted.
    #[arg(long, env = "TRANSIT_DETECTION_THRESHOLD", default_value_t = DEFAULT_DETECTION_THRESHOLD)]
    pub detection_threshold: f64,

    /// Host star radius (solar radii).
    #[arg(long, env = "TRANSIT_STELLAR_RADIUS", default_value_t = DEFAULT_STELLAR_RADIUS)]
    pub stellar_radius: f64,

    /// Number of log-spaced trial periods.
    #[arg(long, default_value_t = 1000)]
    pub period_steps: usize,

    /// Number of trial durations (fractions of the period).
    #[arg(long, default_value_t = 20)]
    pub duration_steps: usize,

    /// Number of trial transit centers per period.
    #[arg(long, default_value_t = 50)]
    pub phase_steps: usize,

    /// Which outliers the 3-sigma clip removes.
    #[arg(long, value_enum, default_value_t = ClipMode::Upper)]
    pub clip: ClipMode,

    /// Objective-evaluation cap for the transit fit.
    #[arg(long, default_value_t = 800)]
    pub max_fit_iterations: usize,

    /// Wall-clock budget for the period scan (seconds).
    #[arg(long, value_name = "SECS")]
    pub time_budget: Option<f64>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long)]
    pub pretty: bool,

    /// Render a phase-folded ASCII plot (text format only).
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Show up to N in-transit points (text format only).
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Export per-point results (time, flux, phase, model, residual) to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the report, config, and fitted model grid to JSON.
    #[arg(long = "export-result")]
    pub export_result: Option<PathBuf>,
}

/// Options for `inspect`.
#[derive(Debug, Parser, Clone)]
pub struct InspectArgs {
    /// Input CSV with `time` and `flux` columns (reads stdin when omitted).
    #[arg(short = 'i', long, value_name = "CSV")]
    pub input: Option<PathBuf>,

    /// Print diagnostics as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Options for `simulate`.
#[derive(Debug, Parser, Clone)]
pub struct SimulateArgs {
    /// Number of samples.
    #[arg(short = 'n', long, default_value_t = 200)]
    pub points: usize,

    /// Observation window (days).
    #[arg(long, default_value_t = 20.0)]
    pub baseline: f64,

    /// Orbital period (days).
    #[arg(long, default_value_t = 3.0)]
    pub period: f64,

    /// Fractional transit depth (0 disables the transit).
    #[arg(long, default_value_t = 0.01)]
    pub depth: f64,

    /// Transit duration (days).
    #[arg(long, default_value_t = 0.1)]
    pub duration: f64,

    /// Mid-transit time of the first transit (days).
    #[arg(long, default_value_t = 1.0)]
    pub t0: f64,

    /// Gaussian noise sigma (relative flux).
    #[arg(long, default_value_t = 0.0005)]
    pub noise: f64,

    /// Linear drift per day (relative flux).
    #[arg(long, default_value_t = 0.0)]
    pub drift: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output CSV (stdout when omitted).
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Options for plotting a saved result.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Result JSON file produced by `transit detect --export-result`.
    #[arg(long, value_name = "JSON")]
    pub result: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}
