//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the cleaned light curve (`TimeSeries`) and stage outputs
//!   (`BlsCandidate`, `TransitFit`, `SignificanceResult`, `PlanetProperties`)
//! - the terminal aggregate (`DetectionResult`, `Verdict`)
//! - the detection configuration (`DetectConfig`)
//! - the JSON output shapes (`DetectionReport`)

pub mod output;
pub mod types;

pub use output::*;
pub use types::*;
