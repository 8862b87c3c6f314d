//! `transit-search` library crate.
//!
//! The binary (`transit`) is a thin wrapper around this library so that:
//!
//! - the detection core is testable without spawning processes
//! - the pipeline can be driven directly with in-memory `(time, flux)` arrays
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
