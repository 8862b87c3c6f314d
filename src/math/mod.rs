//! Descriptive statistics shared by preprocessing, diagnostics, and scoring.

pub mod stats;

pub use stats::*;
