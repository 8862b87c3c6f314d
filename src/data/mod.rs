//! Light-curve data handling ahead of the search.
//!
//! - `preprocess`: clean/normalize raw measurements into a `TimeSeries`
//! - `synthetic`: seeded synthetic light curves with a known transit
//! - `diagnostics`: descriptive statistics for the `inspect` command

pub mod diagnostics;
pub mod preprocess;
pub mod synthetic;

pub use diagnostics::*;
pub use preprocess::*;
pub use synthetic::*;
