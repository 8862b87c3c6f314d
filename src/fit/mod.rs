//! Transit search and fitting.
//!
//! Responsibilities:
//!
//! - generate the period/duration/phase grids
//! - scan the grid with BLS (parallel over periods)
//! - refine the best candidate with a box-model fit
//! - score the fit and apply the detection gates

pub mod bls;
pub mod grid;
pub mod significance;
pub mod transit;

pub use bls::*;
pub use grid::*;
pub use significance::*;
pub use transit::*;
