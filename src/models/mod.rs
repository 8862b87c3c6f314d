//! Transit model and derived physics.
//!
//! Both are small pure functions so that search/fit code can stay generic.

pub mod model;
pub mod planet;

pub use model::*;
pub use planet::*;
