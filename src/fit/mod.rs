//! Family fitting orchestration.
//!
//! Responsibilities:
//!
//! - resolve term specifications into concrete design columns
//! - fit a single model (OLS or logistic IRLS) with inference
//! - run the base fit plus one augmented fit per family entry, isolating
//!   per-entry failures

pub mod analyze;
pub mod design;
pub mod fitter;

pub use analyze::*;
pub use design::*;
pub use fitter::*;
