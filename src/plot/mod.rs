//! Plot renderers for family results.
//!
//! Two surfaces, same two modes:
//!
//! - `ascii`: fixed-size character grids, deterministic (golden-testable)
//! - `chart`: Plotters SVG output for reports/notebooks

pub mod ascii;
pub mod chart;
