//! Reporting utilities: summary rows and formatted terminal output.

pub mod format;

pub use format::*;
