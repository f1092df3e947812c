//! Mathematical utilities: least-squares solves, IRLS, and inference helpers.

pub mod inference;
pub mod irls;
pub mod ols;

pub use inference::*;
pub use irls::*;
pub use ols::*;
