//! `famr`: model-family regression screens.
//!
//! Starting from a base model `response ~ primary`, the crate builds a
//! "family" of augmented models, one per auxiliary term, fits them all, and
//! summarizes how the primary effect holds up:
//!
//! - [`family::build_family`] enumerates the default family from a dataset
//! - [`fit::analyze`] fits the base model plus one augmented model per
//!   family entry, isolating per-entry failures
//! - [`report`] renders the coefficient/p-value table
//! - [`plot`] renders the scatter-with-fit-lines and dual-log-p-value views
//!
//! The crate is a library by design: dataset loading and command-line
//! presentation belong to callers.

pub mod data;
pub mod domain;
pub mod error;
pub mod family;
pub mod fit;
pub mod math;
pub mod plot;
pub mod report;

pub use domain::{
    AnalyzeOptions, AugmentedFit, Column, Dataset, FamilyEntry, FamilyResult, FitFamily,
    FitSummary, ModelFamily, NamedTerm, PrimarySpec, SkippedEntry, TermSpec,
};
pub use error::AppError;
pub use family::build_family;
pub use fit::analyze;
