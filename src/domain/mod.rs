//! Domain types used throughout the analysis pipeline.
//!
//! This module defines:
//!
//! - the column-oriented `Dataset` and its `Column` variants
//! - term specifications (`TermSpec`, `NamedTerm`, `PrimarySpec`)
//! - the model family container (`ModelFamily`, `FamilyEntry`)
//! - fit outputs (`FitSummary`, `FamilyResult`, etc.)

pub mod types;

pub use types::*;
