//! Synthetic dataset generation (test fixtures and demos).

pub mod sample;

pub use sample::*;
