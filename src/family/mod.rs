//! Model family construction.

pub mod builder;

pub use builder::*;
