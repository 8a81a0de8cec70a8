//! Core types shared across extraction, retrieval and comparison.

pub mod errors;

pub use errors::{Error, Result, ResultExt};
