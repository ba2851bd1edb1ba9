//! Shared core types for binfold.
//!
//! Hosts the error type used across the workspace so that the distribution
//! capabilities (`bf-dist`) and the histogram engine (`bf-hist`) agree on
//! failure semantics without depending on each other.

pub mod error;

pub use error::{Error, Result};
