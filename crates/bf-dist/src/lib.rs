//! Distribution capabilities for binfold.
//!
//! This crate hosts the analytic distribution objects the histogram engine
//! consumes: closed-form quantiles, exact moments, and expected-value
//! contribution functions. The engine in `bf-hist` only ever calls the
//! [`EvDistribution`] interface and never re-derives family-specific
//! formulas.

pub mod exponential;
pub mod lognormal;
pub mod math;
pub mod traits;

pub use exponential::ExponentialDist;
pub use lognormal::LognormalDist;
pub use traits::EvDistribution;
