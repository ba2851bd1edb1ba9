//! Error types for binfold.
//!
//! Every operation in this workspace is a pure, deterministic function of its
//! inputs, so a failure is always a caller input problem and never a
//! transient condition. Nothing here is retried or recovered internally.

use thiserror::Error;

/// binfold error type.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// The supplied distribution's quantile or EV-contribution function is
    /// non-monotonic, undefined, or produces non-finite values inside its
    /// open domain.
    #[error("invalid distribution: {0}")]
    InvalidDistribution(String),

    /// The product operator received operands that cannot be combined (e.g.
    /// reference shapes of different sizes, or an empty operand).
    #[error("incompatible histograms: {0}")]
    IncompatibleHistograms(String),

    /// Fewer than one bin requested, or successive bin boundaries collapsed
    /// to a single value at the requested bin count.
    #[error("degenerate bins: {0}")]
    DegenerateBins(String),

    /// A caller-supplied argument is outside its documented domain.
    #[error("validation error: {0}")]
    Validation(String),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_detail() {
        let e = Error::DegenerateBins("at least 1 bin is required".into());
        assert_eq!(e.to_string(), "degenerate bins: at least 1 bin is required");
    }

    #[test]
    fn test_error_is_clone() {
        let e = Error::Validation("p must lie in (0, 1)".into());
        let _ = e.clone();
    }
}
