//! The distribution capability consumed by the histogram engine.

use bf_core::Result;

/// A continuous distribution exposing quantiles, exact moments, and
/// expected-value contributions.
///
/// `ev_contribution(x)` is the share of the total expected value carried by
/// outcomes at or below `x`:
///
/// `ev_contribution(x) = ∫_{-∞}^{x} t·pdf(t) dt / mean`
///
/// It is monotone non-decreasing, 0 at the lower support limit and 1 at the
/// upper limit. Bin builders use its inverse to place boundaries so that
/// every bin carries an equal share of the mean rather than an equal share
/// of probability mass, which concentrates resolution where it matters for
/// moment accuracy (e.g. the right tail of a lognormal).
pub trait EvDistribution: Send + Sync {
    /// Support limits in value space. Entries may be `0.0` or infinite.
    fn support(&self) -> (f64, f64);

    /// Cumulative distribution function.
    fn cdf(&self, x: f64) -> f64;

    /// Inverse CDF for `p` in the open interval `(0, 1)`.
    fn quantile(&self, p: f64) -> Result<f64>;

    /// Closed-form mean of the family.
    fn exact_mean(&self) -> f64;

    /// Closed-form standard deviation of the family.
    fn exact_sd(&self) -> f64;

    /// Fraction of total expected value contributed at or below `x`, in
    /// `[0, 1]`.
    fn ev_contribution(&self, x: f64) -> f64;

    /// Inverse of [`ev_contribution`] for fractions in `(0, 1)`.
    ///
    /// Families without a closed-form inverse may resolve this numerically
    /// (see [`crate::math::invert_monotone`]); it must agree with
    /// `ev_contribution` to floating-point tolerance either way.
    fn inv_ev_contribution(&self, fraction: f64) -> Result<f64>;
}
