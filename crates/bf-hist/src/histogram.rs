//! The capability shared by all histogram representations.

use bf_core::Result;
use bf_dist::EvDistribution;

use crate::binning::BinSizing;

/// A finite histogram approximating a continuous distribution, with exact
/// moments tracked out-of-band.
///
/// `product` takes `Self` on both sides, so mixing representations (e.g. a
/// [`crate::ProbabilityMassHistogram`] with a
/// [`crate::ScaledBinHistogram`]) is rejected at compile time rather than
/// coerced at runtime.
pub trait Histogram: Sized {
    /// Build a histogram for `dist` with `num_bins` bins.
    fn from_distribution(
        dist: &dyn EvDistribution,
        num_bins: usize,
        sizing: BinSizing,
    ) -> Result<Self>;

    /// Histogram of the product of two independent random variables.
    fn product(&self, other: &Self) -> Result<Self>;

    /// Approximate mean computed from the bins.
    fn histogram_mean(&self) -> f64;

    /// Approximate standard deviation computed from the bins.
    fn histogram_sd(&self) -> f64;

    /// Exact mean of the represented distribution (closed form, propagated
    /// through products — never recomputed from the bins).
    fn exact_mean(&self) -> f64;

    /// Exact standard deviation of the represented distribution.
    fn exact_sd(&self) -> f64;

    /// Number of bins.
    fn num_bins(&self) -> usize;
}

/// Exact moments of the product of two independent random variables.
///
/// For independent X, Y:
///
/// - `E[XY]   = E[X]·E[Y]`
/// - `Var(XY) = E[X]²·Var(Y) + E[Y]²·Var(X) + Var(X)·Var(Y)`
///
/// These identities use only independence, not distributional shape, so the
/// returned moments are exact for any independent pair.
pub fn product_moments(mean_a: f64, sd_a: f64, mean_b: f64, sd_b: f64) -> (f64, f64) {
    let var_a = sd_a * sd_a;
    let var_b = sd_b * sd_b;
    let mean = mean_a * mean_b;
    let var = mean_a * mean_a * var_b + mean_b * mean_b * var_a + var_a * var_b;
    (mean, var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use bf_dist::{EvDistribution, LognormalDist};

    #[test]
    fn test_product_moments_match_lognormal_closure() {
        // The product of independent lognormals is lognormal with location
        // mu1+mu2 and scale sqrt(s1^2+s2^2); the generic identities must
        // reproduce its closed-form moments.
        let a = LognormalDist::new(0.4, 1.1).unwrap();
        let b = LognormalDist::new(-0.2, 0.6).unwrap();
        let prod = LognormalDist::new(0.2, (1.1f64 * 1.1 + 0.6 * 0.6).sqrt()).unwrap();

        let (mean, sd) =
            product_moments(a.exact_mean(), a.exact_sd(), b.exact_mean(), b.exact_sd());
        assert_relative_eq!(mean, prod.exact_mean(), epsilon = 1e-12);
        assert_relative_eq!(sd, prod.exact_sd(), epsilon = 1e-12);
    }

    #[test]
    fn test_product_with_constant() {
        // A degenerate factor (sd 0) scales the moments.
        let (mean, sd) = product_moments(3.0, 0.5, 2.0, 0.0);
        assert_relative_eq!(mean, 6.0, epsilon = 1e-15);
        assert_relative_eq!(sd, 1.0, epsilon = 1e-15);
    }
}
