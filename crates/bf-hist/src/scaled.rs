//! The scaled-shape histogram variant.
//!
//! Instead of recomputing bin edges per distribution, this representation
//! reuses one canonical bin shape (built once from the standard lognormal)
//! and maps it onto a target distribution with an affine `scale`/`shift`
//! fit. Products only combine the affine coefficients, so there is no
//! pairwise expansion at all — strictly cheaper than the general
//! [`crate::ProbabilityMassHistogram`] product, and systematically less
//! accurate, because it assumes the reference shape remains valid after
//! scaling. Accuracy comparisons in the test suite confirm the error is
//! never below the general product's for a matched bin count.

use std::sync::{Arc, OnceLock};

use bf_core::{Error, Result};
use bf_dist::{EvDistribution, LognormalDist};

use crate::binning::{bin_layout, build_edges, BinSizing};
use crate::histogram::{product_moments, Histogram};
use crate::DEFAULT_NUM_BINS;

/// Probe probabilities for the two-point quantile fit.
const PROBE_LO: f64 = 0.25;
const PROBE_HI: f64 = 0.75;

/// A canonical bin shape: representative values and masses of a
/// standardized reference distribution, plus the reference quantiles at the
/// two fit probes.
///
/// Computed once and shared read-only across all instances; each
/// [`ScaledBinHistogram`] owns only its own scale/shift/exact-moment fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceShape {
    values: Vec<f64>,
    masses: Vec<f64>,
    sizing: BinSizing,
    probe_lo_q: f64,
    probe_hi_q: f64,
}

impl ReferenceShape {
    /// Build the canonical shape from the standard lognormal
    /// (`norm_mean = 0`, `norm_sd = 1`).
    pub fn standard_lognormal(num_bins: usize, sizing: BinSizing) -> Result<Self> {
        let reference = LognormalDist::new(0.0, 1.0)?;
        let edges = build_edges(&reference, num_bins, sizing)?;
        let (values, masses) = bin_layout(&reference, &edges)?;
        Ok(Self {
            values,
            masses,
            sizing,
            probe_lo_q: reference.quantile(PROBE_LO)?,
            probe_hi_q: reference.quantile(PROBE_HI)?,
        })
    }

    /// Shared shape for the given bin count and sizing. The default
    /// configuration is cached process-wide; other configurations are built
    /// on demand.
    pub fn shared(num_bins: usize, sizing: BinSizing) -> Result<Arc<Self>> {
        static DEFAULT_SHAPE: OnceLock<Result<Arc<ReferenceShape>>> = OnceLock::new();
        if num_bins == DEFAULT_NUM_BINS && sizing == BinSizing::EqualEv {
            return DEFAULT_SHAPE
                .get_or_init(|| Self::standard_lognormal(num_bins, sizing).map(Arc::new))
                .clone();
        }
        Ok(Arc::new(Self::standard_lognormal(num_bins, sizing)?))
    }

    pub fn num_bins(&self) -> usize {
        self.values.len()
    }

    /// Sizing policy the shape was built with.
    pub fn sizing(&self) -> BinSizing {
        self.sizing
    }
}

/// A histogram expressed as an affine transform of a shared reference
/// shape: bin `i` sits at `scale·r_i + shift` with the reference mass.
///
/// Exact moments are tracked out-of-band exactly as for
/// [`crate::ProbabilityMassHistogram`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledBinHistogram {
    shape: Arc<ReferenceShape>,
    scale: f64,
    shift: f64,
    exact_mean: f64,
    exact_sd: f64,
}

impl ScaledBinHistogram {
    /// Fit a scaled shape to `dist` by matching quantiles at the two probe
    /// probabilities:
    ///
    /// `scale = (q_t(0.75) - q_t(0.25)) / (q_r(0.75) - q_r(0.25))`,
    /// `shift = q_t(0.25) - scale·q_r(0.25)`.
    pub fn from_distribution(
        dist: &dyn EvDistribution,
        num_bins: usize,
        sizing: BinSizing,
    ) -> Result<Self> {
        let shape = ReferenceShape::shared(num_bins, sizing)?;
        let q_t_lo = dist.quantile(PROBE_LO)?;
        let q_t_hi = dist.quantile(PROBE_HI)?;
        let scale = (q_t_hi - q_t_lo) / (shape.probe_hi_q - shape.probe_lo_q);
        if !scale.is_finite() || scale <= 0.0 {
            return Err(Error::InvalidDistribution(format!(
                "cannot fit reference shape: probe quantiles {q_t_lo} and {q_t_hi} \
                 give scale {scale}"
            )));
        }
        let shift = q_t_lo - scale * shape.probe_lo_q;
        Ok(Self {
            shape,
            scale,
            shift,
            exact_mean: dist.exact_mean(),
            exact_sd: dist.exact_sd(),
        })
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn shift(&self) -> f64 {
        self.shift
    }

    /// Representative value of bin `i` under the current transform.
    fn value_at(&self, i: usize) -> f64 {
        self.scale * self.shape.values[i] + self.shift
    }
}

impl Histogram for ScaledBinHistogram {
    fn from_distribution(
        dist: &dyn EvDistribution,
        num_bins: usize,
        sizing: BinSizing,
    ) -> Result<Self> {
        Self::from_distribution(dist, num_bins, sizing)
    }

    /// Product of two scaled histograms: scales combine multiplicatively,
    /// shifts additively, and the reference shape is reused unchanged.
    ///
    /// Keeping the shape fixed is what makes this operator O(1) — and what
    /// makes its error grow faster than the general pairwise product's, as
    /// the true product distribution widens away from the reference shape.
    /// Exact moments are propagated with the same independence identities
    /// as the general product.
    fn product(&self, other: &Self) -> Result<Self> {
        // Operands must share one reference shape: combining only the affine
        // coefficients is meaningless across different shapes, so a mismatch
        // in bin count or sizing is surfaced rather than coerced.
        if self.shape.num_bins() != other.shape.num_bins()
            || self.shape.sizing() != other.shape.sizing()
        {
            return Err(Error::IncompatibleHistograms(format!(
                "reference shapes differ: {} bins ({:?}) vs {} bins ({:?})",
                self.shape.num_bins(),
                self.shape.sizing(),
                other.shape.num_bins(),
                other.shape.sizing()
            )));
        }
        let (exact_mean, exact_sd) =
            product_moments(self.exact_mean, self.exact_sd, other.exact_mean, other.exact_sd);
        Ok(Self {
            shape: Arc::clone(&self.shape),
            scale: self.scale * other.scale,
            shift: self.shift + other.shift,
            exact_mean,
            exact_sd,
        })
    }

    fn histogram_mean(&self) -> f64 {
        (0..self.shape.num_bins())
            .map(|i| self.value_at(i) * self.shape.masses[i])
            .sum()
    }

    fn histogram_sd(&self) -> f64 {
        let mean = self.histogram_mean();
        let var: f64 = (0..self.shape.num_bins())
            .map(|i| {
                let d = self.value_at(i) - mean;
                self.shape.masses[i] * d * d
            })
            .sum();
        var.sqrt()
    }

    fn exact_mean(&self) -> f64 {
        self.exact_mean
    }

    fn exact_sd(&self) -> f64 {
        self.exact_sd
    }

    fn num_bins(&self) -> usize {
        self.shape.num_bins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_standard_lognormal_is_identity_fit() {
        // Fitting the reference distribution itself must give scale 1,
        // shift 0 up to rounding.
        let dist = LognormalDist::new(0.0, 1.0).unwrap();
        let hist =
            ScaledBinHistogram::from_distribution(&dist, 100, BinSizing::EqualEv).unwrap();
        assert_relative_eq!(hist.scale(), 1.0, epsilon = 1e-12);
        assert!(hist.shift().abs() < 1e-12);
        assert_relative_eq!(hist.histogram_mean(), dist.exact_mean(), epsilon = 1e-9);
    }

    #[test]
    fn test_location_shift_fits_exactly() {
        // lognormal(mu, 1) is a pure rescale of lognormal(0, 1), so the
        // two-probe fit recovers it exactly: scale = e^mu, shift = 0.
        let dist = LognormalDist::new(1.5, 1.0).unwrap();
        let hist =
            ScaledBinHistogram::from_distribution(&dist, 100, BinSizing::EqualEv).unwrap();
        assert_relative_eq!(hist.scale(), 1.5f64.exp(), epsilon = 1e-10);
        assert!(hist.shift().abs() < 1e-9 * hist.scale());
        assert_relative_eq!(hist.histogram_mean(), dist.exact_mean(), epsilon = 1e-8);
    }

    #[test]
    fn test_exact_moments_copied_and_propagated() {
        let a_dist = LognormalDist::new(0.0, 1.0).unwrap();
        let b_dist = LognormalDist::new(0.5, 0.5).unwrap();
        let a = ScaledBinHistogram::from_distribution(&a_dist, 100, BinSizing::EqualEv).unwrap();
        let b = ScaledBinHistogram::from_distribution(&b_dist, 100, BinSizing::EqualEv).unwrap();
        assert_eq!(a.exact_mean(), a_dist.exact_mean());

        let prod = a.product(&b).unwrap();
        let (mean, sd) = product_moments(
            a_dist.exact_mean(),
            a_dist.exact_sd(),
            b_dist.exact_mean(),
            b_dist.exact_sd(),
        );
        assert_eq!(prod.exact_mean(), mean);
        assert_eq!(prod.exact_sd(), sd);
    }

    #[test]
    fn test_product_combines_affine_coefficients() {
        let a = ScaledBinHistogram::from_distribution(
            &LognormalDist::new(1.0, 1.0).unwrap(),
            100,
            BinSizing::EqualEv,
        )
        .unwrap();
        let b = ScaledBinHistogram::from_distribution(
            &LognormalDist::new(0.5, 1.0).unwrap(),
            100,
            BinSizing::EqualEv,
        )
        .unwrap();
        let prod = a.product(&b).unwrap();
        assert_relative_eq!(prod.scale(), a.scale() * b.scale(), epsilon = 1e-12);
        assert_relative_eq!(prod.shift(), a.shift() + b.shift(), epsilon = 1e-12);
        assert_eq!(prod.num_bins(), 100);
    }

    #[test]
    fn test_mismatched_shapes_rejected() {
        let dist = LognormalDist::new(0.0, 1.0).unwrap();
        let a = ScaledBinHistogram::from_distribution(&dist, 100, BinSizing::EqualEv).unwrap();
        let b = ScaledBinHistogram::from_distribution(&dist, 50, BinSizing::EqualEv).unwrap();
        match a.product(&b) {
            Err(Error::IncompatibleHistograms(_)) => {}
            other => panic!("expected IncompatibleHistograms, got {other:?}"),
        }
    }

    #[test]
    fn test_mixed_sizing_rejected() {
        // Same bin count but different sizing policies still means different
        // reference shapes; the product must refuse rather than keep one
        // shape and drop the other.
        let dist = LognormalDist::new(0.0, 1.0).unwrap();
        let a = ScaledBinHistogram::from_distribution(&dist, 100, BinSizing::EqualMass).unwrap();
        let b = ScaledBinHistogram::from_distribution(&dist, 100, BinSizing::EqualEv).unwrap();
        match a.product(&b) {
            Err(Error::IncompatibleHistograms(_)) => {}
            other => panic!("expected IncompatibleHistograms, got {other:?}"),
        }
    }

    #[test]
    fn test_shared_shape_is_cached_for_default() {
        let dist = LognormalDist::new(0.0, 1.0).unwrap();
        let a = ScaledBinHistogram::from_distribution(&dist, DEFAULT_NUM_BINS, BinSizing::EqualEv)
            .unwrap();
        let b = ScaledBinHistogram::from_distribution(&dist, DEFAULT_NUM_BINS, BinSizing::EqualEv)
            .unwrap();
        assert!(Arc::ptr_eq(&a.shape, &b.shape));
    }
}
