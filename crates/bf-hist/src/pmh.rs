//! The probability mass histogram and its product operator.

use bf_core::{Error, Result};
use bf_dist::EvDistribution;

use crate::binning::{bin_layout, build_edges, BinSizing};
use crate::histogram::{product_moments, Histogram};

/// One histogram bin. Immutable once constructed.
///
/// `value` is the representative value (the conditional mean of the mass in
/// `[lo, hi]`), `mass` the probability carried by the bin. The outermost
/// bins of a freshly built histogram may have `lo = 0`/`-inf` or `hi = inf`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lo: f64,
    pub hi: f64,
    pub value: f64,
    pub mass: f64,
}

/// A distribution approximated as an ordered sequence of probability-weighted
/// bins, with the exact mean and standard deviation of the *represented*
/// distribution carried out-of-band.
///
/// The exact moments are never recomputed from the bins: at construction they
/// are copied from the distribution capability, and through products they are
/// propagated with the closed-form independence identities
/// ([`product_moments`]). Comparing them against [`histogram_mean`] /
/// [`histogram_sd`] measures how much discretization error a chain of
/// products has accumulated.
///
/// [`histogram_mean`]: ProbabilityMassHistogram::histogram_mean
/// [`histogram_sd`]: ProbabilityMassHistogram::histogram_sd
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityMassHistogram {
    bins: Vec<Bin>,
    exact_mean: f64,
    exact_sd: f64,
    bin_sizing: BinSizing,
}

impl ProbabilityMassHistogram {
    /// Build a histogram for `dist` with `num_bins` bins.
    ///
    /// Deterministic: identical arguments yield bit-identical bins.
    pub fn from_distribution(
        dist: &dyn EvDistribution,
        num_bins: usize,
        sizing: BinSizing,
    ) -> Result<Self> {
        let edges = build_edges(dist, num_bins, sizing)?;
        let (values, masses) = bin_layout(dist, &edges)?;
        let bins = values
            .iter()
            .zip(&masses)
            .enumerate()
            .map(|(i, (&value, &mass))| Bin { lo: edges[i], hi: edges[i + 1], value, mass })
            .collect();
        Ok(Self { bins, exact_mean: dist.exact_mean(), exact_sd: dist.exact_sd(), bin_sizing: sizing })
    }

    /// The bins in ascending value order.
    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// The sizing policy of the current bin layout. Product results report
    /// [`BinSizing::EqualMass`], the layout the rebinning merge produces.
    pub fn bin_sizing(&self) -> BinSizing {
        self.bin_sizing
    }

    /// Fraction of total expected value contributed by bins at or below `x`.
    pub fn contribution_to_ev(&self, x: f64) -> f64 {
        let total = self.histogram_mean();
        let mut acc = 0.0;
        for bin in &self.bins {
            if bin.value > x {
                break;
            }
            acc += bin.value * bin.mass;
        }
        acc / total
    }

    /// The representative value of the first bin at which the accumulated
    /// EV share reaches `fraction`.
    ///
    /// For a histogram built with [`BinSizing::EqualEv`], the result at
    /// `fraction = k/num_bins` lies strictly inside the k-th bin, i.e.
    /// strictly between the distribution-side `inv_ev_contribution` of
    /// `(k-1)/num_bins` and `k/num_bins`.
    pub fn inv_contribution_to_ev(&self, fraction: f64) -> Result<f64> {
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(Error::Validation(format!(
                "fraction must lie in (0, 1], got {fraction}"
            )));
        }
        let total: f64 = self.bins.iter().map(|b| b.value * b.mass).sum();
        // Tolerate fp undershoot: the per-bin EV increments are O(1/n),
        // vastly larger than the rounding error in the running sum.
        let target = fraction * total * (1.0 - 1e-9);
        let mut acc = 0.0;
        for bin in &self.bins {
            acc += bin.value * bin.mass;
            if acc >= target {
                return Ok(bin.value);
            }
        }
        // Unreachable for fraction <= 1 up to rounding; fall back to the top
        // bin.
        Ok(self.bins[self.bins.len() - 1].value)
    }
}

impl Histogram for ProbabilityMassHistogram {
    fn from_distribution(
        dist: &dyn EvDistribution,
        num_bins: usize,
        sizing: BinSizing,
    ) -> Result<Self> {
        Self::from_distribution(dist, num_bins, sizing)
    }

    /// Histogram of `X·Y` for independent X, Y.
    ///
    /// Exact moments are propagated analytically; the bin shape comes from
    /// the `n·m` pairwise candidates `{a.value·b.value, a.mass·b.mass}`,
    /// sorted once and merged back down to `max(n, m)` equal-mass bins with
    /// mass-weighted representative values. The mass-weighted merge
    /// preserves the first moment of the expansion, so `histogram_mean`
    /// stays at `histogram_mean(X)·histogram_mean(Y)` while `histogram_sd`
    /// degrades with each chained product.
    fn product(&self, other: &Self) -> Result<Self> {
        if self.bins.is_empty() || other.bins.is_empty() {
            return Err(Error::IncompatibleHistograms(
                "product requires non-empty operands".into(),
            ));
        }
        let (exact_mean, exact_sd) =
            product_moments(self.exact_mean, self.exact_sd, other.exact_mean, other.exact_sd);

        let target_bins = self.bins.len().max(other.bins.len());
        let mut candidates = Vec::with_capacity(self.bins.len() * other.bins.len());
        for a in &self.bins {
            for b in &other.bins {
                candidates.push((a.value * b.value, a.mass * b.mass));
            }
        }
        candidates.sort_unstable_by(|x, y| x.0.total_cmp(&y.0));

        let bins = rebin_equal_mass(&candidates, target_bins);
        Ok(Self { bins, exact_mean, exact_sd, bin_sizing: BinSizing::EqualMass })
    }

    fn histogram_mean(&self) -> f64 {
        self.bins.iter().map(|b| b.value * b.mass).sum()
    }

    fn histogram_sd(&self) -> f64 {
        let mean = self.histogram_mean();
        let var: f64 = self
            .bins
            .iter()
            .map(|b| {
                let d = b.value - mean;
                b.mass * d * d
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
        self.bins.len()
    }
}

/// Merge value-sorted `(value, mass)` candidates into exactly `target` bins
/// of (approximately) equal mass.
///
/// Each output bin's representative value is the mass-weighted average of
/// the merged candidates, which preserves the expansion's first moment
/// locally. The quota is recomputed from the remaining mass after each
/// group, and the final bin absorbs any floating-point residue, so the
/// output bin count is always exactly `target` (requires
/// `candidates.len() >= target`, which holds because `n·m >= max(n, m)`).
fn rebin_equal_mass(candidates: &[(f64, f64)], target: usize) -> Vec<Bin> {
    debug_assert!(candidates.len() >= target);

    let mut bins = Vec::with_capacity(target);
    let mut remaining_mass: f64 = candidates.iter().map(|c| c.1).sum();
    let mut idx = 0;
    for group in 0..target {
        let groups_left = target - group;
        let quota = remaining_mass / groups_left as f64;
        let lo = candidates[idx].0;
        let mut hi = lo;
        let mut mass = 0.0;
        let mut weighted_value = 0.0;
        while idx < candidates.len() {
            // Leave at least one candidate for every later group.
            let candidates_left = candidates.len() - idx;
            if mass > 0.0 && groups_left > 1 && candidates_left < groups_left {
                break;
            }
            let (v, m) = candidates[idx];
            mass += m;
            weighted_value += v * m;
            hi = v;
            idx += 1;
            if groups_left > 1 && mass >= quota {
                break;
            }
        }
        remaining_mass = (remaining_mass - mass).max(0.0);
        bins.push(Bin { lo, hi, value: weighted_value / mass, mass });
    }
    bins
}
