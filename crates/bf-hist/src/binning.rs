//! Bin-edge construction and per-bin layout.
//!
//! A bin-sizing policy decides where the `num_bins + 1` boundaries go in
//! value space; the layout step then derives each bin's probability mass and
//! representative value from the distribution capability.

use bf_core::{Error, Result};
use bf_dist::EvDistribution;

/// Rule used to place bin boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinSizing {
    /// Boundaries at `quantile(i/n)`: every bin holds equal probability
    /// mass. Simple, but under-resolves the tail contribution to the mean
    /// for heavy-tailed distributions.
    EqualMass,
    /// Boundaries at `inv_ev_contribution(i/n)`: every bin carries an equal
    /// share of the total expected value. The default; concentrates bins in
    /// the region that dominates the mean and variance.
    #[default]
    EqualEv,
}

/// Build `num_bins + 1` ascending bin boundaries for `dist`.
///
/// The outermost boundaries are the support limits (possibly 0 or ±inf);
/// interior boundaries come from the sizing policy.
pub fn build_edges(
    dist: &dyn EvDistribution,
    num_bins: usize,
    sizing: BinSizing,
) -> Result<Vec<f64>> {
    if num_bins == 0 {
        return Err(Error::DegenerateBins("at least 1 bin is required".into()));
    }
    let (support_lo, support_hi) = dist.support();

    let mut edges = Vec::with_capacity(num_bins + 1);
    edges.push(support_lo);
    for i in 1..num_bins {
        let p = i as f64 / num_bins as f64;
        let edge = match sizing {
            BinSizing::EqualMass => dist.quantile(p)?,
            BinSizing::EqualEv => dist.inv_ev_contribution(p)?,
        };
        if !edge.is_finite() {
            return Err(Error::InvalidDistribution(format!(
                "bin boundary at p={p} is not finite: {edge}"
            )));
        }
        edges.push(edge);
    }
    edges.push(support_hi);

    for i in 1..edges.len() {
        if edges[i] < edges[i - 1] {
            return Err(Error::InvalidDistribution(format!(
                "quantile function is not monotonic: edge[{}]={} < edge[{}]={}",
                i,
                edges[i],
                i - 1,
                edges[i - 1]
            )));
        }
        if edges[i] == edges[i - 1] {
            return Err(Error::DegenerateBins(format!(
                "boundaries collapsed to {} at {num_bins} bins",
                edges[i]
            )));
        }
    }
    Ok(edges)
}

/// Compute per-bin representative values and masses for the given edges.
///
/// Mass is the CDF difference across the bin. The representative value is
/// the conditional mean of the distribution restricted to the bin,
///
/// `value = exact_mean · (ev_contribution(hi) - ev_contribution(lo)) / mass`
///
/// which follows from the definition of the EV contribution. The same rule
/// covers the open-ended outer bins (there it is exactly the conditional
/// tail mean), so the histogram mean converges to the true mean without a
/// separate tail heuristic.
pub fn bin_layout(dist: &dyn EvDistribution, edges: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
    let n = edges.len() - 1;
    let mean = dist.exact_mean();

    let mut values = Vec::with_capacity(n);
    let mut masses = Vec::with_capacity(n);
    let mut cdf_lo = dist.cdf(edges[0]);
    let mut ev_lo = dist.ev_contribution(edges[0]);
    for i in 0..n {
        // Cap the last bin at exactly 1 so the masses always total 1 even
        // when cdf(support_hi) undershoots at f64 precision.
        let (cdf_hi, ev_hi) = if i == n - 1 {
            (1.0, 1.0)
        } else {
            (dist.cdf(edges[i + 1]), dist.ev_contribution(edges[i + 1]))
        };
        let mass = cdf_hi - cdf_lo;
        if !mass.is_finite() || mass <= 0.0 {
            return Err(Error::DegenerateBins(format!(
                "bin {i} of {n} has non-positive mass {mass}"
            )));
        }
        let value = mean * (ev_hi - ev_lo) / mass;
        if !value.is_finite() {
            return Err(Error::InvalidDistribution(format!(
                "bin {i} of {n} has non-finite representative value"
            )));
        }
        values.push(value);
        masses.push(mass);
        cdf_lo = cdf_hi;
        ev_lo = ev_hi;
    }
    Ok((values, masses))
}
