//! Sample-free histogram arithmetic over continuous probability
//! distributions.
//!
//! Each distribution is represented as a finite histogram of
//! probability-weighted bins, and the product of two *independent* random
//! variables is computed directly from their histograms, without ever
//! materializing samples. Low-order moments (mean, standard deviation) are
//! tracked *exactly* in closed form alongside the approximate bin shape, so
//! callers can measure how much discretization error a chain of products has
//! accumulated:
//!
//! - [`ProbabilityMassHistogram`] — the general representation: adaptive bin
//!   edges per distribution, combinatorial pairwise product collapsed back
//!   into a fixed bin budget by mass-preserving rebinning.
//! - [`ScaledBinHistogram`] — a cheaper alternative that reuses one
//!   precomputed canonical bin shape and only rescales it; documented as the
//!   lower-accuracy end of the accuracy/cost trade-off.
//!
//! All values are immutable after construction; operators return new
//! histograms. Everything is pure, synchronous and deterministic.

pub mod binning;
pub mod histogram;
pub mod pmh;
pub mod scaled;

pub use binning::BinSizing;
pub use histogram::{product_moments, Histogram};
pub use pmh::{Bin, ProbabilityMassHistogram};
pub use scaled::{ReferenceShape, ScaledBinHistogram};

/// Default bin count for histogram construction.
pub const DEFAULT_NUM_BINS: usize = 100;
