//! Lognormal distribution capability.
//!
//! Parameterized by the mean and standard deviation of `ln X` (the
//! "norm" parameters). Every capability method is closed form:
//!
//! - `quantile(p)          = exp(mu + sigma·z_p)`
//! - `ev_contribution(x)   = Φ((ln x - mu - sigma²) / sigma)`
//! - `inv_ev_contribution(f) = exp(mu + sigma² + sigma·z_f)`
//! - `mean = exp(mu + sigma²/2)`, `sd = mean·sqrt(exp(sigma²) - 1)`
//!
//! The EV-contribution identities follow from the partial expectation of a
//! lognormal, `E[X·1{X<=x}] = mean·Φ((ln x - mu - sigma²)/sigma)`.

use bf_core::{Error, Result};

use crate::math::{std_normal_cdf, std_normal_quantile};
use crate::traits::EvDistribution;

/// Lognormal distribution: `ln X ~ Normal(norm_mean, norm_sd)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LognormalDist {
    norm_mean: f64,
    norm_sd: f64,
    mean: f64,
    sd: f64,
}

impl LognormalDist {
    /// Construct from the log-domain location and scale.
    pub fn new(norm_mean: f64, norm_sd: f64) -> Result<Self> {
        if !norm_mean.is_finite() {
            return Err(Error::InvalidDistribution(format!(
                "norm_mean must be finite, got {norm_mean}"
            )));
        }
        if !norm_sd.is_finite() || norm_sd <= 0.0 {
            return Err(Error::InvalidDistribution(format!(
                "norm_sd must be finite and > 0, got {norm_sd}"
            )));
        }
        let mean = (norm_mean + 0.5 * norm_sd * norm_sd).exp();
        let sd = mean * (norm_sd * norm_sd).exp_m1().sqrt();
        if !mean.is_finite() || !sd.is_finite() {
            return Err(Error::InvalidDistribution(format!(
                "moments overflow for norm_mean={norm_mean}, norm_sd={norm_sd}"
            )));
        }
        Ok(Self { norm_mean, norm_sd, mean, sd })
    }

    /// Location of `ln X`.
    pub fn norm_mean(&self) -> f64 {
        self.norm_mean
    }

    /// Scale of `ln X`.
    pub fn norm_sd(&self) -> f64 {
        self.norm_sd
    }
}

impl EvDistribution for LognormalDist {
    fn support(&self) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        std_normal_cdf((x.ln() - self.norm_mean) / self.norm_sd)
    }

    fn quantile(&self, p: f64) -> Result<f64> {
        if !(p > 0.0 && p < 1.0) {
            return Err(Error::Validation(format!("p must lie in (0, 1), got {p}")));
        }
        Ok((self.norm_mean + self.norm_sd * std_normal_quantile(p)).exp())
    }

    fn exact_mean(&self) -> f64 {
        self.mean
    }

    fn exact_sd(&self) -> f64 {
        self.sd
    }

    fn ev_contribution(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        let sigma2 = self.norm_sd * self.norm_sd;
        std_normal_cdf((x.ln() - self.norm_mean - sigma2) / self.norm_sd)
    }

    fn inv_ev_contribution(&self, fraction: f64) -> Result<f64> {
        if !(fraction > 0.0 && fraction < 1.0) {
            return Err(Error::Validation(format!(
                "fraction must lie in (0, 1), got {fraction}"
            )));
        }
        let sigma2 = self.norm_sd * self.norm_sd;
        Ok((self.norm_mean + sigma2 + self.norm_sd * std_normal_quantile(fraction)).exp())
    }
}
