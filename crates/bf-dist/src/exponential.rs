//! Exponential distribution capability.
//!
//! The partial expectation has the closed form
//! `∫_0^x t·rate·e^{-rate·t} dt = (1 - e^{-rate·x}(1 + rate·x)) / rate`,
//! so `ev_contribution` is closed form. Its inverse has no elementary
//! expression and is resolved by monotone bisection; this family exists
//! partly to exercise that path in the histogram engine.

use bf_core::{Error, Result};

use crate::math::invert_monotone;
use crate::traits::EvDistribution;

/// Exponential distribution with the given rate parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialDist {
    rate: f64,
}

impl ExponentialDist {
    pub fn new(rate: f64) -> Result<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(Error::InvalidDistribution(format!(
                "rate must be finite and > 0, got {rate}"
            )));
        }
        Ok(Self { rate })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl EvDistribution for ExponentialDist {
    fn support(&self) -> (f64, f64) {
        (0.0, f64::INFINITY)
    }

    fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        -(-self.rate * x).exp_m1()
    }

    fn quantile(&self, p: f64) -> Result<f64> {
        if !(p > 0.0 && p < 1.0) {
            return Err(Error::Validation(format!("p must lie in (0, 1), got {p}")));
        }
        Ok(-(-p).ln_1p() / self.rate)
    }

    fn exact_mean(&self) -> f64 {
        1.0 / self.rate
    }

    fn exact_sd(&self) -> f64 {
        1.0 / self.rate
    }

    fn ev_contribution(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        let rx = self.rate * x;
        if rx.is_infinite() {
            return 1.0;
        }
        (1.0 - (-rx).exp() * (1.0 + rx)).clamp(0.0, 1.0)
    }

    fn inv_ev_contribution(&self, fraction: f64) -> Result<f64> {
        if !(fraction > 0.0 && fraction < 1.0) {
            return Err(Error::Validation(format!(
                "fraction must lie in (0, 1), got {fraction}"
            )));
        }
        // Grow an upper bracket from the mean, then bisect.
        let mut hi = self.exact_mean();
        let mut doublings = 0;
        while self.ev_contribution(hi) < fraction {
            hi *= 2.0;
            doublings += 1;
            if doublings > 1024 {
                return Err(Error::InvalidDistribution(format!(
                    "ev_contribution never reaches {fraction}"
                )));
            }
        }
        Ok(invert_monotone(|x| self.ev_contribution(x), 0.0, hi, fraction))
    }
}
