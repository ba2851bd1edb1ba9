//! Small numeric helpers shared by the distribution families.

use statrs::distribution::{ContinuousCDF, Normal};

fn unit_normal() -> Normal {
    // Parameters are compile-time valid; construction cannot fail.
    Normal::new(0.0, 1.0).unwrap()
}

/// Standard normal CDF `Φ(x)`.
pub fn std_normal_cdf(x: f64) -> f64 {
    unit_normal().cdf(x)
}

/// Standard normal quantile `Φ⁻¹(p)` for `p` in `(0, 1)`.
pub fn std_normal_quantile(p: f64) -> f64 {
    unit_normal().inverse_cdf(p)
}

/// Invert a monotone non-decreasing function by bisection on `[lo, hi]`.
///
/// The caller must supply a bracket with `f(lo) <= target <= f(hi)`. The
/// search stops when the midpoint can no longer be resolved at f64
/// precision, so the result is accurate to the last representable digit of
/// the abscissa.
pub fn invert_monotone<F: Fn(f64) -> f64>(f: F, mut lo: f64, mut hi: f64, target: f64) -> f64 {
    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        if !(mid > lo && mid < hi) {
            break;
        }
        if f(mid) < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_std_normal_cdf_quantile_roundtrip() {
        for p in [0.001, 0.1, 0.25, 0.5, 0.75, 0.9, 0.999] {
            let z = std_normal_quantile(p);
            assert_relative_eq!(std_normal_cdf(z), p, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_std_normal_cdf_symmetry() {
        for x in [0.3, 1.0, 2.5] {
            assert_relative_eq!(std_normal_cdf(x) + std_normal_cdf(-x), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_invert_monotone_cubic() {
        // x^3 is monotone on [0, 4]; invert at a few targets.
        for target in [0.5, 1.0, 8.0, 27.0] {
            let x = invert_monotone(|x| x * x * x, 0.0, 4.0, target);
            assert_relative_eq!(x * x * x, target, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_invert_monotone_hits_bracket_edges() {
        let x = invert_monotone(|x| x, 0.0, 1.0, 0.0);
        assert!(x.abs() < 1e-12);
        let x = invert_monotone(|x| x, 0.0, 1.0, 1.0);
        assert!((x - 1.0).abs() < 1e-12);
    }
}
