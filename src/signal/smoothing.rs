//! Gaussian low-pass filtering along the time axis.

use crate::error::{Result, TopicSegError};
use ndarray::Array2;
use std::f64::consts::PI;

/// Full-length Gaussian smoother.
///
/// Row `t` of the output is the sum over every input row `k` weighted by the
/// normal density at `k` with mean `t` and standard deviation `sigma`. The
/// kernel is never truncated, so locality comes from `sigma` alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianSmoother {
    sigma: f64,
}

impl GaussianSmoother {
    /// Creates a smoother with bandwidth `sigma`.
    pub fn new(sigma: f64) -> Result<Self> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(TopicSegError::InvalidParameter(format!(
                "smoothing bandwidth must be positive, got {}",
                sigma
            )));
        }
        Ok(Self { sigma })
    }

    /// The bandwidth.
    #[inline]
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Normal probability density at `x`.
    #[inline]
    pub fn density(&self, x: f64, mean: f64) -> f64 {
        let z = (x - mean) / self.sigma;
        (-0.5 * z * z).exp() / (self.sigma * (2.0 * PI).sqrt())
    }

    /// Returns the T×T weight matrix, `weights[[t, k]] = density(k; t, sigma)`.
    pub fn weights(&self, len: usize) -> Array2<f64> {
        Array2::from_shape_fn((len, len), |(t, k)| self.density(k as f64, t as f64))
    }

    /// Smooths every column of `input` over time. O(T²·K).
    pub fn smooth(&self, input: &Array2<f64>) -> Array2<f64> {
        let t = input.nrows();
        if t == 0 {
            return input.clone();
        }
        self.weights(t).dot(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_rejects_bad_sigma() {
        assert!(GaussianSmoother::new(0.0).is_err());
        assert!(GaussianSmoother::new(-1.0).is_err());
        assert!(GaussianSmoother::new(f64::NAN).is_err());
    }

    #[test]
    fn test_density_peak() {
        let smoother = GaussianSmoother::new(1.0).unwrap();
        let peak = smoother.density(0.0, 0.0);
        assert!((peak - 1.0 / (2.0 * PI).sqrt()).abs() < 1e-12);
        assert!(smoother.density(1.0, 0.0) < peak);
        assert!((smoother.density(1.0, 0.0) - smoother.density(-1.0, 0.0)).abs() < 1e-15);
    }

    #[test]
    fn test_impulse_spreads() {
        let input = array![[0.0], [0.0], [1.0], [0.0], [0.0]];
        let smoother = GaussianSmoother::new(1.0).unwrap();
        let out = smoother.smooth(&input);

        assert!(out[[2, 0]] > out[[1, 0]]);
        assert!(out[[1, 0]] > out[[0, 0]]);
        assert!((out[[1, 0]] - out[[3, 0]]).abs() < 1e-12);
        assert!(out[[0, 0]] > 0.0);
    }

    #[test]
    fn test_weights_are_unnormalised_pdf() {
        let smoother = GaussianSmoother::new(2.5).unwrap();
        let w = smoother.weights(4);
        assert_eq!(w.dim(), (4, 4));
        assert!((w[[1, 3]] - smoother.density(3.0, 1.0)).abs() < 1e-15);
        assert!((w[[1, 3]] - w[[3, 1]]).abs() < 1e-15);
    }

    #[test]
    fn test_empty_input() {
        let smoother = GaussianSmoother::new(1.5).unwrap();
        let out = smoother.smooth(&Array2::<f64>::zeros((0, 3)));
        assert_eq!(out.dim(), (0, 3));
    }
}
