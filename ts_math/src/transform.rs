//! Reparameterisation keeping AR polynomials stationary and MA polynomials
//! invertible while the optimiser searches an unconstrained space.
//!
//! Each unconstrained value `x` becomes a partial autocorrelation
//! `r = x / sqrt(1 + x^2)` in `(-1, 1)`; Durbin-Levinson then turns the
//! partials into the coefficients of `1 - a_1 z - ... - a_n z^n`, whose
//! roots all lie outside the unit circle.

use crate::{MathError, Result};

/// Map unconstrained values to stationary AR coefficients.
pub fn constrain_stationary(unconstrained: &[f64]) -> Vec<f64> {
    let partial: Vec<f64> = unconstrained
        .iter()
        .map(|x| x / (1.0 + x * x).sqrt())
        .collect();
    partials_to_coefficients(&partial)
}

/// Map unconstrained values to invertible MA coefficients.
///
/// `1 + b_1 z + ... + b_n z^n` is invertible exactly when
/// `1 - (-b_1) z - ... - (-b_n) z^n` is stationary.
pub fn constrain_invertible(unconstrained: &[f64]) -> Vec<f64> {
    constrain_stationary(unconstrained)
        .into_iter()
        .map(|c| -c)
        .collect()
}

/// Inverse of the partial autocorrelation squashing.
pub fn unconstrain_partial(partial: &[f64]) -> Result<Vec<f64>> {
    partial
        .iter()
        .map(|&r| {
            if r.abs() >= 1.0 || !r.is_finite() {
                Err(MathError::InvalidInput(format!(
                    "Partial autocorrelation {} is outside (-1, 1)",
                    r
                )))
            } else {
                Ok(r / (1.0 - r * r).sqrt())
            }
        })
        .collect()
}

/// Durbin-Levinson step from partial autocorrelations to AR coefficients.
pub fn partials_to_coefficients(partial: &[f64]) -> Vec<f64> {
    let mut coefficients: Vec<f64> = Vec::with_capacity(partial.len());
    for (k, &r) in partial.iter().enumerate() {
        let previous = coefficients.clone();
        for j in 0..k {
            coefficients[j] = previous[j] - r * previous[k - 1 - j];
        }
        coefficients.push(r);
    }
    coefficients
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_order_mapping() {
        let phi = constrain_stationary(&[1.0]);
        assert_relative_eq!(phi[0], 1.0 / 2f64.sqrt(), epsilon = 1e-12);

        let theta = constrain_invertible(&[1.0]);
        assert_relative_eq!(theta[0], -1.0 / 2f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_large_inputs_stay_inside_unit_interval() {
        for x in [-1e3, -10.0, 0.0, 10.0, 1e3] {
            let phi = constrain_stationary(&[x]);
            assert!(phi[0].abs() < 1.0);
        }
    }

    #[test]
    fn test_second_order_is_stationary() {
        // Stationarity triangle for AR(2): |a2| < 1, a2 + a1 < 1, a2 - a1 < 1
        for (x1, x2) in [(3.0, 2.0), (-3.0, 2.0), (5.0, -4.0), (0.2, -0.1)] {
            let a = constrain_stationary(&[x1, x2]);
            assert!(a[1].abs() < 1.0);
            assert!(a[1] + a[0] < 1.0);
            assert!(a[1] - a[0] < 1.0);
        }
    }

    #[test]
    fn test_unconstrain_partial() {
        let x = unconstrain_partial(&[0.6]).unwrap();
        let back = constrain_stationary(&x);
        assert_relative_eq!(back[0], 0.6, epsilon = 1e-12);
        assert!(unconstrain_partial(&[1.0]).is_err());
    }
}
