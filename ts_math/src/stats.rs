//! Sample statistics used to seed model estimation.

use crate::{MathError, Result};
use statrs::statistics::Statistics;

/// Sample mean, `NaN` for an empty slice.
pub fn mean(data: &[f64]) -> f64 {
    data.iter().mean()
}

/// Biased sample autocovariances for lags `0..=max_lag`.
pub fn autocovariances(data: &[f64], max_lag: usize) -> Result<Vec<f64>> {
    let n = data.len();
    if n <= max_lag {
        return Err(MathError::InsufficientData(format!(
            "Need more than {} observations for lag {} autocovariance, got {}",
            max_lag, max_lag, n
        )));
    }

    let mu = mean(data);
    let centered: Vec<f64> = data.iter().map(|x| x - mu).collect();

    Ok((0..=max_lag)
        .map(|k| {
            centered[k..]
                .iter()
                .zip(centered.iter())
                .map(|(a, b)| a * b)
                .sum::<f64>()
                / n as f64
        })
        .collect())
}

/// Sample autocorrelations for lags `0..=max_lag`.
///
/// A series without variation has no defined autocorrelation and yields zeros
/// beyond lag 0.
pub fn autocorrelations(data: &[f64], max_lag: usize) -> Result<Vec<f64>> {
    let acov = autocovariances(data, max_lag)?;
    let c0 = acov[0];
    if c0 <= f64::EPSILON {
        let mut acf = vec![0.0; max_lag + 1];
        acf[0] = 1.0;
        return Ok(acf);
    }
    Ok(acov.iter().map(|c| c / c0).collect())
}

/// Solution of the Yule-Walker equations by Levinson-Durbin recursion.
#[derive(Debug, Clone, PartialEq)]
pub struct YuleWalker {
    /// AR coefficients `phi_1..phi_p`
    pub coefficients: Vec<f64>,
    /// Partial autocorrelations (reflection coefficients) `r_1..r_p`
    pub partial: Vec<f64>,
}

/// Run Levinson-Durbin on autocorrelations `acf[0..=order]`.
pub fn levinson_durbin(acf: &[f64], order: usize) -> Result<YuleWalker> {
    if acf.len() <= order {
        return Err(MathError::InvalidInput(format!(
            "Levinson-Durbin of order {} needs {} autocorrelations, got {}",
            order,
            order + 1,
            acf.len()
        )));
    }

    let mut coefficients: Vec<f64> = Vec::with_capacity(order);
    let mut partial = Vec::with_capacity(order);
    let mut error = acf[0];

    for k in 0..order {
        if error.abs() < 1e-12 {
            // Perfectly predictable; remaining reflections are zero.
            partial.resize(order, 0.0);
            coefficients.resize(order, 0.0);
            break;
        }

        let projection: f64 = coefficients
            .iter()
            .enumerate()
            .map(|(j, c)| c * acf[k - j])
            .sum();
        let reflection = (acf[k + 1] - projection) / error;

        let previous = coefficients.clone();
        for j in 0..k {
            coefficients[j] = previous[j] - reflection * previous[k - 1 - j];
        }
        coefficients.push(reflection);
        partial.push(reflection);

        error *= 1.0 - reflection * reflection;
    }

    Ok(YuleWalker {
        coefficients,
        partial,
    })
}
