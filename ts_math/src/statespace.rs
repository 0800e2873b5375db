//! ARMA models in state-space form with an exact Kalman filter.
//!
//! Uses the Harvey representation with state dimension `r = max(p, q + 1)`:
//!
//! ```text
//! y_t       = Z a_t,                 Z = [1, 0, ..., 0]
//! a_{t+1}   = T a_t + R e_{t+1},     R = [1, theta_1, ..., theta_{r-1}]'
//! ```
//!
//! where the first column of `T` holds the AR coefficients and its
//! superdiagonal is one. The innovation variance is concentrated out of the
//! likelihood, so the filter always runs with unit variance.

use crate::{MathError, Result};
use std::f64::consts::PI;

type Matrix = Vec<Vec<f64>>;

const LYAPUNOV_MAX_ITERATIONS: usize = 200;
const LYAPUNOV_TOLERANCE: f64 = 1e-12;

/// Zero-mean ARMA(p, q) process in state-space form.
#[derive(Debug, Clone)]
pub struct ArmaStateSpace {
    transition: Matrix,
    selection: Vec<f64>,
}

/// Output of a Kalman filter pass.
#[derive(Debug, Clone)]
pub struct FilterOutput {
    /// One-step-ahead predictions of each observation
    pub predictions: Vec<f64>,
    /// Prediction errors `y_t - prediction_t`
    pub innovations: Vec<f64>,
    /// Innovation variances relative to the process variance
    pub variances: Vec<f64>,
    /// Predicted state for the period after the last observation
    pub next_state: Vec<f64>,
}

impl FilterOutput {
    /// Maximum likelihood estimate of the innovation variance.
    pub fn sigma2(&self) -> f64 {
        let n = self.innovations.len() as f64;
        self.innovations
            .iter()
            .zip(self.variances.iter())
            .map(|(v, f)| v * v / f)
            .sum::<f64>()
            / n
    }

    /// Gaussian log-likelihood with the innovation variance concentrated out.
    pub fn concentrated_log_likelihood(&self) -> f64 {
        let n = self.innovations.len() as f64;
        let sum_log_f: f64 = self.variances.iter().map(|f| f.ln()).sum();
        -0.5 * n * ((2.0 * PI).ln() + self.sigma2().ln() + 1.0) - 0.5 * sum_log_f
    }
}

impl ArmaStateSpace {
    /// Build the state-space form for the given AR and MA coefficients.
    pub fn new(ar: &[f64], ma: &[f64]) -> Self {
        let dim = ar.len().max(ma.len() + 1);

        let mut transition = vec![vec![0.0; dim]; dim];
        for (i, &phi) in ar.iter().enumerate() {
            transition[i][0] = phi;
        }
        for i in 0..dim - 1 {
            transition[i][i + 1] = 1.0;
        }

        let mut selection = vec![0.0; dim];
        selection[0] = 1.0;
        for (j, &theta) in ma.iter().enumerate() {
            selection[j + 1] = theta;
        }

        Self {
            transition,
            selection,
        }
    }

    /// Dimension of the state vector.
    pub fn dim(&self) -> usize {
        self.selection.len()
    }

    /// Unconditional state covariance, the solution of `P = T P T' + R R'`.
    ///
    /// Solved with the doubling algorithm; fails if the AR part is not
    /// stationary.
    pub fn stationary_covariance(&self) -> Result<Matrix> {
        let mut power = self.transition.clone();
        let mut covariance = outer(&self.selection, &self.selection);

        for _ in 0..LYAPUNOV_MAX_ITERATIONS {
            let increment = sandwich(&power, &covariance);
            let scale = max_abs(&covariance).max(1.0);
            let change = max_abs(&increment);

            for (row, inc) in covariance.iter_mut().zip(increment.iter()) {
                for (c, d) in row.iter_mut().zip(inc.iter()) {
                    *c += d;
                }
            }
            if !change.is_finite() {
                break;
            }
            if change <= LYAPUNOV_TOLERANCE * scale {
                return Ok(covariance);
            }
            power = multiply(&power, &power);
        }

        Err(MathError::CalculationError(
            "State covariance did not converge; AR polynomial is not stationary".to_string(),
        ))
    }

    /// Run the Kalman filter over a zero-mean series.
    pub fn filter(&self, data: &[f64]) -> Result<FilterOutput> {
        if data.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot filter an empty series".to_string(),
            ));
        }

        let dim = self.dim();
        let mut state = vec![0.0; dim];
        let mut covariance = self.stationary_covariance()?;
        let noise = outer(&self.selection, &self.selection);

        let mut predictions = Vec::with_capacity(data.len());
        let mut innovations = Vec::with_capacity(data.len());
        let mut variances = Vec::with_capacity(data.len());

        for &y in data {
            let prediction = state[0];
            let innovation = y - prediction;
            let variance = covariance[0][0];
            if !(variance > 0.0) || !variance.is_finite() {
                return Err(MathError::CalculationError(format!(
                    "Innovation variance became {}",
                    variance
                )));
            }

            // Measurement update
            let gain: Vec<f64> = covariance.iter().map(|row| row[0]).collect();
            for i in 0..dim {
                state[i] += gain[i] * innovation / variance;
                for j in 0..dim {
                    covariance[i][j] -= gain[i] * gain[j] / variance;
                }
            }

            // Time update
            state = apply(&self.transition, &state);
            covariance = sandwich(&self.transition, &covariance);
            for (row, n) in covariance.iter_mut().zip(noise.iter()) {
                for (c, q) in row.iter_mut().zip(n.iter()) {
                    *c += q;
                }
            }

            predictions.push(prediction);
            innovations.push(innovation);
            variances.push(variance);
        }

        Ok(FilterOutput {
            predictions,
            innovations,
            variances,
            next_state: state,
        })
    }

    /// Project a predicted state `steps` periods ahead.
    pub fn forecast(&self, next_state: &[f64], steps: usize) -> Vec<f64> {
        let mut state = next_state.to_vec();
        let mut forecasts = Vec::with_capacity(steps);
        for _ in 0..steps {
            forecasts.push(state[0]);
            state = apply(&self.transition, &state);
        }
        forecasts
    }
}

fn outer(a: &[f64], b: &[f64]) -> Matrix {
    a.iter()
        .map(|x| b.iter().map(|y| x * y).collect())
        .collect()
}

fn apply(m: &Matrix, v: &[f64]) -> Vec<f64> {
    m.iter()
        .map(|row| row.iter().zip(v.iter()).map(|(a, b)| a * b).sum())
        .collect()
}

fn multiply(a: &Matrix, b: &Matrix) -> Matrix {
    let n = b.first().map_or(0, |row| row.len());
    a.iter()
        .map(|row| {
            (0..n)
                .map(|j| row.iter().zip(b.iter()).map(|(x, brow)| x * brow[j]).sum())
                .collect()
        })
        .collect()
}

fn transpose(m: &Matrix) -> Matrix {
    let n = m.first().map_or(0, |row| row.len());
    (0..n).map(|j| m.iter().map(|row| row[j]).collect()).collect()
}

/// `A X A'`
fn sandwich(a: &Matrix, x: &Matrix) -> Matrix {
    multiply(&multiply(a, x), &transpose(a))
}

fn max_abs(m: &Matrix) -> f64 {
    m.iter()
        .flat_map(|row| row.iter())
        .fold(0.0, |acc: f64, v| {
            if acc.is_nan() || v.is_nan() {
                f64::NAN
            } else {
                acc.max(v.abs())
            }
        })
}
