//! Derivative-free minimisation with the Nelder-Mead simplex method.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Nelder-Mead minimiser settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NelderMead {
    /// Maximum number of simplex iterations
    pub max_iterations: usize,
    /// Convergence threshold on the relative spread of function values
    pub f_tolerance: f64,
    /// Convergence threshold on the simplex size, reached when the simplex collapses
    pub x_tolerance: f64,
    /// Edge length of the initial simplex
    pub initial_step: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            f_tolerance: 1e-10,
            x_tolerance: 1e-7,
            initial_step: 0.1,
        }
    }
}

/// Best point found by a minimisation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    pub point: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
}

impl NelderMead {
    /// Create a minimiser with the given iteration cap and tolerance.
    pub fn new(max_iterations: usize, tolerance: f64) -> Result<Self> {
        if max_iterations == 0 {
            return Err(MathError::InvalidInput(
                "Maximum iterations must be positive".to_string(),
            ));
        }
        if !(tolerance > 0.0) || !tolerance.is_finite() {
            return Err(MathError::InvalidInput(format!(
                "Tolerance must be a positive number, got {}",
                tolerance
            )));
        }

        Ok(Self {
            max_iterations,
            f_tolerance: tolerance,
            ..Self::default()
        })
    }

    /// Minimise `objective` starting from `start`.
    ///
    /// Non-finite objective values are treated as `+inf`, so the search
    /// retreats from regions where the objective is undefined. Running out of
    /// iterations is reported as [`MathError::NonConvergence`].
    pub fn minimize<F>(&self, mut objective: F, start: &[f64]) -> Result<Minimum>
    where
        F: FnMut(&[f64]) -> f64,
    {
        let mut eval = |x: &[f64]| {
            let value = objective(x);
            if value.is_finite() {
                value
            } else {
                f64::INFINITY
            }
        };

        let n = start.len();
        let start_value = eval(start);
        if !start_value.is_finite() {
            return Err(MathError::CalculationError(
                "Objective is not finite at the starting point".to_string(),
            ));
        }
        if n == 0 {
            return Ok(Minimum {
                point: Vec::new(),
                value: start_value,
                iterations: 0,
            });
        }

        let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(n + 1);
        simplex.push((start.to_vec(), start_value));
        for i in 0..n {
            let mut vertex = start.to_vec();
            vertex[i] += self.initial_step;
            let value = eval(&vertex);
            simplex.push((vertex, value));
        }

        for iteration in 0..self.max_iterations {
            simplex.sort_by(|a, b| a.1.total_cmp(&b.1));

            if self.has_converged(&simplex) {
                let (point, value) = simplex.swap_remove(0);
                return Ok(Minimum {
                    point,
                    value,
                    iterations: iteration,
                });
            }

            let worst = simplex[n].clone();
            let second_worst_value = simplex[n - 1].1;
            let best_value = simplex[0].1;

            let centroid: Vec<f64> = (0..n)
                .map(|j| simplex[..n].iter().map(|(x, _)| x[j]).sum::<f64>() / n as f64)
                .collect();

            let reflected = along(&centroid, &worst.0, -REFLECTION);
            let reflected_value = eval(&reflected);

            if reflected_value < best_value {
                let expanded = along(&centroid, &worst.0, -REFLECTION * EXPANSION);
                let expanded_value = eval(&expanded);
                simplex[n] = if expanded_value < reflected_value {
                    (expanded, expanded_value)
                } else {
                    (reflected, reflected_value)
                };
                continue;
            }

            if reflected_value < second_worst_value {
                simplex[n] = (reflected, reflected_value);
                continue;
            }

            let (contracted, contracted_value) = if reflected_value < worst.1 {
                let outside = along(&centroid, &worst.0, -REFLECTION * CONTRACTION);
                let value = eval(&outside);
                (outside, value)
            } else {
                let inside = along(&centroid, &worst.0, CONTRACTION);
                let value = eval(&inside);
                (inside, value)
            };

            if contracted_value < reflected_value.min(worst.1) {
                simplex[n] = (contracted, contracted_value);
                continue;
            }

            let best = simplex[0].0.clone();
            for vertex in simplex.iter_mut().skip(1) {
                let shrunk: Vec<f64> = best
                    .iter()
                    .zip(vertex.0.iter())
                    .map(|(b, x)| b + SHRINK * (x - b))
                    .collect();
                let value = eval(&shrunk);
                *vertex = (shrunk, value);
            }
        }

        Err(MathError::NonConvergence {
            iterations: self.max_iterations,
        })
    }

    fn has_converged(&self, sorted: &[(Vec<f64>, f64)]) -> bool {
        let best = &sorted[0];
        let f_spread = sorted
            .iter()
            .map(|(_, v)| (v - best.1).abs())
            .fold(0.0, f64::max);
        let x_spread = sorted
            .iter()
            .flat_map(|(x, _)| x.iter().zip(best.0.iter()).map(|(a, b)| (a - b).abs()))
            .fold(0.0, f64::max);
        f_spread <= self.f_tolerance * (1.0 + best.1.abs()) || x_spread <= self.x_tolerance
    }
}

/// `centroid + t * (point - centroid)`
fn along(centroid: &[f64], point: &[f64], t: f64) -> Vec<f64> {
    centroid
        .iter()
        .zip(point.iter())
        .map(|(c, p)| c + t * (p - c))
        .collect()
}
