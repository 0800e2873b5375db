//! Differencing and its inverse for integrated models.

use crate::{MathError, Result};

/// Apply `order` rounds of first differencing.
///
/// Each round shortens the series by one value.
pub fn difference(data: &[f64], order: usize) -> Vec<f64> {
    let mut result = data.to_vec();
    for _ in 0..order {
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Undo `order` rounds of differencing for values that continue `history`.
///
/// `forecasts` are on the differenced scale and immediately follow the last
/// observation of `history`; the returned values are on the original scale.
pub fn integrate(forecasts: &[f64], history: &[f64], order: usize) -> Result<Vec<f64>> {
    if history.len() < order {
        return Err(MathError::InsufficientData(format!(
            "Need at least {} observations to undo differencing of order {}",
            order, order
        )));
    }

    // Last value of every intermediate differencing level, innermost last.
    let anchors: Vec<f64> = (0..order)
        .filter_map(|level| difference(history, level).last().copied())
        .collect();

    let mut result = forecasts.to_vec();
    for anchor in anchors.into_iter().rev() {
        let mut acc = anchor;
        for value in result.iter_mut() {
            acc += *value;
            *value = acc;
        }
    }

    Ok(result)
}

/// Map one-step predictions of the differenced series back to the original scale.
///
/// `predictions[i]` predicts `difference(history, order)[i]`, i.e. the
/// original observation at index `i + order`. Each prediction is combined
/// with the observed values preceding it:
/// `y_t = w_t - sum_{k=1..d} (-1)^k C(d,k) y_{t-k}`.
pub fn restore_one_step(predictions: &[f64], history: &[f64], order: usize) -> Vec<f64> {
    let weights: Vec<f64> = (1..=order)
        .map(|k| {
            let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
            sign * binomial(order, k)
        })
        .collect();

    predictions
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let t = i + order;
            let carried: f64 = weights
                .iter()
                .enumerate()
                .map(|(j, weight)| weight * history[t - j - 1])
                .sum();
            w - carried
        })
        .collect()
}

fn binomial(n: usize, k: usize) -> f64 {
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}
