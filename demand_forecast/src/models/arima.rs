//! ARIMA models for annual time series forecasting
//!
//! The series is differenced `d` times and an ARMA(p, q) model is fitted to
//! the result by exact maximum likelihood. With `d == 0` the sample mean is
//! removed first; with `d >= 1` no constant is fitted, so differences revert
//! to zero. Forecasts are integrated back to the original scale.

use crate::error::{ForecastError, Result};
use crate::models::{ArimaOrder, FittedModel, ForecastModel};
use ts_math::differencing::{difference, integrate, restore_one_step};
use ts_math::optimize::NelderMead;
use ts_math::statespace::ArmaStateSpace;
use ts_math::stats::{autocorrelations, levinson_durbin, mean};
use ts_math::transform::{constrain_invertible, constrain_stationary, unconstrain_partial};

/// Largest starting partial autocorrelation for the AR part
const AR_START_LIMIT: f64 = 0.9;
/// Largest starting MA coefficient
const MA_START_LIMIT: f64 = 0.5;

/// ARIMA model (AutoRegressive Integrated Moving Average)
#[derive(Debug, Clone)]
pub struct ArimaModel {
    order: ArimaOrder,
    optimizer: NelderMead,
}

/// ARIMA model fitted to a series
#[derive(Debug, Clone)]
pub struct FittedArima {
    order: ArimaOrder,
    /// Fitted AR coefficients
    ar_coefficients: Vec<f64>,
    /// Fitted MA coefficients
    ma_coefficients: Vec<f64>,
    /// Level of the differenced series, if one was removed
    mean: Option<f64>,
    /// Innovation variance
    sigma2: f64,
    /// Maximised log-likelihood, absent for degenerate fits
    log_likelihood: Option<f64>,
    /// Optimizer iterations used
    iterations: usize,
    /// Observations on the original scale
    history: Vec<f64>,
    /// One-step predictions of the centred differenced series
    predictions: Vec<f64>,
    /// One-step prediction errors of the centred differenced series
    residuals: Vec<f64>,
    /// Predicted state for the first forecast period
    next_state: Vec<f64>,
    state_space: ArmaStateSpace,
}

impl ArimaModel {
    /// Create a new ARIMA model with the default optimizer settings
    pub fn new(order: ArimaOrder) -> Result<Self> {
        order.validate()?;
        Ok(Self {
            order,
            optimizer: NelderMead::default(),
        })
    }

    /// Use a specific iteration cap and convergence tolerance
    pub fn with_optimizer(mut self, max_iterations: usize, tolerance: f64) -> Result<Self> {
        self.optimizer = NelderMead::new(max_iterations, tolerance)
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;
        Ok(self)
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// Starting point in the unconstrained parameter space.
    ///
    /// AR partials come from Yule-Walker; MA coefficients from the
    /// autocorrelation of the AR residuals.
    fn start_values(&self, centered: &[f64]) -> Result<Vec<f64>> {
        let ArimaOrder { p, q, .. } = self.order;
        let mut start = Vec::with_capacity(p + q);

        let mut ar = Vec::new();
        if p > 0 {
            let acf = autocorrelations(centered, p)?;
            let yw = levinson_durbin(&acf, p)?;
            let partial: Vec<f64> = yw
                .partial
                .iter()
                .map(|r| r.clamp(-AR_START_LIMIT, AR_START_LIMIT))
                .collect();
            start.extend(unconstrain_partial(&partial)?);
            ar = constrain_stationary(&start);
        }

        if q > 0 {
            let residuals: Vec<f64> = (p..centered.len())
                .map(|t| {
                    centered[t]
                        - ar
                            .iter()
                            .enumerate()
                            .map(|(j, phi)| phi * centered[t - j - 1])
                            .sum::<f64>()
                })
                .collect();
            let racf = autocorrelations(&residuals, q)?;
            let partial: Vec<f64> = racf[1..]
                .iter()
                .map(|r| -r.clamp(-MA_START_LIMIT, MA_START_LIMIT))
                .collect();
            start.extend(unconstrain_partial(&partial)?);
        }

        Ok(start)
    }

    fn split_parameters(&self, params: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let (ar, ma) = params.split_at(self.order.p);
        (constrain_stationary(ar), constrain_invertible(ma))
    }

    fn fit_degenerate(&self, values: &[f64], level: f64, n: usize) -> FittedArima {
        log::debug!(
            "{}: differenced series has no variation, extrapolating level {}",
            self.order,
            level
        );
        let state_space = ArmaStateSpace::new(&vec![0.0; self.order.p], &vec![0.0; self.order.q]);
        FittedArima {
            order: self.order,
            ar_coefficients: vec![0.0; self.order.p],
            ma_coefficients: vec![0.0; self.order.q],
            mean: Some(level),
            sigma2: 0.0,
            log_likelihood: None,
            iterations: 0,
            history: values.to_vec(),
            predictions: vec![0.0; n],
            residuals: vec![0.0; n],
            next_state: vec![0.0; state_space.dim()],
            state_space,
        }
    }
}

impl Default for ArimaModel {
    fn default() -> Self {
        Self {
            order: ArimaOrder::default(),
            optimizer: NelderMead::default(),
        }
    }
}

impl ForecastModel for ArimaModel {
    type Fitted = FittedArima;

    fn fit(&self, values: &[f64]) -> Result<FittedArima> {
        let required = self.order.min_observations();
        if values.len() < required {
            return Err(ForecastError::PreconditionError {
                required,
                actual: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::DataError(
                "Series contains NaN or infinite values".to_string(),
            ));
        }

        let differenced = difference(values, self.order.d);
        let n = differenced.len();

        let first = differenced[0];
        let scale = differenced.iter().fold(1.0_f64, |acc, v| acc.max(v.abs()));
        if differenced.iter().all(|v| (v - first).abs() <= 1e-10 * scale) {
            return Ok(self.fit_degenerate(values, first, n));
        }

        let level = if self.order.d == 0 {
            Some(mean(&differenced))
        } else {
            None
        };
        let centered: Vec<f64> = match level {
            Some(m) => differenced.iter().map(|v| v - m).collect(),
            None => differenced,
        };

        let start = self.start_values(&centered)?;
        let objective = |params: &[f64]| {
            let (ar, ma) = self.split_parameters(params);
            match ArmaStateSpace::new(&ar, &ma).filter(&centered) {
                Ok(output) => -output.concentrated_log_likelihood() / n as f64,
                Err(_) => f64::INFINITY,
            }
        };
        let minimum = self.optimizer.minimize(objective, &start)?;

        let (ar_coefficients, ma_coefficients) = self.split_parameters(&minimum.point);
        let state_space = ArmaStateSpace::new(&ar_coefficients, &ma_coefficients);
        let output = state_space.filter(&centered)?;
        let log_likelihood = output.concentrated_log_likelihood();
        if !log_likelihood.is_finite() {
            return Err(ForecastError::ModelFitError(
                "Log-likelihood is not finite at the optimum".to_string(),
            ));
        }

        log::debug!(
            "{} fitted in {} iterations: ar={:?} ma={:?} loglik={:.4}",
            self.order,
            minimum.iterations,
            ar_coefficients,
            ma_coefficients,
            log_likelihood
        );

        Ok(FittedArima {
            order: self.order,
            ar_coefficients,
            ma_coefficients,
            mean: level,
            sigma2: output.sigma2(),
            log_likelihood: Some(log_likelihood),
            iterations: minimum.iterations,
            history: values.to_vec(),
            predictions: output.predictions,
            residuals: output.innovations,
            next_state: output.next_state,
            state_space,
        })
    }

    fn name(&self) -> String {
        self.order.to_string()
    }
}

impl FittedArima {
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coefficients
    }

    /// Level removed from the differenced series before fitting
    pub fn mean(&self) -> Option<f64> {
        self.mean
    }

    /// Innovation variance
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    pub fn log_likelihood(&self) -> Option<f64> {
        self.log_likelihood
    }

    /// Number of estimated parameters, including the variance
    pub fn parameter_count(&self) -> usize {
        self.order.p + self.order.q + 1 + usize::from(self.order.d == 0)
    }

    /// Akaike information criterion
    pub fn aic(&self) -> Option<f64> {
        self.log_likelihood
            .map(|ll| -2.0 * ll + 2.0 * self.parameter_count() as f64)
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// One-step prediction errors on the differenced scale
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Whether the fit fell back to exact extrapolation of a series without variation
    pub fn is_degenerate(&self) -> bool {
        self.log_likelihood.is_none()
    }
}

impl FittedModel for FittedArima {
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forecast horizon must be positive".to_string(),
            ));
        }

        let level = self.mean.unwrap_or(0.0);
        let differenced: Vec<f64> = self
            .state_space
            .forecast(&self.next_state, horizon)
            .into_iter()
            .map(|v| v + level)
            .collect();
        let forecasts = integrate(&differenced, &self.history, self.order.d)?;

        if forecasts.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::ModelFitError(
                "Forecast produced non-finite values".to_string(),
            ));
        }
        Ok(forecasts)
    }

    /// Predictions for observations `d..n`; the first `d` have no predecessor.
    fn fitted_values(&self) -> Vec<f64> {
        let level = self.mean.unwrap_or(0.0);
        let predictions: Vec<f64> = self.predictions.iter().map(|v| v + level).collect();
        restore_one_step(&predictions, &self.history, self.order.d)
    }

    fn name(&self) -> String {
        self.order.to_string()
    }
}
