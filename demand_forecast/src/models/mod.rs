//! Forecasting models for annual time series

use crate::error::{ForecastError, Result};
use crate::utils::{future_years, period_end};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

pub mod arima;

/// Largest supported AR or MA order
pub const MAX_ARMA_ORDER: usize = 5;
/// Largest supported differencing order
pub const MAX_DIFFERENCING: usize = 2;

/// The (autoregressive, differencing, moving-average) order triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ArimaOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Result<Self> {
        let order = Self { p, d, q };
        order.validate()?;
        Ok(order)
    }

    pub fn validate(&self) -> Result<()> {
        if self.p > MAX_ARMA_ORDER {
            return Err(ForecastError::InvalidParameter(format!(
                "AR order must be <= {}, got {}",
                MAX_ARMA_ORDER, self.p
            )));
        }
        if self.d > MAX_DIFFERENCING {
            return Err(ForecastError::InvalidParameter(format!(
                "Differencing order must be <= {}, got {}",
                MAX_DIFFERENCING, self.d
            )));
        }
        if self.q > MAX_ARMA_ORDER {
            return Err(ForecastError::InvalidParameter(format!(
                "MA order must be <= {}, got {}",
                MAX_ARMA_ORDER, self.q
            )));
        }
        Ok(())
    }

    /// Fewest observations that leave the ARMA part something to estimate.
    pub fn min_observations(&self) -> usize {
        self.p + self.d + self.q + 2
    }
}

impl Default for ArimaOrder {
    fn default() -> Self {
        Self { p: 1, d: 1, q: 1 }
    }
}

impl fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

/// A predicted value for one future year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub year: i32,
    pub value: f64,
}

/// Point forecast for the years following the last observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Label of the forecast series, if it had one
    label: Option<String>,
    /// Model order used for the fit
    order: ArimaOrder,
    /// Last observed year of the input series
    last_observed_year: i32,
    /// Forecast points in year order
    points: Vec<ForecastPoint>,
}

impl ForecastResult {
    /// Create a forecast result, assigning consecutive years after `last_observed_year`.
    pub fn new(
        label: Option<String>,
        order: ArimaOrder,
        last_observed_year: i32,
        values: Vec<f64>,
    ) -> Result<Self> {
        if values.is_empty() {
            return Err(ForecastError::ValidationError(
                "Forecast must contain at least one value".to_string(),
            ));
        }
        if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
            return Err(ForecastError::ModelFitError(format!(
                "Forecast value at step {} is not finite",
                pos + 1
            )));
        }

        let points = future_years(last_observed_year, values.len())?
            .into_iter()
            .zip(values)
            .map(|(year, value)| ForecastPoint { year, value })
            .collect();

        Ok(Self {
            label,
            order,
            last_observed_year,
            points,
        })
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn last_observed_year(&self) -> i32 {
        self.last_observed_year
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    /// Number of periods forecasted
    pub fn horizon(&self) -> usize {
        self.points.len()
    }

    pub fn years(&self) -> Vec<i32> {
        self.points.iter().map(|p| p.year).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Year-end date of every forecast point, for date-indexed charts.
    pub fn period_end_dates(&self) -> Result<Vec<NaiveDate>> {
        self.points.iter().map(|p| period_end(p.year)).collect()
    }

    /// Serialize the forecast to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Model fitted to the values of a series
pub trait FittedModel: Debug {
    /// Forecast the next `horizon` values
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>>;

    /// One-step-ahead predictions for the fitted observations
    fn fitted_values(&self) -> Vec<f64>;

    /// Name of the model
    fn name(&self) -> String;
}

/// Forecast model that can be fitted to evenly spaced values
pub trait ForecastModel: Debug + Clone {
    /// The type of fitted model produced
    type Fitted: FittedModel;

    /// Fit the model to the values
    fn fit(&self, values: &[f64]) -> Result<Self::Fitted>;

    /// Get the name of the model
    fn name(&self) -> String;
}
