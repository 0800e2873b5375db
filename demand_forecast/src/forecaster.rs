//! Fixed-order forecasting of annual series

use crate::config::ForecastConfig;
use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::models::arima::{ArimaModel, FittedArima};
use crate::models::{FittedModel, ForecastModel, ForecastResult};

/// Fits a fixed-order ARIMA model to a series and forecasts a fixed horizon.
///
/// Every call fits afresh; nothing is cached between calls, and the same
/// input always yields the same forecast.
#[derive(Debug, Clone)]
pub struct Forecaster {
    config: ForecastConfig,
    model: ArimaModel,
}

impl Forecaster {
    /// Create a forecaster from a validated configuration
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        let model = ArimaModel::new(config.order)?
            .with_optimizer(config.max_iterations, config.tolerance)?;
        Ok(Self { config, model })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Fail with a precondition error when the series is too short.
    pub fn check_length(&self, series: &TimeSeries) -> Result<()> {
        if series.len() < self.config.min_observations {
            return Err(ForecastError::PreconditionError {
                required: self.config.min_observations,
                actual: series.len(),
            });
        }
        Ok(())
    }

    /// Fit the configured model without forecasting
    pub fn fit(&self, series: &TimeSeries) -> Result<FittedArima> {
        self.check_length(series)?;
        self.model.fit(&series.values())
    }

    /// Forecast the configured horizon following the last observed year
    pub fn forecast(&self, series: &TimeSeries) -> Result<ForecastResult> {
        let name = series.label().unwrap_or("series");
        let last_year = series.last_year().ok_or_else(|| ForecastError::PreconditionError {
            required: self.config.min_observations,
            actual: 0,
        })?;

        let fitted = self.fit(series).map_err(|e| {
            log::warn!("{}: {} fit failed: {}", name, self.config.order, e);
            e
        })?;
        let values = fitted.forecast(self.config.horizon)?;

        log::info!(
            "{}: forecast {} years after {} with {}",
            name,
            self.config.horizon,
            last_year,
            self.config.order
        );

        ForecastResult::new(
            series.label().map(str::to_string),
            self.config.order,
            last_year,
            values,
        )
    }
}

impl Default for Forecaster {
    fn default() -> Self {
        Self {
            config: ForecastConfig::default(),
            model: ArimaModel::default(),
        }
    }
}
