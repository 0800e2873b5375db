//! Configuration for forecasting runs and dataset loading
//!
//! Every field has a default matching the electricity demand pages, so an
//! empty JSON object is a valid configuration file.

use crate::error::{ForecastError, Result};
use crate::models::ArimaOrder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default number of future years to forecast
pub const DEFAULT_HORIZON: usize = 10;
/// Default minimum number of observations before forecasting
pub const DEFAULT_MIN_OBSERVATIONS: usize = 10;
/// Default number of series compared side by side
pub const DEFAULT_MAX_COMPARED_SERIES: usize = 3;

/// Settings of the forecaster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Model order, (1,1,1) unless configured
    pub order: ArimaOrder,
    /// Number of future years to forecast
    pub horizon: usize,
    /// Minimum observations required before a forecast is attempted
    pub min_observations: usize,
    /// Optimizer iteration cap
    pub max_iterations: usize,
    /// Optimizer convergence tolerance
    pub tolerance: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            order: ArimaOrder::default(),
            horizon: DEFAULT_HORIZON,
            min_observations: DEFAULT_MIN_OBSERVATIONS,
            max_iterations: 2000,
            tolerance: 1e-10,
        }
    }
}

impl ForecastConfig {
    pub fn validate(&self) -> Result<()> {
        self.order
            .validate()
            .map_err(|e| ForecastError::ConfigError(e.to_string()))?;

        if self.horizon == 0 {
            return Err(ForecastError::ConfigError(
                "horizon must be at least 1".to_string(),
            ));
        }
        let floor = self.order.min_observations();
        if self.min_observations < floor {
            return Err(ForecastError::ConfigError(format!(
                "min_observations must be at least {} for {}, got {}",
                floor, self.order, self.min_observations
            )));
        }
        if self.max_iterations == 0 {
            return Err(ForecastError::ConfigError(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        if !(self.tolerance > 0.0) || !self.tolerance.is_finite() {
            return Err(ForecastError::ConfigError(format!(
                "tolerance must be a positive number, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Column names of the long-format demand dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub country_column: String,
    pub year_column: String,
    pub value_column: String,
    /// Additional columns that must be present and complete
    pub indicator_columns: Vec<String>,
    /// Year column of wide-format tables
    pub wide_year_column: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            country_column: "country".to_string(),
            year_column: "year".to_string(),
            value_column: "electricity_demand".to_string(),
            indicator_columns: vec![
                "population".to_string(),
                "gdp".to_string(),
                "energy_per_capita".to_string(),
                "energy_per_gdp".to_string(),
            ],
            wide_year_column: "Year".to_string(),
        }
    }
}

impl DatasetConfig {
    /// All columns a long-format table must provide, in report order.
    pub fn required_columns(&self) -> Vec<String> {
        let mut columns = vec![
            self.country_column.clone(),
            self.year_column.clone(),
            self.value_column.clone(),
        ];
        columns.extend(self.indicator_columns.iter().cloned());
        columns
    }

    pub fn validate(&self) -> Result<()> {
        let columns = self.required_columns();
        if columns.iter().any(|c| c.trim().is_empty()) || self.wide_year_column.trim().is_empty()
        {
            return Err(ForecastError::ConfigError(
                "column names must not be empty".to_string(),
            ));
        }
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].contains(column) {
                return Err(ForecastError::ConfigError(format!(
                    "column '{}' is configured more than once",
                    column
                )));
            }
        }
        Ok(())
    }
}

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub forecast: ForecastConfig,
    pub dataset: DatasetConfig,
    /// Largest number of series forecast side by side
    pub max_compared_series: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            forecast: ForecastConfig::default(),
            dataset: DatasetConfig::default(),
            max_compared_series: DEFAULT_MAX_COMPARED_SERIES,
        }
    }
}

impl AppConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AppConfig =
            serde_json::from_str(json).map_err(|e| ForecastError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.forecast.validate()?;
        self.dataset.validate()?;
        if self.max_compared_series == 0 {
            return Err(ForecastError::ConfigError(
                "max_compared_series must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
