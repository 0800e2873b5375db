//! # Demand Forecast
//!
//! Forecasting annual electricity demand per country with a fixed-order
//! ARIMA model.
//!
//! ## Features
//!
//! - Annual time series with strictly increasing years
//! - ARIMA(p,d,q) fitting by exact maximum likelihood, (1,1,1) by default
//! - Ten-year point forecasts labelled with their future years
//! - Long and wide CSV layouts, with incomplete rows dropped
//! - Side-by-side forecasts for up to three countries
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use demand_forecast::config::AppConfig;
//! use demand_forecast::dataset::DemandTable;
//! use demand_forecast::Forecaster;
//!
//! let config = AppConfig::default();
//! let table = DemandTable::from_csv("demand.csv", &config.dataset)?;
//! let forecaster = Forecaster::new(config.forecast)?;
//!
//! let series = table.series("Korea")?;
//! let forecast = forecaster.forecast(&series)?;
//! for point in forecast.points() {
//!     println!("{}: {:.2}", point.year, point.value);
//! }
//! # Ok::<(), demand_forecast::ForecastError>(())
//! ```

pub mod comparison;
pub mod config;
pub mod data;
pub mod dataset;
pub mod error;
pub mod forecaster;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use crate::config::{AppConfig, DatasetConfig, ForecastConfig};
pub use crate::data::{Observation, TimeSeries};
pub use crate::error::ForecastError;
pub use crate::forecaster::Forecaster;
pub use crate::models::{ArimaOrder, ForecastPoint, ForecastResult};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
