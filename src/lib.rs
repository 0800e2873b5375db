//! # Demand Forecast Workspace
//!
//! Facade over the workspace crates:
//!
//! - [`demand_forecast`]: series, loaders, the ARIMA forecaster and the CLI
//! - [`ts_math`]: differencing, Kalman filtering and optimisation primitives
//!
//! ## Example
//!
//! ```
//! use demand_forecast_workspace::{Forecaster, TimeSeries};
//!
//! let series = TimeSeries::new((2000..2015).map(|year| (year, 10.0))).unwrap();
//! let forecast = Forecaster::default().forecast(&series).unwrap();
//! assert_eq!(forecast.years(), (2015..=2024).collect::<Vec<i32>>());
//! assert!(forecast.values().iter().all(|v| *v == 10.0));
//! ```

pub use demand_forecast;
pub use ts_math;

pub use demand_forecast::{
    AppConfig, ArimaOrder, ForecastConfig, ForecastError, ForecastPoint, ForecastResult,
    Forecaster, Observation, TimeSeries,
};
