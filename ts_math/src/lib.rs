//! # TS Math
//!
//! Numerical building blocks for fitting and forecasting ARIMA models.
//! This crate provides differencing, sample statistics, the stationarity
//! reparameterisation, an ARMA state-space Kalman filter and a derivative
//! free minimiser.

use thiserror::Error;

pub mod differencing;
pub mod optimize;
pub mod statespace;
pub mod stats;
pub mod transform;

/// Errors that can occur in time series calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),

    #[error("Optimizer did not converge within {iterations} iterations")]
    NonConvergence { iterations: usize },
}

/// Result type for time series math operations
pub type Result<T> = std::result::Result<T, MathError>;
