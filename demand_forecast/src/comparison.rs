//! Side-by-side forecasts for a handful of series

use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::forecaster::Forecaster;
use crate::models::ForecastResult;
use serde::Serialize;

/// What happened to one series of a comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The forecast succeeded
    Forecast(ForecastResult),
    /// The series was too short to forecast
    Skipped { reason: String },
    /// The model could not be fitted
    Failed { message: String },
}

/// One series of a comparison with its outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesOutcome {
    pub label: String,
    pub history: TimeSeries,
    pub outcome: Outcome,
}

impl SeriesOutcome {
    pub fn forecast(&self) -> Option<&ForecastResult> {
        match &self.outcome {
            Outcome::Forecast(result) => Some(result),
            _ => None,
        }
    }
}

/// Forecast each series independently, in input order.
///
/// At least one and at most `max_series` series may be compared. A series
/// that is too short or fails to fit is reported in its outcome and does not
/// affect the others.
pub fn compare(
    forecaster: &Forecaster,
    series: &[TimeSeries],
    max_series: usize,
) -> Result<Vec<SeriesOutcome>> {
    if series.is_empty() {
        return Err(ForecastError::ValidationError(
            "Select at least one series to compare".to_string(),
        ));
    }
    if series.len() > max_series {
        return Err(ForecastError::ValidationError(format!(
            "At most {} series can be compared, got {}",
            max_series,
            series.len()
        )));
    }

    Ok(series
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let label = s
                .label()
                .map(str::to_string)
                .unwrap_or_else(|| format!("series {}", i + 1));
            let outcome = match forecaster.forecast(s) {
                Ok(result) => Outcome::Forecast(result),
                Err(e) if e.is_precondition() => Outcome::Skipped {
                    reason: e.to_string(),
                },
                Err(e) => Outcome::Failed {
                    message: e.to_string(),
                },
            };
            SeriesOutcome {
                label,
                history: s.clone(),
                outcome,
            }
        })
        .collect())
}
