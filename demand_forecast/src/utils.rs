//! Utility functions for the demand_forecast crate

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;

/// Years following `last_year`, one per forecast step.
pub fn future_years(last_year: i32, horizon: usize) -> Result<Vec<i32>> {
    (1..=horizon)
        .map(|step| {
            i32::try_from(step)
                .ok()
                .and_then(|step| last_year.checked_add(step))
                .ok_or_else(|| {
                    ForecastError::ValidationError(format!(
                        "Forecast year overflows after {} + {}",
                        last_year, step
                    ))
                })
        })
        .collect()
}

/// Last day of the given year.
pub fn period_end(year: i32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 12, 31)
        .ok_or_else(|| ForecastError::ValidationError(format!("Year {} is out of range", year)))
}

/// Whether a year cell holds only ASCII digits.
pub fn is_numeric_year(cell: &str) -> bool {
    !cell.is_empty() && cell.chars().all(|c| c.is_ascii_digit())
}
