//! Annual time series handling for forecasting

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// A single annual observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub year: i32,
    pub value: f64,
}

/// Annual observations, strictly increasing in year with one value per year.
///
/// Missing years are not interpolated; the series is simply shorter. Values
/// are always finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    label: Option<String>,
    observations: Vec<Observation>,
}

impl TimeSeries {
    /// Create a series from `(year, value)` pairs already in year order.
    pub fn new<I>(points: I) -> Result<Self>
    where
        I: IntoIterator<Item = (i32, f64)>,
    {
        let observations: Vec<Observation> = points
            .into_iter()
            .map(|(year, value)| Observation { year, value })
            .collect();

        for obs in &observations {
            if !obs.value.is_finite() {
                return Err(ForecastError::DataError(format!(
                    "Value for year {} is not finite",
                    obs.year
                )));
            }
        }

        for pair in observations.windows(2) {
            if pair[1].year == pair[0].year {
                return Err(ForecastError::DataError(format!(
                    "Duplicate year {} in time series",
                    pair[0].year
                )));
            }
            if pair[1].year < pair[0].year {
                return Err(ForecastError::DataError(format!(
                    "Years must be strictly increasing: {} follows {}",
                    pair[1].year, pair[0].year
                )));
            }
        }

        Ok(Self {
            label: None,
            observations,
        })
    }

    /// Create a series from pairs in any order; duplicate years are still rejected.
    pub fn from_unsorted<I>(points: I) -> Result<Self>
    where
        I: IntoIterator<Item = (i32, f64)>,
    {
        let mut points: Vec<(i32, f64)> = points.into_iter().collect();
        points.sort_by_key(|(year, _)| *year);
        Self::new(points)
    }

    /// Attach a label such as a country name.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn years(&self) -> Vec<i32> {
        self.observations.iter().map(|o| o.year).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.value).collect()
    }

    pub fn first_year(&self) -> Option<i32> {
        self.observations.first().map(|o| o.year)
    }

    pub fn last_year(&self) -> Option<i32> {
        self.observations.last().map(|o| o.year)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Whether any calendar years between the first and last observation are absent.
    pub fn has_gaps(&self) -> bool {
        match (self.first_year(), self.last_year()) {
            (Some(first), Some(last)) => (last - first + 1) as usize != self.len(),
            _ => false,
        }
    }
}
