//! Loading tabular demand data into per-country series
//!
//! Two layouts are supported:
//!
//! - long format, one row per (country, year) with the demand value and a set
//!   of indicator columns;
//! - wide format, a year column plus one value column per series.

use crate::config::DatasetConfig;
use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::utils::is_numeric_year;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::ops::RangeInclusive;
use std::path::Path;

/// One complete row of the long-format table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandRow {
    pub country: String,
    pub year: i32,
    pub demand: f64,
    /// Indicator values in the configured column order
    pub indicators: Vec<f64>,
}

/// Indicator values of one country for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub year: i32,
    pub values: BTreeMap<String, f64>,
}

/// Demand value of one country in a given year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryValue {
    pub country: String,
    pub value: f64,
}

/// Validated long-format demand table
#[derive(Debug, Clone)]
pub struct DemandTable {
    rows: Vec<DemandRow>,
    countries: Vec<String>,
    indicator_columns: Vec<String>,
}

impl DemandTable {
    /// Load a long-format table from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P, config: &DatasetConfig) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file, config)
    }

    /// Load a long-format table from any CSV source.
    ///
    /// Every configured column must be present. Rows with an empty or
    /// unparseable cell in any configured column are dropped, as are rows
    /// whose year is not made of digits only.
    pub fn from_reader<R: Read>(reader: R, config: &DatasetConfig) -> Result<Self> {
        config.validate()?;

        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();

        let required = config.required_columns();
        let indices = column_indices(&headers, &required).ok_or_else(|| {
            ForecastError::DataError(format!(
                "Missing required columns; the table must provide all of: {}",
                required.join(", ")
            ))
        })?;

        let mut rows = Vec::new();
        let mut dropped = 0usize;
        for record in csv_reader.records() {
            let record = record?;
            match parse_row(&record, &indices) {
                Some(row) => rows.push(row),
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            log::warn!("Dropped {} incomplete or invalid rows", dropped);
        }
        if rows.is_empty() {
            return Err(ForecastError::DataError(
                "Table contains no complete rows".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let countries: Vec<String> = rows
            .iter()
            .filter(|row| seen.insert(row.country.clone()))
            .map(|row| row.country.clone())
            .collect();

        log::info!(
            "Loaded {} rows covering {} countries",
            rows.len(),
            countries.len()
        );

        Ok(Self {
            rows,
            countries,
            indicator_columns: config.indicator_columns.clone(),
        })
    }

    pub fn rows(&self) -> &[DemandRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Countries in order of first appearance
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    pub fn indicator_columns(&self) -> &[String] {
        &self.indicator_columns
    }

    fn country_rows<'a>(&'a self, country: &'a str) -> Result<impl Iterator<Item = &'a DemandRow>> {
        if !self.countries.iter().any(|c| c == country) {
            return Err(ForecastError::DataError(format!(
                "Unknown country '{}'",
                country
            )));
        }
        Ok(self.rows.iter().filter(move |row| row.country == country))
    }

    /// Demand series of one country, sorted by year and labelled with the country
    pub fn series(&self, country: &str) -> Result<TimeSeries> {
        let points = self.country_rows(country)?.map(|row| (row.year, row.demand));
        TimeSeries::from_unsorted(points)
            .map(|series| series.with_label(country))
            .map_err(|e| ForecastError::DataError(format!("{}: {}", country, e)))
    }

    /// Indicator values of one country, sorted by year
    pub fn indicators(&self, country: &str) -> Result<Vec<IndicatorRow>> {
        let mut rows: Vec<IndicatorRow> = self
            .country_rows(country)?
            .map(|row| IndicatorRow {
                year: row.year,
                values: self
                    .indicator_columns
                    .iter()
                    .cloned()
                    .zip(row.indicators.iter().copied())
                    .collect(),
            })
            .collect();
        rows.sort_by_key(|row| row.year);
        Ok(rows)
    }

    /// Range of years present in the table
    pub fn available_years(&self) -> Option<RangeInclusive<i32>> {
        let min = self.rows.iter().map(|row| row.year).min()?;
        let max = self.rows.iter().map(|row| row.year).max()?;
        Some(min..=max)
    }

    /// Demand of every country reporting the given year, in country order
    pub fn snapshot(&self, year: i32) -> Vec<CountryValue> {
        self.countries
            .iter()
            .filter_map(|country| {
                self.rows
                    .iter()
                    .find(|row| row.year == year && &row.country == country)
                    .map(|row| CountryValue {
                        country: country.clone(),
                        value: row.demand,
                    })
            })
            .collect()
    }
}

/// Wide-format table: a year column plus one value column per series
#[derive(Debug, Clone)]
pub struct WideTable {
    years: Vec<i32>,
    columns: Vec<String>,
    cells: Vec<Vec<Option<f64>>>,
}

impl WideTable {
    /// Load a wide-format table from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P, config: &DatasetConfig) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file, config)
    }

    /// Load a wide-format table from any CSV source.
    ///
    /// Rows whose year is not made of digits are dropped; empty or
    /// unparseable value cells are treated as missing.
    pub fn from_reader<R: Read>(reader: R, config: &DatasetConfig) -> Result<Self> {
        let year_column = config.wide_year_column.as_str();
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();

        let year_index = headers
            .iter()
            .position(|h| h == year_column)
            .ok_or_else(|| {
                ForecastError::DataError(format!("A '{}' column is required", year_column))
            })?;
        let value_indices: Vec<usize> = (0..headers.len()).filter(|&i| i != year_index).collect();
        let columns: Vec<String> = value_indices
            .iter()
            .map(|&i| headers[i].to_string())
            .collect();

        let mut years = Vec::new();
        let mut cells = Vec::new();
        let mut dropped = 0usize;
        for record in csv_reader.records() {
            let record = record?;
            let year = record
                .get(year_index)
                .filter(|cell| is_numeric_year(cell))
                .and_then(|cell| cell.parse::<i32>().ok());
            let Some(year) = year else {
                dropped += 1;
                continue;
            };
            years.push(year);
            cells.push(
                value_indices
                    .iter()
                    .map(|&i| record.get(i).and_then(parse_value))
                    .collect(),
            );
        }

        if dropped > 0 {
            log::warn!("Dropped {} rows without a valid year", dropped);
        }

        Ok(Self {
            years,
            columns,
            cells,
        })
    }

    /// Names of the value columns
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Series of one column, skipping missing cells, labelled with the column name
    pub fn series(&self, column: &str) -> Result<TimeSeries> {
        let index = self
            .columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| ForecastError::DataError(format!("Unknown column '{}'", column)))?;

        let points = self
            .years
            .iter()
            .zip(self.cells.iter())
            .filter_map(|(&year, row)| row[index].map(|value| (year, value)));
        TimeSeries::from_unsorted(points)
            .map(|series| series.with_label(column))
            .map_err(|e| ForecastError::DataError(format!("{}: {}", column, e)))
    }
}

fn column_indices(headers: &StringRecord, required: &[String]) -> Option<Vec<usize>> {
    required
        .iter()
        .map(|column| headers.iter().position(|h| h == column))
        .collect()
}

fn parse_value(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a complete row; `None` when any configured cell is missing or invalid.
fn parse_row(record: &StringRecord, indices: &[usize]) -> Option<DemandRow> {
    let cell = |i: usize| record.get(indices[i]).filter(|c| !c.is_empty());

    let country = cell(0)?.to_string();
    let year = cell(1)
        .filter(|c| is_numeric_year(c))
        .and_then(|c| c.parse::<i32>().ok())?;
    let demand = cell(2).and_then(parse_value)?;
    let indicators = (3..indices.len())
        .map(|i| cell(i).and_then(parse_value))
        .collect::<Option<Vec<f64>>>()?;

    Some(DemandRow {
        country,
        year,
        demand,
        indicators,
    })
}
