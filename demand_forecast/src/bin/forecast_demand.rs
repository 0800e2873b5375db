use anyhow::{bail, Context, Result};
use clap::Parser;
use demand_forecast::comparison::{compare, Outcome, SeriesOutcome};
use demand_forecast::config::AppConfig;
use demand_forecast::dataset::{DemandTable, WideTable};
use demand_forecast::{Forecaster, TimeSeries};
use std::path::PathBuf;
use tabled::{Table, Tabled};

/// Forecast annual electricity demand per country with an ARIMA model
#[derive(Parser, Debug)]
#[command(name = "forecast_demand", version, about)]
struct Cli {
    /// CSV file with annual demand data
    input: PathBuf,

    /// Country (or column, with --wide) to forecast; repeat to compare
    #[arg(short, long = "country")]
    countries: Vec<String>,

    /// Input has a year column plus one column per country
    #[arg(long)]
    wide: bool,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of future years to forecast
    #[arg(long)]
    horizon: Option<usize>,

    /// Minimum observations required before forecasting
    #[arg(long)]
    min_observations: Option<usize>,

    /// Print the demand of every country in this year instead of forecasting
    #[arg(long)]
    snapshot: Option<i32>,

    /// Emit JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Tabled)]
struct ForecastRow {
    #[tabled(rename = "Series")]
    series: String,
    #[tabled(rename = "Year")]
    year: i32,
    #[tabled(rename = "Forecast")]
    value: String,
}

#[derive(Tabled)]
struct SnapshotRow {
    #[tabled(rename = "Country")]
    country: String,
    #[tabled(rename = "Demand")]
    value: String,
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(horizon) = cli.horizon {
        config.forecast.horizon = horizon;
    }
    if let Some(min_observations) = cli.min_observations {
        config.forecast.min_observations = min_observations;
    }
    config.validate()?;
    Ok(config)
}

fn select<'a>(requested: &'a [String], available: &'a [String]) -> Result<Vec<&'a String>> {
    if requested.is_empty() {
        return match available.first() {
            Some(first) => Ok(vec![first]),
            None => bail!("The input contains no series"),
        };
    }
    Ok(requested.iter().collect())
}

fn load_series(cli: &Cli, config: &AppConfig) -> Result<Vec<TimeSeries>> {
    if cli.wide {
        let table = WideTable::from_csv(&cli.input, &config.dataset)
            .with_context(|| format!("Failed to read {}", cli.input.display()))?;
        let series = select(&cli.countries, table.columns())?
            .into_iter()
            .map(|name| table.series(name).map_err(Into::into))
            .collect();
        series
    } else {
        let table = DemandTable::from_csv(&cli.input, &config.dataset)
            .with_context(|| format!("Failed to read {}", cli.input.display()))?;
        let series = select(&cli.countries, table.countries())?
            .into_iter()
            .map(|name| table.series(name).map_err(Into::into))
            .collect();
        series
    }
}

fn print_snapshot(cli: &Cli, config: &AppConfig, year: i32) -> Result<()> {
    let table = DemandTable::from_csv(&cli.input, &config.dataset)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;
    let snapshot = table.snapshot(year);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }
    if snapshot.is_empty() {
        if let Some(years) = table.available_years() {
            println!(
                "No data for {}; available years are {}-{}",
                year,
                years.start(),
                years.end()
            );
        }
        return Ok(());
    }
    let rows: Vec<SnapshotRow> = snapshot
        .into_iter()
        .map(|entry| SnapshotRow {
            country: entry.country,
            value: format!("{:.2}", entry.value),
        })
        .collect();
    println!("{}", Table::new(rows));
    Ok(())
}

fn print_outcomes(outcomes: &[SeriesOutcome]) {
    let mut rows = Vec::new();
    for entry in outcomes {
        match &entry.outcome {
            Outcome::Forecast(result) => {
                rows.extend(result.points().iter().map(|point| ForecastRow {
                    series: entry.label.clone(),
                    year: point.year,
                    value: format!("{:.2}", point.value),
                }));
            }
            Outcome::Skipped { reason } => println!("{}: skipped ({})", entry.label, reason),
            Outcome::Failed { message } => println!("{}: {}", entry.label, message),
        }
    }
    if !rows.is_empty() {
        println!("{}", Table::new(rows));
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    if let Some(year) = cli.snapshot {
        return print_snapshot(&cli, &config, year);
    }

    let series = load_series(&cli, &config)?;
    let forecaster = Forecaster::new(config.forecast.clone())?;
    log::info!(
        "Forecasting {} series with {}, horizon {}",
        series.len(),
        config.forecast.order,
        config.forecast.horizon
    );

    let outcomes = compare(&forecaster, &series, config.max_compared_series)?;
    for entry in &outcomes {
        if let Outcome::Failed { message } = &entry.outcome {
            log::warn!("{}: {}", entry.label, message);
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        print_outcomes(&outcomes);
    }
    Ok(())
}
