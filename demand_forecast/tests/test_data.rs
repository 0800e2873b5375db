use demand_forecast::config::DatasetConfig;
use demand_forecast::dataset::{CountryValue, DemandTable, WideTable};
use demand_forecast::{ForecastError, TimeSeries};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

const LONG_CSV: &str = "\
country,year,electricity_demand,population,gdp,energy_per_capita,energy_per_gdp,iso_code
Korea,2001,300.5,47000000,900,5000,1.2,KOR
Korea,2000,290.0,46800000,850,4900,1.3,KOR
Japan,2000,1000.0,126000000,4500,4000,0.9,JPN
Korea,2002,,47200000,950,5100,1.1,KOR
Japan,2001a,1010.0,126100000,4550,4020,0.9,JPN
Japan,2001.0,1012.0,126100000,4550,4020,0.9,JPN
Japan,2002,1020.0,126200000,4600,4050,0.9,JPN
Chile,2002,70.0,15500000,80,1500,2.0,CHL
";

fn long_table() -> DemandTable {
    DemandTable::from_reader(LONG_CSV.as_bytes(), &DatasetConfig::default()).unwrap()
}

#[test]
fn test_time_series_validation() {
    let series = TimeSeries::new(vec![(2000, 1.0), (2001, 2.0), (2003, 4.0)]).unwrap();
    assert_eq!(series.len(), 3);
    assert_eq!(series.first_year(), Some(2000));
    assert_eq!(series.last_year(), Some(2003));
    assert_eq!(series.values(), vec![1.0, 2.0, 4.0]);
    assert!(series.has_gaps());

    assert!(matches!(
        TimeSeries::new(vec![(2000, 1.0), (2000, 2.0)]),
        Err(ForecastError::DataError(_))
    ));
    assert!(TimeSeries::new(vec![(2001, 1.0), (2000, 2.0)]).is_err());
    assert!(TimeSeries::new(vec![(2000, f64::INFINITY)]).is_err());

    let empty = TimeSeries::new(Vec::new()).unwrap();
    assert!(empty.is_empty());
    assert_eq!(empty.last_year(), None);
}

#[test]
fn test_time_series_from_unsorted() {
    let series = TimeSeries::from_unsorted(vec![(2002, 3.0), (2000, 1.0), (2001, 2.0)])
        .unwrap()
        .with_label("Chile");
    assert_eq!(series.years(), vec![2000, 2001, 2002]);
    assert_eq!(series.label(), Some("Chile"));
    assert!(!series.has_gaps());

    assert!(TimeSeries::from_unsorted(vec![(2001, 1.0), (2000, 2.0), (2001, 3.0)]).is_err());
}

#[test]
fn test_long_table_drops_incomplete_rows() {
    let table = long_table();

    // Empty demand, "2001a" and "2001.0" rows are dropped
    assert_eq!(table.len(), 5);
    assert_eq!(table.countries(), &["Korea", "Japan", "Chile"]);
    assert_eq!(table.available_years(), Some(2000..=2002));
}

#[test]
fn test_long_table_series_is_sorted() {
    let table = long_table();

    let korea = table.series("Korea").unwrap();
    assert_eq!(korea.label(), Some("Korea"));
    assert_eq!(korea.years(), vec![2000, 2001]);
    assert_eq!(korea.values(), vec![290.0, 300.5]);

    let japan = table.series("Japan").unwrap();
    assert_eq!(japan.years(), vec![2000, 2002]);

    assert!(matches!(
        table.series("Peru"),
        Err(ForecastError::DataError(_))
    ));
}

#[test]
fn test_long_table_snapshot_and_indicators() {
    let table = long_table();

    assert_eq!(
        table.snapshot(2002),
        vec![
            CountryValue {
                country: "Japan".to_string(),
                value: 1020.0
            },
            CountryValue {
                country: "Chile".to_string(),
                value: 70.0
            },
        ]
    );
    assert!(table.snapshot(1999).is_empty());

    let indicators = table.indicators("Korea").unwrap();
    assert_eq!(indicators.len(), 2);
    assert_eq!(indicators[0].year, 2000);
    assert_eq!(indicators[0].values["population"], 46800000.0);
    assert_eq!(indicators[1].values["energy_per_gdp"], 1.2);
}

#[test]
fn test_long_table_requires_columns() {
    let csv = "country,year,electricity_demand\nKorea,2000,1.0\n";
    let err = DemandTable::from_reader(csv.as_bytes(), &DatasetConfig::default()).unwrap_err();

    match err {
        ForecastError::DataError(msg) => {
            assert!(msg.contains("population"));
            assert!(msg.contains("energy_per_gdp"));
        }
        other => panic!("Expected DataError, got {:?}", other),
    }
}

#[test]
fn test_long_table_with_custom_columns() {
    let config = DatasetConfig {
        country_column: "region".to_string(),
        value_column: "load".to_string(),
        indicator_columns: Vec::new(),
        ..DatasetConfig::default()
    };
    let csv = "region,year,load\nNorth,2000,5\nNorth,2001,6\n";
    let table = DemandTable::from_reader(csv.as_bytes(), &config).unwrap();
    assert_eq!(table.series("North").unwrap().values(), vec![5.0, 6.0]);
}

#[test]
fn test_long_table_rejects_duplicate_years() {
    let config = DatasetConfig {
        indicator_columns: Vec::new(),
        ..DatasetConfig::default()
    };
    let csv = "country,year,electricity_demand\nKorea,2000,1\nKorea,2000,2\n";
    let table = DemandTable::from_reader(csv.as_bytes(), &config).unwrap();
    assert!(table.series("Korea").is_err());
}

#[test]
fn test_long_table_without_complete_rows() {
    let csv = "country,year,electricity_demand,population,gdp,energy_per_capita,energy_per_gdp\n\
               Korea,,1,2,3,4,5\n";
    assert!(DemandTable::from_reader(csv.as_bytes(), &DatasetConfig::default()).is_err());
}

#[test]
fn test_long_table_from_csv_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", LONG_CSV).unwrap();

    let table = DemandTable::from_csv(file.path(), &DatasetConfig::default()).unwrap();
    assert_eq!(table.countries().len(), 3);

    let missing = DemandTable::from_csv("nonexistent_file.csv", &DatasetConfig::default());
    assert!(matches!(missing, Err(ForecastError::IoError(_))));
}

#[test]
fn test_wide_table() {
    let csv = "Year,Korea,Japan\n2000,10,100\n2001,,101\n2002,12,102\nabc,1,1\n";
    let table = WideTable::from_reader(csv.as_bytes(), &DatasetConfig::default()).unwrap();

    assert_eq!(table.columns(), &["Korea", "Japan"]);
    assert_eq!(table.years(), &[2000, 2001, 2002]);

    let korea = table.series("Korea").unwrap();
    assert_eq!(korea.years(), vec![2000, 2002]);
    assert_eq!(korea.label(), Some("Korea"));
    assert_eq!(table.series("Japan").unwrap().len(), 3);
    assert!(table.series("Chile").is_err());
}

#[test]
fn test_wide_table_requires_year_column() {
    let csv = "year,Korea\n2000,1\n";
    let err = WideTable::from_reader(csv.as_bytes(), &DatasetConfig::default()).unwrap_err();
    assert!(err.to_string().contains("'Year'"));
}
