use approx::assert_relative_eq;
use demand_forecast::models::arima::ArimaModel;
use demand_forecast::models::{ArimaOrder, FittedModel, ForecastModel, ForecastResult};
use demand_forecast::ForecastError;
use pretty_assertions::assert_eq;

fn noisy_values(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let t = i as f64;
            200.0 + 1.5 * t + 5.0 * (0.9 * t).sin() + 1.5 * (2.3 * t).cos()
        })
        .collect()
}

/// Stationary series oscillating around 50
fn stationary_values(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let t = i as f64;
            50.0 + 6.0 * (2.1 * t).sin() + 3.0 * (0.7 * t).cos()
        })
        .collect()
}

#[test]
fn test_order_validation_and_display() {
    assert!(ArimaOrder::new(1, 1, 1).is_ok());
    assert!(ArimaOrder::new(6, 1, 1).is_err());
    assert!(ArimaOrder::new(1, 3, 1).is_err());
    assert!(ArimaOrder::new(1, 1, 6).is_err());

    let order = ArimaOrder::default();
    assert_eq!(order.to_string(), "ARIMA(1,1,1)");
    assert_eq!(order.min_observations(), 5);
}

#[test]
fn test_arima_fit_and_forecast() {
    let model = ArimaModel::new(ArimaOrder::default()).unwrap();
    let values = noisy_values(30);

    let fitted = model.fit(&values).unwrap();
    assert_eq!(fitted.ar_coefficients().len(), 1);
    assert_eq!(fitted.ma_coefficients().len(), 1);
    assert!(fitted.ar_coefficients()[0].abs() < 1.0);
    assert!(fitted.ma_coefficients()[0].abs() <= 1.0);
    assert!(fitted.sigma2() > 0.0);
    assert!(fitted.log_likelihood().unwrap().is_finite());
    assert!(!fitted.is_degenerate());
    assert_eq!(fitted.mean(), None);
    assert_eq!(fitted.parameter_count(), 3);

    let forecast = fitted.forecast(10).unwrap();
    assert_eq!(forecast.len(), 10);
    assert!(forecast.iter().all(|v| v.is_finite()));
}

#[test]
fn test_aic_matches_log_likelihood() {
    let fitted = ArimaModel::new(ArimaOrder::default())
        .unwrap()
        .fit(&noisy_values(25))
        .unwrap();
    let ll = fitted.log_likelihood().unwrap();
    assert_relative_eq!(fitted.aic().unwrap(), -2.0 * ll + 6.0, epsilon = 1e-12);
}

#[test]
fn test_fitted_values_align_with_observations() {
    let values = noisy_values(20);
    let fitted = ArimaModel::new(ArimaOrder::default())
        .unwrap()
        .fit(&values)
        .unwrap();

    let in_sample = fitted.fitted_values();
    assert_eq!(in_sample.len(), values.len() - 1);
    assert_eq!(fitted.residuals().len(), values.len() - 1);

    // fitted + residual reproduces each observation after the first
    for (i, (prediction, residual)) in in_sample.iter().zip(fitted.residuals()).enumerate() {
        assert_relative_eq!(prediction + residual, values[i + 1], epsilon = 1e-9);
    }
}

#[test]
fn test_random_walk_repeats_last_value() {
    let values = noisy_values(15);
    let fitted = ArimaModel::new(ArimaOrder::new(0, 1, 0).unwrap())
        .unwrap()
        .fit(&values)
        .unwrap();

    let forecast = fitted.forecast(5).unwrap();
    assert_eq!(forecast, vec![values[14]; 5]);
}

#[test]
fn test_stationary_ar_reverts_to_mean() {
    let values = stationary_values(40);
    let fitted = ArimaModel::new(ArimaOrder::new(1, 0, 0).unwrap())
        .unwrap()
        .fit(&values)
        .unwrap();

    let mean = fitted.mean().unwrap();
    assert_relative_eq!(mean, values.iter().sum::<f64>() / 40.0, epsilon = 1e-12);
    assert_eq!(fitted.parameter_count(), 3);

    let forecast = fitted.forecast(10).unwrap();
    let first_gap = (forecast[0] - mean).abs();
    let last_gap = (forecast[9] - mean).abs();
    assert!(last_gap <= first_gap + 1e-12);
}

#[test]
fn test_linear_series_is_extrapolated_exactly() {
    let values: Vec<f64> = (1..=15).map(|v| v as f64).collect();
    let fitted = ArimaModel::new(ArimaOrder::default())
        .unwrap()
        .fit(&values)
        .unwrap();

    assert!(fitted.is_degenerate());
    assert_eq!(fitted.aic(), None);
    assert_eq!(
        fitted.forecast(3).unwrap(),
        vec![16.0, 17.0, 18.0]
    );
}

#[test]
fn test_second_difference_model() {
    let values = noisy_values(30);
    let fitted = ArimaModel::new(ArimaOrder::new(1, 2, 1).unwrap())
        .unwrap()
        .fit(&values)
        .unwrap();
    assert_eq!(fitted.fitted_values().len(), 28);
    assert_eq!(fitted.forecast(10).unwrap().len(), 10);
}

#[test]
fn test_fit_rejects_short_or_invalid_input() {
    let model = ArimaModel::new(ArimaOrder::default()).unwrap();

    let err = model.fit(&[1.0, 2.0, 3.0]).unwrap_err();
    assert!(matches!(
        err,
        ForecastError::PreconditionError {
            required: 5,
            actual: 3
        }
    ));

    let mut values = noisy_values(12);
    values[4] = f64::NAN;
    assert!(matches!(
        model.fit(&values),
        Err(ForecastError::DataError(_))
    ));
}

#[test]
fn test_zero_horizon_is_rejected() {
    let fitted = ArimaModel::default().fit(&noisy_values(20)).unwrap();
    assert!(matches!(
        fitted.forecast(0),
        Err(ForecastError::InvalidParameter(_))
    ));
}

#[test]
fn test_model_names() {
    let model = ArimaModel::new(ArimaOrder::new(2, 1, 0).unwrap()).unwrap();
    assert_eq!(model.name(), "ARIMA(2,1,0)");
    assert_eq!(model.fit(&noisy_values(20)).unwrap().name(), "ARIMA(2,1,0)");
}

#[test]
fn test_forecast_result_years_and_json() {
    let result = ForecastResult::new(
        Some("Japan".to_string()),
        ArimaOrder::default(),
        2020,
        vec![1.0, 2.0, 3.0],
    )
    .unwrap();

    assert_eq!(result.years(), vec![2021, 2022, 2023]);
    assert_eq!(result.horizon(), 3);

    let dates = result.period_end_dates().unwrap();
    assert_eq!(dates[0].to_string(), "2021-12-31");

    let json = result.to_json().unwrap();
    assert!(json.contains("\"label\":\"Japan\""));
    assert!(json.contains("\"year\":2023"));
}

#[test]
fn test_forecast_result_rejects_non_finite_values() {
    let err = ForecastResult::new(None, ArimaOrder::default(), 2020, vec![1.0, f64::NAN])
        .unwrap_err();
    assert!(matches!(err, ForecastError::ModelFitError(_)));

    assert!(ForecastResult::new(None, ArimaOrder::default(), 2020, Vec::new()).is_err());
}
