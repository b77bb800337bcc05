use alphatic::error::AnalyticsError;
use alphatic::metrics::{
    average_recovery_days, compute_metrics, compute_returns, income_breakdown, max_drawdown,
    monthly_returns, rolling_metrics, total_return, weights_warning, DEFAULT_RISK_FREE_RATE,
};
use alphatic::model::{PriceMatrix, PriceSeries, ReturnSeries, Weights};
use chrono::NaiveDate;

fn dates_from(start: NaiveDate, n: usize) -> Vec<NaiveDate> {
    (0..n)
        .map(|i| start + chrono::Duration::days(i as i64))
        .collect()
}

fn dates(n: usize) -> Vec<NaiveDate> {
    dates_from(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), n)
}

fn series_from_returns(symbol: &str, returns: &[f64]) -> PriceSeries {
    let mut closes = vec![100.0];
    for r in returns {
        let last = *closes.last().unwrap();
        closes.push(last * (1.0 + r));
    }
    PriceSeries::from_closes(symbol, &dates(closes.len()), &closes)
}

fn returns(values: &[f64]) -> ReturnSeries {
    ReturnSeries::new(dates(values.len()), values.to_vec())
}

#[test]
fn two_asset_equal_weight_returns() {
    let a = series_from_returns("A", &[0.01, -0.01, 0.02, -0.02]);
    let b = series_from_returns("B", &[0.0, 0.0, 0.0, 0.0]);
    let matrix = PriceMatrix::from_series(&[a, b]);
    let weights = Weights::from_pairs([("A", 0.5), ("B", 0.5)]);

    let port = compute_returns(&matrix, &weights);
    let expected = [0.005, -0.005, 0.01, -0.01];
    assert_eq!(port.len(), expected.len());
    for (got, want) in port.values().iter().zip(expected) {
        assert!((got - want).abs() < 1e-12, "got {got}, want {want}");
    }
}

#[test]
fn unweighted_symbol_contributes_nothing() {
    let a = series_from_returns("A", &[0.02, 0.01]);
    let b = series_from_returns("B", &[0.5, -0.5]);
    let matrix = PriceMatrix::from_series(&[a, b]);
    let port = compute_returns(&matrix, &Weights::from_pairs([("A", 1.0)]));
    assert!((port.values()[0] - 0.02).abs() < 1e-12);
    assert!((port.values()[1] - 0.01).abs() < 1e-12);
}

#[test]
fn misspecified_weights_are_flagged_not_rejected() {
    let w = Weights::from_pairs([("A", 0.6), ("B", 0.6)]);
    let msg = weights_warning(&w, 0.01).unwrap();
    assert!(msg.contains("120.0%"));
    assert!(weights_warning(&Weights::equal(&["A", "B"]), 0.01).is_none());
}

#[test]
fn total_return_matches_cumulative_product() {
    let r = returns(&[0.01, -0.02, 0.03, 0.015, -0.005]);
    let m = compute_metrics(&r, None, DEFAULT_RISK_FREE_RATE).unwrap();
    let cum = r.values().iter().fold(1.0, |acc, x| acc * (1.0 + x)) - 1.0;
    assert!((m.total_return - cum).abs() < 1e-12);
    assert!((total_return(r.values()) - cum).abs() < 1e-12);
}

#[test]
fn drawdown_non_positive_and_volatility_non_negative() {
    let r = returns(&[0.05, -0.1, 0.02, -0.03, 0.08, -0.01]);
    let m = compute_metrics(&r, None, DEFAULT_RISK_FREE_RATE).unwrap();
    assert!(m.max_drawdown <= 0.0);
    assert!(m.annualized_volatility >= 0.0);
    assert!((m.max_drawdown - max_drawdown(r.values())).abs() < 1e-15);
}

#[test]
fn compute_metrics_is_idempotent() {
    let r = returns(&[0.01, -0.02, 0.03, 0.015, -0.005]);
    let first = compute_metrics(&r, None, 0.02).unwrap();
    let second = compute_metrics(&r, None, 0.02).unwrap();
    assert_eq!(first, second);
}

#[test]
fn single_observation_resolves_ratios_to_zero() {
    let m = compute_metrics(&returns(&[0.01]), None, 0.02).unwrap();
    assert_eq!(m.annualized_volatility, 0.0);
    assert_eq!(m.sharpe, 0.0);
    assert_eq!(m.sortino, 0.0);
    assert!((m.win_rate - 1.0).abs() < f64::EPSILON);
}

#[test]
fn all_zero_returns() {
    let m = compute_metrics(&returns(&[0.0; 30]), None, 0.02).unwrap();
    assert_eq!(m.sharpe, 0.0);
    assert_eq!(m.sortino, 0.0);
    assert_eq!(m.calmar, 0.0);
    assert_eq!(m.max_drawdown, 0.0);
    assert_eq!(m.win_rate, 0.0);
    assert!(m.alpha.is_none());
    assert!(m.beta.is_none());
}

#[test]
fn empty_series_is_an_error() {
    let err = compute_metrics(&returns(&[]), None, 0.02).unwrap_err();
    assert!(matches!(err, AnalyticsError::EmptySeries));
}

#[test]
fn benchmark_against_itself_has_unit_beta_and_zero_alpha() {
    let r = returns(&[0.01, -0.02, 0.03, 0.015, -0.005, 0.007]);
    let m = compute_metrics(&r, Some(&r), 0.02).unwrap();
    assert!((m.beta.unwrap() - 1.0).abs() < 1e-12);
    assert!(m.alpha.unwrap().abs() < 1e-12);
}

#[test]
fn non_overlapping_benchmark_omits_alpha_beta() {
    let r = returns(&[0.01, -0.02, 0.03]);
    let later = ReturnSeries::new(
        dates_from(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(), 3),
        vec![0.01, 0.01, 0.01],
    );
    let m = compute_metrics(&r, Some(&later), 0.02).unwrap();
    assert!(m.alpha.is_none());
    assert!(m.beta.is_none());
}

#[test]
fn flat_benchmark_defaults_beta_to_one() {
    let r = returns(&[0.01, -0.02, 0.03]);
    let flat = returns(&[0.0, 0.0, 0.0]);
    let m = compute_metrics(&r, Some(&flat), 0.0).unwrap();
    assert_eq!(m.beta, Some(1.0));
}

#[test]
fn monthly_returns_compound_within_calendar_month() {
    let start = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap();
    let r = ReturnSeries::new(dates_from(start, 3), vec![0.1, 0.1, 0.05]);
    let months = monthly_returns(&r);
    assert_eq!(months.len(), 2);
    assert_eq!((months[0].year, months[0].month), (2024, 1));
    assert!((months[0].value - 0.21).abs() < 1e-12);
    assert_eq!(months[1].month, 2);
    assert!((months[1].value - 0.05).abs() < 1e-12);
}

#[test]
fn recovery_days_count_only_completed_episodes() {
    let recovered = returns(&[0.1, -0.1, 0.2]);
    assert!((average_recovery_days(&recovered) - 1.0).abs() < f64::EPSILON);

    let still_under = returns(&[0.1, -0.1, 0.01]);
    assert_eq!(average_recovery_days(&still_under), 0.0);
}

#[test]
fn rolling_metrics_undefined_until_window_fills() {
    let r = returns(&[0.01, -0.01, 0.02, 0.0, 0.01]);
    let points = rolling_metrics(&r, 3);
    assert_eq!(points.len(), 5);
    assert!(points[0].sharpe.is_none());
    assert!(points[1].sharpe.is_none());
    assert!(points[2].sharpe.is_some());
    assert!(points[2].sortino.is_none(), "one negative return has no sample std");
}

#[test]
fn income_breakdown_splits_dividends_from_capital_gains() {
    let r = returns(&[0.01]);
    let months = income_breakdown(&r, 10_000.0, 0.012);
    assert_eq!(months.len(), 1);
    let m = months[0];
    assert!((m.dividend_income - 10.0).abs() < 1e-9);
    assert!((m.total_gain - 100.0).abs() < 1e-9);
    assert!((m.capital_gain - 90.0).abs() < 1e-9);
    assert!((m.portfolio_value - 10_100.0).abs() < 1e-9);
}
