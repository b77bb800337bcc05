use alphatic::error::AnalyticsError;
use alphatic::model::{PriceMatrix, PriceSeries};
use alphatic::optimizer::{
    calculate_efficient_frontier, optimize_portfolio, random_weights, OptimizationMethod,
};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

fn synthetic_prices(specs: &[(&str, f64, f64)], days: usize, seed: u64) -> PriceMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let dates: Vec<NaiveDate> = (0..days)
        .map(|i| start + chrono::Duration::days(i as i64))
        .collect();
    let series: Vec<PriceSeries> = specs
        .iter()
        .map(|(symbol, mu, sigma)| {
            let normal = Normal::new(*mu, *sigma).unwrap();
            let mut price = 100.0;
            let closes: Vec<f64> = (0..days)
                .map(|_| {
                    price *= 1.0 + normal.sample(&mut rng);
                    price
                })
                .collect();
            PriceSeries::from_closes(*symbol, &dates, &closes)
        })
        .collect();
    PriceMatrix::from_series(&series)
}

fn three_assets() -> PriceMatrix {
    synthetic_prices(
        &[("EQ", 0.0008, 0.012), ("TECH", 0.0010, 0.020), ("BOND", 0.0003, 0.004)],
        750,
        11,
    )
}

#[test]
fn optimal_weights_are_long_only_and_fully_invested() {
    let result = optimize_portfolio(&three_assets(), OptimizationMethod::MaxSharpe).unwrap();
    assert_eq!(result.symbols, vec!["EQ", "TECH", "BOND"]);
    assert!(result.weights.iter().all(|w| (-1e-12..=1.0 + 1e-12).contains(w)));
    assert!((result.weights.iter().sum::<f64>() - 1.0).abs() < 1e-6);
    assert!((result.to_weights().sum() - 1.0).abs() < 1e-6);
}

#[test]
fn optimum_dominates_the_sampled_cloud() {
    let prices = three_assets();
    let optimal = optimize_portfolio(&prices, OptimizationMethod::MaxSharpe).unwrap();
    assert!(optimal.converged);
    let frontier = calculate_efficient_frontier(&prices, 500, Some(5)).unwrap();
    assert_eq!(frontier.points.len(), 500);
    let best = frontier.best_sharpe().unwrap();
    assert!(optimal.stats.sharpe >= best.stats.sharpe - 1e-6);
    for p in &frontier.points {
        assert!((p.weights.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn single_asset_takes_everything() {
    let prices = synthetic_prices(&[("ONLY", 0.0005, 0.01)], 100, 2);
    let result = optimize_portfolio(&prices, OptimizationMethod::MaxSharpe).unwrap();
    assert!((result.weights[0] - 1.0).abs() < 1e-12);
}

#[test]
fn degenerate_covariance_falls_back_to_equal_weights() {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let dates: Vec<NaiveDate> = (0..10)
        .map(|i| start + chrono::Duration::days(i))
        .collect();
    let flat = vec![50.0; 10];
    let prices = PriceMatrix::from_series(&[
        PriceSeries::from_closes("A", &dates, &flat),
        PriceSeries::from_closes("B", &dates, &flat),
    ]);
    let result = optimize_portfolio(&prices, OptimizationMethod::MaxSharpe).unwrap();
    assert!(!result.converged);
    assert_eq!(result.weights, vec![0.5, 0.5]);
}

#[test]
fn too_little_history_is_reported() {
    let prices = synthetic_prices(&[("A", 0.0, 0.01), ("B", 0.0, 0.01)], 2, 3);
    let err = optimize_portfolio(&prices, OptimizationMethod::MaxSharpe).unwrap_err();
    assert!(matches!(err, AnalyticsError::InsufficientHistory { needed: 2, got: 1 }));
}

#[test]
fn random_weights_sum_to_one() {
    let mut rng = StdRng::seed_from_u64(9);
    for n in 1..6 {
        let w = random_weights(n, &mut rng);
        assert_eq!(w.len(), n);
        assert!((w.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(w.iter().all(|x| *x >= 0.0));
    }
    assert!(random_weights(0, &mut rng).is_empty());
}

#[test]
fn method_parses_from_config_strings() {
    assert_eq!(
        "max_sharpe".parse::<OptimizationMethod>().unwrap(),
        OptimizationMethod::MaxSharpe
    );
    assert!("min_vol".parse::<OptimizationMethod>().is_err());
}
