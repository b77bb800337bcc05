use alphatic::regime::{
    analyze_regime_performance, detect_market_regime_enhanced, detect_market_regimes,
    Confidence, CurrentRegime, MarketRegime, Trend, DEFAULT_REGIME_LOOKBACK,
};
use alphatic::model::ReturnSeries;
use alphatic::stats::cumulative_growth;
use chrono::NaiveDate;

fn returns(values: Vec<f64>) -> ReturnSeries {
    let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    let dates = (0..values.len())
        .map(|i| start + chrono::Duration::days(i as i64))
        .collect();
    ReturnSeries::new(dates, values)
}

#[test]
fn every_date_gets_exactly_one_label() {
    let values: Vec<f64> = (0..200).map(|i| ((i as f64) * 0.7).sin() * 0.01).collect();
    let r = returns(values);
    let labels = detect_market_regimes(&r, DEFAULT_REGIME_LOOKBACK);
    assert_eq!(labels.len(), r.len());
    for (label, date) in labels.iter().zip(r.dates()) {
        assert_eq!(label.date, *date);
    }
    for label in &labels[..DEFAULT_REGIME_LOOKBACK - 1] {
        assert_eq!(label.regime, MarketRegime::SidewaysChoppy);
        assert!(label.rolling_return.is_none());
    }
    assert!(labels[DEFAULT_REGIME_LOOKBACK - 1].rolling_volatility.is_some());
}

#[test]
fn constant_gains_are_low_vol_bull() {
    let labels = detect_market_regimes(&returns(vec![0.01; 80]), 20);
    assert_eq!(labels.last().unwrap().regime, MarketRegime::BullLowVol);
    let labels = detect_market_regimes(&returns(vec![-0.01; 80]), 20);
    assert_eq!(labels.last().unwrap().regime, MarketRegime::BearLowVol);
}

#[test]
fn choppy_gains_after_calm_period_are_high_vol_bull() {
    let mut values = vec![0.002; 100];
    values.extend((0..100).map(|i| if i % 2 == 0 { 0.03 } else { -0.02 }));
    let labels = detect_market_regimes(&returns(values), 60);
    assert_eq!(labels.last().unwrap().regime, MarketRegime::BullHighVol);
    assert_eq!(labels[80].regime, MarketRegime::BullLowVol);
}

#[test]
fn regime_performance_in_first_seen_order() {
    let mut values = vec![0.0; 30];
    values.extend(vec![0.01; 30]);
    let r = returns(values);
    let labels = detect_market_regimes(&r, 10);
    let perf = analyze_regime_performance(&r, &labels);
    assert_eq!(perf[0].regime, MarketRegime::SidewaysChoppy);
    assert_eq!(perf.iter().map(|p| p.occurrences).sum::<usize>(), r.len());
    let bull = perf
        .iter()
        .find(|p| p.regime == MarketRegime::BullLowVol)
        .unwrap();
    assert!((bull.win_rate - 1.0).abs() < f64::EPSILON);
    assert!((bull.best_day - 0.01).abs() < 1e-12);
}

#[test]
fn extreme_volatility_is_crisis() {
    let r = returns((0..120).map(|i| if i % 2 == 0 { 0.05 } else { -0.05 }).collect());
    let prices = cumulative_growth(r.values());
    let a = detect_market_regime_enhanced(&r, &prices);
    assert_eq!(a.regime, CurrentRegime::Crisis);
    assert_eq!(a.confidence, Confidence::High);
    assert_eq!((a.allocation.stocks, a.allocation.bonds, a.allocation.cash), (45, 45, 10));
}

#[test]
fn persistent_losses_with_elevated_volatility_are_bear() {
    let r = returns((0..120).map(|i| if i % 2 == 0 { 0.016 } else { -0.022 }).collect());
    let prices = cumulative_growth(r.values());
    let a = detect_market_regime_enhanced(&r, &prices);
    assert!(a.inputs.volatility > 0.25 && a.inputs.volatility < 0.35);
    assert_eq!(a.regime, CurrentRegime::BearMarket);
    assert_eq!(a.confidence, Confidence::High);
}

#[test]
fn smooth_rally_is_bull_with_golden_cross() {
    let r = returns(vec![0.003; 260]);
    let prices = cumulative_growth(r.values());
    let a = detect_market_regime_enhanced(&r, &prices);
    assert_eq!(a.regime, CurrentRegime::BullMarket);
    assert_eq!(a.inputs.trend, Trend::Bullish);
    assert!(a.notes.iter().any(|n| n.contains("Golden Cross")));
    assert_eq!(a.allocation.stocks, 75);
}

#[test]
fn modest_gains_are_recovery() {
    let r = returns(vec![0.001; 100]);
    let prices = cumulative_growth(r.values());
    let a = detect_market_regime_enhanced(&r, &prices);
    assert_eq!(a.regime, CurrentRegime::Recovery);
    assert_eq!(a.confidence, Confidence::Medium);
    assert_eq!(a.inputs.trend, Trend::InsufficientData);
}

#[test]
fn flat_market_is_neutral() {
    let r = returns(vec![0.0; 100]);
    let prices = cumulative_growth(r.values());
    let a = detect_market_regime_enhanced(&r, &prices);
    assert_eq!(a.regime, CurrentRegime::Neutral);
    assert_eq!(a.allocation.stocks, 60);
}

#[test]
fn flat_prices_read_as_neutral_trend_at_any_level() {
    let r = returns(vec![0.0; 299]);
    for level in [0.3, 23.17, 57.89, 412.33] {
        let prices = vec![level; 300];
        let a = detect_market_regime_enhanced(&r, &prices);
        assert_eq!(a.inputs.trend, Trend::Neutral, "level {level}");
        assert_eq!(a.inputs.price_vs_sma200, Some(0.0));
        assert!(a.notes.iter().all(|n| !n.contains("Cross")), "level {level}: {:?}", a.notes);
    }
}
