use alphatic::indicator::sma_series;
use alphatic::model::{PriceSeries, Signal, SignalAction};
use alphatic::scoring::generate_trading_signal;
use chrono::NaiveDate;

fn series(closes: &[f64]) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let dates: Vec<NaiveDate> = (0..closes.len())
        .map(|i| start + chrono::Duration::days(i as i64))
        .collect();
    PriceSeries::from_closes("TEST", &dates, closes)
}

#[test]
fn flat_series_holds_with_zero_score() {
    let closes = vec![100.0; 300];
    for period in [20, 50, 200] {
        assert_eq!(sma_series(&closes, period).last().copied().flatten(), Some(100.0));
    }

    let s = generate_trading_signal(&series(&closes));
    assert_eq!(s.signal, Signal::Hold);
    assert_eq!(s.action, SignalAction::Hold);
    assert_eq!(s.score, 0);
    assert_eq!(s.confidence, 0);
    assert!(s.reasons.is_empty(), "unexpected reasons: {:?}", s.reasons);
    assert_eq!(s.rsi, Some(50.0));
    assert_eq!(s.price_vs_sma200, Some(0.0));
}

#[test]
fn flat_series_holds_at_any_price_level() {
    for price in [0.1, 0.3, 1.1, 9.99, 23.17, 33.3, 57.89, 100.1, 123.45, 412.33] {
        let s = generate_trading_signal(&series(&vec![price; 300]));
        assert_eq!(s.score, 0, "price {price}: {:?}", s.reasons);
        assert_eq!(s.signal, Signal::Hold);
        assert!(s.reasons.is_empty(), "price {price}: {:?}", s.reasons);
        assert_eq!(s.price_vs_sma50, Some(0.0));
        assert_eq!(s.price_vs_sma200, Some(0.0));
    }
}

#[test]
fn drop_below_lower_band_fires_bollinger_rule() {
    let mut closes = vec![100.0; 80];
    closes.push(90.0);
    let s = generate_trading_signal(&series(&closes));
    assert_eq!(
        s.reasons,
        vec!["RSI Oversold (Bullish)", "MACD Bearish", "Below Lower BB"]
    );
    assert_eq!(s.score, 2);
    assert_eq!(s.signal, Signal::Buy);
}

#[test]
fn spike_above_upper_band_fires_bollinger_rule() {
    let mut closes = vec![100.0; 80];
    closes.push(110.0);
    let s = generate_trading_signal(&series(&closes));
    assert_eq!(
        s.reasons,
        vec!["RSI Overbought (Bearish)", "MACD Bullish", "Above Upper BB"]
    );
    assert_eq!(s.score, -2);
    assert_eq!(s.signal, Signal::Sell);
}

#[test]
fn sharp_reversal_after_rally_is_bearish_crossover() {
    let mut closes: Vec<f64> = (0..120).map(|i| 100.0 * 1.01f64.powi(i)).collect();
    let top = *closes.last().unwrap();
    closes.push(top * 0.85);
    let s = generate_trading_signal(&series(&closes));
    assert_eq!(s.reasons, vec!["MACD Bearish Crossover"]);
    assert_eq!(s.score, -2);
    assert!(s.macd.unwrap() < s.macd_signal.unwrap());
    assert!(s.price_vs_sma200.is_none());
}

#[test]
fn steady_uptrend_fires_trend_and_overbought_rules() {
    let closes: Vec<f64> = (0..300).map(|i| 100.0 + i as f64).collect();
    let s = generate_trading_signal(&series(&closes));
    assert!(s.reasons.contains(&"Strong Uptrend".to_string()));
    assert!(s.reasons.contains(&"RSI Overbought (Bearish)".to_string()));
    assert!((s.rsi.unwrap() - 100.0).abs() < 1e-9);
    assert!(s.price_vs_sma50.unwrap() > 0.0);
}

#[test]
fn steady_downtrend_fires_trend_and_oversold_rules() {
    let closes: Vec<f64> = (0..300).map(|i| 400.0 - i as f64).collect();
    let s = generate_trading_signal(&series(&closes));
    assert!(s.reasons.contains(&"Strong Downtrend".to_string()));
    assert!(s.reasons.contains(&"RSI Oversold (Bullish)".to_string()));
    assert!(s.rsi.unwrap().abs() < 1e-9);
}

#[test]
fn short_history_skips_sma_rule() {
    let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i % 5) as f64).collect();
    let s = generate_trading_signal(&series(&closes));
    assert!(s.price_vs_sma200.is_none());
    assert!(s
        .reasons
        .iter()
        .all(|r| !r.contains("SMA") && !r.contains("trend")));
}

#[test]
fn empty_series_is_neutral() {
    let s = generate_trading_signal(&series(&[]));
    assert_eq!(s.signal, Signal::Hold);
    assert_eq!(s.score, 0);
    assert!(s.rsi.is_none());
}

#[test]
fn score_thresholds_map_to_signals() {
    assert_eq!(Signal::from_score(4), Signal::StrongBuy);
    assert_eq!(Signal::from_score(2), Signal::Buy);
    assert_eq!(Signal::from_score(1), Signal::Hold);
    assert_eq!(Signal::from_score(-2), Signal::Sell);
    assert_eq!(Signal::from_score(-5), Signal::StrongSell);
    assert_eq!(Signal::StrongBuy.action(), SignalAction::Accumulate);
    assert_eq!(Signal::Sell.action(), SignalAction::Distribute);
    assert_eq!(Signal::StrongSell.label(), "STRONG SELL");
}
