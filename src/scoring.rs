//! Rule-based technical signal scoring.
//!
//! Each indicator family contributes at most one rule per call. Comparisons are
//! strict: an indicator sitting on its reference level (MACD equal to its
//! signal line, price equal to the 200-day SMA) contributes zero instead of
//! being pushed to either side. Levels within
//! [`crate::stats::REL_TOLERANCE`] of the last price count as equal.

use std::cmp::Ordering::{Equal, Greater, Less};

use serde::{Deserialize, Serialize};

use crate::indicator::{bollinger_bands, macd, rsi_series, sma_series};
use crate::model::{PriceSeries, Signal, SignalAction};
use crate::stats::compare_within;

pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_K: f64 = 2.0;
pub const SMA_FAST: usize = 50;
pub const SMA_SLOW: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingSignal {
    pub signal: Signal,
    pub action: SignalAction,
    pub score: i32,
    /// `min(|score| * 15, 100)`.
    pub confidence: u32,
    /// Labels of the rules that fired, in evaluation order.
    pub reasons: Vec<String>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    /// Percent distance of the last price from the 50-day SMA.
    pub price_vs_sma50: Option<f64>,
    pub price_vs_sma200: Option<f64>,
}

#[derive(Debug, Default)]
struct Tally {
    score: i32,
    reasons: Vec<String>,
}

impl Tally {
    fn add(&mut self, points: i32, reason: &str) {
        self.score += points;
        self.reasons.push(reason.to_string());
    }
}

pub fn generate_trading_signal(prices: &PriceSeries) -> TradingSignal {
    let closes = prices.closes();
    let Some(&price) = closes.last() else {
        return neutral_signal();
    };
    let last = closes.len() - 1;

    let rsi = rsi_series(&closes, RSI_PERIOD)[last];
    let macd_series = macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
    let bands = bollinger_bands(&closes, BOLLINGER_PERIOD, BOLLINGER_K)[last];
    let sma50 = sma_series(&closes, SMA_FAST)[last];
    let sma200 = sma_series(&closes, SMA_SLOW)[last];

    let mut tally = Tally::default();

    if let Some(rsi) = rsi {
        score_rsi(&mut tally, rsi);
    }

    let (macd_now, signal_now, hist_now) = macd_series.last().unwrap_or((0.0, 0.0, 0.0));
    let hist_prev = if last > 0 {
        macd_series.histogram[last - 1]
    } else {
        0.0
    };
    score_macd(&mut tally, price, macd_now, signal_now, hist_prev, hist_now);

    if let (Some(fast), Some(slow)) = (sma50, sma200) {
        score_trend(&mut tally, price, fast, slow);
    }

    if let Some(band) = bands {
        if compare_within(price, band.lower, price) == Less {
            tally.add(1, "Below Lower BB");
        } else if compare_within(price, band.upper, price) == Greater {
            tally.add(-1, "Above Upper BB");
        }
    }

    let signal = Signal::from_score(tally.score);
    TradingSignal {
        signal,
        action: signal.action(),
        score: tally.score,
        confidence: confidence(tally.score),
        reasons: tally.reasons,
        rsi,
        macd: Some(macd_now),
        macd_signal: Some(signal_now),
        price_vs_sma50: sma50.map(|s| (price / s - 1.0) * 100.0),
        price_vs_sma200: sma200.map(|s| (price / s - 1.0) * 100.0),
    }
}

fn score_rsi(tally: &mut Tally, rsi: f64) {
    if rsi < 30.0 {
        tally.add(2, "RSI Oversold (Bullish)");
    } else if rsi > 70.0 {
        tally.add(-2, "RSI Overbought (Bearish)");
    } else if rsi < 40.0 {
        tally.add(1, "RSI Bullish Lean");
    } else if rsi > 60.0 {
        tally.add(-1, "RSI Bearish Lean");
    }
}

/// MACD values are price differences, so `price` sets the noise floor.
fn score_macd(
    tally: &mut Tally,
    price: f64,
    macd: f64,
    signal: f64,
    hist_prev: f64,
    hist_now: f64,
) {
    let line = compare_within(macd, signal, price);
    let prev = compare_within(hist_prev, 0.0, price);
    let now = compare_within(hist_now, 0.0, price);
    match (line, prev, now) {
        (Greater, Less, Greater) => tally.add(2, "MACD Bullish Crossover"),
        (Less, Greater, Less) => tally.add(-2, "MACD Bearish Crossover"),
        (Greater, _, _) => tally.add(1, "MACD Bullish"),
        (Less, _, _) => tally.add(-1, "MACD Bearish"),
        (Equal, _, _) => {}
    }
}

fn score_trend(tally: &mut Tally, price: f64, sma50: f64, sma200: f64) {
    let vs_fast = compare_within(price, sma50, price);
    let fast_vs_slow = compare_within(sma50, sma200, price);
    let vs_slow = compare_within(price, sma200, price);
    match (vs_fast, fast_vs_slow, vs_slow) {
        (Greater, Greater, _) => tally.add(2, "Strong Uptrend"),
        (Less, Less, _) => tally.add(-2, "Strong Downtrend"),
        (_, _, Greater) => tally.add(1, "Above 200 SMA"),
        (_, _, Less) => tally.add(-1, "Below 200 SMA"),
        (_, _, Equal) => {}
    }
}

fn confidence(score: i32) -> u32 {
    (score.unsigned_abs() * 15).min(100)
}

fn neutral_signal() -> TradingSignal {
    TradingSignal {
        signal: Signal::Hold,
        action: SignalAction::Hold,
        score: 0,
        confidence: 0,
        reasons: Vec::new(),
        rsi: None,
        macd: None,
        macd_signal: None,
        price_vs_sma50: None,
        price_vs_sma200: None,
    }
}
