use serde::{Deserialize, Serialize};

use super::ema::ema_series;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

impl MacdSeries {
    pub fn last(&self) -> Option<(f64, f64, f64)> {
        let i = self.macd.len().checked_sub(1)?;
        Some((self.macd[i], self.signal[i], self.histogram[i]))
    }
}

/// MACD line (fast EMA minus slow EMA), its signal EMA and the histogram.
pub fn macd(prices: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let fast_ema = ema_series(prices, fast);
    let slow_ema = ema_series(prices, slow);
    let line: Vec<f64> = fast_ema.iter().zip(&slow_ema).map(|(f, s)| f - s).collect();
    let signal_line = ema_series(&line, signal);
    let histogram = line.iter().zip(&signal_line).map(|(m, s)| m - s).collect();
    MacdSeries {
        macd: line,
        signal: signal_line,
        histogram,
    }
}
