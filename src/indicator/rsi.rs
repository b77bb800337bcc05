use std::collections::VecDeque;

/// Neutral reading used when a window has neither gains nor losses.
pub const RSI_NEUTRAL: f64 = 50.0;

/// Relative Strength Index over simple rolling averages of gains and losses.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    prev: Option<f64>,
    deltas: VecDeque<f64>,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "RSI period must be > 0");
        Self {
            period,
            prev: None,
            deltas: VecDeque::with_capacity(period + 1),
        }
    }

    pub fn push(&mut self, price: f64) -> Option<f64> {
        if let Some(prev) = self.prev {
            self.deltas.push_back(price - prev);
            while self.deltas.len() > self.period {
                let _ = self.deltas.pop_front();
            }
        }
        self.prev = Some(price);
        self.value()
    }

    /// `None` until `period` deltas (i.e. `period + 1` prices) have been seen.
    pub fn value(&self) -> Option<f64> {
        if self.deltas.len() < self.period {
            return None;
        }
        let n = self.period as f64;
        let gain = self.deltas.iter().filter(|d| **d > 0.0).sum::<f64>() / n;
        let loss = -self.deltas.iter().filter(|d| **d < 0.0).sum::<f64>() / n;
        Some(rsi_from_averages(gain, loss))
    }
}

/// `0/0` resolves to the neutral 50; a zero loss with gains saturates at 100.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            RSI_NEUTRAL
        } else {
            100.0
        }
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

pub fn rsi_series(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut rsi = Rsi::new(period);
    prices.iter().map(|p| rsi.push(*p)).collect()
}
