use serde::{Deserialize, Serialize};

use crate::stats::{mean, std_dev};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBand {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// SMA plus/minus `k` sample standard deviations over a trailing window.
pub fn bollinger_bands(prices: &[f64], period: usize, k: f64) -> Vec<Option<BollingerBand>> {
    (0..prices.len())
        .map(|i| {
            if period < 2 || i + 1 < period {
                return None;
            }
            let window = &prices[i + 1 - period..=i];
            let middle = mean(window)?;
            let sd = std_dev(window)?;
            Some(BollingerBand {
                upper: middle + k * sd,
                middle,
                lower: middle - k * sd,
            })
        })
        .collect()
}
