use serde::{Deserialize, Serialize};

/// Floor-trader pivot levels for the latest bar plus the recent range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupportResistance {
    pub pivot: f64,
    pub resistance_1: f64,
    pub resistance_2: f64,
    pub support_1: f64,
    pub support_2: f64,
    /// Highest close over `window`; `None` with less history.
    pub recent_high: Option<f64>,
    pub recent_low: Option<f64>,
}

/// High and low come from the last three closes. Needs at least three prices.
pub fn support_resistance(prices: &[f64], window: usize) -> Option<SupportResistance> {
    if prices.len() < 3 {
        return None;
    }
    let tail = &prices[prices.len() - 3..];
    let high = tail.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let low = tail.iter().copied().fold(f64::INFINITY, f64::min);
    let close = *prices.last()?;
    let pivot = (high + low + close) / 3.0;

    let (recent_high, recent_low) = if window > 0 && prices.len() >= window {
        let w = &prices[prices.len() - window..];
        (
            Some(w.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
            Some(w.iter().copied().fold(f64::INFINITY, f64::min)),
        )
    } else {
        (None, None)
    };

    Some(SupportResistance {
        pivot,
        resistance_1: 2.0 * pivot - low,
        resistance_2: pivot + (high - low),
        support_1: 2.0 * pivot - high,
        support_2: pivot - (high - low),
        recent_high,
        recent_low,
    })
}
