//! Market regime classification.
//!
//! Two views over the same return series: a per-date historical label from
//! rolling statistics, and a single current-state advisory regime carrying a
//! suggested allocation.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::indicator::sma_series;
use crate::metrics::{win_rate, TRADING_DAYS};
use crate::model::ReturnSeries;
use crate::stats::{compare_within, mean, median, std_dev};

pub const DEFAULT_REGIME_LOOKBACK: usize = 60;
/// Annualized rolling return above which a window counts as a bull market.
pub const BULL_RETURN_THRESHOLD: f64 = 0.02;
pub const BEAR_RETURN_THRESHOLD: f64 = -0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketRegime {
    BullLowVol,
    BullHighVol,
    SidewaysChoppy,
    BearLowVol,
    BearHighVol,
}

impl MarketRegime {
    pub fn label(self) -> &'static str {
        match self {
            Self::BullLowVol => "Bull Market (Low Vol)",
            Self::BullHighVol => "Bull Market (High Vol)",
            Self::SidewaysChoppy => "Sideways/Choppy",
            Self::BearLowVol => "Bear Market (Low Vol)",
            Self::BearHighVol => "Bear Market (High Vol)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatedRegime {
    pub date: NaiveDate,
    pub regime: MarketRegime,
    /// Annualized trailing mean return, `None` before the window fills.
    pub rolling_return: Option<f64>,
    pub rolling_volatility: Option<f64>,
}

/// Labels every date of `returns`. Dates without a full trailing window are
/// `SidewaysChoppy`. High/low volatility is relative to the median rolling
/// volatility over the whole history.
pub fn detect_market_regimes(returns: &ReturnSeries, lookback: usize) -> Vec<DatedRegime> {
    let r = returns.values();
    let rolling: Vec<(Option<f64>, Option<f64>)> = (0..r.len())
        .map(|i| {
            if lookback == 0 || i + 1 < lookback {
                return (None, None);
            }
            let window = &r[i + 1 - lookback..=i];
            (
                mean(window).map(|m| m * TRADING_DAYS),
                std_dev(window).map(|s| s * TRADING_DAYS.sqrt()),
            )
        })
        .collect();

    let vols: Vec<f64> = rolling.iter().filter_map(|(_, v)| *v).collect();
    let vol_median = median(&vols);

    returns
        .dates()
        .iter()
        .zip(rolling)
        .map(|(date, (ret, vol))| {
            let high_vol = match (vol, vol_median) {
                (Some(v), Some(m)) => v > m,
                _ => false,
            };
            let regime = match ret {
                Some(x) if x > BULL_RETURN_THRESHOLD && high_vol => MarketRegime::BullHighVol,
                Some(x) if x > BULL_RETURN_THRESHOLD => MarketRegime::BullLowVol,
                Some(x) if x < BEAR_RETURN_THRESHOLD && high_vol => MarketRegime::BearHighVol,
                Some(x) if x < BEAR_RETURN_THRESHOLD => MarketRegime::BearLowVol,
                _ => MarketRegime::SidewaysChoppy,
            };
            DatedRegime {
                date: *date,
                regime,
                rolling_return: ret,
                rolling_volatility: vol,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimePerformance {
    pub regime: MarketRegime,
    pub occurrences: usize,
    pub avg_daily_return: f64,
    /// Annualized; 0 when the regime has a single observation.
    pub volatility: f64,
    pub best_day: f64,
    pub worst_day: f64,
    pub win_rate: f64,
}

/// Per-regime summary in first-seen order. Regime labels are matched to returns by date.
pub fn analyze_regime_performance(
    returns: &ReturnSeries,
    regimes: &[DatedRegime],
) -> Vec<RegimePerformance> {
    let mut groups: Vec<(MarketRegime, Vec<f64>)> = Vec::new();
    let mut j = 0;
    for (date, r) in returns.iter() {
        while j < regimes.len() && regimes[j].date < date {
            j += 1;
        }
        let Some(label) = regimes.get(j).filter(|l| l.date == date) else {
            continue;
        };
        match groups.iter_mut().find(|(g, _)| *g == label.regime) {
            Some((_, values)) => values.push(r),
            None => groups.push((label.regime, vec![r])),
        }
    }

    groups
        .into_iter()
        .map(|(regime, values)| RegimePerformance {
            regime,
            occurrences: values.len(),
            avg_daily_return: mean(&values).unwrap_or(0.0),
            volatility: std_dev(&values).unwrap_or(0.0) * TRADING_DAYS.sqrt(),
            best_day: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            worst_day: values.iter().copied().fold(f64::INFINITY, f64::min),
            win_rate: win_rate(&values),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurrentRegime {
    Crisis,
    BearMarket,
    BullMarket,
    Recovery,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetAllocation {
    pub stocks: u8,
    pub bonds: u8,
    pub cash: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
    InsufficientData,
}

impl CurrentRegime {
    pub fn label(self) -> &'static str {
        match self {
            Self::Crisis => "High Volatility / Crisis",
            Self::BearMarket => "Bear Market",
            Self::BullMarket => "Bull Market",
            Self::Recovery => "Recovery",
            Self::Neutral => "Neutral / Consolidation",
        }
    }

    pub fn allocation(self) -> TargetAllocation {
        let (stocks, bonds, cash) = match self {
            Self::Crisis => (45, 45, 10),
            Self::BearMarket => (55, 40, 5),
            Self::BullMarket => (75, 22, 3),
            Self::Recovery => (65, 30, 5),
            Self::Neutral => (60, 35, 5),
        };
        TargetAllocation {
            stocks,
            bonds,
            cash,
        }
    }

    pub fn action(self) -> &'static str {
        match self {
            Self::Crisis => "Reduce equity exposure to 40-50%. Increase cash and defensive positions. Avoid new positions until volatility subsides.",
            Self::BearMarket => "Reduce equity to 50-60%. Focus on quality, dividend-paying stocks. Consider defensive sectors.",
            Self::BullMarket => "Maintain 70-80% equity allocation. This is accumulation phase. Focus on growth and momentum.",
            Self::Recovery => "Gradually increase equity to 60-70%. Good time to add positions. Monitor for continued strength.",
            Self::Neutral => "Maintain balanced 60/40 portfolio. Wait for clearer directional signals before making changes.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeInputs {
    /// Annualized volatility of the trailing 60 returns (or all, if fewer).
    pub volatility: f64,
    /// 60-day price change as a fraction.
    pub momentum_60d: f64,
    /// 20-day price change in percent.
    pub return_20d: f64,
    pub return_60d: f64,
    pub trend: Trend,
    pub price_vs_sma200: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeAssessment {
    pub regime: CurrentRegime,
    pub confidence: Confidence,
    pub allocation: TargetAllocation,
    pub action: String,
    pub notes: Vec<String>,
    pub inputs: RegimeInputs,
}

/// Point-in-time regime from the latest returns and prices. First matching rule wins:
/// volatility > 35% is a crisis; momentum < -10% with volatility > 25% is a bear market;
/// momentum > 15% with volatility < 20% is a bull market; positive momentum and
/// 20-day return is a recovery; anything else is neutral.
pub fn detect_market_regime_enhanced(returns: &ReturnSeries, prices: &[f64]) -> RegimeAssessment {
    let inputs = regime_inputs(returns, prices);
    let vol = inputs.volatility;
    let momentum = inputs.momentum_60d;

    let mut notes = Vec::new();
    let (regime, confidence) = if vol > 0.35 {
        notes.push(format!("Volatility extremely high: {:.1}%", vol * 100.0));
        (CurrentRegime::Crisis, Confidence::High)
    } else if momentum < -0.10 && vol > 0.25 {
        notes.push(format!("Negative momentum: {:.1}%", momentum * 100.0));
        if inputs.trend == Trend::Bearish {
            notes.push("Death Cross: 50-day below 200-day SMA".to_string());
        }
        let confidence = if momentum.abs() > 0.15 {
            Confidence::High
        } else {
            Confidence::Medium
        };
        (CurrentRegime::BearMarket, confidence)
    } else if momentum > 0.15 && vol < 0.20 {
        notes.push(format!("Strong positive momentum: {:.1}%", momentum * 100.0));
        if inputs.trend == Trend::Bullish {
            notes.push("Golden Cross: 50-day above 200-day SMA".to_string());
        }
        (CurrentRegime::BullMarket, Confidence::High)
    } else if momentum > 0.0 && inputs.return_20d > 0.0 {
        notes.push(format!(
            "Recovery in progress: {:.1}% momentum",
            momentum * 100.0
        ));
        (CurrentRegime::Recovery, Confidence::Medium)
    } else {
        notes.push("Market lacking clear direction".to_string());
        (CurrentRegime::Neutral, Confidence::Medium)
    };

    RegimeAssessment {
        regime,
        confidence,
        allocation: regime.allocation(),
        action: regime.action().to_string(),
        notes,
        inputs,
    }
}

fn regime_inputs(returns: &ReturnSeries, prices: &[f64]) -> RegimeInputs {
    let r = returns.values();
    let window = r.len().min(DEFAULT_REGIME_LOOKBACK);
    let volatility =
        std_dev(&r[r.len() - window..]).unwrap_or(0.0) * TRADING_DAYS.sqrt();

    let lookback_change = |days: usize| -> f64 {
        match (prices.last(), prices.len().checked_sub(days)) {
            (Some(last), Some(i)) if prices[i] != 0.0 => (last / prices[i] - 1.0) * 100.0,
            _ => 0.0,
        }
    };
    let return_20d = lookback_change(20);
    let return_60d = lookback_change(60);

    let sma50 = sma_series(prices, 50).last().copied().flatten();
    let sma200 = sma_series(prices, 200).last().copied().flatten();
    let trend = match (sma50, sma200) {
        (Some(f), Some(s)) => match compare_within(f, s, s) {
            Ordering::Greater => Trend::Bullish,
            Ordering::Less => Trend::Bearish,
            Ordering::Equal => Trend::Neutral,
        },
        _ => Trend::InsufficientData,
    };
    let price_vs_sma200 = match (prices.last(), sma200) {
        (Some(p), Some(s)) => Some((p / s - 1.0) * 100.0),
        _ => None,
    };

    RegimeInputs {
        volatility,
        momentum_60d: return_60d / 100.0,
        return_20d,
        return_60d,
        trend,
        price_vs_sma200,
    }
}
