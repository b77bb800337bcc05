//! Return construction and performance statistics.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};
use crate::model::{PriceMatrix, ReturnSeries, Weights};
use crate::stats::{covariance, cumulative_growth, mean, std_dev, variance};

pub const TRADING_DAYS: f64 = 252.0;
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub total_return: f64,
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    pub sharpe: f64,
    pub sortino: f64,
    pub max_drawdown: f64,
    pub calmar: f64,
    pub win_rate: f64,
    /// Present only when a benchmark overlapping in time was supplied.
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
}

/// Daily-rebalanced portfolio returns: for each date, the weighted sum of asset
/// returns. Symbols without a weight contribute nothing.
pub fn compute_returns(prices: &PriceMatrix, weights: &Weights) -> ReturnSeries {
    let w = weights.vector(prices.symbols());
    let (dates, rows) = prices.asset_returns();
    let values = rows
        .iter()
        .map(|row| row.iter().zip(&w).map(|(r, w)| r * w).sum())
        .collect();
    ReturnSeries::new(dates, values)
}

/// Returns a human-readable warning when the weights do not sum to 1 within `tolerance`.
pub fn weights_warning(weights: &Weights, tolerance: f64) -> Option<String> {
    let sum = weights.sum();
    if (sum - 1.0).abs() > tolerance {
        Some(format!(
            "weights sum to {:.1}% (should be 100%)",
            sum * 100.0
        ))
    } else {
        None
    }
}

pub fn total_return(returns: &[f64]) -> f64 {
    returns.iter().fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0
}

/// Geometric annualization over `n` observations.
pub fn annualize(total_return: f64, n: usize) -> f64 {
    (1.0 + total_return).powf(TRADING_DAYS / n as f64) - 1.0
}

pub fn annualized_volatility(returns: &[f64]) -> f64 {
    std_dev(returns).unwrap_or(0.0) * TRADING_DAYS.sqrt()
}

/// Downside deviation: sample std of the negative returns, annualized.
pub fn downside_deviation(returns: &[f64]) -> f64 {
    let negatives: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    std_dev(&negatives).unwrap_or(0.0) * TRADING_DAYS.sqrt()
}

/// Per-date drawdown from the running peak of cumulative growth; every value is `<= 0`.
pub fn drawdown_series(returns: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    cumulative_growth(returns)
        .into_iter()
        .map(|c| {
            peak = peak.max(c);
            (c - peak) / peak
        })
        .collect()
}

pub fn max_drawdown(returns: &[f64]) -> f64 {
    drawdown_series(returns).into_iter().fold(0.0, f64::min)
}

pub fn win_rate(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    returns.iter().filter(|r| **r > 0.0).count() as f64 / returns.len() as f64
}

fn ratio_or_zero(num: f64, den: f64) -> f64 {
    if den == 0.0 || !den.is_finite() {
        0.0
    } else {
        num / den
    }
}

pub fn compute_metrics(
    returns: &ReturnSeries,
    benchmark: Option<&ReturnSeries>,
    risk_free_rate: f64,
) -> Result<PortfolioMetrics> {
    let r = returns.values();
    if r.is_empty() {
        return Err(AnalyticsError::EmptySeries);
    }

    let total = total_return(r);
    let ann_return = annualize(total, r.len());
    let ann_vol = annualized_volatility(r);
    let sharpe = ratio_or_zero(ann_return - risk_free_rate, ann_vol);
    let sortino = ratio_or_zero(ann_return - risk_free_rate, downside_deviation(r));
    let mdd = max_drawdown(r);
    let calmar = ratio_or_zero(ann_return, mdd.abs());

    let (alpha, beta) = match benchmark.and_then(|b| capm(returns, b, ann_return, risk_free_rate))
    {
        Some((a, b)) => (Some(a), Some(b)),
        None => (None, None),
    };

    Ok(PortfolioMetrics {
        total_return: total,
        annualized_return: ann_return,
        annualized_volatility: ann_vol,
        sharpe,
        sortino,
        max_drawdown: mdd,
        calmar,
        win_rate: win_rate(r),
        alpha,
        beta,
    })
}

/// CAPM alpha and beta over the dates both series share.
fn capm(
    returns: &ReturnSeries,
    benchmark: &ReturnSeries,
    ann_return: f64,
    risk_free_rate: f64,
) -> Option<(f64, f64)> {
    let (port, bench) = returns.align(benchmark);
    if port.is_empty() {
        return None;
    }
    let bench_var = variance(&bench).unwrap_or(0.0);
    let cov = covariance(&port, &bench).unwrap_or(0.0);
    let beta = if bench_var != 0.0 { cov / bench_var } else { 1.0 };
    let bench_ann = annualize(total_return(&bench), bench.len());
    let alpha = ann_return - (risk_free_rate + beta * (bench_ann - risk_free_rate));
    Some((alpha, beta))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReturn {
    pub year: i32,
    pub month: u32,
    pub value: f64,
}

/// Calendar-month compounded returns in chronological order.
pub fn monthly_returns(returns: &ReturnSeries) -> Vec<MonthlyReturn> {
    let mut out: Vec<MonthlyReturn> = Vec::new();
    let mut growth = 1.0;
    let mut current: Option<(i32, u32)> = None;
    for (date, r) in returns.iter() {
        let key = (date.year(), date.month());
        if current != Some(key) {
            if let Some((year, month)) = current {
                out.push(MonthlyReturn {
                    year,
                    month,
                    value: growth - 1.0,
                });
            }
            current = Some(key);
            growth = 1.0;
        }
        growth *= 1.0 + r;
    }
    if let Some((year, month)) = current {
        out.push(MonthlyReturn {
            year,
            month,
            value: growth - 1.0,
        });
    }
    out
}

/// Mean calendar-day length of drawdown episodes that recovered to a new high.
/// Episodes still open at the end of the series are not counted.
pub fn average_recovery_days(returns: &ReturnSeries) -> f64 {
    let dd = drawdown_series(returns.values());
    let mut periods: Vec<f64> = Vec::new();
    let mut start: Option<NaiveDate> = None;
    for (date, d) in returns.dates().iter().zip(&dd) {
        let in_drawdown = *d < 0.0;
        match start {
            None if in_drawdown => start = Some(*date),
            Some(s) if !in_drawdown => {
                periods.push((*date - s).num_days() as f64);
                start = None;
            }
            _ => {}
        }
    }
    mean(&periods).unwrap_or(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingPoint {
    pub date: NaiveDate,
    pub sharpe: Option<f64>,
    pub sortino: Option<f64>,
}

/// Rolling annualized Sharpe and Sortino (no risk-free adjustment) over a trailing window.
pub fn rolling_metrics(returns: &ReturnSeries, window: usize) -> Vec<RollingPoint> {
    let r = returns.values();
    returns
        .dates()
        .iter()
        .enumerate()
        .map(|(i, date)| {
            if window == 0 || i + 1 < window {
                return RollingPoint {
                    date: *date,
                    sharpe: None,
                    sortino: None,
                };
            }
            let slice = &r[i + 1 - window..=i];
            let ann_ret = mean(slice).unwrap_or(0.0) * TRADING_DAYS;
            let vol = std_dev(slice).map(|s| s * TRADING_DAYS.sqrt());
            let negatives: Vec<f64> = slice.iter().copied().filter(|v| *v < 0.0).collect();
            let down = std_dev(&negatives).map(|s| s * TRADING_DAYS.sqrt());
            RollingPoint {
                date: *date,
                sharpe: vol.filter(|v| *v > 0.0).map(|v| ann_ret / v),
                sortino: down.filter(|v| *v > 0.0).map(|v| ann_ret / v),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyIncome {
    pub year: i32,
    pub month: u32,
    pub monthly_return: f64,
    pub total_gain: f64,
    pub capital_gain: f64,
    pub dividend_income: f64,
    pub portfolio_value: f64,
}

/// Splits each month's dollar gain into an assumed dividend stream and the
/// capital-gain remainder. The dividend share is a yield assumption, not observed data.
pub fn income_breakdown(
    returns: &ReturnSeries,
    initial_capital: f64,
    annual_dividend_yield: f64,
) -> Vec<MonthlyIncome> {
    let monthly_rate = annual_dividend_yield / 12.0;
    let mut value = initial_capital;
    monthly_returns(returns)
        .into_iter()
        .map(|m| {
            let start_value = value;
            let dividend = start_value * monthly_rate;
            let total_gain = start_value * m.value;
            value = start_value + total_gain;
            MonthlyIncome {
                year: m.year,
                month: m.month,
                monthly_return: m.value,
                total_gain,
                capital_gain: total_gain - dividend,
                dividend_income: dividend,
                portfolio_value: value,
            }
        })
        .collect()
}
