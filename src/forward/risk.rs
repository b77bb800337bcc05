use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};
use crate::metrics::{max_drawdown, TRADING_DAYS};
use crate::model::ReturnSeries;
use crate::stats::{mean, quantile, std_dev};

pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForwardRiskMetrics {
    pub expected_annual_return: f64,
    pub expected_volatility: f64,
    pub confidence_level: f64,
    /// Historical VaR at `confidence_level`, as a daily return.
    pub var: f64,
    pub cvar: f64,
    pub var_95: f64,
    pub var_99: f64,
    pub cvar_95: f64,
    pub cvar_99: f64,
    pub prob_daily_loss: f64,
    /// Historical max drawdown reused as the forward estimate.
    pub estimated_max_drawdown: f64,
}

/// Historical-simulation VaR: the `1 - level` quantile of daily returns.
pub fn historical_var(returns: &[f64], level: f64) -> Option<f64> {
    quantile(returns, 1.0 - level)
}

/// Expected shortfall: mean of all returns at or below the VaR.
pub fn historical_cvar(returns: &[f64], level: f64) -> Option<f64> {
    let var = historical_var(returns, level)?;
    let tail: Vec<f64> = returns.iter().copied().filter(|r| *r <= var).collect();
    mean(&tail)
}

pub fn calculate_forward_risk_metrics(
    returns: &ReturnSeries,
    confidence_level: f64,
) -> Result<ForwardRiskMetrics> {
    let r = returns.values();
    let daily_mean = mean(r).ok_or(AnalyticsError::EmptySeries)?;
    let tail = |level: f64| -> Result<(f64, f64)> {
        let var = historical_var(r, level).ok_or(AnalyticsError::EmptySeries)?;
        let cvar = historical_cvar(r, level).ok_or(AnalyticsError::EmptySeries)?;
        Ok((var, cvar))
    };
    let (var, cvar) = tail(confidence_level)?;
    let (var_95, cvar_95) = tail(0.95)?;
    let (var_99, cvar_99) = tail(0.99)?;

    Ok(ForwardRiskMetrics {
        expected_annual_return: daily_mean * TRADING_DAYS,
        expected_volatility: std_dev(r).unwrap_or(0.0) * TRADING_DAYS.sqrt(),
        confidence_level,
        var,
        cvar,
        var_95,
        var_99,
        cvar_95,
        cvar_99,
        prob_daily_loss: r.iter().filter(|v| **v < 0.0).count() as f64 / r.len() as f64,
        estimated_max_drawdown: max_drawdown(r),
    })
}
