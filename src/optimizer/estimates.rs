use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};
use crate::metrics::TRADING_DAYS;
use crate::model::PriceMatrix;

/// Annualized mean-return vector and covariance matrix of daily asset returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnEstimates {
    pub symbols: Vec<String>,
    pub mean: Vec<f64>,
    pub covariance: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioStats {
    pub expected_return: f64,
    pub expected_volatility: f64,
    /// Return over volatility with no risk-free adjustment; 0 when volatility is 0.
    pub sharpe: f64,
}

impl ReturnEstimates {
    pub fn from_prices(prices: &PriceMatrix) -> Result<Self> {
        let (_, rows) = prices.asset_returns();
        if rows.len() < 2 {
            return Err(AnalyticsError::InsufficientHistory {
                needed: 2,
                got: rows.len(),
            });
        }
        let n = prices.num_assets();
        let t = rows.len() as f64;

        let mut mean = vec![0.0; n];
        for row in &rows {
            for (m, r) in mean.iter_mut().zip(row) {
                *m += r / t;
            }
        }

        let mut covariance = vec![vec![0.0; n]; n];
        for row in &rows {
            for i in 0..n {
                let di = row[i] - mean[i];
                for j in i..n {
                    covariance[i][j] += di * (row[j] - mean[j]);
                }
            }
        }
        for i in 0..n {
            for j in i..n {
                let c = covariance[i][j] / (t - 1.0) * TRADING_DAYS;
                covariance[i][j] = c;
                covariance[j][i] = c;
            }
        }

        Ok(Self {
            symbols: prices.symbols().to_vec(),
            mean: mean.into_iter().map(|m| m * TRADING_DAYS).collect(),
            covariance,
        })
    }

    pub fn num_assets(&self) -> usize {
        self.mean.len()
    }

    pub fn expected_return(&self, weights: &[f64]) -> f64 {
        weights.iter().zip(&self.mean).map(|(w, m)| w * m).sum()
    }

    pub fn variance(&self, weights: &[f64]) -> f64 {
        self.cov_times(weights)
            .iter()
            .zip(weights)
            .map(|(cw, w)| cw * w)
            .sum()
    }

    /// `Cov * w`.
    pub fn cov_times(&self, weights: &[f64]) -> Vec<f64> {
        self.covariance
            .iter()
            .map(|row| row.iter().zip(weights).map(|(c, w)| c * w).sum())
            .collect()
    }

    pub fn stats(&self, weights: &[f64]) -> PortfolioStats {
        let expected_return = self.expected_return(weights);
        let expected_volatility = self.variance(weights).max(0.0).sqrt();
        let sharpe = if expected_volatility > 0.0 {
            expected_return / expected_volatility
        } else {
            0.0
        };
        PortfolioStats {
            expected_return,
            expected_volatility,
            sharpe,
        }
    }
}
