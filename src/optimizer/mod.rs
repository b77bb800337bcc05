//! Mean-variance allocation: a max-Sharpe solver and a sampled frontier.

pub mod estimates;
pub mod frontier;
pub mod solver;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};
use crate::model::{PriceMatrix, Weights};

pub use estimates::{PortfolioStats, ReturnEstimates};
pub use frontier::{
    calculate_efficient_frontier, random_weights, sample_frontier, EfficientFrontier,
    FrontierPoint, DEFAULT_FRONTIER_SAMPLES,
};
pub use solver::{maximize_sharpe, project_to_simplex, SolverOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationMethod {
    #[default]
    MaxSharpe,
}

impl FromStr for OptimizationMethod {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "max_sharpe" | "max-sharpe" | "maxsharpe" => Ok(Self::MaxSharpe),
            other => Err(AnalyticsError::Config(format!(
                "unsupported optimization method '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub symbols: Vec<String>,
    pub weights: Vec<f64>,
    pub stats: PortfolioStats,
    /// `false` when the solver failed and equal weights were substituted.
    pub converged: bool,
    pub iterations: usize,
}

impl OptimizationResult {
    pub fn to_weights(&self) -> Weights {
        Weights::from_pairs(self.symbols.iter().cloned().zip(self.weights.iter().copied()))
    }
}

/// Long-only, fully invested max-Sharpe weights starting from equal weights.
/// Solver failure falls back to equal weights instead of returning an error.
pub fn optimize_portfolio(
    prices: &PriceMatrix,
    method: OptimizationMethod,
) -> Result<OptimizationResult> {
    let estimates = ReturnEstimates::from_prices(prices)?;
    Ok(optimize_estimates(&estimates, method))
}

pub fn optimize_estimates(
    estimates: &ReturnEstimates,
    method: OptimizationMethod,
) -> OptimizationResult {
    let n = estimates.num_assets();
    let equal = vec![1.0 / n.max(1) as f64; n];

    let outcome = match method {
        OptimizationMethod::MaxSharpe => maximize_sharpe(estimates, &equal),
    };

    let (weights, converged, iterations) = match outcome {
        SolverOutcome::Converged {
            weights,
            iterations,
        } => (weights, true, iterations),
        SolverOutcome::Failed { reason } => {
            tracing::warn!(reason = %reason, assets = n, "Optimizer failed; using equal weights");
            (equal, false, 0)
        }
    };

    OptimizationResult {
        symbols: estimates.symbols.clone(),
        stats: estimates.stats(&weights),
        weights,
        converged,
        iterations,
    }
}
