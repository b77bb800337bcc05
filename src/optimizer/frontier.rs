use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::estimates::{PortfolioStats, ReturnEstimates};
use crate::error::Result;
use crate::model::PriceMatrix;

pub const DEFAULT_FRONTIER_SAMPLES: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontierPoint {
    pub weights: Vec<f64>,
    pub stats: PortfolioStats,
}

/// Cloud of randomly weighted long-only portfolios approximating the
/// risk/return trade-off. Not an analytic frontier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficientFrontier {
    pub symbols: Vec<String>,
    pub points: Vec<FrontierPoint>,
}

impl EfficientFrontier {
    pub fn best_sharpe(&self) -> Option<&FrontierPoint> {
        self.points
            .iter()
            .max_by(|a, b| a.stats.sharpe.total_cmp(&b.stats.sharpe))
    }

    pub fn min_volatility(&self) -> Option<&FrontierPoint> {
        self.points.iter().min_by(|a, b| {
            a.stats
                .expected_volatility
                .total_cmp(&b.stats.expected_volatility)
        })
    }
}

/// Uniform draws per asset, normalized to sum to one.
pub fn random_weights<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    loop {
        let raw: Vec<f64> = (0..n).map(|_| rng.gen::<f64>()).collect();
        let sum: f64 = raw.iter().sum();
        if sum > 0.0 {
            return raw.into_iter().map(|w| w / sum).collect();
        }
    }
}

pub fn sample_frontier<R: Rng + ?Sized>(
    estimates: &ReturnEstimates,
    num_portfolios: usize,
    rng: &mut R,
) -> EfficientFrontier {
    let n = estimates.num_assets();
    let points = (0..num_portfolios)
        .map(|_| {
            let weights = random_weights(n, rng);
            let stats = estimates.stats(&weights);
            FrontierPoint { weights, stats }
        })
        .collect();
    EfficientFrontier {
        symbols: estimates.symbols.clone(),
        points,
    }
}

pub fn calculate_efficient_frontier(
    prices: &PriceMatrix,
    num_portfolios: usize,
    seed: Option<u64>,
) -> Result<EfficientFrontier> {
    let estimates = ReturnEstimates::from_prices(prices)?;
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    Ok(sample_frontier(&estimates, num_portfolios, &mut rng))
}
