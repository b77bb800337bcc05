use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};
use crate::model::ReturnSeries;
use crate::stats::{mean, quantile, std_dev};

pub const DEFAULT_DAYS_FORWARD: usize = 252;
pub const DEFAULT_NUM_SIMULATIONS: usize = 1000;
pub const BAND_PERCENTILES: [f64; 5] = [5.0, 25.0, 50.0, 75.0, 95.0];

/// Simulated growth paths of one unit of capital. Conceptually a
/// `days_forward x num_simulations` matrix; stored path by path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEnsemble {
    days_forward: usize,
    paths: Vec<Vec<f64>>,
    /// Daily mean and standard deviation the paths were drawn from.
    pub daily_mean: f64,
    pub daily_std: f64,
}

impl SimulationEnsemble {
    /// `(days_forward, num_simulations)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.days_forward, self.paths.len())
    }

    pub fn value(&self, day: usize, simulation: usize) -> Option<f64> {
        self.paths.get(simulation)?.get(day).copied()
    }

    pub fn path(&self, simulation: usize) -> Option<&[f64]> {
        self.paths.get(simulation).map(Vec::as_slice)
    }

    pub fn paths(&self) -> &[Vec<f64>] {
        &self.paths
    }

    pub fn final_values(&self) -> Vec<f64> {
        self.paths
            .iter()
            .filter_map(|p| p.last().copied())
            .collect()
    }

    /// Values of every path on one day.
    pub fn cross_section(&self, day: usize) -> Vec<f64> {
        self.paths.iter().filter_map(|p| p.get(day).copied()).collect()
    }
}

/// Draws i.i.d. normal daily returns with the historical mean and sample standard
/// deviation, compounding each path from 1.0. The first stored value already
/// includes the first simulated return.
pub fn monte_carlo_simulation<R: Rng + ?Sized>(
    returns: &ReturnSeries,
    days_forward: usize,
    num_simulations: usize,
    rng: &mut R,
) -> Result<SimulationEnsemble> {
    let daily_mean = mean(returns.values()).ok_or(AnalyticsError::EmptySeries)?;
    let daily_std = std_dev(returns.values()).unwrap_or(0.0);
    let normal = Normal::new(daily_mean, daily_std).map_err(|e| {
        AnalyticsError::InvalidDistribution(format!(
            "mean={daily_mean} std={daily_std}: {e}"
        ))
    })?;

    let mut paths = Vec::with_capacity(num_simulations);
    for _ in 0..num_simulations {
        let mut path = Vec::with_capacity(days_forward);
        let mut value = 1.0;
        for _ in 0..days_forward {
            value *= 1.0 + normal.sample(rng);
            path.push(value);
        }
        paths.push(path);
    }

    Ok(SimulationEnsemble {
        days_forward,
        paths,
        daily_mean,
        daily_std,
    })
}

/// Seeded variant; `None` draws the seed from the operating system.
pub fn monte_carlo_with_seed(
    returns: &ReturnSeries,
    days_forward: usize,
    num_simulations: usize,
    seed: Option<u64>,
) -> Result<SimulationEnsemble> {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    monte_carlo_simulation(returns, days_forward, num_simulations, &mut rng)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioAnalysis {
    pub worst_case: f64,
    pub bad_case: f64,
    pub median_case: f64,
    pub good_case: f64,
    pub best_case: f64,
    pub prob_gain: f64,
    pub prob_loss: f64,
    pub prob_loss_over_10pct: f64,
}

/// Final-value percentiles (5/25/50/75/95) and outcome probabilities.
pub fn scenario_analysis(ensemble: &SimulationEnsemble) -> Option<ScenarioAnalysis> {
    let finals = ensemble.final_values();
    if finals.is_empty() {
        return None;
    }
    let n = finals.len() as f64;
    let share = |pred: &dyn Fn(f64) -> bool| finals.iter().filter(|v| pred(**v)).count() as f64 / n;
    Some(ScenarioAnalysis {
        worst_case: quantile(&finals, 0.05)?,
        bad_case: quantile(&finals, 0.25)?,
        median_case: quantile(&finals, 0.50)?,
        good_case: quantile(&finals, 0.75)?,
        best_case: quantile(&finals, 0.95)?,
        prob_gain: share(&|v| v > 1.0),
        prob_loss: share(&|v| v < 1.0),
        prob_loss_over_10pct: share(&|v| v < 0.9),
    })
}

/// Per-day percentile bands, one `[p5, p25, p50, p75, p95]` row per day.
pub fn percentile_bands(ensemble: &SimulationEnsemble) -> Vec<[f64; 5]> {
    let (days, _) = ensemble.shape();
    (0..days)
        .filter_map(|day| {
            let values = ensemble.cross_section(day);
            let mut row = [0.0; 5];
            for (slot, pct) in row.iter_mut().zip(BAND_PERCENTILES) {
                *slot = quantile(&values, pct / 100.0)?;
            }
            Some(row)
        })
        .collect()
}
