//! Projected-gradient ascent of the Sharpe ratio over the long-only simplex.
//!
//! Each iteration takes a gradient step, projects back onto
//! `{w : sum(w) = 1, 0 <= w_i <= 1}` and backtracks until the Armijo condition
//! holds. Convergence is declared when the projected step or the objective
//! gain falls below tolerance.

use super::estimates::ReturnEstimates;

pub const MAX_ITERATIONS: usize = 2000;
pub const OBJECTIVE_TOLERANCE: f64 = 1e-12;
pub const STEP_TOLERANCE: f64 = 1e-9;
const MAX_BACKTRACKS: usize = 40;
const ARMIJO_C: f64 = 1e-4;

#[derive(Debug, Clone, PartialEq)]
pub enum SolverOutcome {
    Converged { weights: Vec<f64>, iterations: usize },
    Failed { reason: String },
}

fn sharpe(est: &ReturnEstimates, w: &[f64]) -> Option<f64> {
    let vol = est.variance(w).sqrt();
    if vol > 0.0 && vol.is_finite() {
        Some(est.expected_return(w) / vol)
    } else {
        None
    }
}

fn sharpe_gradient(est: &ReturnEstimates, w: &[f64]) -> Option<Vec<f64>> {
    let var = est.variance(w);
    if var <= 0.0 || !var.is_finite() {
        return None;
    }
    let vol = var.sqrt();
    let ret = est.expected_return(w);
    let cw = est.cov_times(w);
    Some(
        est.mean
            .iter()
            .zip(&cw)
            .map(|(m, c)| m / vol - ret * c / (var * vol))
            .collect(),
    )
}

/// Euclidean projection onto the probability simplex.
pub fn project_to_simplex(v: &[f64]) -> Vec<f64> {
    let mut sorted = v.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));
    let mut cumulative = 0.0;
    let mut theta = 0.0;
    for (i, u) in sorted.iter().enumerate() {
        cumulative += u;
        let t = (cumulative - 1.0) / (i + 1) as f64;
        if u - t > 0.0 {
            theta = t;
        }
    }
    v.iter().map(|x| (x - theta).max(0.0)).collect()
}

pub fn maximize_sharpe(est: &ReturnEstimates, initial: &[f64]) -> SolverOutcome {
    let mut w = project_to_simplex(initial);
    let Some(mut f) = sharpe(est, &w) else {
        return SolverOutcome::Failed {
            reason: "zero or undefined portfolio volatility at the starting point".to_string(),
        };
    };
    let mut step = 1.0;

    for iteration in 1..=MAX_ITERATIONS {
        let Some(grad) = sharpe_gradient(est, &w) else {
            return SolverOutcome::Failed {
                reason: format!("undefined gradient at iteration {iteration}"),
            };
        };

        let mut accepted: Option<(Vec<f64>, f64)> = None;
        let mut s = step;
        for _ in 0..MAX_BACKTRACKS {
            let trial: Vec<f64> = w.iter().zip(&grad).map(|(x, g)| x + s * g).collect();
            let candidate = project_to_simplex(&trial);
            let ascent: f64 = grad
                .iter()
                .zip(candidate.iter().zip(&w))
                .map(|(g, (c, x))| g * (c - x))
                .sum();
            if let Some(fc) = sharpe(est, &candidate) {
                if fc >= f + ARMIJO_C * ascent {
                    accepted = Some((candidate, fc));
                    break;
                }
            }
            s *= 0.5;
        }

        let Some((next, fnext)) = accepted else {
            // No ascent direction left at any step size: stationary point.
            return SolverOutcome::Converged {
                weights: w,
                iterations: iteration,
            };
        };

        let moved = next
            .iter()
            .zip(&w)
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt();
        let improved = fnext - f;
        w = next;
        f = fnext;
        if moved < STEP_TOLERANCE || improved < OBJECTIVE_TOLERANCE {
            return SolverOutcome::Converged {
                weights: w,
                iterations: iteration,
            };
        }
        step = (s * 2.0).min(1e3);
    }

    SolverOutcome::Failed {
        reason: format!("no convergence after {MAX_ITERATIONS} iterations"),
    }
}
