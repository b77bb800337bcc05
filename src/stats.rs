//! Sample statistics shared by the analytics modules.
//!
//! Moments come from `statrs`, wrapped so that empty or too-short input is
//! `None` instead of NaN. Standard deviation and covariance use the `n - 1`
//! denominator.

use std::cmp::Ordering;

use statrs::statistics::{Data, OrderStatistics, Statistics};

/// Relative slack under which two values are treated as the same level.
pub const REL_TOLERANCE: f64 = 1e-12;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().mean())
}

/// Sample standard deviation; `None` with fewer than two observations.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    Some(values.iter().std_dev())
}

pub fn variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    Some(values.iter().variance())
}

pub fn covariance(a: &[f64], b: &[f64]) -> Option<f64> {
    if a.len() != b.len() || a.len() < 2 {
        return None;
    }
    Some(a.iter().covariance(b.iter()))
}

/// Linear-interpolated quantile, `q` in `[0, 1]`.
///
/// Position `q * (n - 1)` between order statistics, the dataframe default.
/// `statrs` quantiles use a different estimator, so VaR and the scenario
/// percentiles go through this one.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    let mut sorted = without_nan(values);
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub fn median(values: &[f64]) -> Option<f64> {
    let clean = without_nan(values);
    if clean.is_empty() {
        return None;
    }
    Some(Data::new(clean).median())
}

fn without_nan(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| !v.is_nan()).collect()
}

/// Orders `a` against `b`, treating a gap within rounding noise of the
/// largest of `a`, `b` and `scale` as equal.
pub fn compare_within(a: f64, b: f64, scale: f64) -> Ordering {
    let tol = REL_TOLERANCE * scale.abs().max(a.abs()).max(b.abs());
    if a - b > tol {
        Ordering::Greater
    } else if b - a > tol {
        Ordering::Less
    } else {
        Ordering::Equal
    }
}

/// Running product of `(1 + r)`.
pub fn cumulative_growth(returns: &[f64]) -> Vec<f64> {
    let mut acc = 1.0;
    returns
        .iter()
        .map(|r| {
            acc *= 1.0 + r;
            acc
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_std_uses_n_minus_one() {
        let v = [1.0, 2.0, 3.0, 4.0];
        let s = std_dev(&v).unwrap();
        assert!((s - 1.290_994_448_735_805_6).abs() < 1e-12);
        assert!(std_dev(&[1.0]).is_none());
        assert!(mean(&[]).is_none());
    }

    #[test]
    fn quantile_interpolates() {
        let v = [4.0, 1.0, 3.0, 2.0];
        assert!((quantile(&v, 0.5).unwrap() - 2.5).abs() < 1e-12);
        assert!((quantile(&v, 0.0).unwrap() - 1.0).abs() < 1e-12);
        assert!((quantile(&v, 1.0).unwrap() - 4.0).abs() < 1e-12);
        assert!((quantile(&v, 0.05).unwrap() - 1.15).abs() < 1e-12);
    }

    #[test]
    fn median_averages_middle_pair() {
        assert!((median(&[4.0, 1.0, 3.0, 2.0]).unwrap() - 2.5).abs() < 1e-12);
        assert!((median(&[5.0, 1.0, 3.0]).unwrap() - 3.0).abs() < 1e-12);
        assert!(median(&[f64::NAN]).is_none());
    }

    #[test]
    fn covariance_matches_variance_on_self() {
        let v = [0.01, -0.02, 0.03, 0.0];
        let c = covariance(&v, &v).unwrap();
        assert!((c - variance(&v).unwrap()).abs() < 1e-15);
        assert!(covariance(&v, &v[..3]).is_none());
    }

    #[test]
    fn mean_of_constant_is_exact() {
        for p in [0.1, 57.89, 412.33, 9.99] {
            assert_eq!(mean(&vec![p; 200]), Some(p));
        }
    }

    #[test]
    fn compare_within_absorbs_rounding_noise() {
        assert_eq!(compare_within(412.33, 412.330_000_000_001_4, 412.33), Ordering::Equal);
        assert_eq!(compare_within(412.34, 412.33, 412.33), Ordering::Greater);
        assert_eq!(compare_within(1e-17, 0.0, 100.0), Ordering::Equal);
        assert_eq!(compare_within(-0.5, 0.0, 100.0), Ordering::Less);
    }
}
