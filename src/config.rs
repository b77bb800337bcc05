use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::model::{parse_tickers, Weights};
use crate::store::AllocationMethod;

pub const CONFIG_PATH_ENV: &str = "ALPHATIC_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub portfolio: Option<PortfolioConfig>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
    #[serde(default = "default_regime_lookback")]
    pub regime_lookback: usize,
    #[serde(default = "default_monte_carlo_days")]
    pub monte_carlo_days: usize,
    #[serde(default = "default_monte_carlo_paths")]
    pub monte_carlo_paths: usize,
    #[serde(default)]
    pub monte_carlo_seed: Option<u64>,
    #[serde(default = "default_frontier_samples")]
    pub frontier_samples: usize,
    #[serde(default = "default_dividend_yield")]
    pub dividend_yield: f64,
    #[serde(default = "default_weight_tolerance")]
    pub weight_tolerance: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
            regime_lookback: default_regime_lookback(),
            monte_carlo_days: default_monte_carlo_days(),
            monte_carlo_paths: default_monte_carlo_paths(),
            monte_carlo_seed: None,
            frontier_samples: default_frontier_samples(),
            dividend_yield: default_dividend_yield(),
            weight_tolerance: default_weight_tolerance(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioConfig {
    pub name: String,
    /// Comma or newline separated, as a user would type them.
    pub tickers: String,
    #[serde(default)]
    pub weights: Option<Weights>,
    #[serde(default)]
    pub allocation: AllocationMethod,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default = "default_benchmark")]
    pub benchmark: String,
}

impl PortfolioConfig {
    pub fn ticker_list(&self) -> Vec<String> {
        parse_tickers(&self.tickers)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_timeout_secs() -> u64 {
    15
}
fn default_cache_ttl_secs() -> u64 {
    3600
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; alphatic)".to_string()
}
fn default_risk_free_rate() -> f64 {
    0.02
}
fn default_regime_lookback() -> usize {
    60
}
fn default_monte_carlo_days() -> usize {
    252
}
fn default_monte_carlo_paths() -> usize {
    1000
}
fn default_frontier_samples() -> usize {
    100
}
fn default_dividend_yield() -> f64 {
    0.018
}
fn default_weight_tolerance() -> f64 {
    0.01
}
fn default_benchmark() -> String {
    "SPY".to_string()
}

impl DataConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::from_path(&config_path)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let a = &self.analytics;
        if a.monte_carlo_paths == 0 {
            bail!("analytics.monte_carlo_paths must be > 0");
        }
        if a.monte_carlo_days == 0 {
            bail!("analytics.monte_carlo_days must be > 0");
        }
        if a.regime_lookback == 0 {
            bail!("analytics.regime_lookback must be > 0");
        }
        if !(0.0..=1.0).contains(&a.dividend_yield) {
            bail!("analytics.dividend_yield must be within [0, 1]");
        }
        if let Some(p) = &self.portfolio {
            if p.start > p.end {
                bail!("portfolio.start {} is after portfolio.end {}", p.start, p.end);
            }
            if p.ticker_list().is_empty() {
                bail!("portfolio.tickers is empty");
            }
            if p.allocation == AllocationMethod::Custom && p.weights.is_none() {
                bail!("portfolio.allocation = \"custom\" requires portfolio.weights");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[data]
base_url = "https://query1.finance.yahoo.com"

[logging]
level = "info"
"#;

    #[test]
    fn minimal_file_uses_defaults() {
        let config: Config = toml::from_str(MINIMAL).unwrap();
        assert!((config.analytics.risk_free_rate - 0.02).abs() < f64::EPSILON);
        assert_eq!(config.analytics.monte_carlo_paths, 1000);
        assert!((config.analytics.dividend_yield - 0.018).abs() < f64::EPSILON);
        assert_eq!(config.data.cache_ttl_secs, 3600);
        assert!(config.portfolio.is_none());
        assert!(!config.logging.json);
        config.validate().unwrap();
    }

    #[test]
    fn rejects_zero_paths() {
        let mut config: Config = toml::from_str(MINIMAL).unwrap();
        config.analytics.monte_carlo_paths = 0;
        assert!(config.validate().is_err());
    }
}
