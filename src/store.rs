//! Caller-owned set of named portfolios with their fetched data.
//!
//! Only definitions are exported; prices and returns are always rebuilt from
//! a price source.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};
use crate::market_data::{fetch_price_matrix, PriceSource};
use crate::metrics::{compute_returns, weights_warning};
use crate::model::{PortfolioDefinition, PriceMatrix, ReturnSeries, Weights};
use crate::optimizer::{optimize_portfolio, OptimizationMethod};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMethod {
    #[default]
    Equal,
    Custom,
    MaxSharpe,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildRequest {
    pub name: String,
    pub tickers: Vec<String>,
    pub allocation: AllocationMethod,
    /// Required for `Custom`; ignored otherwise.
    pub weights: Option<Weights>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioState {
    pub definition: PortfolioDefinition,
    pub prices: PriceMatrix,
    pub returns: ReturnSeries,
    /// Non-fatal issues found while building: dropped symbols, weight sums.
    pub warnings: Vec<String>,
}

#[derive(Debug, Default)]
pub struct PortfolioStore {
    portfolios: BTreeMap<String, PortfolioState>,
    current: Option<String>,
    weight_tolerance: f64,
}

impl PortfolioStore {
    pub fn new(weight_tolerance: f64) -> Self {
        Self {
            portfolios: BTreeMap::new(),
            current: None,
            weight_tolerance,
        }
    }

    /// Fetches prices, resolves weights and stores the result under
    /// `request.name`, replacing any existing entry. The new portfolio becomes current.
    pub fn build<S: PriceSource + ?Sized>(
        &mut self,
        source: &S,
        request: BuildRequest,
    ) -> Result<&PortfolioState> {
        let outcome =
            fetch_price_matrix(source, &request.tickers, request.start_date, request.end_date)?;
        let mut warnings = outcome.warnings();
        let prices = outcome.matrix;
        let resolved = prices.symbols().to_vec();

        let weights = match request.allocation {
            AllocationMethod::Equal => Weights::equal(&resolved),
            AllocationMethod::Custom => {
                let given = request.weights.ok_or_else(|| {
                    AnalyticsError::Config("custom allocation requires weights".to_string())
                })?;
                Weights::from_pairs(resolved.iter().map(|s| (s.clone(), given.get(s))))
            }
            AllocationMethod::MaxSharpe => match optimize_portfolio(&prices, OptimizationMethod::MaxSharpe) {
                Ok(result) => result.to_weights(),
                Err(e) => {
                    tracing::warn!(portfolio = %request.name, error = %e, "Optimization unavailable; using equal weights");
                    warnings.push(format!("optimization unavailable ({e}); equal weights used"));
                    Weights::equal(&resolved)
                }
            },
        };

        let definition = PortfolioDefinition {
            tickers: resolved,
            weights,
            start_date: request.start_date,
            end_date: request.end_date,
        };
        self.insert_built(request.name, definition, prices, warnings)
    }

    /// Rebuilds a stored definition (e.g. an imported one) against `source`.
    pub fn build_from_definition<S: PriceSource + ?Sized>(
        &mut self,
        source: &S,
        name: &str,
        definition: PortfolioDefinition,
    ) -> Result<&PortfolioState> {
        let outcome = fetch_price_matrix(
            source,
            &definition.tickers,
            definition.start_date,
            definition.end_date,
        )?;
        let warnings = outcome.warnings();
        self.insert_built(name.to_string(), definition, outcome.matrix, warnings)
    }

    /// Re-fetches with the same tickers, weights and start date up to `end_date`.
    pub fn refresh<S: PriceSource + ?Sized>(
        &mut self,
        source: &S,
        name: &str,
        end_date: NaiveDate,
    ) -> Result<&PortfolioState> {
        let mut definition = self
            .portfolios
            .get(name)
            .map(|p| p.definition.clone())
            .ok_or_else(|| AnalyticsError::UnknownPortfolio(name.to_string()))?;
        definition.end_date = end_date;
        tracing::info!(portfolio = name, %end_date, "Refreshing portfolio");
        self.build_from_definition(source, name, definition)
    }

    fn insert_built(
        &mut self,
        name: String,
        definition: PortfolioDefinition,
        prices: PriceMatrix,
        mut warnings: Vec<String>,
    ) -> Result<&PortfolioState> {
        if let Some(w) = weights_warning(&definition.weights, self.weight_tolerance) {
            tracing::warn!(portfolio = %name, sum = definition.weights.sum(), "Weights do not sum to 1");
            warnings.push(w);
        }
        let returns = compute_returns(&prices, &definition.weights);
        tracing::info!(
            portfolio = %name,
            assets = prices.num_assets(),
            rows = returns.len(),
            "Portfolio built"
        );
        self.portfolios.insert(
            name.clone(),
            PortfolioState {
                definition,
                prices,
                returns,
                warnings,
            },
        );
        self.current = Some(name.clone());
        self.portfolios
            .get(&name)
            .ok_or(AnalyticsError::UnknownPortfolio(name))
    }

    /// Removing the current portfolio moves the selection to the first remaining name.
    pub fn remove(&mut self, name: &str) -> Result<PortfolioState> {
        let removed = self
            .portfolios
            .remove(name)
            .ok_or_else(|| AnalyticsError::UnknownPortfolio(name.to_string()))?;
        if self.current.as_deref() == Some(name) {
            self.current = self.portfolios.keys().next().cloned();
        }
        tracing::info!(portfolio = name, "Portfolio removed");
        Ok(removed)
    }

    pub fn select(&mut self, name: &str) -> Result<()> {
        if !self.portfolios.contains_key(name) {
            return Err(AnalyticsError::UnknownPortfolio(name.to_string()));
        }
        self.current = Some(name.to_string());
        Ok(())
    }

    pub fn current(&self) -> Option<(&str, &PortfolioState)> {
        let name = self.current.as_deref()?;
        self.portfolios.get(name).map(|p| (name, p))
    }

    pub fn get(&self, name: &str) -> Option<&PortfolioState> {
        self.portfolios.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.portfolios.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.portfolios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.portfolios.is_empty()
    }

    /// `{ name: { tickers, weights, start_date, end_date } }`, pretty printed.
    pub fn export_json(&self) -> Result<String> {
        let defs: BTreeMap<&str, &PortfolioDefinition> = self
            .portfolios
            .iter()
            .map(|(k, v)| (k.as_str(), &v.definition))
            .collect();
        Ok(serde_json::to_string_pretty(&defs)?)
    }

    /// Parses an export. Nothing is fetched; pass each definition to
    /// [`PortfolioStore::build_from_definition`] to load it.
    pub fn import_json(json: &str) -> Result<BTreeMap<String, PortfolioDefinition>> {
        Ok(serde_json::from_str(json)?)
    }
}
