use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fraction of capital per symbol. The sum is expected to be 1.0 but is not enforced.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weights(BTreeMap<String, f64>);

impl Weights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn equal<S: AsRef<str>>(symbols: &[S]) -> Self {
        if symbols.is_empty() {
            return Self::default();
        }
        let w = 1.0 / symbols.len() as f64;
        Self(
            symbols
                .iter()
                .map(|s| (s.as_ref().to_string(), w))
                .collect(),
        )
    }

    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (S, f64)>) -> Self {
        Self(pairs.into_iter().map(|(s, w)| (s.into(), w)).collect())
    }

    pub fn insert(&mut self, symbol: impl Into<String>, weight: f64) {
        self.0.insert(symbol.into(), weight);
    }

    /// Missing symbols carry zero weight.
    pub fn get(&self, symbol: &str) -> f64 {
        self.0.get(symbol).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.0.contains_key(symbol)
    }

    pub fn sum(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Weight vector in the given symbol order.
    pub fn vector<S: AsRef<str>>(&self, symbols: &[S]) -> Vec<f64> {
        symbols.iter().map(|s| self.get(s.as_ref())).collect()
    }
}

/// The persisted unit: what to hold and over which range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioDefinition {
    pub tickers: Vec<String>,
    pub weights: Weights,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Normalizes user ticker input: comma or newline separated, trimmed, upper-cased, de-duplicated.
pub fn parse_tickers(input: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for raw in input.split([',', '\n']) {
        let t = raw.trim().to_ascii_uppercase();
        if !t.is_empty() && !out.iter().any(|v| v == &t) {
            out.push(t);
        }
    }
    out
}
