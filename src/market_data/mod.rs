pub mod cache;
pub mod economic;
pub mod http;

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::{AnalyticsError, Result};
use crate::model::{PriceMatrix, PricePoint, PriceSeries};

pub use cache::{CachedPriceSource, Clock, SystemClock};
pub use economic::{interpret_economic_regime, placeholder_economic_data, EconomicIndicators, EconomicRegime};
pub use http::{parse_chart_response, HttpPriceSource};

/// Anything that can produce adjusted daily closes for a symbol over an
/// inclusive date range.
pub trait PriceSource {
    fn fetch_series(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries>;
}

impl<T: PriceSource + ?Sized> PriceSource for &T {
    fn fetch_series(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        (**self).fetch_series(symbol, start, end)
    }
}

impl<T: PriceSource + ?Sized> PriceSource for Box<T> {
    fn fetch_series(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        (**self).fetch_series(symbol, start, end)
    }
}

/// An aligned matrix plus the symbols that could not be resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub matrix: PriceMatrix,
    pub dropped: Vec<String>,
}

impl FetchOutcome {
    pub fn warnings(&self) -> Vec<String> {
        self.dropped
            .iter()
            .map(|s| format!("no price data for {s}; excluded from analysis"))
            .collect()
    }
}

/// Fetches every symbol and inner-joins the survivors on date. Per-symbol
/// failures are dropped with a warning; only an empty result is an error.
pub fn fetch_price_matrix<S: PriceSource + ?Sized>(
    source: &S,
    symbols: &[String],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<FetchOutcome> {
    let mut series = Vec::with_capacity(symbols.len());
    let mut dropped = Vec::new();
    for symbol in symbols {
        match source.fetch_series(symbol, start, end) {
            Ok(s) if !s.is_empty() => {
                tracing::debug!(symbol = %symbol, rows = s.len(), "Fetched price series");
                series.push(s);
            }
            Ok(_) => {
                tracing::warn!(symbol = %symbol, "Empty price series, dropping symbol");
                dropped.push(symbol.clone());
            }
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "Price fetch failed, dropping symbol");
                dropped.push(symbol.clone());
            }
        }
    }

    let matrix = PriceMatrix::from_series(&series);
    if matrix.num_assets() == 0 || matrix.num_rows() == 0 {
        return Err(AnalyticsError::NoPriceData);
    }
    Ok(FetchOutcome { matrix, dropped })
}

/// Latest first-available date across `symbols`, searching from `floor` to
/// `today`. Symbols that fail to resolve are ignored.
pub fn earliest_common_start<S: PriceSource + ?Sized>(
    source: &S,
    symbols: &[String],
    floor: NaiveDate,
    today: NaiveDate,
) -> Result<NaiveDate> {
    symbols
        .iter()
        .filter_map(|s| match source.fetch_series(s, floor, today) {
            Ok(series) => series.first_date(),
            Err(e) => {
                tracing::warn!(symbol = %s, error = %e, "Skipping symbol for start date search");
                None
            }
        })
        .max()
        .ok_or(AnalyticsError::NoPriceData)
}

/// In-memory source backed by fixed series. Used offline and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceSource {
    series: HashMap<String, PriceSeries>,
}

impl StaticPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, series: PriceSeries) -> Self {
        self.insert(series);
        self
    }

    pub fn insert(&mut self, series: PriceSeries) {
        self.series.insert(series.symbol().to_string(), series);
    }
}

impl PriceSource for StaticPriceSource {
    fn fetch_series(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        let full = self
            .series
            .get(symbol)
            .ok_or_else(|| AnalyticsError::DataUnavailable {
                symbol: symbol.to_string(),
            })?;
        let points: Vec<PricePoint> = full
            .points()
            .iter()
            .filter(|p| p.date >= start && p.date <= end)
            .copied()
            .collect();
        if points.is_empty() {
            return Err(AnalyticsError::DataUnavailable {
                symbol: symbol.to_string(),
            });
        }
        Ok(PriceSeries::new(symbol, points))
    }
}
