use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    /// Split and dividend adjusted close.
    pub close: f64,
}

/// Adjusted daily closes for one symbol, sorted by date with unique dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Non-finite closes are dropped; on duplicate dates the last value wins.
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Self {
        let mut by_date = BTreeMap::new();
        for p in points {
            if p.close.is_finite() {
                by_date.insert(p.date, p.close);
            }
        }
        Self {
            symbol: symbol.into(),
            points: by_date
                .into_iter()
                .map(|(date, close)| PricePoint { date, close })
                .collect(),
        }
    }

    pub fn from_closes(symbol: impl Into<String>, dates: &[NaiveDate], closes: &[f64]) -> Self {
        let points = dates
            .iter()
            .zip(closes)
            .map(|(date, close)| PricePoint {
                date: *date,
                close: *close,
            })
            .collect();
        Self::new(symbol, points)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last(&self) -> Option<PricePoint> {
        self.points.last().copied()
    }
}

/// Price columns aligned on a shared date index (inner join of the inputs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceMatrix {
    dates: Vec<NaiveDate>,
    symbols: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl PriceMatrix {
    /// Dates missing from any series are dropped. Column order follows input order;
    /// a repeated symbol keeps its first occurrence.
    pub fn from_series(series: &[PriceSeries]) -> Self {
        let mut symbols: Vec<String> = Vec::new();
        let mut kept: Vec<&PriceSeries> = Vec::new();
        for s in series {
            if !symbols.iter().any(|sym| sym == s.symbol()) {
                symbols.push(s.symbol().to_string());
                kept.push(s);
            }
        }

        let mut common: Option<BTreeSet<NaiveDate>> = None;
        for s in &kept {
            let dates: BTreeSet<NaiveDate> = s.points().iter().map(|p| p.date).collect();
            common = Some(match common {
                None => dates,
                Some(acc) => acc.intersection(&dates).copied().collect(),
            });
        }
        let dates: Vec<NaiveDate> = common.unwrap_or_default().into_iter().collect();

        let columns = kept
            .iter()
            .map(|s| {
                let lookup: BTreeMap<NaiveDate, f64> =
                    s.points().iter().map(|p| (p.date, p.close)).collect();
                dates.iter().filter_map(|d| lookup.get(d).copied()).collect()
            })
            .collect();

        Self {
            dates,
            symbols,
            columns,
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn column(&self, symbol: &str) -> Option<&[f64]> {
        self.symbols
            .iter()
            .position(|s| s == symbol)
            .map(|i| self.columns[i].as_slice())
    }

    pub fn columns(&self) -> &[Vec<f64>] {
        &self.columns
    }

    pub fn series(&self, symbol: &str) -> Option<PriceSeries> {
        self.column(symbol)
            .map(|col| PriceSeries::from_closes(symbol, &self.dates, col))
    }

    pub fn num_rows(&self) -> usize {
        self.dates.len()
    }

    pub fn num_assets(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.symbols.is_empty()
    }

    /// Per-asset simple returns, one row per date after the first. Rows with any
    /// non-finite return are dropped.
    pub fn asset_returns(&self) -> (Vec<NaiveDate>, Vec<Vec<f64>>) {
        let mut dates = Vec::new();
        let mut rows = Vec::new();
        for t in 1..self.dates.len() {
            let row: Vec<f64> = self
                .columns
                .iter()
                .map(|col| (col[t] - col[t - 1]) / col[t - 1])
                .collect();
            if row.iter().all(|r| r.is_finite()) {
                dates.push(self.dates[t]);
                rows.push(row);
            }
        }
        (dates, rows)
    }
}
