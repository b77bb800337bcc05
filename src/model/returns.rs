use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::price::PriceSeries;

/// Dated simple daily returns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReturnSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl ReturnSeries {
    /// Pairs beyond the shorter of the two inputs are ignored.
    pub fn new(mut dates: Vec<NaiveDate>, mut values: Vec<f64>) -> Self {
        let n = dates.len().min(values.len());
        dates.truncate(n);
        values.truncate(n);
        Self { dates, values }
    }

    /// Returns of a single price series; non-finite steps are skipped.
    pub fn from_prices(prices: &PriceSeries) -> Self {
        let points = prices.points();
        let mut dates = Vec::with_capacity(points.len().saturating_sub(1));
        let mut values = Vec::with_capacity(points.len().saturating_sub(1));
        for w in points.windows(2) {
            let r = (w[1].close - w[0].close) / w[0].close;
            if r.is_finite() {
                dates.push(w[1].date);
                values.push(r);
            }
        }
        Self { dates, values }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Inner join on dates; both outputs share the same date index.
    pub fn align(&self, other: &ReturnSeries) -> (Vec<f64>, Vec<f64>) {
        let mut a = Vec::new();
        let mut b = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.dates.len() && j < other.dates.len() {
            match self.dates[i].cmp(&other.dates[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    a.push(self.values[i]);
                    b.push(other.values[j]);
                    i += 1;
                    j += 1;
                }
            }
        }
        (a, b)
    }
}
