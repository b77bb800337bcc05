use std::time::Duration;

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;

use super::PriceSource;
use crate::error::{AnalyticsError, Result};
use crate::model::{PricePoint, PriceSeries};

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// Parses a chart v8 payload into adjusted closes. Falls back to raw closes
/// when no adjusted series is present; null entries are skipped.
pub fn parse_chart_response(symbol: &str, body: &str) -> Result<PriceSeries> {
    let resp: ChartResponse = serde_json::from_str(body)?;
    if let Some(err) = resp.chart.error {
        tracing::warn!(symbol, code = %err.code, description = %err.description, "Chart API error");
        return Err(AnalyticsError::DataUnavailable {
            symbol: symbol.to_string(),
        });
    }
    let result = resp
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| AnalyticsError::DataUnavailable {
            symbol: symbol.to_string(),
        })?;

    let Indicators { quote, adjclose } = result.indicators;
    let closes = match adjclose.into_iter().next() {
        Some(a) if !a.adjclose.is_empty() => a.adjclose,
        _ => quote.into_iter().next().map(|q| q.close).unwrap_or_default(),
    };

    let points: Vec<PricePoint> = result
        .timestamp
        .iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            let date = DateTime::from_timestamp(*ts, 0)?.date_naive();
            Some(PricePoint { date, close: close? })
        })
        .collect();

    if points.is_empty() {
        return Err(AnalyticsError::DataUnavailable {
            symbol: symbol.to_string(),
        });
    }
    Ok(PriceSeries::new(symbol, points))
}

/// Blocking client for a Yahoo-chart-compatible endpoint.
pub struct HttpPriceSource {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl HttpPriceSource {
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let period1 = unix_midnight(start);
        // period2 is exclusive upstream; push it past `end` so the range is inclusive.
        let period2 = unix_midnight(end) + 86_400;
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=div%2Csplit",
            self.base_url, symbol, period1, period2
        )
    }
}

fn unix_midnight(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

impl PriceSource for HttpPriceSource {
    fn fetch_series(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        let url = self.chart_url(symbol, start, end);
        tracing::debug!(symbol, %start, %end, "Requesting chart data");
        let resp = self.http.get(&url).send()?;
        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            tracing::warn!(symbol, status = %status, "Chart request returned error status");
            return Err(AnalyticsError::DataUnavailable {
                symbol: symbol.to_string(),
            });
        }
        let series = parse_chart_response(symbol, &body)?;
        tracing::info!(symbol, rows = series.len(), "Fetched chart data");
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_url_makes_end_inclusive() {
        let src = HttpPriceSource::new("https://example.test/", Duration::from_secs(5), "t").unwrap();
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let url = src.chart_url("SPY", start, end);
        assert!(url.starts_with("https://example.test/v8/finance/chart/SPY?"));
        assert!(url.contains("period1=1704153600"));
        assert!(url.contains("period2=1704326400"));
    }
}
