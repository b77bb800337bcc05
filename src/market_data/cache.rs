use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::NaiveDate;

use super::{fetch_price_matrix, FetchOutcome, PriceSource};
use crate::error::Result;
use crate::model::PriceSeries;

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

type SeriesKey = (String, NaiveDate, NaiveDate);
type MatrixKey = (Vec<String>, NaiveDate, NaiveDate);

struct Entry<T> {
    value: T,
    stored_at: Instant,
}

/// TTL cache in front of another source. Series and whole matrices are cached
/// separately; expired entries are refetched on next access.
pub struct CachedPriceSource<S, C = SystemClock> {
    inner: S,
    clock: C,
    ttl: Duration,
    series: Mutex<HashMap<SeriesKey, Entry<PriceSeries>>>,
    matrices: Mutex<HashMap<MatrixKey, Entry<FetchOutcome>>>,
}

impl<S: PriceSource> CachedPriceSource<S, SystemClock> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self::with_clock(inner, ttl, SystemClock)
    }
}

impl<S: PriceSource, C: Clock> CachedPriceSource<S, C> {
    pub fn with_clock(inner: S, ttl: Duration, clock: C) -> Self {
        Self {
            inner,
            clock,
            ttl,
            series: Mutex::new(HashMap::new()),
            matrices: Mutex::new(HashMap::new()),
        }
    }

    fn fresh(&self, stored_at: Instant) -> bool {
        self.clock.now().saturating_duration_since(stored_at) < self.ttl
    }

    /// Inserts `value` and drops every expired entry of `cache`.
    fn store<K: Eq + Hash, T>(&self, cache: &mut HashMap<K, Entry<T>>, key: K, value: T) {
        cache.retain(|_, e| self.fresh(e.stored_at));
        cache.insert(
            key,
            Entry {
                value,
                stored_at: self.clock.now(),
            },
        );
    }

    /// Entries currently held, expired or not: `(series, matrices)`.
    pub fn entry_counts(&self) -> (usize, usize) {
        (
            self.series.lock().unwrap_or_else(|e| e.into_inner()).len(),
            self.matrices.lock().unwrap_or_else(|e| e.into_inner()).len(),
        )
    }

    pub fn fetch_matrix(
        &self,
        symbols: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchOutcome> {
        let key = (symbols.to_vec(), start, end);
        {
            let cache = self.matrices.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(entry) = cache.get(&key).filter(|e| self.fresh(e.stored_at)) {
                tracing::debug!(symbols = ?symbols, "Price matrix cache hit");
                return Ok(entry.value.clone());
            }
        }
        tracing::debug!(symbols = ?symbols, "Price matrix cache miss");
        let outcome = fetch_price_matrix(self, symbols, start, end)?;
        let mut cache = self.matrices.lock().unwrap_or_else(|e| e.into_inner());
        self.store(&mut cache, key, outcome.clone());
        Ok(outcome)
    }

    pub fn clear(&self) {
        self.series.lock().unwrap_or_else(|e| e.into_inner()).clear();
        self.matrices.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: PriceSource, C: Clock> PriceSource for CachedPriceSource<S, C> {
    fn fetch_series(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<PriceSeries> {
        let key = (symbol.to_string(), start, end);
        {
            let cache = self.series.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(entry) = cache.get(&key).filter(|e| self.fresh(e.stored_at)) {
                tracing::debug!(symbol, "Price series cache hit");
                return Ok(entry.value.clone());
            }
        }
        let series = self.inner.fetch_series(symbol, start, end)?;
        let mut cache = self.series.lock().unwrap_or_else(|e| e.into_inner());
        self.store(&mut cache, key, series.clone());
        Ok(series)
    }
}
