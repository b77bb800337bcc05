use crate::stats::mean;

/// Simple Moving Average over a ring buffer of the last `period` values.
///
/// The average is taken over the buffer on every read rather than kept as a
/// running sum, so a constant input reads back exactly.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    buffer: Vec<f64>,
    head: usize,
    count: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "SMA period must be > 0");
        Self {
            period,
            buffer: vec![0.0; period],
            head: 0,
            count: 0,
        }
    }

    /// Push a new value, return the current SMA if enough data.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        self.buffer[self.head] = value;
        self.head = (self.head + 1) % self.period;
        if self.count < self.period {
            self.count += 1;
        }
        self.value()
    }

    pub fn value(&self) -> Option<f64> {
        if self.is_ready() {
            mean(&self.buffer)
        } else {
            None
        }
    }

    pub fn is_ready(&self) -> bool {
        self.count >= self.period
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

/// Rolling mean over `prices`; entries before the window fills are `None`.
pub fn sma_series(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    (0..prices.len())
        .map(|i| {
            if period == 0 || i + 1 < period {
                return None;
            }
            mean(&prices[i + 1 - period..=i])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_buffer_wraps_correctly() {
        let mut sma = Sma::new(3);
        sma.push(10.0);
        sma.push(20.0);
        sma.push(30.0);
        let v = sma.push(40.0).unwrap();
        assert!((v - 30.0).abs() < f64::EPSILON);
        let v = sma.push(50.0).unwrap();
        assert!((v - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn series_matches_incremental_average() {
        let prices = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0];
        let mut sma = Sma::new(3);
        let incremental: Vec<Option<f64>> = prices.iter().map(|p| sma.push(*p)).collect();
        let series = sma_series(&prices, 3);
        assert_eq!(series.len(), prices.len());
        assert!(series[1].is_none());
        for (a, b) in series.iter().zip(&incremental) {
            match (a, b) {
                (Some(a), Some(b)) => assert!((a - b).abs() < 1e-12),
                (None, None) => {}
                _ => panic!("readiness differs: {a:?} vs {b:?}"),
            }
        }
    }

    #[test]
    fn flat_input_reads_back_exactly() {
        for p in [0.1, 23.17, 412.33] {
            let mut sma = Sma::new(50);
            let mut last = None;
            for _ in 0..300 {
                last = sma.push(p);
            }
            assert_eq!(last, Some(p));
            assert_eq!(sma_series(&vec![p; 300], 200).last().copied().flatten(), Some(p));
        }
    }

    #[test]
    #[should_panic(expected = "SMA period must be > 0")]
    fn zero_period_panics() {
        Sma::new(0);
    }
}
