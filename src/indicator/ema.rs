/// Exponential Moving Average with span-based smoothing, seeded by the first value
/// (no warm-up window).
#[derive(Debug, Clone)]
pub struct Ema {
    span: usize,
    alpha: f64,
    ema: Option<f64>,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        assert!(span > 0, "EMA span must be > 0");
        Self {
            span,
            alpha: 2.0 / (span as f64 + 1.0),
            ema: None,
        }
    }

    pub fn push(&mut self, value: f64) -> f64 {
        let next = match self.ema {
            Some(prev) => prev + self.alpha * (value - prev),
            None => value,
        };
        self.ema = Some(next);
        next
    }

    pub fn value(&self) -> Option<f64> {
        self.ema
    }

    pub fn span(&self) -> usize {
        self.span
    }
}

pub fn ema_series(values: &[f64], span: usize) -> Vec<f64> {
    let mut ema = Ema::new(span);
    values.iter().map(|v| ema.push(*v)).collect()
}
