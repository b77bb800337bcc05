use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("config error: {0}")]
    Config(String),

    #[error("no price data available for {symbol}")]
    DataUnavailable { symbol: String },

    #[error("no price data resolved for any requested symbol")]
    NoPriceData,

    #[error("insufficient history: need {needed} observations, got {got}")]
    InsufficientHistory { needed: usize, got: usize },

    #[error("return series is empty")]
    EmptySeries,

    #[error("invalid return distribution: {0}")]
    InvalidDistribution(String),

    #[error("unknown portfolio: {0}")]
    UnknownPortfolio(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
