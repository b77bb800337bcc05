pub mod config;
pub mod error;
pub mod forward;
pub mod grading;
pub mod indicator;
pub mod market_data;
pub mod metrics;
pub mod model;
pub mod optimizer;
pub mod regime;
pub mod scoring;
pub mod stats;
pub mod store;

pub use error::{AnalyticsError, Result};
