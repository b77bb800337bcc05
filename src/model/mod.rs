pub mod portfolio;
pub mod price;
pub mod returns;
pub mod signal;

pub use portfolio::{parse_tickers, PortfolioDefinition, Weights};
pub use price::{PriceMatrix, PricePoint, PriceSeries};
pub use returns::ReturnSeries;
pub use signal::{Signal, SignalAction};
