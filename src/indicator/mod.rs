pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod pivots;
pub mod rsi;
pub mod sma;

pub use bollinger::{bollinger_bands, BollingerBand};
pub use ema::{ema_series, Ema};
pub use macd::{macd, MacdSeries};
pub use pivots::{support_resistance, SupportResistance};
pub use rsi::{rsi_series, Rsi, RSI_NEUTRAL};
pub use sma::{sma_series, Sma};
