use serde::{Deserialize, Serialize};

/// Discrete recommendation produced by the signal scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalAction {
    Accumulate,
    Hold,
    Distribute,
}

impl Signal {
    pub fn from_score(score: i32) -> Self {
        if score >= 4 {
            Self::StrongBuy
        } else if score >= 2 {
            Self::Buy
        } else if score <= -4 {
            Self::StrongSell
        } else if score <= -2 {
            Self::Sell
        } else {
            Self::Hold
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::StrongBuy => "STRONG BUY",
            Self::Buy => "BUY",
            Self::Hold => "HOLD",
            Self::Sell => "SELL",
            Self::StrongSell => "STRONG SELL",
        }
    }

    pub fn action(self) -> SignalAction {
        match self {
            Self::StrongBuy | Self::Buy => SignalAction::Accumulate,
            Self::Hold => SignalAction::Hold,
            Self::Sell | Self::StrongSell => SignalAction::Distribute,
        }
    }
}
