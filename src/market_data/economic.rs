//! Point-in-time macro indicators. No live feed is wired up; the placeholder
//! values stand in for one.

use serde::{Deserialize, Serialize};

/// All values in percent except `vix`, which is an index level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EconomicIndicators {
    pub gdp_growth: f64,
    pub unemployment: f64,
    pub inflation_cpi: f64,
    pub fed_funds_rate: f64,
    pub treasury_10y: f64,
    pub vix: f64,
    pub yield_curve: f64,
}

pub fn placeholder_economic_data() -> EconomicIndicators {
    EconomicIndicators {
        gdp_growth: 2.5,
        unemployment: 3.8,
        inflation_cpi: 2.8,
        fed_funds_rate: 5.25,
        treasury_10y: 4.15,
        vix: 14.5,
        yield_curve: -0.15,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EconomicRegime {
    Goldilocks,
    Stagflation,
    Recession,
    Overheating,
    ModerateGrowth,
    Unknown,
}

impl EconomicRegime {
    pub fn label(self) -> &'static str {
        match self {
            Self::Goldilocks => "Goldilocks",
            Self::Stagflation => "Stagflation",
            Self::Recession => "Recession",
            Self::Overheating => "Overheating",
            Self::ModerateGrowth => "Moderate Growth",
            Self::Unknown => "Unknown",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Goldilocks => "Strong growth, low inflation, low unemployment",
            Self::Stagflation => "Weak growth with high inflation",
            Self::Recession => "Contracting growth or rising unemployment",
            Self::Overheating => "Strong growth with rising inflation",
            Self::ModerateGrowth => "Steady growth without clear extremes",
            Self::Unknown => "Economic data unavailable",
        }
    }
}

/// First matching rule wins, in the order Goldilocks, Stagflation, Recession, Overheating.
pub fn interpret_economic_regime(data: Option<&EconomicIndicators>) -> EconomicRegime {
    let Some(d) = data else {
        return EconomicRegime::Unknown;
    };
    if d.gdp_growth > 2.0 && d.inflation_cpi < 3.5 && d.unemployment < 4.5 {
        EconomicRegime::Goldilocks
    } else if d.gdp_growth < 1.5 && d.inflation_cpi > 4.0 {
        EconomicRegime::Stagflation
    } else if d.gdp_growth < 0.5 || d.unemployment > 5.5 {
        EconomicRegime::Recession
    } else if d.gdp_growth > 3.0 && d.inflation_cpi > 3.5 {
        EconomicRegime::Overheating
    } else {
        EconomicRegime::ModerateGrowth
    }
}
