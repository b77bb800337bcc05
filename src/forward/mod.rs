pub mod monte_carlo;
pub mod risk;

pub use monte_carlo::{
    monte_carlo_simulation, monte_carlo_with_seed, percentile_bands, scenario_analysis,
    ScenarioAnalysis, SimulationEnsemble, DEFAULT_DAYS_FORWARD, DEFAULT_NUM_SIMULATIONS,
};
pub use risk::{
    calculate_forward_risk_metrics, historical_cvar, historical_var, ForwardRiskMetrics,
    DEFAULT_CONFIDENCE_LEVEL,
};
