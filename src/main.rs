use anyhow::{Context, Result};
use serde::Serialize;

use alphatic::config::{Config, LoggingConfig};
use alphatic::forward::{
    calculate_forward_risk_metrics, monte_carlo_with_seed, scenario_analysis, ForwardRiskMetrics,
    ScenarioAnalysis, DEFAULT_CONFIDENCE_LEVEL,
};
use alphatic::grading::{
    compare_to_benchmark, rank_against_benchmarks, report_card, smart_benchmarks,
    BenchmarkRanking, BenchmarkSuggestion, GradingInputs, MetricComparison, PortfolioReportCard,
};
use alphatic::indicator::{support_resistance, SupportResistance};
use alphatic::market_data::{
    interpret_economic_regime, placeholder_economic_data, CachedPriceSource, EconomicIndicators,
    HttpPriceSource, PriceSource,
};
use alphatic::metrics::{
    compute_metrics, income_breakdown, rolling_metrics, MonthlyIncome, PortfolioMetrics,
    RollingPoint,
};
use alphatic::model::{ReturnSeries, Weights};
use alphatic::optimizer::{
    calculate_efficient_frontier, optimize_portfolio, FrontierPoint, OptimizationMethod,
    OptimizationResult,
};
use alphatic::regime::{
    analyze_regime_performance, detect_market_regime_enhanced, detect_market_regimes,
    RegimeAssessment, RegimePerformance,
};
use alphatic::scoring::{generate_trading_signal, TradingSignal};
use alphatic::stats::cumulative_growth;
use alphatic::store::{BuildRequest, PortfolioStore};

const INITIAL_CAPITAL: f64 = 10_000.0;
const ROLLING_WINDOW: usize = 126;
const PIVOT_WINDOW: usize = 20;

#[derive(Serialize)]
struct TickerSignal {
    symbol: String,
    signal: TradingSignal,
    levels: Option<SupportResistance>,
}

#[derive(Serialize)]
struct EconomicView {
    indicators: EconomicIndicators,
    regime: &'static str,
    description: &'static str,
}

#[derive(Serialize)]
struct Report {
    portfolio: String,
    tickers: Vec<String>,
    weights: Weights,
    warnings: Vec<String>,
    observations: usize,
    metrics: PortfolioMetrics,
    latest_rolling: Option<RollingPoint>,
    report_card: PortfolioReportCard,
    benchmarks: Vec<BenchmarkSuggestion>,
    ranking: Option<BenchmarkRanking>,
    benchmark_comparison: Vec<MetricComparison>,
    signals: Vec<TickerSignal>,
    current_regime: RegimeAssessment,
    regime_performance: Vec<RegimePerformance>,
    economic: EconomicView,
    forward_risk: ForwardRiskMetrics,
    scenarios: Option<ScenarioAnalysis>,
    optimal: Option<OptimizationResult>,
    frontier_best: Option<FrontierPoint>,
    monthly_income: Vec<MonthlyIncome>,
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        logging
            .level
            .parse()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    });
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn benchmark_returns<S: PriceSource>(
    source: &S,
    symbol: &str,
    start: chrono::NaiveDate,
    end: chrono::NaiveDate,
) -> Option<ReturnSeries> {
    match source.fetch_series(symbol, start, end) {
        Ok(series) => Some(ReturnSeries::from_prices(&series)),
        Err(e) => {
            tracing::warn!(benchmark = symbol, error = %e, "Benchmark unavailable");
            None
        }
    }
}

fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Set ALPHATIC_CONFIG or create config/default.toml");
            std::process::exit(1);
        }
    };
    init_tracing(&config.logging);

    let portfolio = config
        .portfolio
        .clone()
        .context("config has no [portfolio] section to analyze")?;
    let analytics = &config.analytics;

    tracing::info!(
        portfolio = %portfolio.name,
        tickers = %portfolio.tickers,
        base_url = %config.data.base_url,
        "Starting alphatic"
    );

    let http = HttpPriceSource::new(
        &config.data.base_url,
        config.data.timeout(),
        &config.data.user_agent,
    )
    .context("failed to build HTTP client")?;
    let source = CachedPriceSource::new(http, config.data.cache_ttl());

    let mut store = PortfolioStore::new(analytics.weight_tolerance);
    store
        .build(
            &source,
            BuildRequest {
                name: portfolio.name.clone(),
                tickers: portfolio.ticker_list(),
                allocation: portfolio.allocation,
                weights: portfolio.weights.clone(),
                start_date: portfolio.start,
                end_date: portfolio.end,
            },
        )
        .with_context(|| format!("failed to build portfolio '{}'", portfolio.name))?;
    let (name, state) = store.current().context("no portfolio selected")?;
    let returns = &state.returns;
    let (start, end) = (state.definition.start_date, state.definition.end_date);

    let benchmark = benchmark_returns(&source, &portfolio.benchmark, start, end);
    let metrics = compute_metrics(returns, benchmark.as_ref(), analytics.risk_free_rate)?;
    let grading_inputs =
        GradingInputs::from_returns(returns, benchmark.as_ref(), analytics.risk_free_rate)?;

    let suggestions = smart_benchmarks(&state.definition.tickers);
    let mut benchmark_sharpes = Vec::new();
    for s in &suggestions {
        let Some(r) = benchmark_returns(&source, &s.symbol, start, end) else {
            continue;
        };
        if let Ok(m) = compute_metrics(&r, None, analytics.risk_free_rate) {
            benchmark_sharpes.push(m.sharpe);
        }
    }
    let benchmark_comparison = benchmark
        .as_ref()
        .and_then(|b| compute_metrics(b, None, analytics.risk_free_rate).ok())
        .map(|b| compare_to_benchmark(&metrics, &b))
        .unwrap_or_default();

    let signals = state
        .definition
        .tickers
        .iter()
        .filter_map(|symbol| {
            let series = state.prices.series(symbol)?;
            Some(TickerSignal {
                symbol: symbol.clone(),
                signal: generate_trading_signal(&series),
                levels: support_resistance(&series.closes(), PIVOT_WINDOW),
            })
        })
        .collect();

    let growth = cumulative_growth(returns.values());
    let regimes = detect_market_regimes(returns, analytics.regime_lookback);
    let economic_data = placeholder_economic_data();
    let economic_regime = interpret_economic_regime(Some(&economic_data));

    let ensemble = monte_carlo_with_seed(
        returns,
        analytics.monte_carlo_days,
        analytics.monte_carlo_paths,
        analytics.monte_carlo_seed,
    )?;

    let optimal = match optimize_portfolio(&state.prices, OptimizationMethod::MaxSharpe) {
        Ok(o) => Some(o),
        Err(e) => {
            tracing::warn!(error = %e, "Skipping optimization");
            None
        }
    };
    let frontier_best = calculate_efficient_frontier(
        &state.prices,
        analytics.frontier_samples,
        analytics.monte_carlo_seed,
    )
    .ok()
    .and_then(|f| f.best_sharpe().cloned());

    let report = Report {
        portfolio: name.to_string(),
        tickers: state.definition.tickers.clone(),
        weights: state.definition.weights.clone(),
        warnings: state.warnings.clone(),
        observations: returns.len(),
        metrics,
        latest_rolling: rolling_metrics(returns, ROLLING_WINDOW).last().copied(),
        report_card: report_card(&grading_inputs),
        benchmarks: suggestions,
        ranking: rank_against_benchmarks(metrics.sharpe, &benchmark_sharpes),
        benchmark_comparison,
        signals,
        current_regime: detect_market_regime_enhanced(returns, &growth),
        regime_performance: analyze_regime_performance(returns, &regimes),
        economic: EconomicView {
            indicators: economic_data,
            regime: economic_regime.label(),
            description: economic_regime.description(),
        },
        forward_risk: calculate_forward_risk_metrics(returns, DEFAULT_CONFIDENCE_LEVEL)?,
        scenarios: scenario_analysis(&ensemble),
        optimal,
        frontier_best,
        monthly_income: income_breakdown(returns, INITIAL_CAPITAL, analytics.dividend_yield),
    };

    tracing::info!(portfolio = name, grade = report.report_card.overall.as_str(), "Analysis complete");
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
