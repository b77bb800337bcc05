//! Letter grades, weighted GPA and benchmark rankings.
//!
//! Bands are half-open `[low, high)`. The best band of every metric is
//! unbounded on its favourable side so that, for example, a zero drawdown or a
//! 100% win rate grades A.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metrics::{average_recovery_days, compute_metrics, monthly_returns, PortfolioMetrics};
use crate::model::{PriceMatrix, PriceSeries, ReturnSeries, Weights};

const INF: f64 = f64::INFINITY;
const NEG_INF: f64 = f64::NEG_INFINITY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn points(self) -> f64 {
        match self {
            Self::A => 4.0,
            Self::B => 3.0,
            Self::C => 2.0,
            Self::D => 1.0,
            Self::F => 0.0,
        }
    }

    pub fn from_gpa(gpa: f64) -> Self {
        if gpa >= 3.5 {
            Self::A
        } else if gpa >= 2.5 {
            Self::B
        } else if gpa >= 1.5 {
            Self::C
        } else if gpa >= 0.5 {
            Self::D
        } else {
            Self::F
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradedMetric {
    AnnualReturn,
    SharpeRatio,
    SortinoRatio,
    MaxDrawdown,
    Volatility,
    CalmarRatio,
    WinRate,
    BestMonth,
    WorstMonth,
    Alpha,
    Beta,
    AvgRecoveryDays,
}

type Band = (Grade, f64, f64);

impl GradedMetric {
    pub const ALL: [GradedMetric; 12] = [
        Self::AnnualReturn,
        Self::SharpeRatio,
        Self::SortinoRatio,
        Self::MaxDrawdown,
        Self::Volatility,
        Self::CalmarRatio,
        Self::WinRate,
        Self::BestMonth,
        Self::WorstMonth,
        Self::Alpha,
        Self::Beta,
        Self::AvgRecoveryDays,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::AnnualReturn => "Annual Return",
            Self::SharpeRatio => "Sharpe Ratio",
            Self::SortinoRatio => "Sortino Ratio",
            Self::MaxDrawdown => "Max Drawdown",
            Self::Volatility => "Volatility",
            Self::CalmarRatio => "Calmar Ratio",
            Self::WinRate => "Win Rate",
            Self::BestMonth => "Best Month",
            Self::WorstMonth => "Worst Month",
            Self::Alpha => "Alpha",
            Self::Beta => "Beta",
            Self::AvgRecoveryDays => "Avg Recovery Days",
        }
    }

    /// Weight in the overall GPA.
    pub fn weight(self) -> f64 {
        match self {
            Self::SharpeRatio => 0.25,
            Self::Alpha => 0.20,
            Self::MaxDrawdown => 0.15,
            Self::AnnualReturn => 0.15,
            Self::SortinoRatio => 0.10,
            Self::CalmarRatio => 0.05,
            Self::Volatility => 0.05,
            Self::WinRate => 0.03,
            Self::Beta => 0.02,
            Self::BestMonth | Self::WorstMonth | Self::AvgRecoveryDays => 0.005,
        }
    }

    pub fn ranges(self) -> &'static str {
        match self {
            Self::AnnualReturn => "A: >12%, B: 8-12%, C: 4-8%, D: 0-4%, F: <0%",
            Self::SharpeRatio => "A: >1.0, B: 0.5-1.0, C: 0.2-0.5, D: 0-0.2, F: <0",
            Self::SortinoRatio => "A: >1.5, B: 0.9-1.5, C: 0.5-0.9, D: 0.2-0.5, F: <0.2",
            Self::MaxDrawdown => "A: >-15%, B: -15% to -25%, C: -25% to -35%, D: -35% to -50%, F: <-50%",
            Self::Volatility => "A: <12%, B: 12-16%, C: 16-20%, D: 20-25%, F: >25%",
            Self::CalmarRatio => "A: >1.0, B: 0.5-1.0, C: 0.25-0.5, D: 0.1-0.25, F: <0.1",
            Self::WinRate => "A: >60%, B: 55-60%, C: 50-55%, D: 45-50%, F: <45%",
            Self::BestMonth => "A: >12%, B: 8-12%, C: 4-8%, D: 1-4%, F: <1%",
            Self::WorstMonth => "A: >-8%, B: -8% to -12%, C: -12% to -16%, D: -16% to -20%, F: <-20%",
            Self::Alpha => "A: >2%, B: 0.5-2%, C: -0.5% to 0.5%, D: -2% to -0.5%, F: <-2%",
            Self::Beta => "A: 0.85-1.15, B: 0.7-0.85 or 1.15-1.3, C: 0.5-0.7 or 1.3-1.5, D: 0.3-0.5 or 1.5-1.7, F: <0.3 or >1.7",
            Self::AvgRecoveryDays => "A: <120 days, B: 120-240 days, C: 240-365 days, D: 365-540 days, F: >540 days",
        }
    }

    fn bands(self) -> &'static [Band] {
        use Grade::*;
        match self {
            Self::AnnualReturn => &[(A, 0.12, INF), (B, 0.08, 0.12), (C, 0.04, 0.08), (D, 0.0, 0.04)],
            Self::SharpeRatio => &[(A, 1.0, INF), (B, 0.5, 1.0), (C, 0.2, 0.5), (D, 0.0, 0.2)],
            Self::SortinoRatio => &[(A, 1.5, INF), (B, 0.9, 1.5), (C, 0.5, 0.9), (D, 0.2, 0.5)],
            Self::MaxDrawdown => &[(A, -0.15, INF), (B, -0.25, -0.15), (C, -0.35, -0.25), (D, -0.50, -0.35)],
            Self::Volatility => &[(A, NEG_INF, 0.12), (B, 0.12, 0.16), (C, 0.16, 0.20), (D, 0.20, 0.25)],
            Self::CalmarRatio => &[(A, 1.0, INF), (B, 0.5, 1.0), (C, 0.25, 0.5), (D, 0.1, 0.25)],
            Self::WinRate => &[(A, 0.60, INF), (B, 0.55, 0.60), (C, 0.50, 0.55), (D, 0.45, 0.50)],
            Self::BestMonth => &[(A, 0.12, INF), (B, 0.08, 0.12), (C, 0.04, 0.08), (D, 0.01, 0.04)],
            Self::WorstMonth => &[(A, -0.08, INF), (B, -0.12, -0.08), (C, -0.16, -0.12), (D, -0.20, -0.16)],
            Self::Alpha => &[(A, 0.02, INF), (B, 0.005, 0.02), (C, -0.005, 0.005), (D, -0.02, -0.005)],
            // Symmetric around a market beta of 1.0.
            Self::Beta => &[
                (A, 0.85, 1.15),
                (B, 0.7, 0.85),
                (B, 1.15, 1.3),
                (C, 0.5, 0.7),
                (C, 1.3, 1.5),
                (D, 0.3, 0.5),
                (D, 1.5, 1.7),
            ],
            Self::AvgRecoveryDays => &[(A, NEG_INF, 120.0), (B, 120.0, 240.0), (C, 240.0, 365.0), (D, 365.0, 540.0)],
        }
    }

    /// Anything outside the A-D bands, including NaN, grades F.
    pub fn grade(self, value: f64) -> Grade {
        self.bands()
            .iter()
            .find(|(_, low, high)| *low <= value && value < *high)
            .map(|(g, _, _)| *g)
            .unwrap_or(Grade::F)
    }
}

/// Values fed to the report card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradingInputs {
    pub metrics: PortfolioMetrics,
    pub best_month: f64,
    pub worst_month: f64,
    pub avg_recovery_days: f64,
}

impl GradingInputs {
    pub fn from_returns(
        returns: &ReturnSeries,
        benchmark: Option<&ReturnSeries>,
        risk_free_rate: f64,
    ) -> Result<Self> {
        let metrics = compute_metrics(returns, benchmark, risk_free_rate)?;
        let months = monthly_returns(returns);
        let best_month = months.iter().map(|m| m.value).fold(NEG_INF, f64::max);
        let worst_month = months.iter().map(|m| m.value).fold(INF, f64::min);
        Ok(Self {
            metrics,
            best_month: if best_month.is_finite() { best_month } else { 0.0 },
            worst_month: if worst_month.is_finite() { worst_month } else { 0.0 },
            avg_recovery_days: average_recovery_days(returns),
        })
    }

    /// Missing alpha grades as 0 and missing beta as 1.
    pub fn value(&self, metric: GradedMetric) -> f64 {
        let m = &self.metrics;
        match metric {
            GradedMetric::AnnualReturn => m.annualized_return,
            GradedMetric::SharpeRatio => m.sharpe,
            GradedMetric::SortinoRatio => m.sortino,
            GradedMetric::MaxDrawdown => m.max_drawdown,
            GradedMetric::Volatility => m.annualized_volatility,
            GradedMetric::CalmarRatio => m.calmar,
            GradedMetric::WinRate => m.win_rate,
            GradedMetric::BestMonth => self.best_month,
            GradedMetric::WorstMonth => self.worst_month,
            GradedMetric::Alpha => m.alpha.unwrap_or(0.0),
            GradedMetric::Beta => m.beta.unwrap_or(1.0),
            GradedMetric::AvgRecoveryDays => self.avg_recovery_days,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeEntry {
    pub metric: GradedMetric,
    pub value: f64,
    pub grade: Grade,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioReportCard {
    pub entries: Vec<GradeEntry>,
    pub overall: Grade,
    pub gpa: f64,
}

/// Weighted GPA over the graded entries, mapped back to a letter.
pub fn overall_grade(entries: &[(GradedMetric, Grade)]) -> (Grade, f64) {
    let (sum, total) = entries.iter().fold((0.0, 0.0), |(s, t), (m, g)| {
        (s + g.points() * m.weight(), t + m.weight())
    });
    let gpa = if total > 0.0 { sum / total } else { 2.0 };
    (Grade::from_gpa(gpa), gpa)
}

pub fn report_card(inputs: &GradingInputs) -> PortfolioReportCard {
    let entries: Vec<GradeEntry> = GradedMetric::ALL
        .iter()
        .map(|m| {
            let value = inputs.value(*m);
            GradeEntry {
                metric: *m,
                value,
                grade: m.grade(value),
            }
        })
        .collect();
    let pairs: Vec<(GradedMetric, Grade)> = entries.iter().map(|e| (e.metric, e.grade)).collect();
    let (overall, gpa) = overall_grade(&pairs);
    PortfolioReportCard {
        entries,
        overall,
        gpa,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankRating {
    Excellent,
    Good,
    Average,
    BelowAverage,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRanking {
    /// Percent of benchmarks whose Sharpe ratio the portfolio strictly exceeds.
    pub percentile: f64,
    pub benchmarks_beaten: usize,
    pub total_benchmarks: usize,
    pub rating: RankRating,
}

pub fn rank_against_benchmarks(portfolio_sharpe: f64, benchmark_sharpes: &[f64]) -> Option<BenchmarkRanking> {
    if benchmark_sharpes.is_empty() {
        return None;
    }
    let beaten = benchmark_sharpes
        .iter()
        .filter(|s| portfolio_sharpe > **s)
        .count();
    let percentile = beaten as f64 / benchmark_sharpes.len() as f64 * 100.0;
    let rating = if percentile >= 80.0 {
        RankRating::Excellent
    } else if percentile >= 60.0 {
        RankRating::Good
    } else if percentile >= 40.0 {
        RankRating::Average
    } else {
        RankRating::BelowAverage
    };
    Some(BenchmarkRanking {
        percentile,
        benchmarks_beaten: beaten,
        total_benchmarks: benchmark_sharpes.len(),
        rating,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    pub metric: String,
    pub portfolio: f64,
    pub benchmark: f64,
    pub portfolio_better: bool,
}

/// Side-by-side comparison. Drawdown is better when closer to zero, volatility
/// when lower, everything else when higher.
pub fn compare_to_benchmark(
    portfolio: &PortfolioMetrics,
    benchmark: &PortfolioMetrics,
) -> Vec<MetricComparison> {
    let rows: [(&str, f64, f64, bool); 7] = [
        ("Annual Return", portfolio.annualized_return, benchmark.annualized_return, true),
        ("Sharpe Ratio", portfolio.sharpe, benchmark.sharpe, true),
        ("Sortino Ratio", portfolio.sortino, benchmark.sortino, true),
        ("Max Drawdown", portfolio.max_drawdown, benchmark.max_drawdown, true),
        ("Volatility", portfolio.annualized_volatility, benchmark.annualized_volatility, false),
        ("Calmar Ratio", portfolio.calmar, benchmark.calmar, true),
        ("Total Return", portfolio.total_return, benchmark.total_return, true),
    ];
    rows.into_iter()
        .map(|(metric, p, b, higher_better)| MetricComparison {
            metric: metric.to_string(),
            portfolio: p,
            benchmark: b,
            portfolio_better: if higher_better { p > b } else { p < b },
        })
        .collect()
}

const TECH: [&str; 4] = ["QQQ", "XLK", "VGT", "SOXX"];
const SMALL_CAP: [&str; 3] = ["IWM", "VB", "IJR"];
const INTERNATIONAL: [&str; 5] = ["VT", "VXUS", "EFA", "VEA", "IEFA"];
const BONDS: [&str; 5] = ["AGG", "BND", "TLT", "IEF", "SHY"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkSuggestion {
    pub symbol: String,
    pub reason: String,
}

/// Benchmarks relevant to the holdings. SPY is always first.
pub fn smart_benchmarks<S: AsRef<str>>(tickers: &[S]) -> Vec<BenchmarkSuggestion> {
    let holds_any = |group: &[&str]| tickers.iter().any(|t| group.contains(&t.as_ref()));
    let mut out = vec![BenchmarkSuggestion {
        symbol: "SPY".to_string(),
        reason: "Core US large cap benchmark".to_string(),
    }];
    let candidates: [(&[&str], &str, &str); 4] = [
        (&TECH, "QQQ", "Tech exposure warrants Nasdaq comparison"),
        (&SMALL_CAP, "IWM", "Small cap exposure present"),
        (&INTERNATIONAL, "VT", "International holdings present"),
        (&BONDS, "AGG", "Fixed income component"),
    ];
    for (group, symbol, reason) in candidates {
        if holds_any(group) {
            out.push(BenchmarkSuggestion {
                symbol: symbol.to_string(),
                reason: reason.to_string(),
            });
        }
    }
    out
}

/// Synthetic daily-rebalanced 60% equity / 40% bond benchmark.
pub fn sixty_forty_benchmark(equity: &PriceSeries, bonds: &PriceSeries) -> ReturnSeries {
    let matrix = PriceMatrix::from_series(&[equity.clone(), bonds.clone()]);
    let weights = Weights::from_pairs([
        (equity.symbol().to_string(), 0.6),
        (bonds.symbol().to_string(), 0.4),
    ]);
    crate::metrics::compute_returns(&matrix, &weights)
}
