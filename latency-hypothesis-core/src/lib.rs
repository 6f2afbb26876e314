//! Core types and utilities for latency-hypothesis.
//!
//! This crate holds the statistics engine (descriptive statistics, Welch's
//! t-test, Mann-Whitney U, Cohen's d) and the reporters that render its
//! results. It performs no I/O beyond writing reports.

pub mod report;
pub mod stats;

// Re-export main types for convenience
pub use report::{
    FileAnalysis, JsonReporter, LatexReporter, ProtocolSummary, ReportError, Reporter,
    ScenarioAnalysis, TerminalReporter,
};
pub use stats::{
    Comparator, ComparisonRecord, DistributionKind, DistributionProvider, PercentileMethod, Side,
    StatisticalTest, StatisticsRecord, StatsError,
};
