//! latency-hypothesis: statistical comparison of two protocols' latencies
//!
//! This library loads benchmark results files, compares the latency samples
//! of two protocols scenario by scenario, and hands the results to the
//! reporters of `latency-hypothesis-core`.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod input;
pub mod logging;

// Re-export core types for convenience
pub use latency_hypothesis_core::report::{
    FileAnalysis, JsonReporter, LatexReporter, ReportError, Reporter, ScenarioAnalysis,
    TerminalReporter,
};
pub use latency_hypothesis_core::stats::{
    Comparator, ComparisonRecord, DistributionKind, PercentileMethod, Side, StatsError,
};

// Re-export main types from this crate
pub use analysis::{default_output_path, Analyzer};
pub use cli::Cli;
pub use config::Config;
pub use input::{expand_input, expand_inputs, BenchmarkFile, InputError};
