//! Command-line interface for latency-hypothesis.

use crate::config::Config;
use clap::Parser;
use latency_hypothesis_core::stats::{DistributionKind, PercentileMethod};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "latency-hypothesis")]
#[command(about = "Descriptive statistics and hypothesis tests for two-protocol latency benchmarks")]
#[command(version)]
pub struct Cli {
    /// Benchmark results files (JSON)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Path to config file
    #[arg(long, default_value = ".latency-hypothesis.toml")]
    pub config: String,

    /// Confidence level for statistical tests (0.0-1.0)
    #[arg(long)]
    pub confidence_level: Option<f64>,

    /// Source of p-values: exact or approximate
    #[arg(long)]
    pub distribution: Option<DistributionKind>,

    /// Percentile convention: interpolated or inclusive-rank
    #[arg(long)]
    pub percentile_method: Option<PercentileMethod>,

    /// First protocol of the comparison
    #[arg(long)]
    pub protocol_a: Option<String>,

    /// Second protocol of the comparison
    #[arg(long)]
    pub protocol_b: Option<String>,

    /// Scenario(s) to analyse (repeatable); replaces the configured list
    #[arg(long)]
    pub scenario: Vec<String>,

    /// Skip the LaTeX table
    #[arg(long)]
    pub no_latex: bool,

    /// Skip the JSON analysis document
    #[arg(long)]
    pub no_json: bool,

    /// Where to write the JSON analysis document
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Apply CLI overrides to the configuration.
    ///
    /// CLI arguments take precedence over config file values.
    /// Only non-None optional values will override the config.
    pub fn apply_to_config(&self, config: &mut Config) {
        if let Some(confidence_level) = self.confidence_level {
            config.hypothesis.confidence_level = confidence_level;
        }

        if let Some(distribution) = self.distribution {
            config.hypothesis.distribution = distribution;
        }

        if let Some(method) = self.percentile_method {
            config.hypothesis.percentile_method = method;
        }

        if let Some(protocol_a) = &self.protocol_a {
            config.protocols.group_a = protocol_a.clone();
        }

        if let Some(protocol_b) = &self.protocol_b {
            config.protocols.group_b = protocol_b.clone();
        }

        if !self.scenario.is_empty() {
            config.analysis.scenarios = self.scenario.clone();
        }

        if self.no_latex {
            config.output.latex = false;
        }

        if self.no_json {
            config.output.json = false;
        }

        if self.no_color {
            config.output.colors = false;
        }
    }
}
