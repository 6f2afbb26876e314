//! Per-file analysis driver.
//!
//! Extracts the two protocol groups of every selected scenario, hands them to
//! the [`Comparator`] and collects the results. A scenario that cannot be
//! compared is recorded with its error; the other scenarios still run.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use rayon::prelude::*;

use latency_hypothesis_core::report::{FileAnalysis, ProtocolSummary, ScenarioAnalysis};
use latency_hypothesis_core::stats::{compute_statistics_with, Comparator};

use crate::config::Config;
use crate::input::{BenchmarkFile, ANALYSIS_FILE_PREFIX};

/// Compares protocol A against protocol B across the scenarios of a file.
#[derive(Debug, Clone)]
pub struct Analyzer {
    comparator: Comparator,
    protocol_a: String,
    protocol_b: String,
    /// Empty means every scenario present in the file.
    scenarios: Vec<String>,
}

impl Analyzer {
    pub fn new(
        comparator: Comparator,
        protocol_a: impl Into<String>,
        protocol_b: impl Into<String>,
        scenarios: Vec<String>,
    ) -> Self {
        Self {
            comparator,
            protocol_a: protocol_a.into(),
            protocol_b: protocol_b.into(),
            scenarios,
        }
    }

    /// Build an analyzer from a validated configuration.
    pub fn from_config(config: &Config) -> Self {
        let comparator = Comparator::new(config.hypothesis.distribution.provider())
            .with_percentile_method(config.hypothesis.percentile_method)
            .with_confidence_level(config.hypothesis.confidence_level);
        Self::new(
            comparator,
            config.protocols.group_a.as_str(),
            config.protocols.group_b.as_str(),
            config.analysis.scenarios.clone(),
        )
    }

    pub fn comparator(&self) -> &Comparator {
        &self.comparator
    }

    /// Scenarios of `file` to analyse, in report order.
    fn selected_scenarios<'a>(&'a self, file: &'a BenchmarkFile) -> Vec<&'a str> {
        if self.scenarios.is_empty() {
            return file.scenario_names();
        }
        self.scenarios
            .iter()
            .map(String::as_str)
            .filter(|name| {
                let present = file.has_scenario(name);
                if !present {
                    tracing::debug!(scenario = *name, "scenario not in results file, skipping");
                }
                present
            })
            .collect()
    }

    /// Analyse every selected scenario of `file`.
    pub fn analyze(&self, file: &BenchmarkFile, source: &str) -> FileAnalysis {
        let names = self.selected_scenarios(file);
        tracing::debug!(source, scenarios = names.len(), "analyzing results file");

        let scenarios = names
            .par_iter()
            .map(|name| self.analyze_scenario(file, name))
            .collect();

        FileAnalysis {
            source: source.to_string(),
            timestamp: file.timestamp.clone(),
            config: file.config.clone(),
            scenarios,
        }
    }

    fn analyze_scenario(&self, file: &BenchmarkFile, scenario: &str) -> ScenarioAnalysis {
        let method = self.comparator.percentile_method();
        let group_a = non_empty(file.latencies(scenario, &self.protocol_a));
        let group_b = non_empty(file.latencies(scenario, &self.protocol_b));

        let protocols = [(&self.protocol_a, group_a), (&self.protocol_b, group_b)]
            .into_iter()
            .filter_map(|(name, samples)| {
                samples.map(|samples| ProtocolSummary {
                    protocol: name.clone(),
                    stats: compute_statistics_with(samples, method),
                })
            })
            .collect();

        let outcome = match (group_a, group_b) {
            (Some(a), Some(b)) => self
                .comparator
                .compare(a, b, &self.protocol_a, &self.protocol_b)
                .map_err(|e| e.to_string()),
            (None, _) => Err(missing(&self.protocol_a)),
            (_, None) => Err(missing(&self.protocol_b)),
        };

        let (comparison, error) = match outcome {
            Ok(record) => (Some(record), None),
            Err(error) => {
                tracing::warn!(scenario, %error, "comparison skipped");
                (None, Some(error))
            }
        };

        ScenarioAnalysis {
            scenario: scenario.to_string(),
            protocols,
            comparison,
            error,
        }
    }
}

/// `statistical-analysis-<%Y-%m-%dT%H-%M-%S>.json` next to the first input
/// file.
pub fn default_output_path<Tz>(first_input: &Path, now: &DateTime<Tz>) -> PathBuf
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let dir = first_input.parent().unwrap_or_else(|| Path::new(""));
    dir.join(format!(
        "{}{}.json",
        ANALYSIS_FILE_PREFIX,
        now.format("%Y-%m-%dT%H-%M-%S")
    ))
}

fn non_empty(samples: Option<&[f64]>) -> Option<&[f64]> {
    samples.filter(|s| !s.is_empty())
}

fn missing(protocol: &str) -> String {
    format!("no successful samples for protocol '{}'", protocol)
}
