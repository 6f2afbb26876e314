use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stats::{ComparisonRecord, StatisticsRecord};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Descriptive statistics of one protocol within a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolSummary {
    pub protocol: String,
    pub stats: StatisticsRecord,
}

/// Everything computed for a single benchmark scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioAnalysis {
    pub scenario: String,
    pub protocols: Vec<ProtocolSummary>,
    pub comparison: Option<ComparisonRecord>,
    /// Why no comparison could be made, if one was expected.
    pub error: Option<String>,
}

/// The analysis of one benchmark results file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAnalysis {
    pub source: String,
    pub timestamp: Option<String>,
    /// Benchmark configuration as recorded in the results file.
    pub config: serde_json::Value,
    pub scenarios: Vec<ScenarioAnalysis>,
}

/// Significance bucket of a p-value, as printed in reports.
pub fn significance_marker(p_value: f64) -> &'static str {
    if p_value < 0.001 {
        "***"
    } else if p_value < 0.01 {
        "**"
    } else if p_value < 0.05 {
        "*"
    } else {
        "ns"
    }
}

pub trait Reporter: Send + Sync {
    /// Render `analyses` into `writer`.
    fn write_report(
        &self,
        writer: &mut dyn Write,
        analyses: &[FileAnalysis],
    ) -> Result<(), ReportError>;

    /// Render `analyses` to standard output.
    fn report(&self, analyses: &[FileAnalysis]) -> Result<(), ReportError> {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        self.write_report(&mut writer, analyses)
    }
}

mod json;
mod latex;
mod terminal;

pub use json::JsonReporter;
pub use latex::LatexReporter;
pub use terminal::TerminalReporter;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_significance_markers() {
        assert_eq!(significance_marker(0.0005), "***");
        assert_eq!(significance_marker(0.001), "**");
        assert_eq!(significance_marker(0.009), "**");
        assert_eq!(significance_marker(0.01), "*");
        assert_eq!(significance_marker(0.049), "*");
        assert_eq!(significance_marker(0.05), "ns");
        assert_eq!(significance_marker(0.7), "ns");
    }
}
