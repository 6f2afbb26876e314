//! Loading of benchmark results files.
//!
//! Two layouts are accepted. The real-benchmark layout stores every request:
//!
//! ```text
//! {"timestamp": "...", "config": {...},
//!  "benchmarks": {"issue": {"didcomm": {"singleClient": {"rawResults": [
//!      {"latency": 12.3, "success": true}]}}}}}
//! ```
//!
//! The legacy summary layout stores latencies directly:
//!
//! ```text
//! {"scenarios": {"issue": {"DIDComm": {"latencies": [12.3]}}}}
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while loading a results file.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid benchmark JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document has neither a `benchmarks` nor a `scenarios` object.
    #[error("Unrecognized benchmark format: expected a 'benchmarks' or 'scenarios' object")]
    UnrecognizedFormat,

    #[error("Directory path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("Invalid directory pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Failed to list directory: {0}")]
    Glob(#[from] glob::GlobError),
}

/// File name prefix of the analysis documents written next to the inputs.
pub const ANALYSIS_FILE_PREFIX: &str = "statistical-analysis-";

/// Expand `path` into the results files it names.
///
/// A directory yields its `*.json` files in sorted order, leaving out
/// analysis documents from earlier runs. Any other path is returned as is.
pub fn expand_input(path: &Path) -> Result<Vec<PathBuf>, InputError> {
    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let dir = path
        .to_str()
        .ok_or_else(|| InputError::NonUtf8Path(path.to_path_buf()))?;
    let pattern = Path::new(&glob::Pattern::escape(dir)).join("*.json");

    let mut files = Vec::new();
    for entry in glob::glob(&pattern.to_string_lossy())? {
        let file = entry?;
        let is_analysis = file
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(ANALYSIS_FILE_PREFIX));
        if file.is_file() && !is_analysis {
            files.push(file);
        }
    }
    files.sort();
    Ok(files)
}

/// Expand every input path, logging and skipping the ones that yield nothing.
pub fn expand_inputs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        match expand_input(path) {
            Ok(expanded) if expanded.is_empty() => {
                tracing::warn!(path = %path.display(), "no results files in directory");
            }
            Ok(expanded) => files.extend(expanded),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "skipping input");
            }
        }
    }
    files
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    timestamp: Option<String>,
    config: Option<serde_json::Value>,
    benchmarks: Option<BTreeMap<String, BTreeMap<String, RawProtocol>>>,
    scenarios: Option<BTreeMap<String, BTreeMap<String, LegacyProtocol>>>,
}

#[derive(Debug, Deserialize)]
struct RawProtocol {
    #[serde(rename = "singleClient")]
    single_client: Option<SingleClient>,
}

#[derive(Debug, Deserialize)]
struct SingleClient {
    #[serde(rename = "rawResults", default)]
    raw_results: Vec<RawResult>,
}

#[derive(Debug, Deserialize)]
struct RawResult {
    latency: Option<f64>,
    #[serde(default = "default_success")]
    success: bool,
}

fn default_success() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct LegacyProtocol {
    #[serde(default)]
    latencies: Vec<f64>,
}

/// Latency samples of one results file, keyed by scenario then by
/// lowercased protocol name.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkFile {
    pub timestamp: Option<String>,
    /// Benchmark configuration as recorded by the harness, `{}` if absent.
    pub config: serde_json::Value,
    pub scenarios: BTreeMap<String, BTreeMap<String, Vec<f64>>>,
}

impl BenchmarkFile {
    /// Read and parse a results file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not JSON, or matches
    /// neither layout.
    pub fn load(path: &Path) -> Result<Self, InputError> {
        let content = std::fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse a results document.
    ///
    /// Failed requests (`"success": false`) and results without a latency
    /// are dropped.
    pub fn from_json(content: &str) -> Result<Self, InputError> {
        let raw: RawDocument = serde_json::from_str(content)?;

        let mut scenarios: BTreeMap<String, BTreeMap<String, Vec<f64>>> = BTreeMap::new();
        if let Some(benchmarks) = raw.benchmarks {
            for (scenario, protocols) in benchmarks {
                let entry = scenarios.entry(scenario).or_default();
                for (protocol, data) in protocols {
                    let latencies = data
                        .single_client
                        .map(|client| {
                            client
                                .raw_results
                                .into_iter()
                                .filter(|r| r.success)
                                .filter_map(|r| r.latency)
                                .collect::<Vec<_>>()
                        })
                        .unwrap_or_default();
                    entry
                        .entry(protocol.to_lowercase())
                        .or_default()
                        .extend(latencies);
                }
            }
        } else if let Some(legacy) = raw.scenarios {
            for (scenario, protocols) in legacy {
                let entry = scenarios.entry(scenario).or_default();
                for (protocol, data) in protocols {
                    entry
                        .entry(protocol.to_lowercase())
                        .or_default()
                        .extend(data.latencies);
                }
            }
        } else {
            return Err(InputError::UnrecognizedFormat);
        }

        Ok(Self {
            timestamp: raw.timestamp,
            config: raw
                .config
                .unwrap_or_else(|| serde_json::Value::Object(Default::default())),
            scenarios,
        })
    }

    /// Successful latencies of `protocol` (matched case-insensitively) in
    /// `scenario`.
    pub fn latencies(&self, scenario: &str, protocol: &str) -> Option<&[f64]> {
        self.scenarios
            .get(scenario)?
            .get(&protocol.to_lowercase())
            .map(Vec::as_slice)
    }

    pub fn has_scenario(&self, scenario: &str) -> bool {
        self.scenarios.contains_key(scenario)
    }

    /// Scenario names, sorted.
    pub fn scenario_names(&self) -> Vec<&str> {
        self.scenarios.keys().map(String::as_str).collect()
    }
}
