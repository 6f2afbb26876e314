//! Configuration loading for latency-hypothesis.
//!
//! Supports loading configuration from TOML files, with sensible defaults
//! for all settings.

use anyhow::{bail, Context, Result};
use latency_hypothesis_core::stats::{DistributionKind, PercentileMethod};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration for latency-hypothesis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings for statistical hypothesis testing.
    pub hypothesis: HypothesisConfig,
    /// Which protocols are compared.
    pub protocols: ProtocolConfig,
    /// Which scenarios are analysed.
    pub analysis: AnalysisConfig,
    /// Which reports are produced.
    pub output: OutputConfig,
}

/// Configuration for statistical hypothesis testing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HypothesisConfig {
    /// Confidence level for statistical tests (e.g., 0.95 for 95% confidence).
    pub confidence_level: f64,
    /// Source of p-values: exact distributions or normal approximations.
    pub distribution: DistributionKind,
    /// Percentile convention applied to every group of a run.
    pub percentile_method: PercentileMethod,
}

/// The two protocols under comparison, as named in the results files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    pub group_a: String,
    pub group_b: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Scenarios to analyse, in report order. Empty means every scenario in
    /// the file.
    pub scenarios: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Print the LaTeX table after the terminal report.
    pub latex: bool,
    /// Write the JSON analysis document.
    pub json: bool,
    /// Color terminal output.
    pub colors: bool,
}

impl Default for HypothesisConfig {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
            distribution: DistributionKind::default(),
            percentile_method: PercentileMethod::default(),
        }
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            group_a: "didcomm".to_string(),
            group_b: "openid4vc".to_string(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            scenarios: vec![
                "issue".to_string(),
                "present".to_string(),
                "selective-disclose".to_string(),
            ],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            latex: true,
            json: true,
            colors: true,
        }
    }
}

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = ".latency-hypothesis.toml";

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from the default file (`.latency-hypothesis.toml`) or use defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be parsed.
    pub fn load_or_default() -> Result<Config> {
        let path = Path::new(DEFAULT_CONFIG_FILE);

        if path.exists() {
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from `path`.
    ///
    /// A missing file is only tolerated for the default file name; an
    /// explicitly named file must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Config> {
        if path == Path::new(DEFAULT_CONFIG_FILE) {
            Self::load_or_default()
        } else {
            Self::load(path)
        }
    }

    /// Check values that serde cannot.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        let level = self.hypothesis.confidence_level;
        if !(level > 0.0 && level < 1.0) {
            bail!(
                "confidence_level must be between 0 and 1 (exclusive), got {}",
                level
            );
        }
        if self.protocols.group_a.trim().is_empty() || self.protocols.group_b.trim().is_empty() {
            bail!("protocol names must not be empty");
        }
        if self
            .protocols
            .group_a
            .eq_ignore_ascii_case(&self.protocols.group_b)
        {
            bail!(
                "cannot compare protocol '{}' with itself",
                self.protocols.group_a
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.hypothesis.confidence_level, 0.95);
        assert_eq!(config.hypothesis.distribution, DistributionKind::Exact);
        assert_eq!(
            config.hypothesis.percentile_method,
            PercentileMethod::Interpolated
        );
        assert_eq!(config.protocols.group_a, "didcomm");
        assert_eq!(config.protocols.group_b, "openid4vc");
        assert_eq!(
            config.analysis.scenarios,
            vec!["issue", "present", "selective-disclose"]
        );
        assert!(config.output.latex);
        assert!(config.output.json);
        assert!(config.output.colors);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_config() {
        let toml_content = r#"
[hypothesis]
confidence_level = 0.99
distribution = "approximate"

[output]
latex = false
"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();

        // Overridden values
        assert_eq!(config.hypothesis.confidence_level, 0.99);
        assert_eq!(config.hypothesis.distribution, DistributionKind::Approximate);
        assert!(!config.output.latex);

        // Default values
        assert_eq!(
            config.hypothesis.percentile_method,
            PercentileMethod::Interpolated
        );
        assert!(config.output.json);
        assert_eq!(config.protocols.group_a, "didcomm");
    }

    #[test]
    fn test_load_full_config() {
        let toml_content = r#"
[hypothesis]
confidence_level = 0.9
distribution = "exact"
percentile_method = "inclusive-rank"

[protocols]
group_a = "grpc"
group_b = "rest"

[analysis]
scenarios = []

[output]
latex = false
json = false
colors = false
"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.hypothesis.confidence_level, 0.9);
        assert_eq!(config.hypothesis.distribution, DistributionKind::Exact);
        assert_eq!(
            config.hypothesis.percentile_method,
            PercentileMethod::InclusiveRank
        );
        assert_eq!(config.protocols.group_a, "grpc");
        assert_eq!(config.protocols.group_b, "rest");
        assert!(config.analysis.scenarios.is_empty());
        assert!(!config.output.latex);
        assert!(!config.output.json);
        assert!(!config.output.colors);
    }

    #[test]
    fn test_load_unknown_distribution() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[hypothesis]\ndistribution = \"bootstrap\"\n")
            .unwrap();

        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_explicit_missing_file() {
        let result = Config::load_from(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"this is not valid toml {{{{").unwrap();

        let result = Config::load(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_no_file() {
        // Either loads a local .latency-hypothesis.toml or returns defaults
        let config = Config::load_or_default();
        assert!(config.is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.hypothesis.confidence_level = 1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.protocols.group_b = "DIDComm".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("itself"));

        let mut config = Config::default();
        config.protocols.group_a = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut config = Config::default();
        config.hypothesis.percentile_method = PercentileMethod::InclusiveRank;
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(
            config.hypothesis.confidence_level,
            parsed.hypothesis.confidence_level
        );
        assert_eq!(
            parsed.hypothesis.percentile_method,
            PercentileMethod::InclusiveRank
        );
        assert_eq!(config.analysis.scenarios, parsed.analysis.scenarios);
        assert_eq!(config.protocols.group_b, parsed.protocols.group_b);
    }
}
