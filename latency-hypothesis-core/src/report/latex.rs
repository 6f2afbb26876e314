use std::io::Write;

use super::{FileAnalysis, ReportError, Reporter, ScenarioAnalysis};

/// Renders a booktabs table with one row per scenario/protocol pair.
#[derive(Debug, Clone)]
pub struct LatexReporter {
    caption: String,
    label: String,
}

impl Default for LatexReporter {
    fn default() -> Self {
        Self {
            caption: "Protocol Performance Comparison".to_string(),
            label: "tab:protocol-comparison".to_string(),
        }
    }
}

impl LatexReporter {
    pub fn new(caption: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            label: label.into(),
        }
    }

    /// "selective-disclose" -> "Selective Disclose"
    fn scenario_title(name: &str) -> String {
        name.split(['-', '_'])
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn escape(text: &str) -> String {
        let mut escaped = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                    escaped.push('\\');
                    escaped.push(c);
                }
                _ => escaped.push(c),
            }
        }
        escaped
    }

    /// The delta column is filled on group B's row only.
    fn rows(scenario: &ScenarioAnalysis) -> Vec<String> {
        scenario
            .protocols
            .iter()
            .enumerate()
            .map(|(i, summary)| {
                let scenario_name = if i == 0 {
                    Self::escape(&Self::scenario_title(&scenario.scenario))
                } else {
                    String::new()
                };
                let delta = scenario
                    .comparison
                    .as_ref()
                    .filter(|c| c.name_b == summary.protocol)
                    .and_then(|c| c.percentage_difference)
                    .map(|pct| format!("{:.1}\\%", -pct))
                    .unwrap_or_default();
                format!(
                    "{} & {} & {:.2} & {:.2} & {:.2} & {} \\\\",
                    scenario_name,
                    Self::escape(&summary.protocol.to_uppercase()),
                    summary.stats.mean,
                    summary.stats.sd,
                    summary.stats.p95,
                    delta
                )
            })
            .collect()
    }

    /// Build the table source.
    pub fn render(&self, analyses: &[FileAnalysis]) -> String {
        let scenarios: Vec<&ScenarioAnalysis> =
            analyses.iter().flat_map(|a| &a.scenarios).collect();

        let approximate = scenarios
            .iter()
            .filter_map(|s| s.comparison.as_ref())
            .any(|c| c.approximate);
        let caption = if approximate {
            format!("{} (approximate p-values)", self.caption)
        } else {
            self.caption.clone()
        };

        let mut lines = vec![
            "\\begin{table}[htbp]".to_string(),
            "\\centering".to_string(),
            format!("\\caption{{{}}}", Self::escape(&caption)),
            format!("\\label{{{}}}", self.label),
            "\\begin{tabular}{llrrrr}".to_string(),
            "\\toprule".to_string(),
            "\\textbf{Scenario} & \\textbf{Protocol} & \\textbf{Mean (ms)} & \\textbf{SD} & \\textbf{P95} & \\textbf{$\\Delta$\\%} \\\\".to_string(),
            "\\midrule".to_string(),
        ];
        for scenario in scenarios {
            lines.extend(Self::rows(scenario));
        }
        lines.push("\\bottomrule".to_string());
        lines.push("\\end{tabular}".to_string());
        lines.push("\\end{table}".to_string());

        let mut table = lines.join("\n");
        table.push('\n');
        table
    }
}

impl Reporter for LatexReporter {
    fn write_report(
        &self,
        writer: &mut dyn Write,
        analyses: &[FileAnalysis],
    ) -> Result<(), ReportError> {
        writer.write_all(self.render(analyses).as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::{analysis, scenario};

    #[test]
    fn test_scenario_title() {
        assert_eq!(LatexReporter::scenario_title("selective-disclose"), "Selective Disclose");
        assert_eq!(LatexReporter::scenario_title("issue"), "Issue");
    }

    #[test]
    fn test_escape() {
        assert_eq!(LatexReporter::escape("p95_ms & 5%"), "p95\\_ms \\& 5\\%");
    }

    #[test]
    fn test_render_table() {
        let a = [12.0, 13.0, 11.0, 12.0];
        let b = [10.0, 11.0, 9.0, 10.0];
        let table = LatexReporter::default()
            .render(&[analysis(vec![scenario("selective-disclose", &a, &b)])]);

        assert!(table.starts_with("\\begin{table}[htbp]"));
        assert!(table.contains("\\caption{Protocol Performance Comparison (approximate p-values)}"));
        assert!(table.contains("Selective Disclose & DIDCOMM & 12.00 & 0.82 & 12.85 &  \\\\"));
        // mean difference 2 on a base of 10
        assert!(table.contains(" & OPENID4VC & 10.00 & 0.82 & 10.85 & -20.0\\% \\\\"));
        assert!(table.trim_end().ends_with("\\end{table}"));
    }

    #[test]
    fn test_write_report() {
        let mut buffer = Vec::new();
        LatexReporter::new("Custom", "tab:custom")
            .write_report(&mut buffer, &[])
            .unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("\\caption{Custom}"));
        assert!(output.contains("\\label{tab:custom}"));
    }
}
