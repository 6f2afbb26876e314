use std::io::{self, Write};

use colored::{ColoredString, Colorize};

use super::{
    significance_marker, FileAnalysis, ReportError, Reporter, ScenarioAnalysis,
};
use crate::stats::{ComparisonRecord, Side, StatisticsRecord};

const RULE_WIDTH: usize = 70;
const TABLE_WIDTH: usize = 110;

/// A reporter that prints per-protocol statistics, the hypothesis tests and
/// a closing summary table to the terminal.
#[derive(Debug, Clone, Default)]
pub struct TerminalReporter {
    /// Whether to use colors in output (defaults to true).
    use_colors: bool,
}

impl TerminalReporter {
    /// Create a new terminal reporter with default settings.
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    /// Create a terminal reporter with color output disabled.
    pub fn without_colors() -> Self {
        Self { use_colors: false }
    }

    /// Format a latency in milliseconds to a human-readable string.
    fn format_time(ms: f64) -> String {
        let abs = ms.abs();
        if abs >= 1_000.0 {
            format!("{:.3} s", ms / 1_000.0)
        } else if abs >= 1.0 || abs == 0.0 {
            format!("{:.3} ms", ms)
        } else if abs >= 0.001 {
            format!("{:.3} us", ms * 1_000.0)
        } else {
            format!("{:.3} ns", ms * 1_000_000.0)
        }
    }

    /// Format a latency with standard deviation.
    fn format_time_with_sd(stats: &StatisticsRecord) -> String {
        format!(
            "{} (+/- {})",
            Self::format_time(stats.mean),
            Self::format_time(stats.sd)
        )
    }

    /// Format the relative difference of group A against group B.
    fn format_change(percentage_difference: Option<f64>) -> String {
        match percentage_difference {
            Some(pct) if pct > 0.0 => format!("+{:.2}%", pct),
            Some(pct) if pct < 0.0 => format!("-{:.2}%", pct.abs()),
            Some(_) => "0.00%".to_string(),
            None => "n/a".to_string(),
        }
    }

    fn paint(&self, text: &str, style: fn(&str) -> ColoredString) -> String {
        if self.use_colors {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Plain text of the result column.
    fn result_text(scenario: &ScenarioAnalysis) -> String {
        match &scenario.comparison {
            None => "error".to_string(),
            Some(comparison) => match comparison.winner {
                Some(Side::GroupA) => format!("{} faster", comparison.name_a),
                Some(Side::GroupB) => format!("{} faster", comparison.name_b),
                None => "inconclusive".to_string(),
            },
        }
    }

    /// Format the result column with appropriate coloring.
    fn format_result(&self, scenario: &ScenarioAnalysis) -> String {
        let text = Self::result_text(scenario);
        match &scenario.comparison {
            None => self.paint(&text, |s| s.red()),
            Some(comparison) if comparison.winner.is_some() => {
                self.paint(&text, |s| s.green().bold())
            }
            Some(_) => self.paint(&text, |s| s.yellow()),
        }
    }

    fn print_banner(&self, writer: &mut dyn Write, analysis: &FileAnalysis) -> io::Result<()> {
        writeln!(writer)?;
        writeln!(writer, "{}", "=".repeat(RULE_WIDTH))?;
        let title = format!("Analyzing: {}", analysis.source);
        writeln!(writer, "{}", self.paint(&title, |s| s.bold()))?;
        writeln!(writer, "{}", "=".repeat(RULE_WIDTH))?;

        let config_value = |key: &str| {
            analysis
                .config
                .get(key)
                .map(|v| v.to_string())
                .unwrap_or_else(|| "N/A".to_string())
        };

        writeln!(writer)?;
        writeln!(writer, "Benchmark Configuration:")?;
        writeln!(
            writer,
            "  Timestamp: {}",
            analysis.timestamp.as_deref().unwrap_or("unknown")
        )?;
        writeln!(writer, "  Iterations: {}", config_value("iterations"))?;
        writeln!(writer, "  Warmup: {}", config_value("warmupIterations"))?;
        Ok(())
    }

    fn print_statistics(
        &self,
        writer: &mut dyn Write,
        protocol: &str,
        stats: &StatisticsRecord,
    ) -> io::Result<()> {
        writeln!(writer)?;
        let heading = format!("{} Statistics (n={}):", protocol.to_uppercase(), stats.n);
        writeln!(writer, "{}", self.paint(&heading, |s| s.bold()))?;
        writeln!(writer, "  Mean:  {:.3} ms", stats.mean)?;
        writeln!(writer, "  SD:    {:.3} ms", stats.sd)?;
        writeln!(writer, "  Min:   {:.3} ms", stats.min)?;
        writeln!(writer, "  Max:   {:.3} ms", stats.max)?;
        writeln!(writer, "  P50:   {:.3} ms", stats.p50)?;
        writeln!(writer, "  P95:   {:.3} ms", stats.p95)?;
        writeln!(writer, "  P99:   {:.3} ms", stats.p99)?;
        match stats.cv {
            Some(cv) => writeln!(writer, "  CV:    {:.1}%", cv)?,
            None => writeln!(writer, "  CV:    undefined (mean is zero)")?,
        }
        writeln!(
            writer,
            "  95% CI: [{:.3}, {:.3}] ms",
            stats.ci95_lower, stats.ci95_upper
        )?;
        Ok(())
    }

    fn print_comparison(
        &self,
        writer: &mut dyn Write,
        comparison: &ComparisonRecord,
    ) -> io::Result<()> {
        let name_a = comparison.name_a.to_uppercase();
        let name_b = comparison.name_b.to_uppercase();

        writeln!(writer)?;
        writeln!(writer, "{}", "~".repeat(50))?;
        let heading = format!("STATISTICAL COMPARISON: {} vs {}", name_a, name_b);
        writeln!(writer, "{}", self.paint(&heading, |s| s.bold()))?;
        writeln!(writer, "{}", "~".repeat(50))?;

        writeln!(writer)?;
        writeln!(writer, "Welch's t-test:")?;
        writeln!(writer, "  t = {:.4}", comparison.t)?;
        writeln!(writer, "  df = {:.2}", comparison.df)?;
        writeln!(
            writer,
            "  p = {:.2e} ({})",
            comparison.t_p_value,
            significance_marker(comparison.t_p_value)
        )?;

        writeln!(writer)?;
        writeln!(writer, "Mann-Whitney U test:")?;
        writeln!(writer, "  U = {:.2}", comparison.u)?;
        writeln!(writer, "  z = {:.4}", comparison.z)?;
        writeln!(
            writer,
            "  p = {:.2e} ({})",
            comparison.mw_p_value,
            significance_marker(comparison.mw_p_value)
        )?;

        writeln!(writer)?;
        writeln!(writer, "Cohen's d effect size:")?;
        writeln!(writer, "  d = {:.4}", comparison.cohens_d)?;
        writeln!(
            writer,
            "  Interpretation: {}",
            comparison.effect_interpretation
        )?;

        writeln!(writer)?;
        writeln!(writer, "Performance Difference:")?;
        writeln!(writer, "  Absolute: {:.3} ms", comparison.mean_difference)?;
        match comparison.percentage_difference {
            Some(pct) => {
                writeln!(writer, "  Relative: {:.1}%", pct)?;
                let direction = if pct > 0.0 { "faster" } else { "slower" };
                writeln!(
                    writer,
                    "  {} is {:.1}% {} than {}",
                    name_b,
                    pct.abs(),
                    direction,
                    name_a
                )?;
            }
            None => writeln!(writer, "  Relative: undefined ({} mean is zero)", name_b)?,
        }

        if comparison.approximate {
            let caveat = "  Note: p-values use a normal approximation and are not exact.";
            writeln!(writer, "{}", self.paint(caveat, |s| s.dimmed()))?;
        }
        Ok(())
    }

    fn print_scenario(&self, writer: &mut dyn Write, scenario: &ScenarioAnalysis) -> io::Result<()> {
        writeln!(writer)?;
        writeln!(writer, "{}", "-".repeat(50))?;
        writeln!(writer, "Scenario: {}", scenario.scenario.to_uppercase())?;
        writeln!(writer, "{}", "-".repeat(50))?;

        for summary in &scenario.protocols {
            self.print_statistics(writer, &summary.protocol, &summary.stats)?;
        }

        if let Some(comparison) = &scenario.comparison {
            self.print_comparison(writer, comparison)?;
        }
        if let Some(error) = &scenario.error {
            writeln!(writer)?;
            let line = format!("Comparison skipped: {}", error);
            writeln!(writer, "{}", self.paint(&line, |s| s.red()))?;
        }
        Ok(())
    }

    /// Print the table header.
    fn print_header(&self, writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer)?;
        let header = format!(
            "{:<24} {:>24} {:>24} {:>10} {:>10} {:>14}",
            "Scenario", "Group A", "Group B", "Change", "p-value", "Result"
        );
        writeln!(writer, "{}", self.paint(&header, |s| s.bold()))?;
        writeln!(writer, "{}", "-".repeat(TABLE_WIDTH))?;
        Ok(())
    }

    /// Print a single scenario row.
    fn print_row(&self, writer: &mut dyn Write, scenario: &ScenarioAnalysis) -> io::Result<()> {
        let name = if scenario.scenario.chars().count() > 22 {
            format!("{}...", scenario.scenario.chars().take(19).collect::<String>())
        } else {
            scenario.scenario.clone()
        };

        let (group_a, group_b, change, p_value) = match &scenario.comparison {
            Some(comparison) => (
                Self::format_time_with_sd(&comparison.stats_a),
                Self::format_time_with_sd(&comparison.stats_b),
                Self::format_change(comparison.percentage_difference),
                format!("{:.4}", comparison.t_p_value),
            ),
            None => (
                "-".to_string(),
                "-".to_string(),
                "n/a".to_string(),
                "-".to_string(),
            ),
        };

        // Pad by visible width since ANSI escape codes take no columns
        let result = self.format_result(scenario);
        let result_padding = 14_usize.saturating_sub(Self::result_text(scenario).chars().count());

        writeln!(
            writer,
            "{:<24} {:>24} {:>24} {:>10} {:>10} {:>width_result$}{}",
            name,
            group_a,
            group_b,
            change,
            p_value,
            "",
            result,
            width_result = result_padding,
        )?;
        Ok(())
    }

    /// Print the summary footer.
    fn print_summary(&self, writer: &mut dyn Write, analyses: &[FileAnalysis]) -> io::Result<()> {
        let mut significant = 0;
        let mut inconclusive = 0;
        let mut failed = 0;

        for scenario in analyses.iter().flat_map(|a| &a.scenarios) {
            match &scenario.comparison {
                Some(comparison) if comparison.winner.is_some() => significant += 1,
                Some(_) => inconclusive += 1,
                None => failed += 1,
            }
        }

        writeln!(writer)?;
        writeln!(writer, "{}", "-".repeat(TABLE_WIDTH))?;
        write!(writer, "{} ", self.paint("Summary:", |s| s.bold()))?;

        let significant_text = format!("{} significant", significant);
        let inconclusive_text = format!("{} inconclusive", inconclusive);
        let failed_text = format!("{} failed", failed);
        writeln!(
            writer,
            "{}, {}, {}",
            self.paint(&significant_text, |s| s.green()),
            self.paint(&inconclusive_text, |s| s.yellow()),
            self.paint(&failed_text, |s| s.red())
        )?;
        writeln!(writer)?;
        Ok(())
    }
}

impl Reporter for TerminalReporter {
    fn write_report(
        &self,
        writer: &mut dyn Write,
        analyses: &[FileAnalysis],
    ) -> Result<(), ReportError> {
        for analysis in analyses {
            self.print_banner(writer, analysis)?;
            for scenario in &analysis.scenarios {
                self.print_scenario(writer, scenario)?;
            }
        }

        self.print_header(writer)?;
        for scenario in analyses.iter().flat_map(|a| &a.scenarios) {
            self.print_row(writer, scenario)?;
        }
        self.print_summary(writer, analyses)?;

        Ok(())
    }
}
