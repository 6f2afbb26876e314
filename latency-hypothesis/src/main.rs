use anyhow::{bail, Context, Result};
use clap::Parser;
use latency_hypothesis::{
    default_output_path, expand_inputs, logging, Analyzer, BenchmarkFile, Cli, Config,
    JsonReporter, LatexReporter, Reporter, TerminalReporter,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config and apply CLI overrides
    let mut config = Config::load_from(Path::new(&cli.config))?;
    cli.apply_to_config(&mut config);
    logging::init(cli.verbose, config.output.colors)?;
    config.validate().context("Invalid configuration")?;
    tracing::debug!(?config, "configuration");

    // 1. Analyze every readable results file
    let inputs = expand_inputs(&cli.files);
    let analyzer = Analyzer::from_config(&config);
    let mut analyses = Vec::new();
    for path in &inputs {
        match BenchmarkFile::load(path) {
            Ok(file) => analyses.push(analyzer.analyze(&file, &path.display().to_string())),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "skipping results file");
            }
        }
    }

    if analyses.is_empty() {
        bail!("None of the {} results file(s) could be analysed", inputs.len());
    }

    // 2. Report results
    let reporter = if config.output.colors {
        TerminalReporter::new()
    } else {
        TerminalReporter::without_colors()
    };
    reporter.report(&analyses)?;

    if config.output.latex {
        let latex = LatexReporter::default();
        for analysis in &analyses {
            println!();
            latex.report(std::slice::from_ref(analysis))?;
        }
    }

    // 3. Save the analysis document
    if config.output.json {
        let path = match &cli.output {
            Some(path) => path.clone(),
            None => default_output_path(&inputs[0], &chrono::Local::now()),
        };

        let file = File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        JsonReporter::new().write_report(&mut writer, &analyses)?;
        writer
            .flush()
            .with_context(|| format!("Failed to write {}", path.display()))?;

        tracing::info!(path = %path.display(), "analysis saved");
        println!("\nAnalysis saved to: {}", path.display());
    }

    Ok(())
}
