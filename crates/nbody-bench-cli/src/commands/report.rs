use crate::cli::SourceArgs;
use crate::commands::resolve_config;
use anyhow::{Context, Result};
use console::style;
use nbody_bench::runners::ReportSummary;
use nbody_bench::{ReportKind, ReportRunner};
use std::io::{self, Write};

pub fn handle_report(sources: &SourceArgs, only: &[ReportKind]) -> Result<()> {
    let config = resolve_config(sources)?;
    let output_dir = config.output_dir.clone();
    let runner = ReportRunner::new(config);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = runner
        .run(only, &mut out)
        .context("Failed to generate reports")?;

    writeln!(out)?;
    writeln!(out, "{}", summary_message(&summary, &output_dir.display().to_string()))?;
    Ok(())
}

fn summary_message(summary: &ReportSummary, output_dir: &str) -> String {
    let mut message = format!(
        "{} {} files from {} series in {}",
        style("Generated").green().bold(),
        summary.files.len(),
        summary.series,
        style(output_dir).cyan()
    );
    if !summary.skipped.is_empty() {
        let skipped: Vec<String> = summary.skipped.iter().map(|k| k.to_string()).collect();
        message.push_str(&format!(
            "\n{} {} (benchmarks of a single system)",
            style("Skipped").yellow(),
            skipped.join(", ")
        ));
    }
    message
}
