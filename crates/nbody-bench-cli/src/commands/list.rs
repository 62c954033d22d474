use crate::cli::{OutputFormat, SourceArgs};
use crate::commands::resolve_config;
use anyhow::{Context, Result};
use nbody_bench::{load_benchmarks, LoadedBenchmarks, SourceLayout};
use serde_json::json;

pub fn handle_list(sources: &SourceArgs, format: OutputFormat) -> Result<()> {
    let config = resolve_config(sources)?;
    let loaded = load_benchmarks(&config.sources).context("Failed to load benchmarks")?;
    tracing::debug!(
        "Listing {} series from the {} layout",
        loaded.results.len(),
        layout_name(loaded.layout)
    );
    println!("{}", render_listing(&loaded, format)?);
    Ok(())
}

fn layout_name(layout: SourceLayout) -> &'static str {
    match layout {
        SourceLayout::Nested => "nested",
        SourceLayout::Flat => "flat",
    }
}

fn render_listing(loaded: &LoadedBenchmarks, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let series: Vec<_> = loaded
                .results
                .iter()
                .map(|(label, table)| json!({ "label": label, "rows": table.height() }))
                .collect();
            let listing = json!({
                "layout": layout_name(loaded.layout),
                "multiple_systems": loaded.multiple_systems(),
                "series": series,
            });
            Ok(serde_json::to_string_pretty(&listing)?)
        }
        OutputFormat::Text => {
            let mut lines = vec![format!(
                "Layout: {} ({} series)",
                layout_name(loaded.layout),
                loaded.results.len()
            )];
            lines.extend(
                loaded
                    .results
                    .iter()
                    .map(|(label, table)| format!("  {} [{} rows]", label, table.height())),
            );
            Ok(lines.join("\n"))
        }
    }
}
