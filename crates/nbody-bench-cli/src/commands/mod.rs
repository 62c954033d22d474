pub mod list;
pub mod report;
pub mod show_config;

use crate::cli::SourceArgs;
use anyhow::{Context, Result};
use nbody_bench::{ConfigManager, ReportConfig};

/// Built-in defaults, then the config file, then environment, then flags
pub fn resolve_config(args: &SourceArgs) -> Result<ReportConfig> {
    let config = ConfigManager::load(args.config.as_deref())
        .context("Failed to load report configuration")?
        .with_process_env()
        .with_data_dir(args.data_dir.clone())
        .with_benchmarks_dir(args.benchmarks_dir.clone())
        .with_output_dir(args.output_dir.clone())
        .finish()
        .context("Invalid report configuration")?;
    tracing::debug!(
        "Resolved configuration: output {}, data {}, benchmarks {}",
        config.output_dir.display(),
        config.sources.nested_root.display(),
        config.sources.flat_root.display()
    );
    Ok(config)
}
