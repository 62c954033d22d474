use crate::cli::SourceArgs;
use crate::commands::resolve_config;
use anyhow::{Context, Result};

pub fn handle_show_config(sources: &SourceArgs) -> Result<()> {
    let config = resolve_config(sources)?;
    let rendered = config
        .to_toml_string()
        .context("Failed to serialize configuration")?;
    print!("{}", rendered);
    Ok(())
}
