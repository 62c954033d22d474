use anyhow::Result;

mod cli;
mod commands;
mod logging;

use cli::cli;

fn main() -> Result<()> {
    cli()
}
