use anyhow::Result;
use clap::Parser;
use tracing::info;

use perftools_utils::init_logging;

mod cli;
mod demo;

use cli::Cli;

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = cli.resolve()?;
    info!(label = %config.label, seconds = config.sleep_secs, "running timer demo");

    demo::run_demo(&config, std::io::stdout())?;
    Ok(())
}
