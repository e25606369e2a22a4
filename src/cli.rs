use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use perftools_config::DemoConfig;

/// Time a short sleep and print the start/end markers and its cost.
#[derive(Debug, Parser)]
#[command(name = "perftools", version = perftools_config::VERSION)]
pub struct Cli {
    /// Timer label (printed upper-cased)
    #[arg(short, long)]
    pub label: Option<String>,

    /// How long the measured block sleeps, in seconds
    #[arg(short, long)]
    pub seconds: Option<f64>,

    /// Run without printing anything
    #[arg(short, long)]
    pub quiet: bool,

    /// TOML config file (requires the `toml-config` feature)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Defaults, then the config file, then `PERFTOOLS_*` variables, then flags.
    pub fn resolve(&self) -> Result<DemoConfig> {
        let config = self.load_file()?.merge_with_env();
        self.apply_flags(config)
    }

    #[cfg(test)]
    fn resolve_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<DemoConfig> {
        let config = self.load_file()?.merge_with_lookup(lookup);
        self.apply_flags(config)
    }

    fn load_file(&self) -> Result<DemoConfig> {
        match &self.config {
            Some(path) => DemoConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display())),
            None => Ok(DemoConfig::default()),
        }
    }

    fn apply_flags(&self, mut config: DemoConfig) -> Result<DemoConfig> {
        if let Some(label) = &self.label {
            config.label = label.clone();
        }
        if let Some(seconds) = self.seconds {
            config.sleep_secs = seconds;
        }
        if self.quiet {
            config.timer.verbose = false;
        }

        config.validate().context("invalid demo configuration")?;
        Ok(config)
    }
}
