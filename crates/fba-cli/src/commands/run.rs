use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use fba_core::pipeline::config::DeblurConfig;

#[derive(Args)]
pub struct RunArgs {
    /// Deblur config file (TOML)
    #[arg(long)]
    pub config: PathBuf,

    /// Override the output path from the config
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let contents = std::fs::read_to_string(&args.config)
        .with_context(|| format!("Failed to read config {}", args.config.display()))?;
    let mut config: DeblurConfig = toml::from_str(&contents).context("Invalid deblur config")?;

    if let Some(ref output) = args.output {
        config.output = output.clone();
    }

    super::deblur::execute(&config)
}
