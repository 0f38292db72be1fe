use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use fba_core::deblur::params::{Execution, FbaParams};
use fba_core::pipeline::config::DeblurConfig;
use fba_core::pipeline::run_deblur_reported;
use tracing::info;

use crate::progress::BarReporter;

#[derive(Args)]
pub struct DeblurArgs {
    /// Pre-aligned burst frames, in stack order
    #[arg(required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Side length of the square analysis block in pixels
    #[arg(long, default_value = "512")]
    pub block_size: usize,

    /// Fraction of the block shared between neighbouring blocks
    #[arg(long, default_value = "0.5")]
    pub overlap: f64,

    /// Weight exponent; higher picks the sharpest frame more aggressively
    #[arg(long, default_value = "11")]
    pub softmax: f64,

    /// Estimated sensor noise sigma on the 0-1 scale
    #[arg(long, default_value = "0.03")]
    pub noise_sigma: f64,

    /// Divisor of the weight smoothing scale (lower = more smoothing)
    #[arg(long, default_value = "30")]
    pub ks: f64,

    /// Process blocks one at a time instead of on the thread pool
    #[arg(long)]
    pub sequential: bool,

    /// Output file path (PNG or TIFF)
    #[arg(short, long, default_value = "deblurred.tiff")]
    pub output: PathBuf,
}

pub fn run(args: &DeblurArgs) -> Result<()> {
    let config = build_config_from_args(args);
    execute(&config)
}

/// Print the summary, run the pipeline with a progress bar, report the result.
pub fn execute(config: &DeblurConfig) -> Result<()> {
    crate::summary::print_deblur_summary(config);

    let reporter = Arc::new(BarReporter::new());
    let result = run_deblur_reported(config, reporter)
        .with_context(|| format!("Failed to deblur {} frames", config.inputs.len()))?;
    info!(
        frames = config.inputs.len(),
        width = result.width(),
        height = result.height(),
        execution = %config.execution,
        "Deblur finished"
    );

    println!(
        "\nDeblurred {}x{} image saved to {}",
        result.width(),
        result.height(),
        config.output.display()
    );
    Ok(())
}

fn build_config_from_args(args: &DeblurArgs) -> DeblurConfig {
    DeblurConfig {
        inputs: args.files.clone(),
        output: args.output.clone(),
        execution: if args.sequential {
            Execution::Sequential
        } else {
            Execution::Parallel
        },
        params: FbaParams {
            block_size: args.block_size,
            block_overlap: args.overlap,
            softmax: args.softmax,
            noise_sigma: args.noise_sigma,
            ks: args.ks,
        },
    }
}
