use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use fba_core::deblur::params::FbaParams;
use fba_core::deblur::Deblurrer;
use fba_core::io::image_io::load_burst;

#[derive(Args)]
pub struct InfoArgs {
    /// Burst frames to inspect
    #[arg(required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,

    /// Block size to lay out
    #[arg(long, default_value = "512")]
    pub block_size: usize,

    /// Block overlap to lay out
    #[arg(long, default_value = "0.5")]
    pub overlap: f64,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let frames = load_burst(&args.files).context("Failed to load burst")?;
    let params = FbaParams {
        block_size: args.block_size,
        block_overlap: args.overlap,
        ..Default::default()
    };

    let deblurrer =
        Deblurrer::configure(&frames, params).context("Burst cannot be deblurred as given")?;

    crate::summary::print_layout_summary(
        deblurrer.width(),
        deblurrer.height(),
        deblurrer.frame_count(),
        deblurrer.params(),
        deblurrer.derived(),
        deblurrer.block_count(),
    );

    Ok(())
}
