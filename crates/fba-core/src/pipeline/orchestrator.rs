use std::sync::Arc;

use tracing::info;

use crate::deblur::Deblurrer;
use crate::error::Result;
use crate::frame::ColorFrame;
use crate::io::image_io::{load_rgba, output_format, save_color_image};

use super::config::DeblurConfig;
use super::types::{NoOpReporter, PipelineStage, ProgressReporter};

/// Load the burst, deblur it and write the result.
pub fn run_deblur(config: &DeblurConfig) -> Result<ColorFrame> {
    run_deblur_reported(config, Arc::new(NoOpReporter))
}

/// Run the full pipeline with a thread-safe progress reporter.
pub fn run_deblur_reported(
    config: &DeblurConfig,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<ColorFrame> {
    output_format(&config.output)?;

    let total = config.inputs.len();
    info!(total_frames = total, "Reading burst");

    reporter.begin_stage(PipelineStage::Reading, Some(total));
    let mut frames = Vec::with_capacity(total);
    for (i, path) in config.inputs.iter().enumerate() {
        frames.push(load_rgba(path)?);
        reporter.advance(i + 1);
    }
    reporter.finish_stage();

    let deblurrer =
        Deblurrer::configure(&frames, config.params.clone())?.with_execution(config.execution);
    let result = deblurrer.deblur_reported(reporter.as_ref())?;

    reporter.begin_stage(PipelineStage::Writing, None);
    save_color_image(&result, &config.output)?;
    reporter.finish_stage();
    info!(output = %config.output.display(), "Saved deblurred image");

    Ok(result)
}
