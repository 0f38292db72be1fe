//! Fourier burst accumulation.
//!
//! Each block of the (mirror-padded) image is transformed for every frame,
//! the frames are averaged per frequency with weights that favour the frame
//! with the strongest Fourier magnitude there, and the blocks are blended
//! back together with a Hanning-windowed overlap-add.

pub mod blocks;
pub mod overlap;
pub mod params;
pub mod spectrum;
pub mod weights;
pub mod window;
pub mod workspace;

use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::Array2;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::consts::RGBA_CHANNEL_COUNT;
use crate::error::{FbaError, Result};
use crate::frame::{ColorFrame, RgbaFrame};
use crate::pipeline::{NoOpReporter, PipelineStage, ProgressReporter};

use blocks::{BlockGrid, BlockOrigin};
use overlap::OverlapAccumulator;
use params::{DerivedParams, Execution, FbaParams};
use weights::FrequencyWeighting;
use window::hanning_window;
use workspace::BlockWorkspace;

/// A configured burst deblurring run over a borrowed, pre-aligned stack.
pub struct Deblurrer<'a> {
    frames: &'a [RgbaFrame],
    params: FbaParams,
    derived: DerivedParams,
    grid: BlockGrid,
    window: Array2<f32>,
    weighting: FrequencyWeighting,
    execution: Execution,
    width: usize,
    height: usize,
}

impl<'a> Deblurrer<'a> {
    /// Validate the stack and parameters and precompute everything that
    /// depends only on them.
    pub fn configure(frames: &'a [RgbaFrame], params: FbaParams) -> Result<Self> {
        let (width, height) = validate_stack(frames)?;
        params.validate()?;

        let derived = DerivedParams::new(&params, width, height);
        let grid = BlockGrid::new(&derived);
        let window = hanning_window(params.block_size);
        let weighting = FrequencyWeighting::new(&derived);

        info!(
            frames = frames.len(),
            width,
            height,
            block_size = derived.block_size,
            stride = derived.stride,
            blocks = grid.block_count(),
            sigma = derived.sigma,
            min_weight = derived.min_weight,
            "Configured burst deblurring"
        );

        Ok(Self {
            frames,
            params,
            derived,
            grid,
            window,
            weighting,
            execution: Execution::default(),
            width,
            height,
        })
    }

    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    pub fn params(&self) -> &FbaParams {
        &self.params
    }

    pub fn derived(&self) -> &DerivedParams {
        &self.derived
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn block_count(&self) -> usize {
        self.grid.block_count()
    }

    /// Reconstruct the sharpened image.
    pub fn deblur(&self) -> Result<ColorFrame> {
        self.deblur_reported(&NoOpReporter)
    }

    /// Reconstruct the sharpened image, reporting one item per block.
    pub fn deblur_reported(&self, reporter: &dyn ProgressReporter) -> Result<ColorFrame> {
        reporter.begin_stage(PipelineStage::Deblurring, Some(self.block_count()));

        let accumulated = match self.execution {
            Execution::Sequential => self.accumulate_sequential(reporter)?,
            Execution::Parallel => self.accumulate_parallel(reporter)?,
        };

        reporter.finish_stage();
        let result = accumulated.normalize()?;
        info!(execution = %self.execution, "Burst deblurring complete");
        Ok(result)
    }

    fn accumulate_sequential(&self, reporter: &dyn ProgressReporter) -> Result<OverlapAccumulator> {
        let mut workspace = BlockWorkspace::new(self.derived.block_size);
        let mut accumulated = OverlapAccumulator::full(self.width, self.height);

        for (i, origin) in self.grid.origins().enumerate() {
            if reporter.is_cancelled() {
                return Err(FbaError::Cancelled);
            }
            self.add_block(&mut workspace, &mut accumulated, origin);
            reporter.advance(i + 1);
        }

        Ok(accumulated)
    }

    /// Bands are processed a pool-width at a time so at most that many
    /// partial accumulators are alive, then merged in row order.
    fn accumulate_parallel(&self, reporter: &dyn ProgressReporter) -> Result<OverlapAccumulator> {
        let rows: Vec<usize> = self.grid.rows().collect();
        let chunk = rayon::current_num_threads().max(1);
        let done = AtomicUsize::new(0);
        let mut accumulated = OverlapAccumulator::full(self.width, self.height);

        for band_rows in rows.chunks(chunk) {
            let bands: Vec<OverlapAccumulator> = band_rows
                .par_iter()
                .map_init(
                    || BlockWorkspace::new(self.derived.block_size),
                    |workspace, &y| self.accumulate_band(workspace, y, reporter, &done),
                )
                .collect::<Result<Vec<_>>>()?;

            for band in &bands {
                accumulated.merge(band);
            }
        }

        Ok(accumulated)
    }

    fn accumulate_band(
        &self,
        workspace: &mut BlockWorkspace,
        y: usize,
        reporter: &dyn ProgressReporter,
        done: &AtomicUsize,
    ) -> Result<OverlapAccumulator> {
        let mut band =
            OverlapAccumulator::band(y, self.derived.block_size, self.width, self.height);

        for x in self.grid.columns() {
            if reporter.is_cancelled() {
                return Err(FbaError::Cancelled);
            }
            self.add_block(workspace, &mut band, BlockOrigin { x, y });
            reporter.advance(done.fetch_add(1, Ordering::Relaxed) + 1);
        }

        debug!(y, "Block band reconstructed");
        Ok(band)
    }

    fn add_block(
        &self,
        workspace: &mut BlockWorkspace,
        accumulated: &mut OverlapAccumulator,
        origin: BlockOrigin,
    ) {
        let patch = workspace.process_block(self.frames, origin, &self.weighting);
        accumulated.add_block(origin, patch, &self.window);
    }
}

/// Check that the stack is non-empty, 4-channel and uniformly sized.
/// Returns the common (width, height).
fn validate_stack(frames: &[RgbaFrame]) -> Result<(usize, usize)> {
    let first = frames
        .first()
        .ok_or_else(|| FbaError::InvalidInput("frame stack is empty".into()))?;
    let (width, height) = (first.width(), first.height());
    if width == 0 || height == 0 {
        return Err(FbaError::InvalidInput(format!(
            "frames must not be empty, got {width}x{height}"
        )));
    }

    for (i, frame) in frames.iter().enumerate() {
        if frame.channels() != RGBA_CHANNEL_COUNT {
            return Err(FbaError::InvalidInput(format!(
                "frame {i} has {} channels, expected {RGBA_CHANNEL_COUNT}",
                frame.channels()
            )));
        }
        if frame.width() != width || frame.height() != height {
            return Err(FbaError::InvalidInput(format!(
                "frame {i} is {}x{}, expected {width}x{height}",
                frame.width(),
                frame.height()
            )));
        }
    }

    Ok((width, height))
}
