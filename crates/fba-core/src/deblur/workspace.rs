use ndarray::Array2;
use num_complex::Complex64;
use num_traits::Zero;

use crate::consts::{COLOR_CHANNEL_COUNT, EPSILON, U8_SCALE};
use crate::frame::RgbaFrame;

use super::blocks::{mirror_coord, BlockOrigin};
use super::spectrum::Fft2d;
use super::weights::FrequencyWeighting;

/// Reusable per-block buffers: one workspace serves every block a worker
/// processes, so nothing block-sized is allocated inside the block loop.
pub struct BlockWorkspace {
    block_size: usize,
    fft: Fft2d,
    /// Real patch channels; hold the reconstructed block after `finish`.
    patch: Vec<Array2<f64>>,
    spectra: Vec<Array2<Complex64>>,
    weights: Array2<f64>,
    scratch: Array2<f64>,
    accum: Vec<Array2<Complex64>>,
    norm: Array2<f64>,
    /// Largest log weight seen per bin; `accum` and `norm` are scaled by
    /// `exp(-max_log)`.
    max_log: Array2<f64>,
}

impl BlockWorkspace {
    pub fn new(block_size: usize) -> Self {
        let n = block_size;
        Self {
            block_size,
            fft: Fft2d::new(n),
            patch: vec![Array2::zeros((n, n)); COLOR_CHANNEL_COUNT],
            spectra: vec![Array2::zeros((n, n)); COLOR_CHANNEL_COUNT],
            weights: Array2::zeros((n, n)),
            scratch: Array2::zeros((n, n)),
            accum: vec![Array2::zeros((n, n)); COLOR_CHANNEL_COUNT],
            norm: Array2::zeros((n, n)),
            max_log: Array2::from_elem((n, n), f64::NEG_INFINITY),
        }
    }

    /// Run one block to completion over every frame and return the
    /// reconstructed color channels (not yet windowed).
    pub fn process_block(
        &mut self,
        frames: &[RgbaFrame],
        origin: BlockOrigin,
        weighting: &FrequencyWeighting,
    ) -> &[Array2<f64>] {
        self.reset();
        for frame in frames {
            self.accumulate_frame(frame, origin, weighting);
        }
        self.finish()
    }

    /// Clear the Fourier accumulators for a new block.
    pub fn reset(&mut self) {
        for channel in &mut self.accum {
            channel.fill(Complex64::zero());
        }
        self.norm.fill(f64::zero());
        self.max_log.fill(f64::NEG_INFINITY);
    }

    /// Fold one frame's weighted spectrum into the block accumulators.
    pub fn accumulate_frame(
        &mut self,
        frame: &RgbaFrame,
        origin: BlockOrigin,
        weighting: &FrequencyWeighting,
    ) {
        self.extract_patch(frame, origin);

        for (patch, spectrum) in self.patch.iter().zip(self.spectra.iter_mut()) {
            self.fft.forward(patch, spectrum);
        }

        weighting.log_weights(&self.spectra, &mut self.weights, &mut self.scratch);
        self.rescale_to_running_max();

        for (accum, spectrum) in self.accum.iter_mut().zip(self.spectra.iter()) {
            ndarray::Zip::from(accum)
                .and(spectrum)
                .and(&self.weights)
                .for_each(|a, &c, &w| *a += c * w);
        }
        self.norm += &self.weights;
    }

    /// Turn the current log weights into linear weights relative to the
    /// per-bin maximum, shrinking what is already accumulated whenever this
    /// frame raises that maximum.
    fn rescale_to_running_max(&mut self) {
        let n = self.block_size;
        for row in 0..n {
            for col in 0..n {
                let log_w = self.weights[[row, col]];
                let max = self.max_log[[row, col]];
                self.weights[[row, col]] = if log_w == f64::NEG_INFINITY {
                    0.0
                } else if log_w > max {
                    let shrink = (max - log_w).exp();
                    for accum in &mut self.accum {
                        accum[[row, col]] *= shrink;
                    }
                    self.norm[[row, col]] *= shrink;
                    self.max_log[[row, col]] = log_w;
                    1.0
                } else {
                    (log_w - max).exp()
                };
            }
        }
    }

    /// Copy the block's color channels out of `frame`, mirroring past the
    /// right and bottom edges and scaling samples to [0, 1].
    pub fn extract_patch(&mut self, frame: &RgbaFrame, origin: BlockOrigin) {
        let (h, w) = (frame.height(), frame.width());
        let n = self.block_size;

        for yy in 0..n {
            let imy = mirror_coord(origin.y + yy, h);
            for xx in 0..n {
                let imx = mirror_coord(origin.x + xx, w);
                for (c, patch) in self.patch.iter_mut().enumerate() {
                    patch[[yy, xx]] = frame.data[[imy, imx, c]] as f64 / U8_SCALE;
                }
            }
        }
    }

    /// Weighted spectrum of the current patch channels (after `accumulate_frame`).
    pub fn spectra(&self) -> &[Array2<Complex64>] {
        &self.spectra
    }

    /// Current accumulated weight normaliser.
    pub fn normalizer(&self) -> &Array2<f64> {
        &self.norm
    }

    /// Normalize the accumulated spectra and transform back to pixels.
    pub fn finish(&mut self) -> &[Array2<f64>] {
        for (accum, patch) in self.accum.iter_mut().zip(self.patch.iter_mut()) {
            ndarray::Zip::from(&mut *accum)
                .and(&self.norm)
                .for_each(|a, &n| *a /= n + EPSILON);
            self.fft.inverse_real(accum, patch);
        }
        &self.patch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deblur::params::{DerivedParams, FbaParams};

    fn setup(block_size: usize, w: usize, h: usize) -> (BlockWorkspace, FrequencyWeighting) {
        let params = FbaParams {
            block_size,
            ..Default::default()
        };
        let derived = DerivedParams::new(&params, w, h);
        (
            BlockWorkspace::new(block_size),
            FrequencyWeighting::new(&derived),
        )
    }

    #[test]
    fn patch_is_mirrored_past_edges() {
        let frame = RgbaFrame::new(ndarray::Array3::from_shape_fn((4, 4, 4), |(r, c, _)| {
            (r * 4 + c) as u8
        }));
        let (mut ws, _) = setup(4, 4, 4);
        ws.extract_patch(&frame, BlockOrigin { x: 2, y: 0 });
        // Column 4 mirrors to 2, column 5 to 1.
        assert!((ws.patch[0][[0, 2]] - 2.0 / 255.0).abs() < 1e-12);
        assert!((ws.patch[0][[0, 3]] - 1.0 / 255.0).abs() < 1e-12);
    }

    #[test]
    fn single_frame_block_round_trips() {
        let frame = RgbaFrame::new(ndarray::Array3::from_shape_fn((8, 8, 4), |(r, c, ch)| {
            ((r * 31 + c * 17 + ch * 5) % 256) as u8
        }));
        let (mut ws, weighting) = setup(8, 8, 8);
        let out = ws.process_block(std::slice::from_ref(&frame), BlockOrigin { x: 0, y: 0 }, &weighting);
        for r in 0..8 {
            for c in 0..8 {
                let expected = frame.data[[r, c, 1]] as f64 / 255.0;
                assert!((out[1][[r, c]] - expected).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn normalizer_accumulates_every_frame() {
        let frame = RgbaFrame::filled(8, 8, [0, 0, 0, 255]);
        let (mut ws, weighting) = setup(8, 8, 8);
        ws.reset();
        for _ in 0..3 {
            ws.accumulate_frame(&frame, BlockOrigin { x: 0, y: 0 }, &weighting);
        }
        // Black frames: every weight sits at the floor, i.e. 1 after scaling.
        assert!(ws.normalizer().iter().all(|&v| (v - 3.0).abs() < 1e-12));
    }

    #[test]
    fn huge_exponent_keeps_weights_bounded() {
        let params = FbaParams {
            block_size: 8,
            softmax: 1000.0,
            ..Default::default()
        };
        let weighting = FrequencyWeighting::new(&DerivedParams::new(&params, 8, 8));
        let mut ws = BlockWorkspace::new(8);
        let dim = RgbaFrame::filled(8, 8, [60, 60, 60, 255]);
        let bright = RgbaFrame::filled(8, 8, [250, 250, 250, 255]);

        ws.reset();
        ws.accumulate_frame(&dim, BlockOrigin { x: 0, y: 0 }, &weighting);
        ws.accumulate_frame(&bright, BlockOrigin { x: 0, y: 0 }, &weighting);
        assert!(ws
            .normalizer()
            .iter()
            .all(|&v| v.is_finite() && (1.0..=2.0).contains(&v)));

        let out = ws.finish();
        // The brighter DC term dominates completely.
        assert!((out[0][[3, 3]] - 250.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn zero_weights_contribute_nothing() {
        let params = FbaParams {
            block_size: 8,
            noise_sigma: 0.0,
            ..Default::default()
        };
        let weighting = FrequencyWeighting::new(&DerivedParams::new(&params, 8, 8));
        let mut ws = BlockWorkspace::new(8);
        let black = RgbaFrame::filled(8, 8, [0, 0, 0, 255]);

        let out = ws.process_block(std::slice::from_ref(&black), BlockOrigin { x: 0, y: 0 }, &weighting);
        assert!(out.iter().all(|c| c.iter().all(|&v| v == 0.0)));
    }
}
