use ndarray::{s, Array2, Zip};

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{FbaError, Result};
use crate::frame::{ColorFrame, Frame};

use super::blocks::BlockOrigin;

/// Windowed overlap-add sums for a band of image rows.
///
/// A band starting at `y0` holds rows `y0..y0 + rows` of an image `width`
/// pixels wide. The full-image accumulator is the band with `y0 == 0`.
#[derive(Clone, Debug)]
pub struct OverlapAccumulator {
    y0: usize,
    color: Vec<Array2<f64>>,
    weight: Array2<f64>,
}

impl OverlapAccumulator {
    /// Accumulator covering the whole image.
    pub fn full(width: usize, height: usize) -> Self {
        Self::band(0, height, width, height)
    }

    /// Accumulator for the rows a block band starting at `y0` can touch.
    pub fn band(y0: usize, rows: usize, width: usize, image_height: usize) -> Self {
        let rows = rows.min(image_height.saturating_sub(y0));
        Self {
            y0,
            color: vec![Array2::zeros((rows, width)); COLOR_CHANNEL_COUNT],
            weight: Array2::zeros((rows, width)),
        }
    }

    pub fn width(&self) -> usize {
        self.weight.ncols()
    }

    pub fn rows(&self) -> usize {
        self.weight.nrows()
    }

    /// Add a reconstructed block, tapered by `window`, at `origin`.
    ///
    /// Pixels outside the image (the mirrored padding) are dropped here.
    pub fn add_block(&mut self, origin: BlockOrigin, patch: &[Array2<f64>], window: &Array2<f32>) {
        let n = window.nrows();
        let width = self.width();
        let row_end = self.y0 + self.rows();

        for yy in 0..n {
            let imy = origin.y + yy;
            if imy < self.y0 || imy >= row_end {
                continue;
            }
            let local_y = imy - self.y0;
            for xx in 0..n {
                let imx = origin.x + xx;
                if imx >= width {
                    break;
                }
                let wv = window[[yy, xx]] as f64;
                for (acc, channel) in self.color.iter_mut().zip(patch.iter()) {
                    acc[[local_y, imx]] += channel[[yy, xx]] * wv;
                }
                self.weight[[local_y, imx]] += wv;
            }
        }
    }

    /// Fold a band's partial sums into this accumulator.
    pub fn merge(&mut self, band: &OverlapAccumulator) {
        let start = band.y0 - self.y0;
        let end = start + band.rows();
        for (dst, src) in self.color.iter_mut().zip(band.color.iter()) {
            let mut view = dst.slice_mut(s![start..end, ..]);
            view += src;
        }
        let mut view = self.weight.slice_mut(s![start..end, ..]);
        view += &band.weight;
    }

    /// Window-weight sum at an image pixel.
    pub fn weight_at(&self, row: usize, col: usize) -> f64 {
        self.weight[[row - self.y0, col]]
    }

    /// Divide the color sums by the window weights.
    ///
    /// Fails on the first pixel whose weight sum is not positive and finite,
    /// or whose normalized value is not finite.
    pub fn normalize(self) -> Result<ColorFrame> {
        if let Some(((row, col), _)) = self
            .weight
            .indexed_iter()
            .find(|(_, norm)| !(**norm > 0.0 && norm.is_finite()))
        {
            return Err(FbaError::Reconstruction {
                row: row + self.y0,
                col,
            });
        }

        let channel = |c: usize| -> Result<Frame> {
            let data = Zip::from(&self.color[c])
                .and(&self.weight)
                .map_collect(|&sum, &norm| (sum / norm) as f32);
            let non_finite = data
                .indexed_iter()
                .find(|(_, v)| !v.is_finite())
                .map(|(idx, _)| idx);
            if let Some((row, col)) = non_finite {
                return Err(FbaError::Reconstruction {
                    row: row + self.y0,
                    col,
                });
            }
            Ok(Frame::new(data))
        };

        Ok(ColorFrame {
            red: channel(0)?,
            green: channel(1)?,
            blue: channel(2)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deblur::window::hanning_window;

    fn constant_patch(n: usize, v: f64) -> Vec<Array2<f64>> {
        vec![Array2::from_elem((n, n), v); COLOR_CHANNEL_COUNT]
    }

    #[test]
    fn padding_pixels_are_discarded() {
        let window = hanning_window(4);
        let mut acc = OverlapAccumulator::full(6, 6);
        acc.add_block(BlockOrigin { x: 4, y: 4 }, &constant_patch(4, 1.0), &window);
        let total: f64 = acc.weight.sum();
        let inside = window[[0, 0]] + window[[0, 1]] + window[[1, 0]] + window[[1, 1]];
        assert!((total - inside as f64).abs() < 1e-9);
    }

    #[test]
    fn uncovered_pixel_is_an_error() {
        let acc = OverlapAccumulator::full(3, 3);
        match acc.normalize() {
            Err(FbaError::Reconstruction { row, col }) => assert_eq!((row, col), (0, 0)),
            other => panic!("expected reconstruction error, got {other:?}"),
        }
    }

    #[test]
    fn merged_bands_equal_direct_accumulation() {
        let window = hanning_window(4);
        let patch = constant_patch(4, 0.25);
        let origins = [BlockOrigin { x: 0, y: 0 }, BlockOrigin { x: 0, y: 2 }];

        let mut direct = OverlapAccumulator::full(4, 6);
        for &o in &origins {
            direct.add_block(o, &patch, &window);
        }

        let mut merged = OverlapAccumulator::full(4, 6);
        for &o in &origins {
            let mut band = OverlapAccumulator::band(o.y, 4, 4, 6);
            band.add_block(o, &patch, &window);
            merged.merge(&band);
        }

        for r in 0..6 {
            for c in 0..4 {
                assert!((direct.weight_at(r, c) - merged.weight_at(r, c)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn non_finite_block_is_an_error() {
        let window = hanning_window(4);
        let mut acc = OverlapAccumulator::full(4, 4);
        let mut patch = constant_patch(4, 0.5);
        patch[2][[1, 2]] = f64::NAN;
        acc.add_block(BlockOrigin { x: 0, y: 0 }, &patch, &window);
        match acc.normalize() {
            Err(FbaError::Reconstruction { row, col }) => assert_eq!((row, col), (1, 2)),
            other => panic!("expected reconstruction error, got {other:?}"),
        }
    }

    #[test]
    fn normalize_recovers_constant_value() {
        let window = hanning_window(4);
        let mut acc = OverlapAccumulator::full(4, 4);
        acc.add_block(BlockOrigin { x: 0, y: 0 }, &constant_patch(4, 0.75), &window);
        let out = acc.normalize().unwrap();
        assert!(out.red.data.iter().all(|&v| (v - 0.75).abs() < 1e-6));
    }
}
