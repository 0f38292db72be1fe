use ndarray::{Array2, Axis};
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::deblur::blocks::mirror_index;

/// Normalized 1D Gaussian taps of an explicit half-width.
#[derive(Clone, Debug)]
pub struct GaussianKernel {
    taps: Vec<f64>,
}

impl GaussianKernel {
    /// `2 * radius + 1` taps with std-dev `sigma`. A zero radius (or a
    /// non-positive sigma) yields the identity kernel.
    pub fn new(sigma: f64, radius: usize) -> Self {
        if radius == 0 || sigma <= 0.0 {
            return Self { taps: vec![1.0] };
        }

        let size = 2 * radius + 1;
        let s2 = 2.0 * sigma * sigma;
        let mut taps = vec![0.0f64; size];
        let mut sum = 0.0f64;

        for (i, k) in taps.iter_mut().enumerate() {
            let x = i as f64 - radius as f64;
            *k = (-x * x / s2).exp();
            sum += *k;
        }

        for v in &mut taps {
            *v /= sum;
        }

        Self { taps }
    }

    pub fn taps(&self) -> &[f64] {
        &self.taps
    }

    pub fn is_identity(&self) -> bool {
        self.taps.len() == 1
    }
}

/// Blur `data` in place with a separable Gaussian, mirroring samples past
/// the borders (reflect-101). `tmp` must have the same shape as `data`.
pub fn gaussian_blur_in_place(data: &mut Array2<f64>, tmp: &mut Array2<f64>, kernel: &GaussianKernel) {
    if kernel.is_identity() {
        return;
    }
    convolve_rows(data, tmp, kernel.taps());
    convolve_cols(tmp, data, kernel.taps());
}

/// Blur into a freshly allocated array.
pub fn gaussian_blur_array(data: &Array2<f64>, kernel: &GaussianKernel) -> Array2<f64> {
    let mut out = data.clone();
    let mut tmp = Array2::<f64>::zeros(data.dim());
    gaussian_blur_in_place(&mut out, &mut tmp, kernel);
    out
}

fn convolve_rows(src: &Array2<f64>, dst: &mut Array2<f64>, kernel: &[f64]) {
    let (h, w) = src.dim();
    let radius = kernel.len() / 2;

    let row_pass = |row: usize, out: &mut [f64]| {
        for (col, o) in out.iter_mut().enumerate() {
            let mut sum = 0.0f64;
            for (ki, &kv) in kernel.iter().enumerate() {
                let src_col = mirror_index(col as isize + ki as isize - radius as isize, w);
                sum += src[[row, src_col]] * kv;
            }
            *o = sum;
        }
    };

    apply_by_row(dst, h * w, row_pass);
}

fn convolve_cols(src: &Array2<f64>, dst: &mut Array2<f64>, kernel: &[f64]) {
    let (h, w) = src.dim();
    let radius = kernel.len() / 2;

    let col_pass = |row: usize, out: &mut [f64]| {
        for (col, o) in out.iter_mut().enumerate() {
            let mut sum = 0.0f64;
            for (ki, &kv) in kernel.iter().enumerate() {
                let src_row = mirror_index(row as isize + ki as isize - radius as isize, h);
                sum += src[[src_row, col]] * kv;
            }
            *o = sum;
        }
    };

    apply_by_row(dst, h * w, col_pass);
}

fn apply_by_row<F>(dst: &mut Array2<f64>, pixels: usize, f: F)
where
    F: Fn(usize, &mut [f64]) + Sync,
{
    let w = dst.ncols();
    let mut line = vec![0.0f64; w];

    if pixels >= PARALLEL_PIXEL_THRESHOLD {
        dst.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each_init(
                || vec![0.0f64; w],
                |buf, (row, mut out)| {
                    f(row, buf);
                    for (o, &v) in out.iter_mut().zip(buf.iter()) {
                        *o = v;
                    }
                },
            );
    } else {
        for (row, mut out) in dst.axis_iter_mut(Axis(0)).enumerate() {
            f(row, &mut line);
            for (o, &v) in out.iter_mut().zip(line.iter()) {
                *o = v;
            }
        }
    }
}
