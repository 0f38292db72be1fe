use std::sync::Arc;

use ndarray::Array2;
use num_complex::Complex64;
use num_traits::Zero;
use rustfft::{Fft, FftPlanner};

/// Square 2D FFT with precomputed plans and reusable line buffers.
///
/// Forward: row-wise FFT, then column-wise FFT (unnormalized).
/// Inverse: column-wise IFFT, then row-wise IFFT, scaled by `1 / n²`.
pub struct Fft2d {
    size: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    line: Vec<Complex64>,
    scratch: Vec<Complex64>,
}

impl Fft2d {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());

        Self {
            size,
            forward,
            inverse,
            line: vec![Complex64::zero(); size],
            scratch: vec![Complex64::zero(); scratch_len],
        }
    }

    /// Forward transform of a real patch into `output`.
    pub fn forward(&mut self, input: &Array2<f64>, output: &mut Array2<Complex64>) {
        let n = self.size;

        for row in 0..n {
            for col in 0..n {
                self.line[col] = Complex64::new(input[[row, col]], 0.0);
            }
            self.forward
                .process_with_scratch(&mut self.line, &mut self.scratch);
            for col in 0..n {
                output[[row, col]] = self.line[col];
            }
        }

        self.columns(output, true);
    }

    /// Inverse transform of `spectrum` (consumed as scratch) into a real patch.
    pub fn inverse_real(&mut self, spectrum: &mut Array2<Complex64>, output: &mut Array2<f64>) {
        let n = self.size;
        self.columns(spectrum, false);

        let scale = 1.0 / (n * n) as f64;
        for row in 0..n {
            for col in 0..n {
                self.line[col] = spectrum[[row, col]];
            }
            self.inverse
                .process_with_scratch(&mut self.line, &mut self.scratch);
            for col in 0..n {
                output[[row, col]] = self.line[col].re * scale;
            }
        }
    }

    fn columns(&mut self, data: &mut Array2<Complex64>, forward: bool) {
        let n = self.size;
        let plan = if forward { &self.forward } else { &self.inverse };

        for col in 0..n {
            for row in 0..n {
                self.line[row] = data[[row, col]];
            }
            plan.process_with_scratch(&mut self.line, &mut self.scratch);
            for row in 0..n {
                data[[row, col]] = self.line[row];
            }
        }
    }
}
