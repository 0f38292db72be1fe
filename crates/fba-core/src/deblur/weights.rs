use ndarray::{Array2, Zip};
use num_complex::Complex64;

use crate::filters::gaussian_blur::{gaussian_blur_in_place, GaussianKernel};

use super::params::DerivedParams;

/// Turns a frame's per-channel block spectra into per-frequency weights.
///
/// weight = max(blur(mean |coef|), min_weight) ^ softmax
///
/// Weights are produced as `softmax * ln(weight)`; the block accumulator
/// exponentiates them relative to a per-bin running maximum, so no weight
/// ever leaves [0, 1] whatever the exponent.
#[derive(Clone, Debug)]
pub struct FrequencyWeighting {
    kernel: GaussianKernel,
    min_weight: f64,
    softmax: f64,
}

impl FrequencyWeighting {
    pub fn new(derived: &DerivedParams) -> Self {
        Self {
            kernel: GaussianKernel::new(derived.sigma, derived.kernel_radius),
            min_weight: derived.min_weight,
            softmax: derived.softmax,
        }
    }

    pub fn min_weight(&self) -> f64 {
        self.min_weight
    }

    /// Smoothed, floored weights before exponentiation.
    pub fn floored(
        &self,
        spectra: &[Array2<Complex64>],
        weights: &mut Array2<f64>,
        tmp: &mut Array2<f64>,
    ) {
        mean_magnitude(spectra, weights);
        gaussian_blur_in_place(weights, tmp, &self.kernel);
        let floor = self.min_weight;
        weights.mapv_inplace(|w| w.max(floor));
    }

    /// Log-domain accumulation weights for one frame. A zero weight (only
    /// possible with a zero noise floor) maps to negative infinity.
    pub fn log_weights(
        &self,
        spectra: &[Array2<Complex64>],
        weights: &mut Array2<f64>,
        tmp: &mut Array2<f64>,
    ) {
        self.floored(spectra, weights, tmp);
        let p = self.softmax;
        weights.mapv_inplace(|w| p * w.ln());
    }
}

/// Per-bin magnitude averaged over channels.
pub fn mean_magnitude(spectra: &[Array2<Complex64>], out: &mut Array2<f64>) {
    out.fill(0.0);
    let inv = 1.0 / spectra.len().max(1) as f64;
    for spectrum in spectra {
        Zip::from(&mut *out)
            .and(spectrum)
            .for_each(|w, c| *w += c.norm() * inv);
    }
}
