use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BLOCK_OVERLAP, DEFAULT_BLOCK_SIZE, DEFAULT_KS, DEFAULT_NOISE_SIGMA, DEFAULT_SOFTMAX,
    KERNEL_SIGMA_SPAN,
};
use crate::error::{FbaError, Result};

/// Tunable parameters of Fourier burst accumulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FbaParams {
    /// Side length of the square analysis block. Should be as small as
    /// possible while still resolving the frequency bands of interest.
    pub block_size: usize,
    /// Fraction of the block shared between neighbouring blocks, in [0, 1).
    pub block_overlap: f64,
    /// Weight exponent (>= 1). Higher = closer to a hard per-frequency max.
    pub softmax: f64,
    /// Estimated sigma of Gaussian sensor noise on the 0-1 scale.
    pub noise_sigma: f64,
    /// Divisor of the weight smoothing scale (lower = more smoothing).
    pub ks: f64,
}

impl Default for FbaParams {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            block_overlap: DEFAULT_BLOCK_OVERLAP,
            softmax: DEFAULT_SOFTMAX,
            noise_sigma: DEFAULT_NOISE_SIGMA,
            ks: DEFAULT_KS,
        }
    }
}

impl FbaParams {
    /// Check every parameter against its valid domain.
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(invalid("block_size must be greater than 0"));
        }
        if !self.block_overlap.is_finite() || !(0.0..1.0).contains(&self.block_overlap) {
            return Err(invalid(format!(
                "block_overlap must be in [0, 1), got {}",
                self.block_overlap
            )));
        }
        if !self.softmax.is_finite() || self.softmax < 1.0 {
            return Err(invalid(format!("softmax must be >= 1, got {}", self.softmax)));
        }
        if !self.noise_sigma.is_finite() || self.noise_sigma < 0.0 {
            return Err(invalid(format!(
                "noise_sigma must be >= 0, got {}",
                self.noise_sigma
            )));
        }
        if !self.ks.is_finite() || self.ks <= 0.0 {
            return Err(invalid(format!("ks must be > 0, got {}", self.ks)));
        }
        if self.stride() == 0 {
            return Err(invalid(format!(
                "block_size {} with overlap {} leaves no block stride",
                self.block_size, self.block_overlap
            )));
        }
        Ok(())
    }

    /// Distance between neighbouring block origins, in whole pixels.
    pub fn stride(&self) -> usize {
        (self.block_size as f64 * (1.0 - self.block_overlap)).floor() as usize
    }

    /// Noise floor below which frequency weights are clamped.
    pub fn min_weight(&self) -> f64 {
        self.noise_sigma * std::f64::consts::PI.sqrt() * self.block_size as f64 / 2.0
    }
}

/// How blocks are scheduled.
///
/// `Sequential` folds blocks in row-major order into one accumulator.
/// `Parallel` reconstructs each row band of blocks on the rayon pool into
/// its own partial accumulator and merges bands in row order, so the result
/// does not depend on the thread count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Execution {
    Sequential,
    #[default]
    Parallel,
}

impl std::fmt::Display for Execution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sequential => write!(f, "Sequential"),
            Self::Parallel => write!(f, "Parallel"),
        }
    }
}

/// Quantities derived once from the parameters and the frame dimensions.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivedParams {
    pub block_size: usize,
    pub stride: usize,
    /// Std-dev of the Gaussian that smooths the weight maps.
    pub sigma: f64,
    /// Half-width of the smoothing kernel, `3 * round(sigma)`.
    pub kernel_radius: usize,
    pub min_weight: f64,
    pub softmax: f64,
    pub padded_width: usize,
    pub padded_height: usize,
}

impl DerivedParams {
    /// Parameters must already be validated.
    pub fn new(params: &FbaParams, width: usize, height: usize) -> Self {
        let min_size = width.min(height).min(params.block_size);
        let sigma = min_size as f64 / params.ks;
        let kernel_radius = (KERNEL_SIGMA_SPAN * sigma.round()) as usize;
        let stride = params.stride();

        Self {
            block_size: params.block_size,
            stride,
            sigma,
            kernel_radius,
            min_weight: params.min_weight(),
            softmax: params.softmax,
            padded_width: padded_extent(width, params.block_size, stride),
            padded_height: padded_extent(height, params.block_size, stride),
        }
    }

    /// Side length of the smoothing kernel.
    pub fn kernel_size(&self) -> usize {
        2 * self.kernel_radius + 1
    }
}

/// Smallest `stride * k + block` that reaches past `extent` (never below `block`).
pub fn padded_extent(extent: usize, block: usize, stride: usize) -> usize {
    let excess = extent.saturating_sub(block);
    stride * excess.div_ceil(stride) + block
}

fn invalid(msg: impl Into<String>) -> FbaError {
    FbaError::InvalidInput(msg.into())
}
