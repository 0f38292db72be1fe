/// Small constant added to the Hanning window and to the Fourier normaliser
/// so neither ever divides by an exact zero.
pub const EPSILON: f64 = 1e-7;

/// Number of channels in an input burst frame (R, G, B, A).
pub const RGBA_CHANNEL_COUNT: usize = 4;

/// Number of colour channels the deblurring operates on (alpha is ignored).
pub const COLOR_CHANNEL_COUNT: usize = 3;

/// Scale of 8-bit input samples.
pub const U8_SCALE: f64 = 255.0;

/// Default analysis block side length in pixels.
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Default fraction of the block shared between neighbouring blocks.
pub const DEFAULT_BLOCK_OVERLAP: f64 = 0.5;

/// Default weight exponent. Higher values approach a hard per-frequency max.
pub const DEFAULT_SOFTMAX: f64 = 11.0;

/// Default sensor noise estimate on the 0-1 intensity scale.
pub const DEFAULT_NOISE_SIGMA: f64 = 3e-2;

/// Default divisor of the weight smoothing scale (lower = more smoothing).
pub const DEFAULT_KS: f64 = 30.0;

/// Gaussian kernel half-width in units of the rounded sigma.
pub const KERNEL_SIGMA_SPAN: f64 = 3.0;

/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;
