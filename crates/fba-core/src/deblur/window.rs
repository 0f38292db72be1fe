use ndarray::Array2;

use crate::consts::EPSILON;

/// Separable 2D Hanning window used to taper blocks during overlap-add.
///
/// `w(x, y) = hann(x) * hann(y) + EPSILON`, so corner weights never reach an
/// exact zero. A one-pixel block has the single weight `1 + EPSILON`.
pub fn hanning_window(block_size: usize) -> Array2<f32> {
    let profile = hann_profile(block_size);
    Array2::from_shape_fn((block_size, block_size), |(row, col)| {
        (profile[row] * profile[col] + EPSILON) as f32
    })
}

fn hann_profile(block_size: usize) -> Vec<f64> {
    if block_size == 1 {
        return vec![1.0];
    }
    let denom = (block_size - 1) as f64;
    (0..block_size)
        .map(|i| 0.5 * (1.0 - (std::f64::consts::TAU * i as f64 / denom).cos()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_values_in_unit_range() {
        let w = hanning_window(16);
        assert!(w.iter().all(|&v| v > 0.0 && v <= 1.0 + 1e-6));
    }

    #[test]
    fn window_peaks_at_center() {
        let w = hanning_window(33);
        let center = w[[16, 16]];
        assert!((center - 1.0).abs() < 1e-5);
        assert!(w.iter().all(|&v| v <= center));
    }

    #[test]
    fn window_is_symmetric() {
        let w = hanning_window(12);
        for r in 0..12 {
            for c in 0..12 {
                assert!((w[[r, c]] - w[[11 - r, c]]).abs() < 1e-6);
                assert!((w[[r, c]] - w[[c, r]]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn corners_carry_epsilon_only() {
        let w = hanning_window(8);
        assert!(w[[0, 0]] > 0.0);
        assert!((w[[0, 0]] as f64 - EPSILON).abs() < 1e-9);
    }

    #[test]
    fn single_pixel_window() {
        let w = hanning_window(1);
        assert_eq!(w.dim(), (1, 1));
        assert!(w[[0, 0]] >= 1.0);
    }
}
