use ndarray::Array3;

use fba_core::frame::RgbaFrame;

/// Deterministic pseudo-random texture (LCG), opaque alpha.
pub fn textured_frame(width: usize, height: usize, seed: u64) -> RgbaFrame {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut data = Array3::<u8>::zeros((height, width, 4));
    for row in 0..height {
        for col in 0..width {
            for c in 0..3 {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                data[[row, col, c]] = (state >> 56) as u8;
            }
            data[[row, col, 3]] = 255;
        }
    }
    RgbaFrame::new(data)
}

/// Smooth gradient with a little structure, identical across channels
/// except for a per-channel offset.
pub fn gradient_frame(width: usize, height: usize) -> RgbaFrame {
    let data = Array3::from_shape_fn((height, width, 4), |(row, col, c)| {
        if c == 3 {
            255
        } else {
            ((row * 3 + col * 2 + c * 40) % 256) as u8
        }
    });
    RgbaFrame::new(data)
}

/// Vertical stripes with the given period around mid-gray.
pub fn stripe_frame(width: usize, height: usize, period: usize, amplitude: f64) -> RgbaFrame {
    let data = Array3::from_shape_fn((height, width, 4), |(_, col, c)| {
        if c == 3 {
            255
        } else {
            let phase = std::f64::consts::TAU * col as f64 / period as f64;
            (128.0 + amplitude * phase.cos()).round() as u8
        }
    });
    RgbaFrame::new(data)
}

/// Sample of an input frame on the [0, 1] scale.
pub fn sample(frame: &RgbaFrame, row: usize, col: usize, channel: usize) -> f32 {
    frame.data[[row, col, channel]] as f32 / 255.0
}
