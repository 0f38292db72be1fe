use ndarray::{Array2, Array3};

use crate::consts::RGBA_CHANNEL_COUNT;

/// A single channel of float image data.
/// Pixel values are f32, nominally in [0.0, 1.0].
#[derive(Clone, Debug)]
pub struct Frame {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<f32>,
}

impl Frame {
    pub fn new(data: Array2<f32>) -> Self {
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }
}

/// Color image composed of separate channel frames.
#[derive(Clone, Debug)]
pub struct ColorFrame {
    pub red: Frame,
    pub green: Frame,
    pub blue: Frame,
}

impl ColorFrame {
    pub fn width(&self) -> usize {
        self.red.width()
    }

    pub fn height(&self) -> usize {
        self.red.height()
    }

    /// Channels in R, G, B order.
    pub fn channels(&self) -> [&Frame; 3] {
        [&self.red, &self.green, &self.blue]
    }

    /// Requantize to interleaved 8-bit RGBA with an opaque alpha channel.
    pub fn to_rgba8(&self) -> RgbaFrame {
        let (h, w) = (self.height(), self.width());
        let mut data = Array3::<u8>::zeros((h, w, RGBA_CHANNEL_COUNT));
        for row in 0..h {
            for col in 0..w {
                for (c, channel) in self.channels().iter().enumerate() {
                    data[[row, col, c]] = quantize_u8(channel.data[[row, col]]);
                }
                data[[row, col, 3]] = u8::MAX;
            }
        }
        RgbaFrame { data }
    }
}

/// One 8-bit burst frame, shape = (height, width, channels).
///
/// Burst deblurring expects four interleaved channels: three color channels
/// followed by an alpha channel that is carried but never read.
#[derive(Clone, Debug)]
pub struct RgbaFrame {
    pub data: Array3<u8>,
}

impl RgbaFrame {
    pub fn new(data: Array3<u8>) -> Self {
        Self { data }
    }

    /// Frame where every pixel has the same RGBA value.
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Self {
        let mut data = Array3::<u8>::zeros((height, width, RGBA_CHANNEL_COUNT));
        for mut px in data.lanes_mut(ndarray::Axis(2)) {
            for (dst, &src) in px.iter_mut().zip(rgba.iter()) {
                *dst = src;
            }
        }
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }
}

fn quantize_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
