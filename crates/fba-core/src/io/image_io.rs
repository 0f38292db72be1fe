use std::path::Path;

use image::{ImageFormat, Rgb};
use ndarray::Array3;

use crate::consts::RGBA_CHANNEL_COUNT;
use crate::error::{FbaError, Result};
use crate::frame::{ColorFrame, RgbaFrame};

/// Save a ColorFrame as 16-bit RGB TIFF.
pub fn save_color_tiff(color: &ColorFrame, path: &Path) -> Result<()> {
    let h = color.height();
    let w = color.width();

    let mut pixels: Vec<u16> = Vec::with_capacity(h * w * 3);
    for row in 0..h {
        for col in 0..w {
            for channel in color.channels() {
                pixels.push((channel.data[[row, col]].clamp(0.0, 1.0) * 65535.0).round() as u16);
            }
        }
    }

    let img = image::ImageBuffer::<Rgb<u16>, Vec<u16>>::from_raw(w as u32, h as u32, pixels)
        .ok_or_else(|| FbaError::InvalidInput(format!("cannot build {w}x{h} RGB16 buffer")))?;
    img.save_with_format(path, ImageFormat::Tiff)?;
    Ok(())
}

/// Save a ColorFrame as 8-bit RGB PNG.
pub fn save_color_png(color: &ColorFrame, path: &Path) -> Result<()> {
    let h = color.height();
    let w = color.width();

    let mut img = image::RgbImage::new(w as u32, h as u32);
    for row in 0..h {
        for col in 0..w {
            let [r, g, b] = color
                .channels()
                .map(|channel| (channel.data[[row, col]].clamp(0.0, 1.0) * 255.0).round() as u8);
            img.put_pixel(col as u32, row as u32, Rgb([r, g, b]));
        }
    }

    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Output format implied by the file extension (case-insensitive).
/// Only PNG and TIFF are written.
pub fn output_format(path: &Path) -> Result<ImageFormat> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("tiff" | "tif") => Ok(ImageFormat::Tiff),
        Some("png") => Ok(ImageFormat::Png),
        _ => Err(FbaError::InvalidInput(format!(
            "{}: output must end in .png, .tif or .tiff",
            path.display()
        ))),
    }
}

/// Save a ColorFrame, choosing format from file extension.
pub fn save_color_image(color: &ColorFrame, path: &Path) -> Result<()> {
    match output_format(path)? {
        ImageFormat::Png => save_color_png(color, path),
        _ => save_color_tiff(color, path),
    }
}

/// Load an image file as an 8-bit RGBA burst frame.
/// Images without alpha get an opaque alpha channel.
pub fn load_rgba(path: &Path) -> Result<RgbaFrame> {
    let img = image::open(path)?.to_rgba8();
    let (w, h) = img.dimensions();
    let data = Array3::from_shape_vec((h as usize, w as usize, RGBA_CHANNEL_COUNT), img.into_raw())
        .map_err(|e| FbaError::InvalidInput(format!("{}: {e}", path.display())))?;
    Ok(RgbaFrame::new(data))
}

/// Load a burst, in the given order.
pub fn load_burst<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<RgbaFrame>> {
    paths.iter().map(|p| load_rgba(p.as_ref())).collect()
}
