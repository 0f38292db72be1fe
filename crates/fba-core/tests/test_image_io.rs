#[allow(dead_code)]
mod common;

use image::ImageFormat;
use ndarray::Array2;

use fba_core::deblur::params::{Execution, FbaParams};
use fba_core::frame::{ColorFrame, Frame};
use fba_core::error::FbaError;
use fba_core::io::image_io::{
    load_burst, load_rgba, output_format, save_color_image, save_color_png,
};
use fba_core::pipeline::config::DeblurConfig;
use fba_core::pipeline::run_deblur;

fn color_from_fn(h: usize, w: usize, f: impl Fn(usize, usize, usize) -> f32) -> ColorFrame {
    ColorFrame {
        red: Frame::new(Array2::from_shape_fn((h, w), |(r, c)| f(r, c, 0))),
        green: Frame::new(Array2::from_shape_fn((h, w), |(r, c)| f(r, c, 1))),
        blue: Frame::new(Array2::from_shape_fn((h, w), |(r, c)| f(r, c, 2))),
    }
}

#[test]
fn test_png_save_load_roundtrip() {
    let color = color_from_fn(6, 5, |r, c, ch| ((r * 5 + c) * 3 + ch) as f32 / 100.0);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.png");
    save_color_png(&color, &path).unwrap();

    let loaded = load_rgba(&path).unwrap();
    assert_eq!(loaded.width(), 5);
    assert_eq!(loaded.height(), 6);
    assert_eq!(loaded.channels(), 4);
    assert_eq!(loaded.data[[0, 0, 3]], 255);
    let expected = (color.green.data[[2, 3]] * 255.0).round() as u8;
    assert_eq!(loaded.data[[2, 3, 1]], expected);
}

#[test]
fn test_tiff_chosen_by_extension() {
    let color = color_from_fn(4, 4, |_, _, _| 0.5);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.tif");
    save_color_image(&color, &path).unwrap();

    let loaded = load_rgba(&path).unwrap();
    assert_eq!(loaded.width(), 4);
    assert!((loaded.data[[1, 1, 0]] as i32 - 128).abs() <= 1);
}

#[test]
fn test_unknown_extension_rejected() {
    let color = color_from_fn(4, 4, |_, _, _| 0.5);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.jpg");
    assert!(matches!(
        save_color_image(&color, &path),
        Err(FbaError::InvalidInput(_))
    ));
    assert!(!path.exists());
}

#[test]
fn test_output_format_ignores_case() {
    assert_eq!(output_format(std::path::Path::new("a.PNG")).unwrap(), ImageFormat::Png);
    assert_eq!(output_format(std::path::Path::new("a.Tif")).unwrap(), ImageFormat::Tiff);
    assert!(output_format(std::path::Path::new("noext")).is_err());
}

#[test]
fn test_run_deblur_rejects_bad_output_before_reading() {
    let config = DeblurConfig {
        inputs: vec![std::path::PathBuf::from("/nonexistent/frame.png")],
        output: std::path::PathBuf::from("result.bmp"),
        execution: Execution::Sequential,
        params: FbaParams::default(),
    };
    assert!(matches!(run_deblur(&config), Err(FbaError::InvalidInput(_))));
}

#[test]
fn test_to_rgba8_clamps_and_rounds() {
    let color = color_from_fn(2, 2, |r, _, _| if r == 0 { -0.5 } else { 1.5 });
    let rgba = color.to_rgba8();
    assert_eq!(rgba.data[[0, 0, 0]], 0);
    assert_eq!(rgba.data[[1, 0, 2]], 255);
    assert_eq!(rgba.data[[1, 1, 3]], 255);
}

#[test]
fn test_load_missing_file_is_error() {
    assert!(load_rgba(std::path::Path::new("/nonexistent/frame.png")).is_err());
}

#[test]
fn test_run_deblur_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let mut inputs = Vec::new();
    for i in 0..3 {
        let frame = common::textured_frame(20, 14, i);
        let color = color_from_fn(14, 20, |r, c, ch| common::sample(&frame, r, c, ch));
        let path = dir.path().join(format!("frame_{i}.png"));
        save_color_png(&color, &path).unwrap();
        inputs.push(path);
    }

    let config = DeblurConfig {
        inputs: inputs.clone(),
        output: dir.path().join("result.png"),
        execution: Execution::Parallel,
        params: FbaParams {
            block_size: 8,
            ..Default::default()
        },
    };
    let result = run_deblur(&config).unwrap();
    assert_eq!(result.width(), 20);
    assert_eq!(result.height(), 14);
    assert!(config.output.exists());

    let burst = load_burst(&inputs).unwrap();
    assert_eq!(burst.len(), 3);
}
