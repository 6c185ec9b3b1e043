//! Pass-image encoding
//!
//! Rendered passes come back from the GPU as tightly packed RGBA bytes
//! (color, normal, albedo) or scalar f32 rows (depth). This module encodes
//! them as 8/16-bit PNG or as 32-bit float EXR.

use image::ImageBuffer;
use shapeview_core::{Error, Result};
use std::path::Path;

/// Output image container format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    OpenExr,
}

impl ImageFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::OpenExr => "exr",
        }
    }
}

/// Bits per channel for integer output; ignored for EXR
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorDepth {
    Eight,
    Sixteen,
}

fn save_err(e: image::ImageError) -> Error {
    Error::Image(e.to_string())
}

fn buffer_err() -> Error {
    Error::InvalidData("pixel buffer does not match image dimensions".to_string())
}

/// Encode an RGBA byte image (color, normal or albedo pass)
pub fn write_color(
    path: &Path,
    rgba: &[u8],
    width: u32,
    height: u32,
    format: ImageFormat,
    depth: ColorDepth,
) -> Result<()> {
    if rgba.len() != (width * height * 4) as usize {
        return Err(buffer_err());
    }

    match (format, depth) {
        (ImageFormat::Png, ColorDepth::Eight) => {
            let img: ImageBuffer<image::Rgba<u8>, _> =
                ImageBuffer::from_raw(width, height, rgba.to_vec()).ok_or_else(buffer_err)?;
            img.save(path).map_err(save_err)
        }
        (ImageFormat::Png, ColorDepth::Sixteen) => {
            let widened: Vec<u16> = rgba.iter().map(|&v| v as u16 * 257).collect();
            let img: ImageBuffer<image::Rgba<u16>, _> =
                ImageBuffer::from_raw(width, height, widened).ok_or_else(buffer_err)?;
            img.save(path).map_err(save_err)
        }
        (ImageFormat::OpenExr, _) => {
            let floats: Vec<f32> = rgba.iter().map(|&v| v as f32 / 255.0).collect();
            let img: ImageBuffer<image::Rgba<f32>, _> =
                ImageBuffer::from_raw(width, height, floats).ok_or_else(buffer_err)?;
            img.save(path).map_err(save_err)
        }
    }
}

/// Encode a scalar f32 image (the depth pass).
///
/// PNG output expects values in `[0, 1]`; anything above saturates to
/// white. EXR output stores the raw values.
pub fn write_gray(
    path: &Path,
    values: &[f32],
    width: u32,
    height: u32,
    format: ImageFormat,
    depth: ColorDepth,
) -> Result<()> {
    if values.len() != (width * height) as usize {
        return Err(buffer_err());
    }

    match (format, depth) {
        (ImageFormat::Png, ColorDepth::Eight) => {
            let bytes: Vec<u8> = values
                .iter()
                .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
                .collect();
            let img: ImageBuffer<image::Luma<u8>, _> =
                ImageBuffer::from_raw(width, height, bytes).ok_or_else(buffer_err)?;
            img.save(path).map_err(save_err)
        }
        (ImageFormat::Png, ColorDepth::Sixteen) => {
            let words: Vec<u16> = values
                .iter()
                .map(|&v| (v.clamp(0.0, 1.0) * 65535.0).round() as u16)
                .collect();
            let img: ImageBuffer<image::Luma<u16>, _> =
                ImageBuffer::from_raw(width, height, words).ok_or_else(buffer_err)?;
            img.save(path).map_err(save_err)
        }
        (ImageFormat::OpenExr, _) => {
            // The EXR encoder takes RGB float images, so the scalar channel
            // is replicated.
            let floats: Vec<f32> = values.iter().flat_map(|&v| [v, v, v]).collect();
            let img: ImageBuffer<image::Rgb<f32>, _> =
                ImageBuffer::from_raw(width, height, floats).ok_or_else(buffer_err)?;
            img.save(path).map_err(save_err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn test_write_color_png_roundtrip() {
        let path = PathBuf::from("test_write_color.png");
        let rgba: Vec<u8> = (0..2 * 2 * 4).map(|i| i as u8 * 10).collect();
        write_color(&path, &rgba, 2, 2, ImageFormat::Png, ColorDepth::Eight).unwrap();

        let loaded = image::open(&path).unwrap().into_rgba8();
        assert_eq!(loaded.as_raw(), &rgba);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_write_color_png_sixteen_bit() {
        let path = PathBuf::from("test_write_color16.png");
        let rgba = vec![255u8, 0, 128, 255];
        write_color(&path, &rgba, 1, 1, ImageFormat::Png, ColorDepth::Sixteen).unwrap();

        let loaded = image::open(&path).unwrap().into_rgba16();
        assert_eq!(loaded.get_pixel(0, 0).0[0], 65535);
        assert_eq!(loaded.get_pixel(0, 0).0[1], 0);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_write_gray_png_saturates() {
        let path = PathBuf::from("test_write_gray.png");
        let values = vec![0.0f32, 0.5, 1.0, 25.0];
        write_gray(&path, &values, 2, 2, ImageFormat::Png, ColorDepth::Eight).unwrap();

        let loaded = image::open(&path).unwrap().into_luma8();
        assert_eq!(loaded.get_pixel(0, 0).0[0], 0);
        assert_eq!(loaded.get_pixel(1, 0).0[0], 128);
        assert_eq!(loaded.get_pixel(0, 1).0[0], 255);
        // Out-of-range background depth saturates to white
        assert_eq!(loaded.get_pixel(1, 1).0[0], 255);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_write_gray_exr_keeps_raw_values() {
        let path = PathBuf::from("test_write_gray.exr");
        let values = vec![0.25f32, 4.5, 1e4, 0.0];
        write_gray(&path, &values, 2, 2, ImageFormat::OpenExr, ColorDepth::Eight).unwrap();

        let loaded = image::open(&path).unwrap().into_rgb32f();
        assert!((loaded.get_pixel(0, 0).0[0] - 0.25).abs() < 1e-6);
        assert!((loaded.get_pixel(1, 0).0[0] - 4.5).abs() < 1e-6);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_write_color_rejects_bad_length() {
        let path = PathBuf::from("test_write_badlen.png");
        let result = write_color(&path, &[0u8; 5], 2, 2, ImageFormat::Png, ColorDepth::Eight);
        assert!(result.is_err());
        assert!(!path.exists());
    }
}
