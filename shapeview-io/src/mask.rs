//! Silhouette mask extraction
//!
//! Rendered color views carry object coverage in their alpha channel
//! (background is transparent). The mask pass walks a dataset tree, pulls
//! the last channel out of every two-digit view image and writes it next to
//! the source as an 8-bit grayscale `*_mask.png`.

use image::{DynamicImage, GrayImage, ImageBuffer};
use shapeview_core::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Whether a filename is a rendered view image (`NN.png`, two ASCII digits)
pub fn is_view_image_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() == 6
        && bytes[0].is_ascii_digit()
        && bytes[1].is_ascii_digit()
        && name.ends_with(".png")
}

/// Recursively collect view images under `root`, sorted for deterministic
/// processing order. Errors if nothing matches.
pub fn find_view_images(root: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| Error::InvalidData(e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if is_view_image_name(name) {
                paths.push(entry.into_path());
            }
        }
    }

    if paths.is_empty() {
        return Err(Error::InvalidData(format!(
            "directory {:?} does not include any rendered view images",
            root
        )));
    }

    paths.sort();
    Ok(paths)
}

/// Mask filename for a source image: the last underscore-delimited segment
/// of the stem is replaced by `mask`; a stem without underscores keeps its
/// whole name (`00.png` -> `00_mask.png`).
pub fn mask_path_for(src: &Path) -> PathBuf {
    let stem = src
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let base = match stem.rsplit_once('_') {
        Some((prefix, _)) => prefix,
        None => stem,
    };
    src.with_file_name(format!("{}_mask.png", base))
}

fn last_channel(img: DynamicImage) -> GrayImage {
    match img {
        DynamicImage::ImageLuma8(gray) => gray,
        DynamicImage::ImageLumaA8(la) => {
            ImageBuffer::from_fn(la.width(), la.height(), |x, y| {
                image::Luma([la.get_pixel(x, y).0[1]])
            })
        }
        DynamicImage::ImageRgb8(rgb) => {
            ImageBuffer::from_fn(rgb.width(), rgb.height(), |x, y| {
                image::Luma([rgb.get_pixel(x, y).0[2]])
            })
        }
        DynamicImage::ImageRgba8(rgba) => {
            ImageBuffer::from_fn(rgba.width(), rgba.height(), |x, y| {
                image::Luma([rgba.get_pixel(x, y).0[3]])
            })
        }
        other => {
            let rgba = other.into_rgba8();
            ImageBuffer::from_fn(rgba.width(), rgba.height(), |x, y| {
                image::Luma([rgba.get_pixel(x, y).0[3]])
            })
        }
    }
}

/// Extract the silhouette mask of one view image
pub fn extract_mask(src: &Path) -> Result<GrayImage> {
    let img = image::open(src).map_err(|e| Error::Image(e.to_string()))?;
    Ok(last_channel(img))
}

/// Walk `root`, extract a mask for every view image and write it next to
/// the source. Any decode or write error aborts the run. Returns the number
/// of masks written.
pub fn create_masks(root: &Path) -> Result<usize> {
    let paths = find_view_images(root)?;
    log::info!("found {} view images under {:?}", paths.len(), root);

    for path in &paths {
        let mask = extract_mask(path)?;
        let out = mask_path_for(path);
        mask.save(&out).map_err(|e| Error::Image(e.to_string()))?;
        log::debug!("wrote {:?}", out);
    }

    Ok(paths.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_rgba(path: &Path, width: u32, height: u32) -> Vec<u8> {
        let mut rgba = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                rgba.extend_from_slice(&[x as u8 * 40, y as u8 * 40, 0, (x + y * width) as u8 * 16]);
            }
        }
        let img: ImageBuffer<image::Rgba<u8>, _> =
            ImageBuffer::from_raw(width, height, rgba.clone()).unwrap();
        img.save(path).unwrap();
        rgba
    }

    #[test]
    fn test_is_view_image_name() {
        assert!(is_view_image_name("00.png"));
        assert!(is_view_image_name("23.png"));
        assert!(!is_view_image_name("0.png"));
        assert!(!is_view_image_name("000.png"));
        assert!(!is_view_image_name("ab.png"));
        assert!(!is_view_image_name("00.jpg"));
        assert!(!is_view_image_name("00_depth.png"));
    }

    #[test]
    fn test_mask_path_naming() {
        assert_eq!(
            mask_path_for(Path::new("/data/rendering/00.png")),
            Path::new("/data/rendering/00_mask.png")
        );
        assert_eq!(
            mask_path_for(Path::new("/data/rendering/07_depth.png")),
            Path::new("/data/rendering/07_mask.png")
        );
        // Underscores in parent directories must not affect the result
        assert_eq!(
            mask_path_for(Path::new("/data_v2/my_renders/00.png")),
            Path::new("/data_v2/my_renders/00_mask.png")
        );
    }

    #[test]
    fn test_mask_equals_alpha_channel() {
        let dir = Path::new("test_mask_alpha/sub/rendering");
        fs::create_dir_all(dir).unwrap();
        let src = dir.join("00.png");
        let rgba = write_rgba(&src, 4, 4);

        let count = create_masks(Path::new("test_mask_alpha")).unwrap();
        assert_eq!(count, 1);

        let mask = image::open(dir.join("00_mask.png")).unwrap().into_luma8();
        let alpha: Vec<u8> = rgba.chunks(4).map(|px| px[3]).collect();
        assert_eq!(mask.as_raw(), &alpha);

        let _ = fs::remove_dir_all("test_mask_alpha");
    }

    #[test]
    fn test_empty_tree_errors_and_writes_nothing() {
        let dir = Path::new("test_mask_empty/rendering");
        fs::create_dir_all(dir).unwrap();
        // Near-miss names that must not match
        fs::write(dir.join("0.png"), b"junk").unwrap();
        fs::write(dir.join("abc.png"), b"junk").unwrap();

        assert!(create_masks(Path::new("test_mask_empty")).is_err());
        let leftover: Vec<_> = WalkDir::new("test_mask_empty")
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.file_name().to_str().is_some_and(|n| n.ends_with("_mask.png")))
            .collect();
        assert!(leftover.is_empty());

        let _ = fs::remove_dir_all("test_mask_empty");
    }

    #[test]
    fn test_multiple_views_all_masked() {
        let dir = Path::new("test_mask_many/rendering");
        fs::create_dir_all(dir).unwrap();
        for i in 0..3 {
            write_rgba(&dir.join(format!("{:02}.png", i)), 2, 2);
        }

        let count = create_masks(Path::new("test_mask_many")).unwrap();
        assert_eq!(count, 3);
        for i in 0..3 {
            assert!(dir.join(format!("{:02}_mask.png", i)).exists());
        }

        let _ = fs::remove_dir_all("test_mask_many");
    }

    #[test]
    fn test_undecodable_image_aborts() {
        let dir = Path::new("test_mask_bad/rendering");
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join("00.png"), b"not a png").unwrap();

        assert!(create_masks(Path::new("test_mask_bad")).is_err());

        let _ = fs::remove_dir_all("test_mask_bad");
    }
}
