//! I/O helpers and conversions to the `image` crate types.
//!
//! - `load_rgb_image`: read a PNG/JPEG/etc. into an `RgbImage`.
//! - `view_rgb`: borrow an `RgbImage` as the pipeline's input view.
//! - `rgb_buffer_to_image` / `gray_to_image` / `mask_to_image`: convert
//!   pipeline buffers for saving or annotation.
//! - `write_json_file`: pretty-print a serializable value to disk.

use super::{ImageF32, Mask, RgbBuffer, RgbU8};
use image::{GrayImage, Luma, RgbImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert to 8-bit RGB.
pub fn load_rgb_image(path: &Path) -> Result<RgbImage, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    Ok(img)
}

/// Save an `RgbImage`, creating parent directories as needed.
pub fn save_rgb_image(img: &RgbImage, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    img.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Borrow a decoded `RgbImage` as the detector's input view.
pub fn view_rgb(img: &RgbImage) -> RgbU8<'_> {
    RgbU8 {
        w: img.width() as usize,
        h: img.height() as usize,
        stride: 3 * img.width() as usize,
        data: img.as_raw(),
    }
}

/// Convert an owned pipeline RGB buffer into an `RgbImage`.
pub fn rgb_buffer_to_image(buffer: &RgbBuffer) -> RgbImage {
    RgbImage::from_raw(buffer.w as u32, buffer.h as u32, buffer.data.clone())
        .expect("buffer dimensions match data length")
}

/// Convert a 0–255 scale float image into an 8-bit grayscale image.
pub fn gray_to_image(image: &ImageF32) -> GrayImage {
    let mut out = GrayImage::new(image.w as u32, image.h as u32);
    for y in 0..image.h {
        for x in 0..image.w {
            let v = image.get(x, y).clamp(0.0, 255.0);
            out.put_pixel(x as u32, y as u32, Luma([v as u8]));
        }
    }
    out
}

/// Convert a binary mask into an 8-bit grayscale image.
pub fn mask_to_image(mask: &Mask) -> GrayImage {
    GrayImage::from_raw(mask.w as u32, mask.h as u32, mask.data.clone())
        .expect("mask dimensions match data length")
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
