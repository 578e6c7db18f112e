//! Keep-aspect downscaling of the input image.

use crate::image::{RgbBuffer, RgbU8};

/// Downscale `src` so its longer side equals `max_side`, preserving aspect.
///
/// Returns the working copy and the scale factor applied (always ≤1.0;
/// images already within bounds are copied unchanged with factor 1.0).
/// Sampling is bilinear with clamped borders.
pub fn resize_keep_aspect(src: &RgbU8<'_>, max_side: u32) -> (RgbBuffer, f32) {
    let max_dim = src.w.max(src.h);
    if max_dim <= max_side as usize {
        return (copy_unchanged(src), 1.0);
    }

    let scale = max_side as f32 / max_dim as f32;
    let nw = ((src.w as f32 * scale) as usize).max(1);
    let nh = ((src.h as f32 * scale) as usize).max(1);

    let inv_x = src.w as f32 / nw as f32;
    let inv_y = src.h as f32 / nh as f32;
    let mut out = RgbBuffer::new(nw, nh);
    for y in 0..nh {
        let sy = (y as f32 + 0.5) * inv_y - 0.5;
        let y0 = sy.floor().clamp(0.0, (src.h - 1) as f32) as usize;
        let y1 = (y0 + 1).min(src.h - 1);
        let fy = (sy - y0 as f32).clamp(0.0, 1.0);
        for x in 0..nw {
            let sx = (x as f32 + 0.5) * inv_x - 0.5;
            let x0 = sx.floor().clamp(0.0, (src.w - 1) as f32) as usize;
            let x1 = (x0 + 1).min(src.w - 1);
            let fx = (sx - x0 as f32).clamp(0.0, 1.0);

            let p00 = src.pixel(x0, y0);
            let p10 = src.pixel(x1, y0);
            let p01 = src.pixel(x0, y1);
            let p11 = src.pixel(x1, y1);

            let mut px = [0u8; 3];
            for c in 0..3 {
                let top = p00[c] as f32 * (1.0 - fx) + p10[c] as f32 * fx;
                let bottom = p01[c] as f32 * (1.0 - fx) + p11[c] as f32 * fx;
                px[c] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
            }
            out.set_pixel(x, y, px);
        }
    }

    (out, scale)
}

fn copy_unchanged(src: &RgbU8<'_>) -> RgbBuffer {
    let mut out = RgbBuffer::new(src.w, src.h);
    for y in 0..src.h {
        let row = &src.data[y * src.stride..y * src.stride + 3 * src.w];
        let start = 3 * y * src.w;
        out.data[start..start + 3 * src.w].copy_from_slice(row);
    }
    out
}

/// Convert an RGB working copy to grayscale on the 0–255 scale.
///
/// Uses the Rec.601 luma weights.
pub fn to_grayscale(src: &RgbBuffer) -> crate::image::ImageF32 {
    let mut out = crate::image::ImageF32::new(src.w, src.h);
    for y in 0..src.h {
        let dst = out.row_mut(y);
        for (x, px) in dst.iter_mut().enumerate() {
            let [r, g, b] = src.pixel(x, y);
            *px = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_rgb(w: usize, h: usize, value: u8) -> Vec<u8> {
        vec![value; 3 * w * h]
    }

    #[test]
    fn small_images_pass_through_with_unit_scale() {
        let data = uniform_rgb(100, 50, 128);
        let src = RgbU8 {
            w: 100,
            h: 50,
            stride: 300,
            data: &data,
        };
        let (out, scale) = resize_keep_aspect(&src, 100);
        assert_eq!(scale, 1.0);
        assert_eq!((out.w, out.h), (100, 50));
        assert_eq!(out.pixel(40, 20), [128, 128, 128]);
    }

    #[test]
    fn oversized_images_shrink_to_max_side() {
        let data = uniform_rgb(200, 100, 77);
        let src = RgbU8 {
            w: 200,
            h: 100,
            stride: 600,
            data: &data,
        };
        let (out, scale) = resize_keep_aspect(&src, 100);
        assert_eq!(scale, 0.5);
        assert_eq!((out.w, out.h), (100, 50));
        assert_eq!(out.pixel(10, 10), [77, 77, 77]);
    }

    #[test]
    fn grayscale_uses_luma_weights() {
        let mut buffer = RgbBuffer::new(2, 1);
        buffer.set_pixel(0, 0, [255, 0, 0]);
        buffer.set_pixel(1, 0, [255, 255, 255]);
        let gray = to_grayscale(&buffer);
        assert!((gray.get(0, 0) - 0.299 * 255.0).abs() < 1e-3);
        assert!((gray.get(1, 0) - 255.0).abs() < 1e-3);
    }
}
