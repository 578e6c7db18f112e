//! Separable Gaussian smoothing ahead of edge detection.

use crate::image::{ImageF32, ImageView};

/// Normalized 1D Gaussian taps for a square kernel of side `ksize`.
///
/// Sigma follows the usual kernel-size heuristic
/// `0.3 * ((ksize - 1) * 0.5 - 1) + 0.8`. A kernel of 1 (or 0) yields the
/// identity filter.
pub fn gaussian_taps(ksize: u32) -> Vec<f32> {
    if ksize <= 1 {
        return vec![1.0];
    }
    let k = ksize as usize;
    let sigma = 0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let center = (k - 1) as f32 / 2.0;
    let denom = 2.0 * sigma * sigma;

    let mut taps: Vec<f32> = (0..k)
        .map(|i| {
            let d = i as f32 - center;
            (-d * d / denom).exp()
        })
        .collect();
    let sum: f32 = taps.iter().sum();
    for t in &mut taps {
        *t /= sum;
    }
    taps
}

/// Smooth `src` with a `ksize × ksize` Gaussian, clamping at borders.
pub fn gaussian_blur(src: &ImageF32, ksize: u32) -> ImageF32 {
    let taps = gaussian_taps(ksize);
    if taps.len() == 1 || src.w == 0 || src.h == 0 {
        return src.clone();
    }
    let radius = taps.len() / 2;

    // Horizontal pass, then vertical pass over the intermediate.
    let mut horiz = ImageF32::new(src.w, src.h);
    for y in 0..src.h {
        let row = src.row(y);
        let out = horiz.row_mut(y);
        filter_row(row, out, &taps, radius);
    }

    let mut out = ImageF32::new(src.w, src.h);
    let mut column = vec![0.0f32; src.h];
    let mut filtered = vec![0.0f32; src.h];
    for x in 0..src.w {
        for y in 0..src.h {
            column[y] = horiz.get(x, y);
        }
        filter_row(&column, &mut filtered, &taps, radius);
        for y in 0..src.h {
            out.set(x, y, filtered[y]);
        }
    }
    out
}

fn filter_row(row: &[f32], out: &mut [f32], taps: &[f32], radius: usize) {
    let upper = row.len();
    for (x, dst) in out.iter_mut().enumerate() {
        let mut acc = 0.0f32;
        for (k, &tap) in taps.iter().enumerate() {
            let offset = k as isize - radius as isize;
            let idx = clamp_index(x as isize + offset, upper);
            acc += tap * row[idx];
        }
        *dst = acc;
    }
}

fn clamp_index(idx: isize, upper: usize) -> usize {
    if upper == 0 {
        return 0;
    }
    if idx < 0 {
        0
    } else if (idx as usize) >= upper {
        upper - 1
    } else {
        idx as usize
    }
}
