//! Canny edge extraction: Sobel gradients, direction-aligned non-maximum
//! suppression, and two-threshold hysteresis.
//!
//! Border handling clamps in the gradient computation and ignores the
//! outermost 1-pixel frame during suppression to avoid out-of-bounds
//! neighbor lookups.

use crate::image::{ImageF32, ImageView, Mask};

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

const TAN_22_5_DEG: f32 = 0.41421356237;

/// Per-pixel gradient buffers.
pub struct Gradients {
    pub gx: ImageF32,
    pub gy: ImageF32,
    /// Euclidean magnitude per pixel: `sqrt(gx^2 + gy^2)`
    pub mag: ImageF32,
}

/// Compute Sobel gradients on a single-channel image with border clamping.
pub fn sobel_gradients(l: &ImageF32) -> Gradients {
    let w = l.w;
    let h = l.h;
    let mut gx = ImageF32::new(w, h);
    let mut gy = ImageF32::new(w, h);
    let mut mag = ImageF32::new(w, h);

    if w == 0 || h == 0 {
        return Gradients { gx, gy, mag };
    }

    for y in 0..h {
        let y_idx = [y.saturating_sub(1), y, (y + 1).min(h - 1)];
        let rows = [l.row(y_idx[0]), l.row(y_idx[1]), l.row(y_idx[2])];
        let out_gx = gx.row_mut(y);
        for x in 0..w {
            let x_idx = [x.saturating_sub(1), x, (x + 1).min(w - 1)];
            let mut sum = 0.0;
            for (ky, row) in rows.iter().enumerate() {
                let k = &SOBEL_KERNEL_X[ky];
                sum += row[x_idx[0]] * k[0] + row[x_idx[1]] * k[1] + row[x_idx[2]] * k[2];
            }
            out_gx[x] = sum;
        }
        let out_gy = gy.row_mut(y);
        for x in 0..w {
            let x_idx = [x.saturating_sub(1), x, (x + 1).min(w - 1)];
            let mut sum = 0.0;
            for (ky, row) in rows.iter().enumerate() {
                let k = &SOBEL_KERNEL_Y[ky];
                sum += row[x_idx[0]] * k[0] + row[x_idx[1]] * k[1] + row[x_idx[2]] * k[2];
            }
            out_gy[x] = sum;
        }
        let out_mag = mag.row_mut(y);
        for x in 0..w {
            let gxv = gx.get(x, y);
            let gyv = gy.get(x, y);
            out_mag[x] = (gxv * gxv + gyv * gyv).sqrt();
        }
    }

    Gradients { gx, gy, mag }
}

/// Extract a binary edge map with hysteresis thresholds `low` and `high`.
///
/// A pixel survives when its magnitude is a local maximum along the
/// quantized gradient direction and reaches `low`; ties on flat gradient
/// plateaus break toward the first of the two compared neighbors, so a
/// symmetric two-pixel ridge thins to one deterministic pixel. Survivors at
/// or above `high` seed the hysteresis pass, which then keeps every weak
/// survivor 8-connected to a seed.
pub fn detect_edges(l: &ImageF32, low: f32, high: f32) -> Mask {
    let grad = sobel_gradients(l);
    let w = grad.mag.w;
    let h = grad.mag.h;
    let mut edges = Mask::new(w, h);
    if w < 3 || h < 3 {
        return edges;
    }

    // 0 = suppressed, 1 = weak survivor, 2 = strong seed.
    let mut class = vec![0u8; w * h];
    let mut seeds: Vec<(usize, usize)> = Vec::new();
    for y in 1..h - 1 {
        let mag_prev = grad.mag.row(y - 1);
        let mag_row = grad.mag.row(y);
        let mag_next = grad.mag.row(y + 1);
        let gx_row = grad.gx.row(y);
        let gy_row = grad.gy.row(y);

        for x in 1..w - 1 {
            let mag = mag_row[x];
            if mag < low {
                continue;
            }

            let gx = gx_row[x];
            let gy = gy_row[x];
            let abs_gx = gx.abs();
            let abs_gy = gy.abs();
            let same_sign = (gx >= 0.0 && gy >= 0.0) || (gx <= 0.0 && gy <= 0.0);

            // Compare along the gradient: matching gx/gy signs point the
            // gradient down-right, so the comparison runs NW/SE; opposite
            // signs run NE/SW.
            let (neighbor1, neighbor2) = if abs_gx >= abs_gy {
                if abs_gy <= abs_gx * TAN_22_5_DEG {
                    (mag_row[x - 1], mag_row[x + 1])
                } else if same_sign {
                    (mag_prev[x - 1], mag_next[x + 1])
                } else {
                    (mag_prev[x + 1], mag_next[x - 1])
                }
            } else if abs_gx <= abs_gy * TAN_22_5_DEG {
                (mag_prev[x], mag_next[x])
            } else if same_sign {
                (mag_prev[x - 1], mag_next[x + 1])
            } else {
                (mag_prev[x + 1], mag_next[x - 1])
            };

            if mag <= neighbor1 || mag < neighbor2 {
                continue;
            }

            if mag >= high {
                class[y * w + x] = 2;
                seeds.push((x, y));
            } else {
                class[y * w + x] = 1;
            }
        }
    }

    // Grow strong seeds into adjacent weak survivors.
    let mut stack = seeds;
    while let Some((x, y)) = stack.pop() {
        if edges.is_on(x, y) {
            continue;
        }
        edges.set_on(x, y);
        for (dx, dy) in NEIGH_OFFSETS {
            let nx = x as isize + dx;
            let ny = y as isize + dy;
            if nx < 0 || ny < 0 || nx as usize >= w || ny as usize >= h {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            if class[ny * w + nx] != 0 && !edges.is_on(nx, ny) {
                stack.push((nx, ny));
            }
        }
    }

    edges
}

const NEIGH_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];
