//! External contour extraction from a binary edge map.
//!
//! Components are discovered in raster-scan order and their outer boundary
//! traced with Moore neighbor following, which fixes a deterministic
//! contour ordering. Boundaries are compacted by dropping points interior
//! to straight runs, and contours nested inside another contour's region
//! are discarded so only outermost boundaries remain.

use crate::image::Mask;

/// Ordered boundary curve of one connected component, in pixel coordinates
/// of the traced mask.
#[derive(Clone, Debug, Default)]
pub struct Contour {
    pub points: Vec<[f32; 2]>,
}

/// Clockwise Moore neighborhood in image coordinates (y grows downward).
const DIRS: [(isize, isize); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Trace the outer boundary of every 8-connected component in `mask`.
pub fn find_external_contours(mask: &Mask) -> Vec<Contour> {
    let mut visited = vec![false; mask.w * mask.h];
    let mut contours = Vec::new();

    for y in 0..mask.h {
        for x in 0..mask.w {
            if !mask.is_on(x, y) || visited[y * mask.w + x] {
                continue;
            }
            let boundary = trace_boundary(mask, (x, y));
            mark_component(mask, (x, y), &mut visited);
            contours.push(Contour {
                points: compact_runs(&boundary),
            });
        }
    }

    drop_nested(contours)
}

/// Moore neighbor tracing from the component's raster-first pixel.
///
/// The start pixel has no set neighbors to its west or in the row above,
/// so the west cell is a valid backtrack and the traversal runs clockwise
/// around the outer boundary.
fn trace_boundary(mask: &Mask, start: (usize, usize)) -> Vec<(usize, usize)> {
    let s = (start.0 as isize, start.1 as isize);
    let mut boundary = vec![start];

    let mut p = s;
    let mut b = (s.0 - 1, s.1);
    let mut c_dir = next_dir_after(b, p);
    let mut c = step(p, c_dir);
    let mut misses = 0usize;
    let max_steps = 4 * mask.w * mask.h + 16;

    for _ in 0..max_steps {
        if c == s {
            break;
        }
        if is_on(mask, c) {
            boundary.push((c.0 as usize, c.1 as usize));
            p = c;
            c_dir = next_dir_after(b, p);
            c = step(p, c_dir);
            misses = 0;
        } else {
            b = c;
            c_dir = (c_dir + 1) % 8;
            c = step(p, c_dir);
            misses += 1;
            if misses == 8 {
                // Full revolution without a hit: isolated pixel.
                break;
            }
        }
    }

    boundary
}

#[inline]
fn is_on(mask: &Mask, p: (isize, isize)) -> bool {
    p.0 >= 0
        && p.1 >= 0
        && (p.0 as usize) < mask.w
        && (p.1 as usize) < mask.h
        && mask.is_on(p.0 as usize, p.1 as usize)
}

#[inline]
fn step(p: (isize, isize), dir: usize) -> (isize, isize) {
    (p.0 + DIRS[dir].0, p.1 + DIRS[dir].1)
}

/// Direction index of the neighbor following `b` clockwise around `p`.
fn next_dir_after(b: (isize, isize), p: (isize, isize)) -> usize {
    let delta = (b.0 - p.0, b.1 - p.1);
    let dir = DIRS
        .iter()
        .position(|&d| d == delta)
        .expect("backtrack cell adjoins the current pixel");
    (dir + 1) % 8
}

/// Flood-mark the whole component so inner borders never seed a new trace.
fn mark_component(mask: &Mask, start: (usize, usize), visited: &mut [bool]) {
    let mut stack = vec![start];
    visited[start.1 * mask.w + start.0] = true;
    while let Some((x, y)) = stack.pop() {
        for (dx, dy) in DIRS {
            let nx = x as isize + dx;
            let ny = y as isize + dy;
            if nx < 0 || ny < 0 || nx as usize >= mask.w || ny as usize >= mask.h {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            let idx = ny * mask.w + nx;
            if mask.is_on(nx, ny) && !visited[idx] {
                visited[idx] = true;
                stack.push((nx, ny));
            }
        }
    }
}

/// Keep only the endpoints of straight pixel runs (ring-aware).
fn compact_runs(boundary: &[(usize, usize)]) -> Vec<[f32; 2]> {
    let n = boundary.len();
    if n <= 2 {
        return boundary
            .iter()
            .map(|&(x, y)| [x as f32, y as f32])
            .collect();
    }

    let dir_of = |a: (usize, usize), b: (usize, usize)| {
        (
            (b.0 as isize - a.0 as isize).signum(),
            (b.1 as isize - a.1 as isize).signum(),
        )
    };

    let mut points = Vec::with_capacity(n);
    for i in 0..n {
        let prev = boundary[(i + n - 1) % n];
        let cur = boundary[i];
        let next = boundary[(i + 1) % n];
        if dir_of(prev, cur) != dir_of(cur, next) {
            points.push([cur.0 as f32, cur.1 as f32]);
        }
    }
    if points.is_empty() {
        // Fully collinear ring; keep the extremes.
        points.push([boundary[0].0 as f32, boundary[0].1 as f32]);
        points.push([
            boundary[n / 2].0 as f32,
            boundary[n / 2].1 as f32,
        ]);
    }
    points
}

/// Discard contours whose region lies inside another contour.
fn drop_nested(contours: Vec<Contour>) -> Vec<Contour> {
    let keep: Vec<bool> = contours
        .iter()
        .enumerate()
        .map(|(i, contour)| {
            let Some(&probe) = contour.points.first() else {
                return false;
            };
            !contours
                .iter()
                .enumerate()
                .any(|(j, other)| i != j && point_in_polygon(probe, &other.points))
        })
        .collect();

    contours
        .into_iter()
        .zip(keep)
        .filter_map(|(c, k)| k.then_some(c))
        .collect()
}

/// Even-odd ray casting along +x.
fn point_in_polygon(pt: [f32; 2], poly: &[[f32; 2]]) -> bool {
    if poly.len() < 3 {
        return false;
    }
    let mut inside = false;
    let n = poly.len();
    for i in 0..n {
        let a = poly[i];
        let b = poly[(i + 1) % n];
        if (a[1] > pt[1]) != (b[1] > pt[1]) {
            let t = (pt[1] - a[1]) / (b[1] - a[1]);
            let x = a[0] + t * (b[0] - a[0]);
            if pt[0] < x {
                inside = !inside;
            }
        }
    }
    inside
}
