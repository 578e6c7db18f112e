//! Pure point-set utilities: areas, hulls, minimum-area rectangles,
//! polygon simplification, and corner ordering.
//!
//! Points are `[x, y]` pairs in pixel coordinates (y grows downward).

use nalgebra::Vector2;

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: [f32; 2], b: [f32; 2]) -> f32 {
    (Vector2::from(a) - Vector2::from(b)).norm()
}

/// Unsigned polygon area via the shoelace formula.
///
/// Returns 0.0 for fewer than 3 points.
pub fn polygon_area(points: &[[f32; 2]]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    let n = points.len();
    let mut doubled = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        doubled += points[i][0] * points[j][1] - points[j][0] * points[i][1];
    }
    doubled.abs() / 2.0
}

/// Perimeter of the closed polygon through `points`.
pub fn polygon_perimeter(points: &[[f32; 2]]) -> f32 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| distance(points[i], points[(i + 1) % n]))
        .sum()
}

#[inline]
fn cross(o: [f32; 2], a: [f32; 2], b: [f32; 2]) -> f32 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

/// Convex hull by monotone chain, in counterclockwise order (mathematical
/// orientation; clockwise on screen with y down).
///
/// Collinear points are dropped. Inputs with fewer than 3 distinct points
/// return what they can.
pub fn convex_hull(points: &[[f32; 2]]) -> Vec<[f32; 2]> {
    let mut sorted: Vec<[f32; 2]> = points.to_vec();
    sorted.sort_by(|a, b| {
        a[0].partial_cmp(&b[0])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a[1].partial_cmp(&b[1]).unwrap_or(std::cmp::Ordering::Equal))
    });
    sorted.dedup();
    let n = sorted.len();
    if n < 3 {
        return sorted;
    }

    let mut hull: Vec<[f32; 2]> = Vec::with_capacity(2 * n);
    for &p in &sorted {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    let lower_len = hull.len() + 1;
    for &p in sorted.iter().rev() {
        while hull.len() >= lower_len && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
        {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}

/// Corners of the minimum-area rectangle enclosing `points`, found by
/// rotating calipers over the convex hull.
///
/// Degenerate inputs (collinear or fewer than 3 points) fall back to the
/// axis-aligned bounding box, which may have zero area.
pub fn min_area_rect(points: &[[f32; 2]]) -> [[f32; 2]; 4] {
    let hull = convex_hull(points);
    if hull.len() < 3 {
        return axis_aligned_box(points);
    }

    let n = hull.len();
    let mut best_area = f32::MAX;
    let mut best: Option<[[f32; 2]; 4]> = None;

    for i in 0..n {
        let origin = Vector2::from(hull[i]);
        let edge = Vector2::from(hull[(i + 1) % n]) - origin;
        let len = edge.norm();
        if len <= f32::EPSILON {
            continue;
        }
        let axis = edge / len;
        let normal = Vector2::new(-axis.y, axis.x);

        let mut min_a = f32::MAX;
        let mut max_a = f32::MIN;
        let mut min_n = f32::MAX;
        let mut max_n = f32::MIN;
        for &p in &hull {
            let rel = Vector2::from(p) - origin;
            let along = axis.dot(&rel);
            let across = normal.dot(&rel);
            min_a = min_a.min(along);
            max_a = max_a.max(along);
            min_n = min_n.min(across);
            max_n = max_n.max(across);
        }

        let area = (max_a - min_a) * (max_n - min_n);
        if area < best_area {
            best_area = area;
            let corner = |sa: f32, sn: f32| {
                let p = origin + axis * sa + normal * sn;
                [p.x, p.y]
            };
            best = Some([
                corner(min_a, min_n),
                corner(max_a, min_n),
                corner(max_a, max_n),
                corner(min_a, max_n),
            ]);
        }
    }

    best.unwrap_or_else(|| axis_aligned_box(points))
}

fn axis_aligned_box(points: &[[f32; 2]]) -> [[f32; 2]; 4] {
    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for p in points {
        min_x = min_x.min(p[0]);
        max_x = max_x.max(p[0]);
        min_y = min_y.min(p[1]);
        max_y = max_y.max(p[1]);
    }
    if points.is_empty() {
        return [[0.0; 2]; 4];
    }
    [
        [min_x, min_y],
        [max_x, min_y],
        [max_x, max_y],
        [min_x, max_y],
    ]
}

/// Simplify a closed curve with Douglas-Peucker at tolerance `epsilon`.
///
/// The curve is split at the point farthest from the first point, each open
/// chain is simplified independently, and the halves are rejoined.
pub fn approx_polygon(points: &[[f32; 2]], epsilon: f32) -> Vec<[f32; 2]> {
    let n = points.len();
    if n <= 3 {
        return points.to_vec();
    }

    let far = (1..n)
        .max_by(|&i, &j| {
            distance(points[0], points[i])
                .partial_cmp(&distance(points[0], points[j]))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(n / 2);

    let mut simplified = Vec::new();
    douglas_peucker(&points[0..=far], epsilon, &mut simplified);
    simplified.pop();
    let mut closing = Vec::new();
    let mut second_half: Vec<[f32; 2]> = points[far..n].to_vec();
    second_half.push(points[0]);
    douglas_peucker(&second_half, epsilon, &mut closing);
    closing.pop();
    simplified.extend(closing);
    simplified
}

fn douglas_peucker(chain: &[[f32; 2]], epsilon: f32, out: &mut Vec<[f32; 2]>) {
    let n = chain.len();
    if n <= 2 {
        out.extend_from_slice(chain);
        return;
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;

    let mut stack = vec![(0usize, n - 1)];
    while let Some((start, end)) = stack.pop() {
        if end - start <= 1 {
            continue;
        }
        let mut max_dist = 0.0;
        let mut max_index = start;
        for i in start + 1..end {
            let d = point_to_segment_line_distance(chain[i], chain[start], chain[end]);
            if d > max_dist {
                max_dist = d;
                max_index = i;
            }
        }
        if max_dist > epsilon {
            keep[max_index] = true;
            stack.push((start, max_index));
            stack.push((max_index, end));
        }
    }

    out.extend(chain.iter().zip(&keep).filter_map(|(&p, &k)| k.then_some(p)));
}

/// Perpendicular distance from `point` to the infinite line through `a`, `b`.
fn point_to_segment_line_distance(point: [f32; 2], a: [f32; 2], b: [f32; 2]) -> f32 {
    let la = b[1] - a[1];
    let lb = a[0] - b[0];
    let lc = b[0] * a[1] - a[0] * b[1];
    let denom = (la * la + lb * lb).sqrt();
    if denom == 0.0 {
        return distance(point, a);
    }
    (la * point[0] + lb * point[1] + lc).abs() / denom
}

/// Centroid of a point set.
pub fn centroid(points: &[[f32; 2]]) -> [f32; 2] {
    if points.is_empty() {
        return [0.0, 0.0];
    }
    let n = points.len() as f32;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p[0], sy + p[1]));
    [sx / n, sy / n]
}

/// Order four corners clockwise (on screen, y down) by their angle around
/// the centroid. The starting corner is whichever sorts first by angle,
/// which is deterministic for a given box.
pub fn order_clockwise(corners: [[f32; 2]; 4]) -> [[f32; 2]; 4] {
    let c = centroid(&corners);
    let mut ordered = corners;
    ordered.sort_by(|a, b| {
        let angle_a = (a[1] - c[1]).atan2(a[0] - c[0]);
        let angle_b = (b[1] - c[1]).atan2(b[0] - c[0]);
        angle_a.partial_cmp(&angle_b).unwrap_or(std::cmp::Ordering::Equal)
    });
    ordered
}
