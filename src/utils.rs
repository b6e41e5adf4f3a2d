//! Utility functions for frame math and polyline operations
//!
//! These are the shared geometric primitives behind lane-frame conversions:
//! headings, lateral normals, point-to-segment projection, arc-length tables
//! and lateral polyline offsets.

use geo::{Coord, Rect};
use glam::DVec3;

/// Below this horizontal length a direction has no meaningful heading
pub const MIN_HORIZONTAL_LENGTH: f64 = 1e-12;

/// Miter scale limit for lateral polyline offsets at sharp corners
const MITER_LIMIT: f64 = 4.0;

/// Heading of a direction vector in the world x-y plane, in radians
///
/// Measured counterclockwise from the +x axis.
#[inline(always)]
pub fn heading(dir: DVec3) -> f64 {
    dir.y.atan2(dir.x)
}

/// Pitch of a direction vector, in radians
///
/// Follows the right-hand rule about the body y-axis: an ascending
/// direction (positive z component) yields a negative pitch.
#[inline(always)]
pub fn pitch(dir: DVec3) -> f64 {
    let horizontal = dir.x.hypot(dir.y);
    -dir.z.atan2(horizontal)
}

/// Horizontal unit vector pointing to the left of a direction
///
/// Falls back to +y for directions with no horizontal component.
#[inline(always)]
pub fn left_normal(dir: DVec3) -> DVec3 {
    let horizontal = dir.x.hypot(dir.y);
    if horizontal < MIN_HORIZONTAL_LENGTH {
        return DVec3::Y;
    }
    DVec3::new(-dir.y / horizontal, dir.x / horizontal, 0.0)
}

/// Project a point onto the segment `a..b`
///
/// Returns the clamped segment parameter in `[0, 1]` and the foot of the
/// projection. Degenerate segments project onto `a`.
#[inline]
pub fn project_to_segment(p: DVec3, a: DVec3, b: DVec3) -> (f64, DVec3) {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < MIN_HORIZONTAL_LENGTH {
        return (0.0, a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (t, a + ab * t)
}

/// Cumulative arc lengths of a polyline
///
/// The result has the same length as the input; the first entry is 0 and
/// the last entry is the total length.
pub fn arc_lengths(points: &[DVec3]) -> Vec<f64> {
    let mut lengths = Vec::with_capacity(points.len());
    let mut total = 0.0;
    for (i, point) in points.iter().enumerate() {
        if i > 0 {
            total += point.distance(points[i - 1]);
        }
        lengths.push(total);
    }
    lengths
}

/// Offset a polyline laterally by a constant distance
///
/// Positive offsets move the line to the left of its direction of travel.
/// Interior vertices use mitered joins, with the miter scale clamped to
/// avoid blowups at sharp corners.
pub fn offset_polyline(points: &[DVec3], offset: f64) -> Vec<DVec3> {
    if points.len() < 2 {
        return points.to_vec();
    }

    let mut result = Vec::with_capacity(points.len());
    for i in 0..points.len() {
        let normal = if i == 0 {
            left_normal(points[1] - points[0])
        } else if i == points.len() - 1 {
            left_normal(points[i] - points[i - 1])
        } else {
            // Mitered join: average the adjacent edge normals and scale so
            // the offset edges stay parallel to the originals.
            let n_in = left_normal(points[i] - points[i - 1]);
            let n_out = left_normal(points[i + 1] - points[i]);
            let avg = n_in + n_out;
            let avg_len = avg.length();
            if avg_len < MIN_HORIZONTAL_LENGTH {
                // 180-degree turn, no meaningful miter direction
                n_in
            } else {
                let avg = avg / avg_len;
                let scale = (1.0 / avg.dot(n_in).max(1.0 / MITER_LIMIT)).min(MITER_LIMIT);
                avg * scale
            }
        };
        result.push(points[i] + normal * offset);
    }
    result
}

/// Axis-aligned bounding rectangle of a polyline in the world x-y plane
///
/// Returns `None` for an empty polyline.
pub fn bounding_rect(points: &[DVec3]) -> Option<Rect<f64>> {
    let first = points.first()?;
    let mut min_x = first.x;
    let mut min_y = first.y;
    let mut max_x = first.x;
    let mut max_y = first.y;
    for point in &points[1..] {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }
    Some(Rect::new(
        Coord { x: min_x, y: min_y },
        Coord { x: max_x, y: max_y },
    ))
}

/// Distance from a 2-D point to an axis-aligned rectangle
///
/// Zero for points inside the rectangle.
#[inline]
pub fn rect_distance(x: f64, y: f64, rect: &Rect<f64>) -> f64 {
    let dx = (rect.min().x - x).max(0.0).max(x - rect.max().x);
    let dy = (rect.min().y - y).max(0.0).max(y - rect.max().y);
    dx.hypot(dy)
}
