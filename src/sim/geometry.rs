//! Geometry helpers shared by both games
//!
//! Circle containment, angular gap membership, boundary crossing search and
//! swept segment-vs-circle tests. All functions are pure and allocation free.

use glam::Vec2;

use crate::consts::{BISECTION_ITERATIONS, EPSILON};
use crate::normalize_angle;

/// Slack on the gap edge so an angle exactly on the boundary counts as inside
const GAP_EDGE_TOLERANCE: f32 = 1e-5;

/// Whether `point` lies inside (or on) the circle at `center` with radius `r`
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, r: f32) -> bool {
    point.distance_squared(center) <= r * r
}

/// Whether `angle` lies within an angular gap centered on `gap_center`
///
/// Both angles are radians, the width is in degrees. The shortest angular
/// distance is used, so gaps straddling 0/2π work. Widths of 360° or more are
/// the caller's business (treat as "always open").
#[inline]
pub fn point_in_gap(angle: f32, gap_center: f32, gap_width_deg: f32) -> bool {
    let diff = normalize_angle(angle - gap_center);
    diff.abs() <= gap_width_deg.to_radians() / 2.0 + GAP_EDGE_TOLERANCE
}

/// Find where the motion segment `prev -> curr` crosses the origin-centered
/// circle of `radius`
///
/// Bisects the interpolation parameter for a fixed number of iterations and
/// returns the last sample still on `prev`'s side of the circle, so a wall
/// clamp built from it never ends up outside. Precision is |curr - prev|·2⁻¹⁵.
/// If the segment does not cross, the result approaches `curr`.
pub fn boundary_crossing(prev: Vec2, curr: Vec2, radius: f32) -> Vec2 {
    let radius_sq = radius * radius;
    let prev_inside = prev.length_squared() <= radius_sq;

    let mut lo = 0.0_f32;
    let mut hi = 1.0_f32;
    for _ in 0..BISECTION_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        let inside = prev.lerp(curr, mid).length_squared() <= radius_sq;
        if inside == prev_inside {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    prev.lerp(curr, lo)
}

/// Closest point to `point` on the segment `a -> b`
#[inline]
pub fn closest_point_on_segment(a: Vec2, b: Vec2, point: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < EPSILON * EPSILON {
        return a; // Degenerate segment
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Swept test: does the segment `a -> b` touch the circle at `center`?
///
/// Used for weapon tips so a fast spin cannot skip over a target between
/// frames.
#[inline]
pub fn segment_hits_circle(a: Vec2, b: Vec2, center: Vec2, r: f32) -> bool {
    point_in_circle(closest_point_on_segment(a, b, center), center, r)
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n, with `normal` unit length
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Unit radial direction of `pos`, or `None` at the arena center
#[inline]
pub fn radial_normal(pos: Vec2) -> Option<Vec2> {
    let len = pos.length();
    if len < EPSILON { None } else { Some(pos / len) }
}
