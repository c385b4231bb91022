//! Ray-triangle intersection.
//!
//! Uses the Möller-Trumbore algorithm. The solve is branch-free: parallel
//! rays and degenerate triangles produce non-finite values, which the
//! acceptance test in [`is_valid_hit`] rejects like any other miss.

use lumen_core::Triangle;
use lumen_math::{DVec3, Interval};

use crate::Ray;

/// Solve for (t, u, v): distance along the ray and barycentric weights.
#[inline]
pub fn solve(ray: &Ray, triangle: &Triangle) -> DVec3 {
    let e1 = triangle.vertex_2 - triangle.vertex_1;
    let e2 = triangle.vertex_3 - triangle.vertex_1;
    let t = ray.origin - triangle.vertex_1;
    let p = ray.direction.cross(e2);
    let q = t.cross(e1);

    (1.0 / p.dot(e1)) * DVec3::new(q.dot(e2), p.dot(t), q.dot(ray.direction))
}

/// Accept a solution when `t` lies strictly inside `ray_t` and (u, v)
/// lies inside the triangle.
#[inline]
pub fn is_valid_hit(result: DVec3, ray_t: Interval) -> bool {
    let (t, u, v) = (result.x, result.y, result.z);
    ray_t.surrounds(t)
        && Interval::UNIT.contains(u)
        && Interval::UNIT.contains(v)
        && Interval::UNIT.contains(u + v)
}
