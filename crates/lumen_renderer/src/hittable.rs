//! Nearest-hit queries against a whole scene.

use lumen_core::{ObjectId, Scene};
use lumen_math::{DVec3, Interval};

use crate::{triangle, Ray};

/// Record of a ray-scene intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Object that was struck, `None` for a miss
    pub object: Option<ObjectId>,
    /// Point of intersection
    pub position: DVec3,
    /// Face normal of the struck triangle (not flipped towards the ray)
    pub normal: DVec3,
    /// Raw solver output (t, u, v); t is +inf for a miss
    pub result: DVec3,
}

impl Default for Hit {
    fn default() -> Self {
        Self::MISS
    }
}

impl Hit {
    /// Nothing was hit.
    pub const MISS: Hit = Hit {
        object: None,
        position: DVec3::ZERO,
        normal: DVec3::ZERO,
        result: DVec3::new(f64::INFINITY, 0.0, 0.0),
    };

    /// Distance along the ray.
    #[inline]
    pub fn t(&self) -> f64 {
        self.result.x
    }

    /// First barycentric weight.
    #[inline]
    pub fn u(&self) -> f64 {
        self.result.y
    }

    /// Second barycentric weight.
    #[inline]
    pub fn v(&self) -> f64 {
        self.result.z
    }

    /// Whether the ray missed every triangle.
    #[inline]
    pub fn is_miss(&self) -> bool {
        self.object.is_none()
    }
}

/// Find the closest triangle hit by `ray`, ignoring hits at or before `min_clip`.
///
/// Brute force over every triangle of every object.
pub fn nearest_hit(scene: &Scene, ray: &Ray, min_clip: f64) -> Hit {
    let mut closest = Hit::MISS;
    let mut ray_t = Interval::new(min_clip, f64::INFINITY);

    for (index, object) in scene.objects().iter().enumerate() {
        for tri in object.triangles() {
            let result = triangle::solve(ray, tri);

            if triangle::is_valid_hit(result, ray_t) {
                ray_t = ray_t.with_max(result.x);
                closest = Hit {
                    object: Some(ObjectId(index)),
                    position: ray.at(result.x),
                    normal: tri.normal,
                    result,
                };
            }
        }
    }

    closest
}
