//! Ray type for Whitted tracing.
//!
//! Besides origin and direction, a ray remembers the output pixel it was
//! generated for, how many reflection/refraction bounces produced it, and the
//! total distance travelled so far (used for light falloff).

use lumen_math::DVec3;

/// A ray with origin, direction and tracing state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Origin point of the ray
    pub origin: DVec3,
    /// Direction vector (unit length for distances to be meaningful)
    pub direction: DVec3,
    /// Top-left pixel of the block this ray fills
    pub x: u32,
    pub y: u32,
    /// Reflection/refraction depth; 0 for primary and shadow rays
    pub depth: u32,
    /// Distance travelled by earlier segments of this path
    pub distance: f64,
}

impl Ray {
    /// Create a primary ray for the pixel block at (x, y).
    #[inline]
    pub fn primary(origin: DVec3, direction: DVec3, x: u32, y: u32) -> Self {
        Self {
            origin,
            direction,
            x,
            y,
            depth: 0,
            distance: 0.0,
        }
    }

    /// Spawn a reflected or refracted ray one level deeper, carrying the distance.
    #[inline]
    pub fn bounce(&self, origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction,
            depth: self.depth + 1,
            ..*self
        }
    }

    /// Spawn a shadow ray towards a light. Shadow rays start fresh.
    #[inline]
    pub fn shadow(&self, origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction,
            depth: 0,
            distance: 0.0,
            ..*self
        }
    }

    /// Compute a point along the ray at parameter t.
    /// P(t) = origin + t * direction
    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::primary(DVec3::ZERO, DVec3::Z, 0, 0)
    }
}
