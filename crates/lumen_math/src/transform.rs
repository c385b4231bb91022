// Rotation and direction utilities for DVec3
//
// Euler rotations are applied as three separate matrix-vector products
// (X, then Y, then Z) rather than one composed matrix, so world-space
// vertices reproduce the same rounding every time they are recomputed.

use glam::{DMat3, DVec3};

/// Extension trait for DVec3 to provide tracer-specific vector utilities
pub trait DVec3Ext {
    /// Normalize the vector, returning it unchanged when its magnitude is exactly zero.
    ///
    /// Unlike `normalize_or_zero`, non-finite magnitudes are not masked: they
    /// propagate into the result so degenerate geometry fails the hit tests.
    fn normalize_or_unchanged(self) -> DVec3;
}

impl DVec3Ext for DVec3 {
    fn normalize_or_unchanged(self) -> DVec3 {
        let magnitude = self.length();
        if magnitude != 0.0 {
            self / magnitude
        } else {
            self
        }
    }
}

/// Rotate a vector about the X axis by `angle` radians.
#[inline]
pub fn rotate_x(angle: f64, vector: DVec3) -> DVec3 {
    DMat3::from_rotation_x(angle) * vector
}

/// Rotate a vector about the Y axis by `angle` radians.
#[inline]
pub fn rotate_y(angle: f64, vector: DVec3) -> DVec3 {
    DMat3::from_rotation_y(angle) * vector
}

/// Rotate a vector about the Z axis by `angle` radians.
#[inline]
pub fn rotate_z(angle: f64, vector: DVec3) -> DVec3 {
    DMat3::from_rotation_z(angle) * vector
}

/// Apply Euler angles to a vector: about X first, then Y, then Z.
pub fn rotate(vector: DVec3, angles: DVec3) -> DVec3 {
    let vector = rotate_x(angles.x, vector);
    let vector = rotate_y(angles.y, vector);
    rotate_z(angles.z, vector)
}

/// Mirror `incident` about `normal`.
#[inline]
pub fn reflect(incident: DVec3, normal: DVec3) -> DVec3 {
    incident - 2.0 * normal * incident.dot(normal)
}

/// Bend `incident` through a surface with the given refractive index (Snell's law).
///
/// The outside medium has index 1. When the ray leaves the surface
/// (`dot(incident, normal) < 0` after clamping) the indices swap and the
/// normal flips. Total internal reflection returns `DVec3::ZERO`.
pub fn refract(incident: DVec3, normal: DVec3, refractive_index: f64) -> DVec3 {
    let mut cos_i = incident.dot(normal).clamp(-1.0, 1.0);
    let mut eta_i = 1.0;
    let mut eta_t = refractive_index;
    let mut normal = normal;

    if cos_i < 0.0 {
        cos_i = -cos_i;
        std::mem::swap(&mut eta_i, &mut eta_t);
        normal = -normal;
    }

    let eta = eta_i / eta_t;
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        DVec3::ZERO
    } else {
        incident * eta + normal * (eta * cos_i - k.sqrt())
    }
}
