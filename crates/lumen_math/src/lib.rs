// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod interval;
mod transform;
pub use interval::Interval;
pub use transform::{reflect, refract, rotate, rotate_x, rotate_y, rotate_z, DVec3Ext};

/// Color type alias (RGB channels in 0..255 space, unclamped until output)
pub type Color = DVec3;
