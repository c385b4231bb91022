//! Lumen Renderer - CPU Whitted ray tracing
//!
//! A recursive ray tracer over the triangle scenes built by `lumen_core`:
//! Phong-style direct light with hard shadows, mirror reflection and
//! refraction, shaded in parallel column bands with rayon.
//!
//! Intersection is brute force over every triangle; there is no
//! acceleration structure.

mod bands;
mod camera;
mod context;
mod hittable;
mod ray;
mod renderer;
mod shading;
mod triangle;

pub use bands::{generate_bands, render_band, Band, BandResult};
pub use camera::Camera;
pub use context::{FrameInput, FrameStats, RenderContext};
pub use hittable::{nearest_hit, Hit};
pub use ray::Ray;
pub use renderer::{color_to_rgba, render_frame, FrameBuffer, RenderConfig, RenderError, RenderResult};
pub use shading::{uv_color, Tracer, MAGENTA, MAX_CHANNEL};
pub use triangle::{is_valid_hit, solve};

/// Re-export common math types from lumen_math
pub use lumen_math::{Color, DVec3, Interval};
