//! Frame rendering: render settings, the output buffer, and the
//! shade-then-write pass that ties camera, bands and tracer together.

use crate::bands::{generate_bands, render_band, BandResult};
use crate::{Camera, Color, Tracer};
use lumen_core::{ConfigError, Scene};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from setting up or outputting a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("scene setup failed: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to write image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("frame buffer is {width}x{height} but holds {len} pixels")]
    BufferSize { width: u32, height: u32, len: usize },
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Color returned when a ray hits nothing
    pub background: Color,
    /// Number of column bands shaded in parallel
    pub workers: usize,
    /// Offset applied to shadow ray origins along the surface normal
    pub shadow_bias: f64,
    /// Offset applied to reflected ray origins along the surface normal
    pub reflection_bias: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: Color::new(0.0, 0.0, 20.0),
            workers: 20,
            shadow_bias: 1e-3,
            reflection_bias: 1e-7,
        }
    }
}

/// Convert a color with 0..255 channels to 8-bit RGBA.
///
/// Out-of-range channels saturate; NaN becomes 0.
#[inline]
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let channel = |c: f64| c.clamp(0.0, 255.0) as u8;
    [channel(color.x), channel(color.y), channel(color.z), 255]
}

/// Top-down frame buffer of colors.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl FrameBuffer {
    /// Create a new buffer filled with white.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::splat(255.0); (width as usize) * (height as usize)],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Fill the `size × size` block whose top-left corner is (x, y),
    /// clipped to the buffer.
    pub fn fill_block(&mut self, x: u32, y: u32, size: u32, color: Color) {
        let x_end = x.saturating_add(size).min(self.width);
        let y_end = y.saturating_add(size).min(self.height);

        for row in y..y_end {
            let start = self.index(x.min(x_end), row);
            let end = self.index(x_end, row);
            self.pixels[start..end].fill(color);
        }
    }

    /// Convert to RGBA pixels.
    pub fn to_rgba(&self) -> Vec<[u8; 4]> {
        self.pixels.iter().map(|c| color_to_rgba(*c)).collect()
    }

    /// Convert to tightly packed RGBA bytes (for display or saving).
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice::<[u8; 4], u8>(&self.to_rgba()).to_vec()
    }

    /// Write the buffer as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        let image = image::RgbaImage::from_raw(self.width, self.height, self.to_rgba_bytes()).ok_or(
            RenderError::BufferSize {
                width: self.width,
                height: self.height,
                len: self.pixels.len(),
            },
        )?;

        image
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|source| RenderError::Image {
                path: path.to_path_buf(),
                source,
            })?;

        log::info!("Saved {}x{} frame to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// Shade the camera's current rays and write them into `buffer`.
///
/// Bands are shaded in parallel on `pool`; the buffer is only written after
/// every band has finished. Returns the number of rays shaded.
pub fn render_frame(
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    pool: &ThreadPool,
    buffer: &mut FrameBuffer,
) -> usize {
    let rays = camera.rays();
    let tracer = Tracer::new(scene, camera, config);
    let bands = generate_bands(buffer.width, config.workers);

    let results: Vec<BandResult> = pool.install(|| {
        bands
            .par_iter()
            .map(|band| render_band(band, rays, &tracer))
            .collect()
    });

    let resolution = camera.resolution();
    let mut shaded = 0;
    for result in &results {
        for (ray, color) in rays[result.rays.clone()].iter().zip(&result.colors) {
            buffer.fill_block(ray.x, ray.y, resolution, *color);
        }
        shaded += result.colors.len();
    }

    log::debug!("Shaded {} rays in {} bands", shaded, results.len());
    shaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{Material, MaterialMode, Mesh, Object, Transform};
    use lumen_math::DVec3;

    fn pool(threads: usize) -> ThreadPool {
        rayon::ThreadPoolBuilder::new().num_threads(threads).build().unwrap()
    }

    #[test]
    fn test_color_to_rgba() {
        assert_eq!(color_to_rgba(Color::new(0.0, 20.0, 255.0)), [0, 20, 255, 255]);
        assert_eq!(color_to_rgba(Color::new(-5.0, 300.0, f64::NAN)), [0, 255, 0, 255]);
    }

    #[test]
    fn test_new_buffer_is_white() {
        let buffer = FrameBuffer::new(3, 2);
        assert_eq!(buffer.pixels.len(), 6);
        assert!(buffer.pixels.iter().all(|c| *c == Color::splat(255.0)));
        assert_eq!(buffer.to_rgba_bytes().len(), 24);
    }

    #[test]
    fn test_fill_block_clips_to_buffer() {
        let mut buffer = FrameBuffer::new(5, 5);
        buffer.fill_block(3, 3, 4, Color::ZERO);

        for y in 0..5 {
            for x in 0..5 {
                let expected = if x >= 3 && y >= 3 { Color::ZERO } else { Color::splat(255.0) };
                assert_eq!(buffer.get(x, y), expected, "pixel ({}, {})", x, y);
            }
        }

        // Entirely outside: no-op
        buffer.fill_block(9, 9, 2, Color::ONE);
        assert!(!buffer.pixels.contains(&Color::ONE));
    }

    #[test]
    fn test_single_ray_fills_block() {
        let scene = Scene::new("empty");
        let config = RenderConfig::default();
        let mut camera = Camera::new().with_resolution(4);
        camera.generate_rays(2, 2);
        assert_eq!(camera.rays().len(), 1);

        let mut buffer = FrameBuffer::new(8, 8);
        let shaded = render_frame(&camera, &scene, &config, &pool(2), &mut buffer);
        assert_eq!(shaded, 1);

        for y in 0..8 {
            for x in 0..8 {
                let expected = if x < 4 && y < 4 { config.background } else { Color::splat(255.0) };
                assert_eq!(buffer.get(x, y), expected);
            }
        }
    }

    #[test]
    fn test_parallel_matches_single_worker() {
        let mut scene = Scene::new("cube");
        scene.add_object(Object::from_mesh(
            "cube",
            Transform::new(DVec3::ZERO, DVec3::new(0.2, 0.5, 0.0), DVec3::splat(3.0)),
            Material::new(Color::new(200.0, 50.0, 50.0), MaterialMode::Lit).with_albedo(0.9, 0.3, 0.1, 0.0),
            &Mesh::cube(),
        ));
        scene.add_light(DVec3::new(0.0, 6.0, -6.0), DVec3::splat(0.2), Color::splat(255.0), 30.0);

        let mut camera = Camera::new().with_position(DVec3::new(0.0, 0.0, -12.0));
        camera.generate_rays(8, 8);

        let serial = RenderConfig { workers: 1, ..RenderConfig::default() };
        let mut expected = FrameBuffer::new(16, 16);
        render_frame(&camera, &scene, &serial, &pool(1), &mut expected);

        let parallel = RenderConfig { workers: 5, ..RenderConfig::default() };
        let mut buffer = FrameBuffer::new(16, 16);
        let shaded = render_frame(&camera, &scene, &parallel, &pool(4), &mut buffer);

        assert_eq!(shaded, 256);
        assert_eq!(buffer.pixels, expected.pixels);
    }
}
