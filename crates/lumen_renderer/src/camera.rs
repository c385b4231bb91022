//! Pinhole camera and primary ray generation.

use crate::Ray;
use lumen_core::CameraConfig;
use lumen_math::DVec3;

/// Camera that emits one primary ray per pixel block.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: DVec3,
    /// Kept with the camera; primary rays always look down +Z.
    pub rotation: DVec3,
    /// Full field of view in radians
    pub fov: f64,
    /// Hits closer than this are ignored
    pub min_clip: f64,
    /// Deepest reflection/refraction level that is still shaded
    pub max_depth: u32,

    // Pixel block size, never below 1
    resolution: u32,
    rays: Vec<Ray>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl Camera {
    /// Create a camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera from its scene description.
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            position: config.position,
            rotation: config.rotation,
            fov: config.fov,
            min_clip: config.min_clip,
            max_depth: config.max_depth,
            resolution: config.resolution.max(1),
            rays: Vec::new(),
        }
    }

    /// Set camera position.
    pub fn with_position(mut self, position: DVec3) -> Self {
        self.position = position;
        self
    }

    /// Set field of view in radians.
    pub fn with_fov(mut self, fov: f64) -> Self {
        self.fov = fov;
        self
    }

    /// Set the near clip distance.
    pub fn with_clip(mut self, min_clip: f64) -> Self {
        self.min_clip = min_clip;
        self
    }

    /// Set the recursion limit.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the pixel block size.
    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.set_resolution(resolution);
        self
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Set the pixel block size, flooring at 1.
    pub fn set_resolution(&mut self, resolution: u32) {
        self.resolution = resolution.max(1);
    }

    /// Grow or shrink the pixel block size, flooring at 1.
    pub fn adjust_resolution(&mut self, delta: i32) {
        let resolution = (self.resolution as i64 + delta as i64).clamp(1, u32::MAX as i64);
        self.resolution = resolution as u32;
    }

    /// Translate the camera.
    pub fn move_by(&mut self, delta: DVec3) {
        self.position += delta;
    }

    /// Rays from the last call to [`Camera::generate_rays`], ordered by column.
    pub fn rays(&self) -> &[Ray] {
        &self.rays
    }

    /// Regenerate primary rays for a buffer of `2 * half_width` by
    /// `2 * half_height` pixels.
    ///
    /// One ray is emitted per `resolution × resolution` block, tagged with the
    /// block's top-left pixel. Columns are the outer loop, so the rays come out
    /// sorted by `x`.
    pub fn generate_rays(&mut self, half_width: u32, half_height: u32) {
        self.rays.clear();

        let width = half_width * 2;
        let height = half_height * 2;
        if width == 0 || height == 0 {
            return;
        }

        let hw = half_width as f64;
        let hh = half_height as f64;
        let aspect = width as f64 / height as f64;
        let half_fov = (self.fov / 2.0).tan();
        let x_inc = half_fov / hw;
        let y_inc = half_fov / hh / aspect;

        let step = self.resolution as usize;
        let columns = (width as usize).div_ceil(step);
        let rows = (height as usize).div_ceil(step);
        self.rays.reserve(columns * rows);

        for col in (0..width).step_by(step) {
            let i = col as f64 - hw;
            for row in (0..height).step_by(step) {
                let j = hh - row as f64;
                let direction = DVec3::new(x_inc * i, y_inc * j, 1.0).normalize();
                self.rays.push(Ray::primary(self.position, direction, col, row));
            }
        }

        log::trace!(
            "Generated {} rays for {}x{} at resolution {}",
            self.rays.len(),
            width,
            height,
            self.resolution
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_count_per_resolution() {
        let mut camera = Camera::new();

        camera.generate_rays(4, 4);
        assert_eq!(camera.rays().len(), 64);

        camera.set_resolution(2);
        camera.generate_rays(4, 4);
        assert_eq!(camera.rays().len(), 16);

        // Partial blocks at the edge still get a ray
        camera.set_resolution(3);
        camera.generate_rays(4, 4);
        assert_eq!(camera.rays().len(), 9);
    }

    #[test]
    fn test_resolution_floors_at_one() {
        let mut camera = Camera::new().with_resolution(0);
        assert_eq!(camera.resolution(), 1);

        camera.adjust_resolution(3);
        assert_eq!(camera.resolution(), 4);
        camera.adjust_resolution(-10);
        assert_eq!(camera.resolution(), 1);
    }

    #[test]
    fn test_directions_and_origin() {
        let position = DVec3::new(1.0, 2.0, -30.0);
        let mut camera = Camera::new().with_position(position).with_fov(std::f64::consts::FRAC_PI_2);
        camera.generate_rays(2, 2);

        for ray in camera.rays() {
            assert_eq!(ray.origin, position);
            assert!((ray.direction.length() - 1.0).abs() < 1e-12);
            assert!(ray.direction.z > 0.0);
            assert_eq!(ray.depth, 0);
        }

        // Top-left pixel looks left and up
        let corner = camera.rays()[0];
        assert_eq!((corner.x, corner.y), (0, 0));
        assert!(corner.direction.x < 0.0 && corner.direction.y > 0.0);

        // Pixel (hw, hh) looks straight ahead; tan(pi/4) = 1 so x_inc = 0.5
        let centre = camera.rays().iter().find(|r| r.x == 2 && r.y == 2).copied().unwrap();
        assert!((centre.direction - DVec3::Z).length() < 1e-12);
        let right = camera.rays().iter().find(|r| r.x == 3 && r.y == 2).copied().unwrap();
        assert!((right.direction - DVec3::new(0.5, 0.0, 1.0).normalize()).length() < 1e-12);
    }

    #[test]
    fn test_column_major_covering_every_block() {
        let mut camera = Camera::new().with_resolution(2);
        camera.generate_rays(3, 2);

        let pixels: Vec<(u32, u32)> = camera.rays().iter().map(|r| (r.x, r.y)).collect();
        assert_eq!(
            pixels,
            vec![(0, 0), (0, 2), (2, 0), (2, 2), (4, 0), (4, 2)]
        );
        assert!(camera.rays().windows(2).all(|w| w[0].x <= w[1].x));
    }

    #[test]
    fn test_regenerate_clears_previous_rays() {
        let mut camera = Camera::new();
        camera.generate_rays(4, 4);
        camera.generate_rays(1, 1);
        assert_eq!(camera.rays().len(), 4);

        camera.generate_rays(0, 5);
        assert!(camera.rays().is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = CameraConfig {
            resolution: 0,
            max_depth: 3,
            ..CameraConfig::default()
        };
        let camera = Camera::from_config(&config);
        assert_eq!(camera.resolution(), 1);
        assert_eq!(camera.max_depth, 3);
        assert_eq!(camera.position, config.position);
    }
}
