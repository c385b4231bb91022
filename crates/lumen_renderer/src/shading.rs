//! Recursive Whitted shading.
//!
//! Lit surfaces combine four weighted terms:
//! - diffuse and specular from every light that is not in shadow
//! - a mirror reflection ray
//! - a refracted (transmitted) ray
//!
//! Secondary rays recurse until the camera's depth limit. Light falls off
//! with the inverse square root of the total path length.

use lumen_core::{Material, MaterialMode, Scene};
use lumen_math::{reflect, refract, Color, DVec3Ext};

use crate::{nearest_hit, Camera, Hit, Ray, RenderConfig};

/// Channel ceiling applied to combined lit colors.
pub const MAX_CHANNEL: f64 = 255.0;

/// Returned for materials whose mode is not understood.
pub const MAGENTA: Color = Color::new(255.0, 0.0, 255.0);

const WHITE: Color = Color::splat(255.0);

/// Read-only view of everything needed to shade a ray.
///
/// Borrowed for the duration of one frame's shading pass and shared across
/// worker threads.
#[derive(Clone, Copy)]
pub struct Tracer<'a> {
    scene: &'a Scene,
    config: &'a RenderConfig,
    min_clip: f64,
    max_depth: u32,
}

impl<'a> Tracer<'a> {
    /// Create a tracer for one frame.
    pub fn new(scene: &'a Scene, camera: &Camera, config: &'a RenderConfig) -> Self {
        Self {
            scene,
            config,
            min_clip: camera.min_clip,
            max_depth: camera.max_depth,
        }
    }

    /// Closest hit along `ray`, honoring the camera clip distance.
    #[inline]
    pub fn nearest_hit(&self, ray: &Ray) -> Hit {
        nearest_hit(self.scene, ray, self.min_clip)
    }

    /// Compute the color seen along `ray`.
    pub fn shade(&self, ray: &Ray) -> Color {
        if ray.depth > self.max_depth {
            return self.config.background;
        }

        let hit = self.nearest_hit(ray);
        let Some(object) = hit.object.and_then(|id| self.scene.object(id)) else {
            return self.config.background;
        };

        let mut ray = *ray;
        ray.distance += hit.t();

        let material = &object.material;
        match &material.mode {
            MaterialMode::Lit => self.shade_lit(&ray, &hit, material),
            MaterialMode::Unlit | MaterialMode::Light => material.color,
            MaterialMode::UvDebug => uv_color(hit.u(), hit.v()),
            MaterialMode::Unknown(_) => MAGENTA,
        }
    }

    fn shade_lit(&self, ray: &Ray, hit: &Hit, material: &Material) -> Color {
        let (diffuse, specular) = self.direct_light(ray, hit, material);

        let reflected = if material.reflective_albedo > 0.0 {
            self.shade_reflection(ray, hit)
        } else {
            Color::ZERO
        };

        let refracted = if material.refractive_albedo > 0.0 {
            self.shade_refraction(ray, hit, material.refractive_index)
        } else {
            Color::ZERO
        };

        let color = material.color * diffuse * material.diffuse_albedo
            + WHITE * specular * material.specular_albedo
            + reflected * material.reflective_albedo
            + refracted * material.refractive_albedo;

        clamp_to_max(color)
    }

    /// Sum diffuse and specular intensity over the lights visible from the hit.
    fn direct_light(&self, ray: &Ray, hit: &Hit, material: &Material) -> (f64, f64) {
        let normal = hit.normal;
        let falloff = 1.0 / ray.distance.sqrt();

        let mut diffuse = 0.0;
        let mut specular = 0.0;

        for light in self.scene.lights() {
            let light_direction = (light.position - hit.position).normalize_or_unchanged();

            // Start on the same side of the surface as the light
            let bias = if light_direction.dot(normal) < 0.0 {
                -self.config.shadow_bias
            } else {
                self.config.shadow_bias
            };
            let shadow_ray = ray.shadow(hit.position + normal * bias, light_direction);

            if !self.is_visible(&shadow_ray) {
                continue;
            }

            diffuse += light.intensity * falloff * light_direction.dot(normal).max(0.0);

            let mirrored = -reflect(-light_direction, normal);
            specular += light.intensity
                * falloff
                * mirrored.dot(ray.direction).max(0.0).powf(material.specular_exponent);
        }

        (diffuse, specular)
    }

    /// A shadow ray reaches its light if it hits nothing, or if the first
    /// thing it hits is light marker geometry.
    fn is_visible(&self, shadow_ray: &Ray) -> bool {
        match self.nearest_hit(shadow_ray).object {
            None => true,
            Some(id) => self.scene.object(id).is_some_and(|object| object.is_light()),
        }
    }

    fn shade_reflection(&self, ray: &Ray, hit: &Hit) -> Color {
        let direction = reflect(ray.direction, hit.normal).normalize_or_unchanged();
        let bias = if direction.dot(hit.normal) < 0.0 {
            -self.config.reflection_bias
        } else {
            self.config.reflection_bias
        };

        self.shade(&ray.bounce(hit.position + hit.normal * bias, direction))
    }

    fn shade_refraction(&self, ray: &Ray, hit: &Hit, refractive_index: f64) -> Color {
        // Total internal reflection leaves a zero direction, which hits nothing
        let direction = refract(ray.direction, hit.normal, refractive_index).normalize_or_unchanged();
        let origin = hit.position + hit.normal * direction.dot(hit.normal);

        self.shade(&ray.bounce(origin, direction))
    }
}

/// Barycentric debug color.
#[inline]
pub fn uv_color(u: f64, v: f64) -> Color {
    let w = 1.0 - (u + v);
    Color::new(
        255.0 * w,
        255.0 * (1.0 - (u + w)),
        255.0 * (1.0 - (v + w)),
    )
}

/// Clamp each channel from above only; negative values pass through.
#[inline]
fn clamp_to_max(color: Color) -> Color {
    let clamp = |channel: f64| if channel > MAX_CHANNEL { MAX_CHANNEL } else { channel };
    Color::new(clamp(color.x), clamp(color.y), clamp(color.z))
}
