//! Scene model for the tracer.
//!
//! Objects keep two triangle lists: the untouched model-space triangles they
//! were built from, and world-space triangles derived from them through the
//! object's [`Transform`]. The world-space list is only ever rewritten by
//! [`Object::update`], which every transform mutation goes through.

use lumen_math::{rotate, Color, DVec3};
use serde::{Deserialize, Serialize};

use crate::mesh::Mesh;

/// How a surface is shaded when a ray hits it.
///
/// Parsed from a lowercase name. Names that are not recognised are kept as
/// `Unknown` so a misconfigured scene still renders (in magenta).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MaterialMode {
    /// Diffuse + specular lighting, reflection and refraction
    Lit,
    /// Flat material color
    Unlit,
    /// Flat material color; also lets shadow rays through
    Light,
    /// Barycentric coordinates visualised as color
    UvDebug,
    Unknown(String),
}

impl From<String> for MaterialMode {
    fn from(name: String) -> Self {
        match name.as_str() {
            "lit" => MaterialMode::Lit,
            "unlit" => MaterialMode::Unlit,
            "light" => MaterialMode::Light,
            "uv_debug" => MaterialMode::UvDebug,
            _ => MaterialMode::Unknown(name),
        }
    }
}

impl From<MaterialMode> for String {
    fn from(mode: MaterialMode) -> Self {
        match mode {
            MaterialMode::Lit => "lit".to_string(),
            MaterialMode::Unlit => "unlit".to_string(),
            MaterialMode::Light => "light".to_string(),
            MaterialMode::UvDebug => "uv_debug".to_string(),
            MaterialMode::Unknown(name) => name,
        }
    }
}

/// Surface description shared by every triangle of an object.
///
/// The four albedo coefficients weight the shading terms independently and
/// are not required to sum to one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Base color (RGB, 0-255)
    pub color: Color,

    /// Shading mode
    pub mode: MaterialMode,

    /// Index of refraction for transmitted rays (1.0 = air)
    pub refractive_index: f64,

    pub diffuse_albedo: f64,
    pub specular_albedo: f64,
    pub reflective_albedo: f64,
    pub refractive_albedo: f64,

    /// Phong exponent for the specular highlight
    pub specular_exponent: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::splat(255.0),
            mode: MaterialMode::Lit,
            refractive_index: 1.0,
            diffuse_albedo: 0.0,
            specular_albedo: 0.0,
            reflective_albedo: 0.0,
            refractive_albedo: 0.0,
            specular_exponent: 0.0,
        }
    }
}

impl Material {
    /// Create a material with a color and mode and no lighting weights.
    pub fn new(color: Color, mode: MaterialMode) -> Self {
        Self {
            color,
            mode,
            ..Default::default()
        }
    }

    /// Set diffuse, specular, reflective and refractive weights.
    pub fn with_albedo(mut self, diffuse: f64, specular: f64, reflective: f64, refractive: f64) -> Self {
        self.diffuse_albedo = diffuse;
        self.specular_albedo = specular;
        self.reflective_albedo = reflective;
        self.refractive_albedo = refractive;
        self
    }

    /// Set the index of refraction.
    pub fn with_refractive_index(mut self, refractive_index: f64) -> Self {
        self.refractive_index = refractive_index;
        self
    }

    /// Set the specular exponent.
    pub fn with_specular_exponent(mut self, specular_exponent: f64) -> Self {
        self.specular_exponent = specular_exponent;
        self
    }
}

/// A triangle with a derived unit normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub vertex_1: DVec3,
    pub vertex_2: DVec3,
    pub vertex_3: DVec3,
    /// normalize(cross(v2 - v1, v3 - v1)); NaN for zero-area triangles
    pub normal: DVec3,
}

impl Triangle {
    /// Create a triangle and compute its normal from the winding.
    pub fn new(vertex_1: DVec3, vertex_2: DVec3, vertex_3: DVec3) -> Self {
        Self {
            vertex_1,
            vertex_2,
            vertex_3,
            normal: Self::face_normal(vertex_1, vertex_2, vertex_3),
        }
    }

    /// Unit normal of the face. Unguarded: a degenerate triangle
    /// divides by zero and yields a non-finite normal.
    pub fn face_normal(vertex_1: DVec3, vertex_2: DVec3, vertex_3: DVec3) -> DVec3 {
        let direction = (vertex_2 - vertex_1).cross(vertex_3 - vertex_1);
        direction / direction.length()
    }
}

/// Placement of an object: non-uniform scale, Euler rotation, translation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    /// Translation
    pub position: DVec3,

    /// Euler angles in radians, applied X then Y then Z
    pub rotation: DVec3,

    /// Componentwise scale
    pub scale: DVec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            rotation: DVec3::ZERO,
            scale: DVec3::ONE,
        }
    }
}

impl Transform {
    /// Create a transform from all three components.
    pub fn new(position: DVec3, rotation: DVec3, scale: DVec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Create a new transform with only translation.
    pub fn from_position(position: DVec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Map a model-space point to world space.
    ///
    /// Order: Scale -> Rotate -> Translate
    #[inline]
    pub fn apply(&self, point: DVec3) -> DVec3 {
        rotate(point * self.scale, self.rotation) + self.position
    }

    /// Map a model-space triangle to world space and recompute its normal.
    pub fn apply_triangle(&self, triangle: &Triangle) -> Triangle {
        Triangle::new(
            self.apply(triangle.vertex_1),
            self.apply(triangle.vertex_2),
            self.apply(triangle.vertex_3),
        )
    }
}

/// Stable handle to an object in a [`Scene`] (its insertion index).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectId(pub usize);

/// A mesh instance with cached model-space and world-space triangles.
#[derive(Clone, Debug)]
pub struct Object {
    /// Name used in logs
    pub name: String,

    /// Surface material
    pub material: Material,

    transform: Transform,
    original_triangles: Vec<Triangle>,
    triangles: Vec<Triangle>,
}

impl Object {
    /// Create an object and derive its world-space triangles.
    pub fn new(name: impl Into<String>, transform: Transform, material: Material, triangles: Vec<Triangle>) -> Self {
        let mut object = Self {
            name: name.into(),
            material,
            transform,
            triangles: triangles.clone(),
            original_triangles: triangles,
        };
        object.update();
        object
    }

    /// Create an object from indexed mesh geometry.
    pub fn from_mesh(name: impl Into<String>, transform: Transform, material: Material, mesh: &Mesh) -> Self {
        Self::new(name, transform, material, mesh.triangles())
    }

    /// Recompute every world-space triangle from its model-space original.
    pub fn update(&mut self) {
        let transform = self.transform;
        for (triangle, original) in self.triangles.iter_mut().zip(&self.original_triangles) {
            *triangle = transform.apply_triangle(original);
        }
    }

    /// Current placement.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Edit the placement in place, then rebuild the world-space triangles.
    pub fn modify_transform(&mut self, edit: impl FnOnce(&mut Transform)) {
        edit(&mut self.transform);
        self.update();
    }

    /// World-space triangles.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Model-space triangles, as loaded.
    pub fn original_triangles(&self) -> &[Triangle] {
        &self.original_triangles
    }

    /// Whether this object is a light's marker geometry.
    pub fn is_light(&self) -> bool {
        self.material.mode == MaterialMode::Light
    }
}

/// A point light with a visible marker object.
#[derive(Clone, Debug)]
pub struct Light {
    pub position: DVec3,
    pub color: Color,
    pub intensity: f64,

    /// Marker geometry, kept at `position`
    pub object: ObjectId,
}

/// Objects and lights that make up a frame.
///
/// Object order is insertion order. Object 0 is the one the frame driver
/// animates.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// Scene name (usually from the description file)
    pub name: String,

    objects: Vec<Object>,
    lights: Vec<Light>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add an object to the scene and return its handle.
    pub fn add_object(&mut self, object: Object) -> ObjectId {
        let id = ObjectId(self.objects.len());
        log::debug!("Added object '{}' with {} triangles", object.name, object.triangles().len());
        self.objects.push(object);
        id
    }

    /// Add a light together with its cube marker, returning the light index.
    ///
    /// The marker is an unlit-style `Light` material cube of size `marker_scale`.
    pub fn add_light(&mut self, position: DVec3, marker_scale: DVec3, color: Color, intensity: f64) -> usize {
        let index = self.lights.len();
        let marker = Object::from_mesh(
            format!("light_{}", index),
            Transform::new(position, DVec3::ZERO, marker_scale),
            Material::new(color, MaterialMode::Light),
            &Mesh::cube(),
        );
        let object = self.add_object(marker);

        self.lights.push(Light {
            position,
            color,
            intensity,
            object,
        });
        index
    }

    /// Move a light and its marker object together.
    ///
    /// Returns false if `index` is not a light.
    pub fn set_light_position(&mut self, index: usize, position: DVec3) -> bool {
        let Some(light) = self.lights.get_mut(index) else {
            return false;
        };
        light.position = position;
        let marker = light.object;

        if let Some(object) = self.objects.get_mut(marker.0) {
            object.modify_transform(|transform| transform.position = position);
        }
        true
    }

    /// Edit an object's transform and rebuild its world-space triangles.
    ///
    /// Returns false if `id` does not name an object.
    pub fn transform_object(&mut self, id: ObjectId, edit: impl FnOnce(&mut Transform)) -> bool {
        match self.objects.get_mut(id.0) {
            Some(object) => {
                object.modify_transform(edit);
                true
            }
            None => false,
        }
    }

    /// Get an object by handle.
    pub fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.0)
    }

    /// All objects in insertion order.
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// All lights.
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Resolve a light's marker object.
    pub fn light_marker(&self, light: &Light) -> Option<&Object> {
        self.object(light.object)
    }

    /// Get total object count.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Get total triangle count across all objects.
    pub fn total_triangle_count(&self) -> usize {
        self.objects.iter().map(|object| object.triangles().len()).sum()
    }
}
