//! JSON scene description.
//!
//! A [`SceneConfig`] names materials, places objects and lights, and carries
//! the camera, viewport and worker settings. Every field has a default: the
//! collections start empty and the settings take the values of
//! [`SceneConfig::default`]. The built-in demo room is [`SceneConfig::demo`].
//!
//! ```json
//! {
//!   "materials": { "red": { "color": [255, 0, 0], "mode": "lit", "diffuse_albedo": 0.9 } },
//!   "objects": [
//!     { "name": "wall", "mesh": "plane", "material": "red",
//!       "transform": { "position": [-500, 0, 0], "rotation": [0, 0, -1.57], "scale": [500, 500, 500] } }
//!   ],
//!   "lights": [ { "position": [0, 500, 0], "marker_scale": [200, 10, 200], "intensity": 40 } ],
//!   "camera": { "position": [0, 0, -1410], "fov": 1.0, "resolution": 1 },
//!   "viewport": { "width": 1000, "height": 1000 },
//!   "workers": 20
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lumen_math::{Color, DVec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mesh::Mesh;
use crate::obj::{load_obj, ObjError};
use crate::scene::{Material, MaterialMode, Object, Scene, Transform};

/// Errors that can occur while reading a scene description.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read scene file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid scene description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Object '{object}' references unknown material '{material}'")]
    UnknownMaterial { object: String, material: String },

    #[error("Failed to load mesh for object '{object}': {source}")]
    Mesh {
        object: String,
        #[source]
        source: ObjError,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Where an object's triangles come from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshSource {
    /// Built-in [-1, 1] cube
    Cube,
    /// Built-in [-1, 1] square facing +Y
    Plane,
    /// OBJ file, relative paths resolve against the description's directory
    Obj(PathBuf),
}

/// One mesh instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectConfig {
    #[serde(default)]
    pub name: String,
    pub mesh: MeshSource,
    #[serde(default)]
    pub transform: Transform,
    pub material: String,
}

/// One point light and its marker cube.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub position: DVec3,
    pub marker_scale: DVec3,
    pub color: Color,
    pub intensity: f64,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            marker_scale: DVec3::ONE,
            color: Color::splat(255.0),
            intensity: 1.0,
        }
    }
}

/// Camera placement and sampling settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: DVec3,
    /// Stored with the camera but not applied to primary rays
    pub rotation: DVec3,
    /// Full field of view in radians
    pub fov: f64,
    /// Pixel block size per traced ray
    pub resolution: u32,
    /// Hits closer than this are ignored
    pub min_clip: f64,
    /// Deepest reflection/refraction level that is still shaded
    pub max_depth: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: DVec3::new(0.0, 0.0, -1410.0),
            rotation: DVec3::ZERO,
            fov: 1.0,
            resolution: 1,
            min_clip: 0.0,
            max_depth: 5,
        }
    }
}

/// Output image size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 1000,
        }
    }
}

/// Complete scene description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub name: String,
    pub materials: BTreeMap<String, Material>,
    pub objects: Vec<ObjectConfig>,
    pub lights: Vec<LightConfig>,
    pub camera: CameraConfig,
    pub viewport: ViewportConfig,
    /// Number of column bands rendered in parallel
    pub workers: usize,
    /// Color returned for misses and exhausted recursion
    pub background: Color,
}

impl Default for SceneConfig {
    /// An empty scene with default camera, viewport and render settings.
    fn default() -> Self {
        Self {
            name: "scene".to_string(),
            materials: BTreeMap::new(),
            objects: Vec::new(),
            lights: Vec::new(),
            camera: CameraConfig::default(),
            viewport: ViewportConfig::default(),
            workers: 20,
            background: Color::new(0.0, 0.0, 20.0),
        }
    }
}

impl SceneConfig {
    /// The demo room: a glass cube in a box with red and green side walls,
    /// a tilted mirror and a ceiling light.
    pub fn demo() -> Self {
        let materials = BTreeMap::from([
            (
                "default".to_string(),
                Material::new(Color::new(222.0, 222.0, 214.0), MaterialMode::Lit)
                    .with_albedo(0.6, 0.3, 0.0, 0.0)
                    .with_specular_exponent(10.0),
            ),
            (
                "glass".to_string(),
                Material::new(Color::splat(255.0), MaterialMode::Lit)
                    .with_refractive_index(1.6)
                    .with_albedo(0.3, 0.5, 0.2, 0.8)
                    .with_specular_exponent(10.0),
            ),
            (
                "red".to_string(),
                Material::new(Color::new(255.0, 0.0, 0.0), MaterialMode::Lit)
                    .with_albedo(0.9, 0.1, 0.0, 0.0)
                    .with_specular_exponent(10.0),
            ),
            (
                "green".to_string(),
                Material::new(Color::new(0.0, 255.0, 0.0), MaterialMode::Lit)
                    .with_albedo(0.9, 0.5, 0.1, 0.0)
                    .with_specular_exponent(100.0),
            ),
            (
                "mirror".to_string(),
                Material::new(Color::new(0.0, 255.0, 0.0), MaterialMode::Lit)
                    .with_albedo(0.0, 1.0, 0.7, 0.0)
                    .with_specular_exponent(2025.0),
            ),
        ]);

        let object = |name: &str, mesh: MeshSource, position: [f64; 3], rotation: [f64; 3], scale: [f64; 3], material: &str| {
            ObjectConfig {
                name: name.to_string(),
                mesh,
                transform: Transform::new(position.into(), rotation.into(), scale.into()),
                material: material.to_string(),
            }
        };

        let objects = vec![
            object("figure", MeshSource::Cube, [0.0, -300.0, 0.0], [0.0, 3.14, 0.0], [150.0, 200.0, 150.0], "glass"),
            object("floor", MeshSource::Plane, [0.0, -500.0, 0.0], [0.0, 0.0, 0.0], [500.0, 500.0, 500.0], "default"),
            object("back", MeshSource::Plane, [0.0, 0.0, 500.0], [1.57, 3.14, 0.0], [500.0, 500.0, 500.0], "default"),
            object("ceiling", MeshSource::Cube, [0.0, 500.0, 0.0], [0.0, 0.0, 0.0], [500.0, 1.0, 500.0], "default"),
            object("left", MeshSource::Plane, [-500.0, 0.0, 0.0], [0.0, 0.0, -1.57], [500.0, 500.0, 500.0], "red"),
            object("right", MeshSource::Plane, [500.0, 0.0, 0.0], [0.0, 0.0, 1.57], [500.0, 500.0, 500.0], "green"),
            object("mirror", MeshSource::Cube, [-250.0, 0.0, 250.0], [1.57, -1.57 / 2.0, 0.0], [500.0, 1.0, 500.0], "mirror"),
        ];

        let lights = vec![LightConfig {
            position: DVec3::new(0.0, 500.0, 0.0),
            marker_scale: DVec3::new(200.0, 10.0, 200.0),
            color: Color::splat(255.0),
            intensity: 40.0,
        }];

        Self {
            name: "demo".to_string(),
            materials,
            objects,
            lights,
            ..Self::default()
        }
    }

    /// Parse a scene description from JSON text.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a scene description file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded scene description {:?} ({} objects)", path, config.objects.len());
        Ok(config)
    }

    /// Build the scene: objects first, in order, then one marker object per light.
    ///
    /// OBJ paths are resolved relative to `base_dir`.
    pub fn build_scene(&self, base_dir: &Path) -> ConfigResult<Scene> {
        let mut scene = Scene::new(self.name.clone());

        for (index, config) in self.objects.iter().enumerate() {
            let name = if config.name.is_empty() {
                format!("object_{}", index)
            } else {
                config.name.clone()
            };

            let material = self
                .materials
                .get(&config.material)
                .cloned()
                .ok_or_else(|| ConfigError::UnknownMaterial {
                    object: name.clone(),
                    material: config.material.clone(),
                })?;

            if let MaterialMode::Unknown(mode) = &material.mode {
                log::warn!("Material '{}' has unknown mode '{}'", config.material, mode);
            }

            let mesh = match &config.mesh {
                MeshSource::Cube => Mesh::cube(),
                MeshSource::Plane => Mesh::plane(),
                MeshSource::Obj(path) => load_obj(base_dir.join(path)).map_err(|source| ConfigError::Mesh {
                    object: name.clone(),
                    source,
                })?,
            };

            scene.add_object(Object::from_mesh(name, config.transform, material, &mesh));
        }

        for light in &self.lights {
            scene.add_light(light.position, light.marker_scale, light.color, light.intensity);
        }

        log::info!(
            "Built scene '{}': {} objects, {} lights, {} triangles",
            scene.name,
            scene.object_count(),
            scene.lights().len(),
            scene.total_triangle_count()
        );
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::ObjectId;

    #[test]
    fn test_empty_document_is_empty_scene() {
        let config = SceneConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SceneConfig::default());
        assert!(config.materials.is_empty());
        assert!(config.objects.is_empty());
        assert!(config.lights.is_empty());
        assert_eq!(config.workers, 20);
        assert_eq!(config.background, Color::new(0.0, 0.0, 20.0));

        let scene = config.build_scene(Path::new(".")).unwrap();
        assert_eq!(scene.object_count(), 0);
    }

    #[test]
    fn test_omitted_lights_add_no_geometry() {
        let json = r#"{
            "materials": { "m": { "mode": "unlit" } },
            "objects": [ { "mesh": "cube", "material": "m" } ]
        }"#;
        let config = SceneConfig::from_json_str(json).unwrap();
        assert!(config.lights.is_empty());

        let scene = config.build_scene(Path::new(".")).unwrap();
        assert_eq!(scene.object_count(), 1);
        assert!(scene.lights().is_empty());
        assert!(!scene.objects()[0].is_light());
    }

    #[test]
    fn test_demo_scene_builds() {
        let scene = SceneConfig::demo().build_scene(Path::new(".")).unwrap();

        // 7 objects + 1 light marker
        assert_eq!(scene.object_count(), 8);
        assert_eq!(scene.lights().len(), 1);
        assert_eq!(scene.object(ObjectId(0)).unwrap().name, "figure");
        assert!(scene.light_marker(&scene.lights()[0]).unwrap().is_light());
    }

    #[test]
    fn test_parse_objects_and_modes() {
        let json = r#"{
            "materials": {
                "flat": { "color": [10, 20, 30], "mode": "unlit" },
                "odd": { "mode": "holographic" }
            },
            "objects": [
                { "name": "a", "mesh": "plane", "material": "flat",
                  "transform": { "position": [1, 2, 3] } },
                { "mesh": "cube", "material": "odd" }
            ],
            "camera": { "resolution": 4 },
            "workers": 2
        }"#;

        let config = SceneConfig::from_json_str(json).unwrap();
        assert_eq!(config.materials["flat"].mode, MaterialMode::Unlit);
        assert_eq!(
            config.materials["odd"].mode,
            MaterialMode::Unknown("holographic".to_string())
        );
        assert_eq!(config.objects[0].transform.scale, DVec3::ONE);
        assert_eq!(config.camera.resolution, 4);
        assert_eq!(config.camera.max_depth, 5);
        assert!(config.lights.is_empty());

        let scene = config.build_scene(Path::new(".")).unwrap();
        assert_eq!(scene.object(ObjectId(1)).unwrap().name, "object_1");
        assert_eq!(
            scene.object(ObjectId(0)).unwrap().transform().position,
            DVec3::new(1.0, 2.0, 3.0)
        );
    }

    #[test]
    fn test_unknown_material_is_an_error() {
        let json = r#"{ "objects": [ { "mesh": "cube", "material": "missing" } ] }"#;
        let config = SceneConfig::from_json_str(json).unwrap();
        let err = config.build_scene(Path::new(".")).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownMaterial { .. }));
    }

    #[test]
    fn test_missing_obj_is_an_error() {
        let json = r#"{
            "materials": { "m": {} },
            "objects": [ { "mesh": { "obj": "nowhere.obj" }, "material": "m" } ]
        }"#;
        let config = SceneConfig::from_json_str(json).unwrap();
        let err = config.build_scene(Path::new("/nonexistent")).unwrap_err();
        assert!(matches!(err, ConfigError::Mesh { .. }));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            SceneConfig::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
