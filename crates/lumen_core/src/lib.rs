//! Lumen Core - scene model for the Lumen ray tracer.
//!
//! This crate provides:
//!
//! - **Scene model**: `Scene`, `Object`, `Light`, `Material`, `Triangle`
//! - **Transform pipeline**: `Object::update` rebuilds world-space triangles
//! - **Mesh input**: built-in primitives and a tolerant OBJ loader
//! - **Scene description**: JSON configuration via serde
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::SceneConfig;
//!
//! let config = SceneConfig::load("room.json")?;
//! let scene = config.build_scene(std::path::Path::new("."))?;
//! println!("Loaded {} objects, {} triangles",
//!     scene.object_count(),
//!     scene.total_triangle_count());
//! ```

pub mod config;
pub mod mesh;
pub mod obj;
pub mod scene;

// Re-export commonly used types
pub use config::{CameraConfig, ConfigError, ConfigResult, LightConfig, MeshSource, ObjectConfig, SceneConfig, ViewportConfig};
pub use mesh::Mesh;
pub use obj::{load_obj, parse_obj, ObjError, ObjResult};
pub use scene::{Light, Material, MaterialMode, Object, ObjectId, Scene, Transform, Triangle};
