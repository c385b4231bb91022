//! Wavefront OBJ loader.
//!
//! Only vertex positions and faces are read. The loader is forgiving: any line
//! it cannot make sense of is skipped, and a face keeps just its first three
//! resolvable corners.
//!
//! # Supported Syntax
//!
//! - `v x y z` vertex position
//! - `f a/.. b/.. c/..` face, 1-based vertex index before the first `/`
//!
//! Faces written without any `/` separator are ignored, matching the meshes
//! this loader was written against.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use lumen_math::DVec3;
use thiserror::Error;

use crate::mesh::Mesh;

/// Errors that can occur while loading an OBJ file.
#[derive(Error, Debug)]
pub enum ObjError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for OBJ loading.
pub type ObjResult<T> = Result<T, ObjError>;

/// Load an OBJ file from disk.
pub fn load_obj<P: AsRef<Path>>(path: P) -> ObjResult<Mesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ObjError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mesh = parse_obj(BufReader::new(file))?;
    log::info!(
        "Loaded {:?}: {} vertices, {} triangles",
        path,
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Parse OBJ text from any buffered reader.
///
/// Lines are decoded lossily, so names or comments in a legacy encoding do
/// not stop the geometry from loading.
pub fn parse_obj<R: BufRead>(mut reader: R) -> ObjResult<Mesh> {
    let mut positions = Vec::new();
    let mut indices = Vec::new();
    let mut buffer = Vec::new();
    let mut line_number = 0;

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        line_number += 1;

        let decoded = String::from_utf8_lossy(&buffer);
        let line = decoded.trim_end_matches(|c: char| c == '\n' || c == '\r');

        if let Some(rest) = line.strip_prefix("v ") {
            match parse_vertex(rest) {
                Some(position) => positions.push(position),
                None => log::debug!("Skipping malformed vertex at line {}: {:?}", line_number, line),
            }
        } else if let Some(rest) = line.strip_prefix('f') {
            if !rest.starts_with(char::is_whitespace) || !rest.contains('/') {
                continue;
            }

            let corners: Vec<u32> = rest
                .split_whitespace()
                .filter_map(|corner| resolve_corner(corner, positions.len()))
                .take(3)
                .collect();

            if corners.len() < 3 {
                log::debug!("Skipping face with fewer than 3 vertices at line {}", line_number);
                continue;
            }
            indices.extend_from_slice(&corners);
        }
    }

    Ok(Mesh::new(positions, indices))
}

/// Parse the three coordinates following `v `.
fn parse_vertex(rest: &str) -> Option<DVec3> {
    let mut coords = rest.split_whitespace().map(|c| c.parse::<f64>());
    let x = coords.next()?.ok()?;
    let y = coords.next()?.ok()?;
    let z = coords.next()?.ok()?;
    Some(DVec3::new(x, y, z))
}

/// Turn a face corner such as `12/4/7` into a zero-based vertex index.
fn resolve_corner(corner: &str, vertex_count: usize) -> Option<u32> {
    let index: usize = corner.split('/').next()?.parse().ok()?;
    if index == 0 || index > vertex_count {
        return None;
    }
    u32::try_from(index - 1).ok()
}
