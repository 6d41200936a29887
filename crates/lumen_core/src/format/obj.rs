//! Wavefront OBJ parser (geometry subset).
//!
//! # Supported Syntax
//!
//! - `v x y z`
//! - `f a b c ...` where each corner is `i`, `i/t`, `i//n` or `i/t/n`;
//!   only the vertex index is used, negative indices count from the end,
//!   and polygons are fan-triangulated
//! - `mtllib file.mtl` (relative to the OBJ file)
//! - `usemtl name`
//!
//! Normals, texture coordinates, groups and smoothing groups are ignored;
//! the renderer computes its own normals.

use std::path::Path;
use std::sync::Arc;

use super::{content_lines, load_mtl, read_file, ParseResult, Tokens};
use crate::mesh::{Face, Mesh};

/// Load and parse an OBJ file and every material library it names.
pub fn load_obj<P: AsRef<Path>>(path: P) -> ParseResult<Mesh> {
    let path = path.as_ref();
    let content = read_file(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    let mesh = parse_obj(&content, base_dir).map_err(|e| e.in_file(path))?;

    log::debug!(
        "Loaded {}: {} vertices, {} faces, {} materials",
        path.display(),
        mesh.vertex_count(),
        mesh.face_count(),
        mesh.materials.len()
    );

    Ok(mesh)
}

/// Parse OBJ content. `mtllib` paths are resolved against `base_dir`.
pub fn parse_obj(content: &str, base_dir: &Path) -> ParseResult<Mesh> {
    let mut mesh = Mesh::default();
    let mut current_material: Option<usize> = None;

    for (line_num, line) in content_lines(content) {
        let mut tokens = Tokens::new(line_num, line);
        let statement = tokens.next_str()?;

        match statement {
            "v" => mesh.vertices.push(tokens.next_vec3()?),
            "f" => {
                let material = current_material
                    .ok_or_else(|| tokens.error("face has no material (missing usemtl)"))?;
                let corners = parse_face_corners(&mut tokens, mesh.vertices.len())?;

                // Fan triangulation around the first corner
                for pair in corners[1..].windows(2) {
                    mesh.faces.push(Face {
                        indices: [corners[0], pair[0], pair[1]],
                        material,
                    });
                }
            }
            "mtllib" => {
                let file = tokens.rest()?;
                let materials = load_mtl(base_dir.join(file))?;
                mesh.materials.extend(materials.into_iter().map(Arc::new));
            }
            "usemtl" => {
                let name = tokens.rest()?;
                let index = mesh
                    .materials
                    .iter()
                    .position(|m| m.name == name)
                    .ok_or_else(|| tokens.error(format!("unknown material '{name}'")))?;
                current_material = Some(index);
            }
            _ => {}
        }
    }

    Ok(mesh)
}

/// Vertex indices (0-based) of every corner on an `f` line.
fn parse_face_corners(tokens: &mut Tokens, vertex_count: usize) -> ParseResult<Vec<usize>> {
    let mut corners = Vec::with_capacity(4);

    while let Some(corner) = tokens.next_opt() {
        let index_text = corner.split('/').next().unwrap_or(corner);
        let index: i64 = index_text
            .parse()
            .map_err(|_| tokens.error(format!("invalid vertex index '{corner}'")))?;

        let resolved = if index > 0 {
            index - 1
        } else {
            vertex_count as i64 + index
        };
        if index == 0 || resolved < 0 || resolved >= vertex_count as i64 {
            return Err(tokens.error(format!(
                "vertex index {index} out of range ({vertex_count} vertices defined)"
            )));
        }
        corners.push(resolved as usize);
    }

    if corners.len() < 3 {
        return Err(tokens.error("face needs at least three vertices"));
    }
    Ok(corners)
}
