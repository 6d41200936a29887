//! Mesh data as loaded from an OBJ file.
//!
//! Vertices are untransformed and no normals are computed here; the
//! renderer's `TriangleMesh` does both once at construction.

use std::sync::Arc;

use lumen_math::Vec3;

use crate::scene::Material;

/// A triangle: three vertex indices and an index into the mesh materials.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    pub indices: [usize; 3],
    pub material: usize,
}

/// Vertex positions, triangles and the materials they reference.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Vertex positions in model space
    pub vertices: Vec<Vec3>,

    /// Triangles (polygons are fan-triangulated on load)
    pub faces: Vec<Face>,

    /// Materials from every `mtllib` the file named
    pub materials: Vec<Arc<Material>>,
}

impl Mesh {
    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in the mesh.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}
