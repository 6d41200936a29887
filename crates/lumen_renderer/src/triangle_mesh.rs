//! Triangle mesh primitive.
//!
//! Vertices are transformed once at construction and never change. Each face
//! keeps its flat normal plus one normal per corner; corner normals are
//! either the flat normal or, when smoothing is enabled, the average of the
//! flat normals of nearby faces sharing that vertex.
//!
//! Intersection solves the ray/triangle system directly for the barycentric
//! coordinates and distance, scanning every face.

use std::sync::Arc;

use lumen_core::{Material, Mesh};
use lumen_math::{GeometricTransform, Interval, Mat3, Ray, Vec3};

use crate::hittable::{Hit, Hittable};
use crate::refraction::{refract, RefractionError};
use crate::world::SceneError;

/// Cutoffs below this (radians) disable smoothing.
const MIN_SMOOTHING_CUTOFF: f64 = 1e-3;

/// A new hit replaces the current best unless it is farther by more than this.
/// The reported hit point is also pulled back along the ray by this amount.
const HIT_BIAS: f64 = 1e-5;

/// |det| below this means the ray is parallel to the face (or the face is degenerate).
const MIN_DETERMINANT: f64 = 1e-14;

/// Offset of the internal refraction ray origin along the incoming ray.
const INTERNAL_OFFSET: f64 = 1e-4;

/// Offset of the exit ray origin along the internal ray.
const EXIT_OFFSET: f64 = 1e-3;

#[derive(Debug, Clone, Copy)]
struct MeshFace {
    indices: [usize; 3],
    material: usize,
    true_normal: Vec3,
    corner_normals: [Vec3; 3],
}

/// A mesh of triangles sharing one vertex buffer.
pub struct TriangleMesh {
    vertices: Vec<Vec3>,
    faces: Vec<MeshFace>,
    materials: Vec<Arc<Material>>,
}

/// Solve `[v1-v2 | v1-v3 | dir] * (beta, gamma, t) = v1 - origin`.
///
/// Returns `(beta, gamma, t)`, or `None` when the system is singular.
/// Acceptance (inside the triangle, in front of the ray) is left to the caller.
pub fn solve_triangle(vertices: [Vec3; 3], ray: &Ray) -> Option<(f64, f64, f64)> {
    let [v1, v2, v3] = vertices;
    let system = Mat3::from_cols(v1 - v2, v1 - v3, ray.direction());
    if system.determinant().abs() < MIN_DETERMINANT {
        return None;
    }

    let solution = system.inverse() * (v1 - ray.origin());
    Some((solution.x, solution.y, solution.z))
}

impl TriangleMesh {
    /// Build a mesh from loaded data, transforming every vertex and
    /// computing normals.
    ///
    /// `smoothing_cutoff` is the largest angle (radians) between two faces'
    /// flat normals for them to be blended at a shared vertex.
    pub fn new(
        mesh: Mesh,
        transform: &GeometricTransform,
        smoothing_cutoff: f64,
    ) -> Result<Self, SceneError> {
        let Mesh {
            vertices,
            faces,
            materials,
        } = mesh;

        let vertices: Vec<Vec3> = vertices
            .into_iter()
            .map(|v| transform.apply_point(v))
            .collect();

        // Per-vertex incident faces, built while validating the faces
        let mut incident: Vec<Vec<usize>> = vec![Vec::new(); vertices.len()];
        let mut mesh_faces = Vec::with_capacity(faces.len());

        for (face_index, face) in faces.iter().enumerate() {
            if face.material >= materials.len() {
                return Err(SceneError::InvalidFace {
                    face: face_index,
                    message: format!("material index {} out of range", face.material),
                });
            }
            for &vertex in &face.indices {
                let Some(list) = incident.get_mut(vertex) else {
                    return Err(SceneError::InvalidFace {
                        face: face_index,
                        message: format!("vertex index {vertex} out of range"),
                    });
                };
                list.push(face_index);
            }

            let [v1, v2, v3] = face.indices.map(|i| vertices[i]);
            let true_normal = (v1 - v2).cross(v1 - v3).normalize_or_zero();
            if true_normal == Vec3::ZERO {
                log::warn!("Face {face_index} is degenerate and will never be hit");
            }

            mesh_faces.push(MeshFace {
                indices: face.indices,
                material: face.material,
                true_normal,
                corner_normals: [true_normal; 3],
            });
        }

        if smoothing_cutoff >= MIN_SMOOTHING_CUTOFF {
            let smoothed: Vec<[Vec3; 3]> = mesh_faces
                .iter()
                .map(|face| {
                    face.indices.map(|vertex| {
                        incident[vertex]
                            .iter()
                            .map(|&other| mesh_faces[other].true_normal)
                            .filter(|other| {
                                let cosine = other.dot(face.true_normal).clamp(-1.0, 1.0);
                                cosine.acos() <= smoothing_cutoff
                            })
                            .sum::<Vec3>()
                            .normalize_or_zero()
                    })
                })
                .collect();

            for (face, normals) in mesh_faces.iter_mut().zip(smoothed) {
                face.corner_normals = normals;
            }
        }

        log::debug!(
            "Built mesh: {} vertices, {} faces, {} materials, smoothing {}",
            vertices.len(),
            mesh_faces.len(),
            materials.len(),
            if smoothing_cutoff >= MIN_SMOOTHING_CUTOFF {
                "on"
            } else {
                "off"
            }
        );

        Ok(Self {
            vertices,
            faces: mesh_faces,
            materials,
        })
    }

    /// Transformed vertex positions.
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Flat normal of a face.
    pub fn true_normal(&self, face: usize) -> Vec3 {
        self.faces[face].true_normal
    }

    /// Corner normals of a face, in the face's winding order.
    pub fn corner_normals(&self, face: usize) -> [Vec3; 3] {
        self.faces[face].corner_normals
    }

    fn face_hit<'a>(&'a self, face: &MeshFace, ray: &Ray, max_distance: f64) -> Option<Hit<'a>> {
        let corners = face.indices.map(|i| self.vertices[i]);
        let (beta, gamma, distance) = solve_triangle(corners, ray)?;

        let inside = beta > 0.0 && gamma > 0.0 && beta + gamma < 1.0;
        if !inside
            || !Interval::ahead(max_distance)
                .with_bias(HIT_BIAS)
                .surrounds(distance)
        {
            return None;
        }

        let [n1, n2, n3] = face.corner_normals;
        let mut normal = (n1 * (1.0 - beta - gamma) + n2 * beta + n3 * gamma).normalize_or_zero();
        if ray.direction().dot(normal) > 0.0 {
            normal = -normal;
        }

        Some(Hit {
            point: ray.at(distance - HIT_BIAS),
            normal,
            distance,
            material: &self.materials[face.material],
            object: self,
        })
    }
}

impl Hittable for TriangleMesh {
    fn intersect_nearest<'a>(&'a self, ray: &Ray, max_distance: f64) -> Option<Hit<'a>> {
        let mut closest: Option<Hit<'a>> = None;
        for face in &self.faces {
            let limit = closest.map_or(max_distance, |hit| hit.distance);
            if let Some(hit) = self.face_hit(face, ray, limit) {
                closest = Some(hit);
            }
        }
        closest
    }

    fn intersect_any<'a>(&'a self, ray: &Ray, max_distance: f64) -> Option<Hit<'a>> {
        self.faces
            .iter()
            .find_map(|face| self.face_hit(face, ray, max_distance))
    }

    fn exit_refraction(&self, ray: &Ray, hit: &Hit) -> Result<Ray, RefractionError> {
        let eta = hit.material.refractive_index;
        let inside_dir = refract(-ray.direction(), hit.normal, 1.0, eta)?;
        let internal = Ray::new(hit.point + ray.direction() * INTERNAL_OFFSET, inside_dir);

        let exit_hit = self
            .intersect_nearest(&internal, f64::INFINITY)
            .ok_or(RefractionError::NoExitSurface)?;
        let exit_dir = refract(-internal.direction(), exit_hit.normal, eta, 1.0)?;

        Ok(Ray::new(
            exit_hit.point + internal.direction() * EXIT_OFFSET,
            exit_dir,
        ))
    }

    fn face_count(&self) -> usize {
        self.faces.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::Face;

    fn material(index: f64) -> Arc<Material> {
        Arc::new(Material {
            refractive_index: index,
            ..Material::default()
        })
    }

    fn single_triangle() -> TriangleMesh {
        let mesh = Mesh {
            vertices: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            faces: vec![Face { indices: [0, 1, 2], material: 0 }],
            materials: vec![material(0.0)],
        };
        TriangleMesh::new(mesh, &GeometricTransform::identity(), 0.0).unwrap()
    }

    /// Axis-aligned cube from -1 to 1, outward winding.
    fn cube(index: f64) -> TriangleMesh {
        let vertices = vec![
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
        ];
        let quads = [
            [4, 5, 6, 7],
            [1, 0, 3, 2],
            [5, 1, 2, 6],
            [0, 4, 7, 3],
            [7, 6, 2, 3],
            [0, 1, 5, 4],
        ];
        let faces = quads
            .iter()
            .flat_map(|[a, b, c, d]| {
                [
                    Face { indices: [*a, *b, *c], material: 0 },
                    Face { indices: [*a, *c, *d], material: 0 },
                ]
            })
            .collect();
        let mesh = Mesh {
            vertices,
            faces,
            materials: vec![material(index)],
        };
        TriangleMesh::new(mesh, &GeometricTransform::identity(), 0.0).unwrap()
    }

    #[test]
    fn test_solve_triangle_barycentric() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let (beta, gamma, t) = solve_triangle([Vec3::ZERO, Vec3::X, Vec3::Y], &ray).unwrap();

        assert!((beta - 0.25).abs() < 1e-12);
        assert!((gamma - 0.25).abs() < 1e-12);
        assert!((t - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_solve_triangle_point_consistency() {
        let corners = [
            Vec3::new(0.5, -1.0, 2.0),
            Vec3::new(3.0, 0.5, 1.0),
            Vec3::new(-1.0, 2.0, 0.0),
        ];
        let ray = Ray::new(Vec3::new(0.2, 0.1, 6.0), Vec3::new(0.1, 0.2, -1.0));
        let (beta, gamma, t) = solve_triangle(corners, &ray).unwrap();

        let [v1, v2, v3] = corners;
        let barycentric = v1 * (1.0 - beta - gamma) + v2 * beta + v3 * gamma;
        assert!((ray.at(t) - barycentric).length() < 1e-9);
    }

    #[test]
    fn test_solve_triangle_parallel_ray_is_singular() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::X);
        assert!(solve_triangle([Vec3::ZERO, Vec3::X, Vec3::Y], &ray).is_none());
    }

    #[test]
    fn test_triangle_hit() {
        let mesh = single_triangle();
        let ray = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::new(0.0, 0.0, -1.0));

        let hit = mesh.intersect_nearest(&ray, f64::INFINITY).unwrap();
        assert!((hit.distance - 1.0).abs() < 1e-12);
        assert!((hit.normal - Vec3::Z).length() < 1e-12);
        // Hit point is pulled back toward the ray origin
        assert!((hit.point - Vec3::new(0.25, 0.25, HIT_BIAS)).length() < 1e-12);
        assert!(!hit.object.always_reflects_at_grazing_angle());
    }

    #[test]
    fn test_triangle_back_face_normal_opposes_ray() {
        let mesh = single_triangle();
        let ray = Ray::new(Vec3::new(0.25, 0.25, -1.0), Vec3::Z);

        let hit = mesh.intersect_nearest(&ray, f64::INFINITY).unwrap();
        assert!((hit.normal + Vec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_triangle_miss_outside_and_behind() {
        let mesh = single_triangle();

        let outside = Ray::new(Vec3::new(0.75, 0.75, 1.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(mesh.intersect_nearest(&outside, f64::INFINITY).is_none());

        let behind = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::Z);
        assert!(mesh.intersect_nearest(&behind, f64::INFINITY).is_none());

        let too_far = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(mesh.intersect_nearest(&too_far, 0.5).is_none());
    }

    #[test]
    fn test_nearest_picks_closest_face() {
        let mesh = cube(0.0);
        let ray = Ray::new(Vec3::new(0.3, 0.1, 5.0), Vec3::new(0.0, 0.0, -1.0));

        let hit = mesh.intersect_nearest(&ray, f64::INFINITY).unwrap();
        assert!((hit.distance - 4.0).abs() < 1e-9);
        assert!((hit.normal - Vec3::Z).length() < 1e-9);

        // Any hit is fine for shadows, but it must exist
        assert!(mesh.intersect_any(&ray, f64::INFINITY).is_some());
        assert_eq!(mesh.face_count(), 12);
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let mesh = cube(0.0);
        let centroid_dir = |face: usize| {
            let corners = mesh.faces[face].indices.map(|i| mesh.vertices()[i]);
            (corners[0] + corners[1] + corners[2]) / 3.0
        };
        for face in 0..mesh.face_count() {
            assert!(mesh.true_normal(face).dot(centroid_dir(face)) > 0.0);
        }
    }

    #[test]
    fn test_transform_applied_to_vertices() {
        let mesh = Mesh {
            vertices: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            faces: vec![Face { indices: [0, 1, 2], material: 0 }],
            materials: vec![material(0.0)],
        };
        let transform =
            GeometricTransform::new(Vec3::Z, 0.0, 2.0, Vec3::new(0.0, 0.0, -3.0)).unwrap();
        let mesh = TriangleMesh::new(mesh, &transform, 0.0).unwrap();

        assert!((mesh.vertices()[1] - Vec3::new(2.0, 0.0, -3.0)).length() < 1e-12);
        assert!((mesh.vertices()[2] - Vec3::new(0.0, 2.0, -3.0)).length() < 1e-12);
    }

    fn roof(cutoff_degrees: f64) -> TriangleMesh {
        // Two faces meeting at a right angle along the edge (0,0,0)-(1,0,0)
        let mesh = Mesh {
            vertices: vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z],
            faces: vec![
                Face { indices: [0, 1, 2], material: 0 },
                Face { indices: [1, 0, 3], material: 0 },
            ],
            materials: vec![material(0.0)],
        };
        TriangleMesh::new(
            mesh,
            &GeometricTransform::identity(),
            cutoff_degrees.to_radians(),
        )
        .unwrap()
    }

    #[test]
    fn test_flat_normals_below_cutoff() {
        let mesh = roof(30.0);
        assert_eq!(mesh.corner_normals(0), [Vec3::Z; 3]);
        assert_eq!(mesh.corner_normals(1), [Vec3::Y; 3]);
    }

    #[test]
    fn test_smoothed_normals_blend_shared_vertices() {
        let mesh = roof(100.0);
        let blended = Vec3::new(0.0, 1.0, 1.0).normalize();

        let [a0, a1, a2] = mesh.corner_normals(0);
        assert!((a0 - blended).length() < 1e-12);
        assert!((a1 - blended).length() < 1e-12);
        // Vertex 2 belongs only to the first face
        assert!((a2 - Vec3::Z).length() < 1e-12);

        let [b0, b1, b2] = mesh.corner_normals(1);
        assert!((b0 - blended).length() < 1e-12);
        assert!((b1 - blended).length() < 1e-12);
        assert!((b2 - Vec3::Y).length() < 1e-12);

        for face in 0..2 {
            for normal in mesh.corner_normals(face) {
                assert!((normal.length() - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_smoothed_hit_normal_is_interpolated() {
        let mesh = roof(100.0);
        // Near the shared edge the normal leans toward the blended one
        let ray = Ray::new(Vec3::new(0.2, 0.05, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = mesh.intersect_nearest(&ray, f64::INFINITY).unwrap();

        assert!((hit.normal.length() - 1.0).abs() < 1e-12);
        assert!(hit.normal.y > 0.0);
        assert!(hit.normal.z > hit.normal.y);
    }

    #[test]
    fn test_invalid_faces_rejected() {
        let bad_vertex = Mesh {
            vertices: vec![Vec3::ZERO, Vec3::X],
            faces: vec![Face { indices: [0, 1, 2], material: 0 }],
            materials: vec![material(0.0)],
        };
        assert!(matches!(
            TriangleMesh::new(bad_vertex, &GeometricTransform::identity(), 0.0),
            Err(SceneError::InvalidFace { face: 0, .. })
        ));

        let bad_material = Mesh {
            vertices: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            faces: vec![Face { indices: [0, 1, 2], material: 1 }],
            materials: vec![material(0.0)],
        };
        assert!(TriangleMesh::new(bad_material, &GeometricTransform::identity(), 0.0).is_err());
    }

    #[test]
    fn test_exit_refraction_through_cube() {
        let mesh = cube(1.5);
        let ray = Ray::new(Vec3::new(0.3, 0.1, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = mesh.intersect_nearest(&ray, f64::INFINITY).unwrap();

        let exit = mesh.exit_refraction(&ray, &hit).unwrap();
        assert!((exit.direction() - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-9);
        assert!((exit.origin() - Vec3::new(0.3, 0.1, -1.0)).length() < 1e-2);
        assert!(exit.origin().z < -1.0);
    }

    #[test]
    fn test_exit_refraction_open_surface_has_no_exit() {
        let mesh = Mesh {
            vertices: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            faces: vec![Face { indices: [0, 1, 2], material: 0 }],
            materials: vec![material(1.5)],
        };
        let mesh = TriangleMesh::new(mesh, &GeometricTransform::identity(), 0.0).unwrap();
        let ray = Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = mesh.intersect_nearest(&ray, f64::INFINITY).unwrap();

        assert_eq!(
            mesh.exit_refraction(&ray, &hit).unwrap_err(),
            RefractionError::NoExitSurface
        );
    }
}
