//! Intersection capability shared by every primitive.
//!
//! A query takes a ray and the distance of the best hit found so far and
//! returns a new [`Hit`] by value when this primitive is closer. Nothing is
//! mutated on the ray.

use lumen_core::Material;
use lumen_math::{Ray, Vec3};

use crate::{RefractionError, Sphere, TriangleMesh};

/// Record of a ray-primitive intersection.
#[derive(Clone, Copy)]
pub struct Hit<'a> {
    /// Point of intersection
    pub point: Vec3,
    /// Unit surface normal (meshes always orient it against the ray)
    pub normal: Vec3,
    /// Distance along the ray
    pub distance: f64,
    /// Material at the intersection point
    pub material: &'a Material,
    /// The primitive that was hit
    pub object: &'a dyn Hittable,
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Nearest hit closer than `max_distance` (plus this primitive's bias).
    fn intersect_nearest<'a>(&'a self, ray: &Ray, max_distance: f64) -> Option<Hit<'a>>;

    /// Any hit closer than `max_distance`. Used for shadow rays, so it may
    /// return as soon as one is found.
    fn intersect_any<'a>(&'a self, ray: &Ray, max_distance: f64) -> Option<Hit<'a>>;

    /// The ray leaving this primitive after refracting in at `hit` and back
    /// out on the far side.
    fn exit_refraction(&self, ray: &Ray, hit: &Hit) -> Result<Ray, RefractionError>;

    /// Whether mirror reflection is traced even at near-grazing angles.
    fn always_reflects_at_grazing_angle(&self) -> bool {
        false
    }

    /// Number of triangles, for scene statistics.
    fn face_count(&self) -> usize {
        0
    }
}

/// Closed set of primitives a world can hold.
pub enum Primitive {
    Sphere(Sphere),
    Mesh(TriangleMesh),
}

impl Primitive {
    fn as_hittable(&self) -> &dyn Hittable {
        match self {
            Primitive::Sphere(sphere) => sphere,
            Primitive::Mesh(mesh) => mesh,
        }
    }
}

impl From<Sphere> for Primitive {
    fn from(sphere: Sphere) -> Self {
        Primitive::Sphere(sphere)
    }
}

impl From<TriangleMesh> for Primitive {
    fn from(mesh: TriangleMesh) -> Self {
        Primitive::Mesh(mesh)
    }
}

impl Hittable for Primitive {
    fn intersect_nearest<'a>(&'a self, ray: &Ray, max_distance: f64) -> Option<Hit<'a>> {
        self.as_hittable().intersect_nearest(ray, max_distance)
    }

    fn intersect_any<'a>(&'a self, ray: &Ray, max_distance: f64) -> Option<Hit<'a>> {
        self.as_hittable().intersect_any(ray, max_distance)
    }

    fn exit_refraction(&self, ray: &Ray, hit: &Hit) -> Result<Ray, RefractionError> {
        self.as_hittable().exit_refraction(ray, hit)
    }

    fn always_reflects_at_grazing_angle(&self) -> bool {
        self.as_hittable().always_reflects_at_grazing_angle()
    }

    fn face_count(&self) -> usize {
        self.as_hittable().face_count()
    }
}
