//! Sphere primitive for ray tracing.

use std::sync::Arc;

use lumen_core::Material;
use lumen_math::{Interval, Ray, Vec3};

use crate::hittable::{Hit, Hittable};
use crate::refraction::{refract, RefractionError};

/// Discriminants below this count as a miss (tangent rays included).
const MIN_DISCRIMINANT: f64 = 1e-4;

/// A new hit replaces the current best unless it is farther by more than this.
const HIT_BIAS: f64 = 1e-3;

/// Offset of the exit ray origin past the far surface.
const EXIT_OFFSET: f64 = 1e-3;

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f64,
    material: Arc<Material>,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f64, material: Arc<Material>) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Hittable for Sphere {
    fn intersect_nearest<'a>(&'a self, ray: &Ray, max_distance: f64) -> Option<Hit<'a>> {
        let to_center = self.center - ray.origin();
        let projection = to_center.dot(ray.direction());
        let discriminant =
            self.radius * self.radius - (to_center.length_squared() - projection * projection);
        if discriminant < MIN_DISCRIMINANT {
            return None;
        }

        // Only the near root; rays starting inside the sphere miss it
        let distance = projection - discriminant.sqrt();
        if !Interval::ahead(max_distance)
            .with_bias(HIT_BIAS)
            .surrounds(distance)
        {
            return None;
        }

        let point = ray.at(distance);
        Some(Hit {
            point,
            normal: (point - self.center) / self.radius,
            distance,
            material: &self.material,
            object: self,
        })
    }

    fn intersect_any<'a>(&'a self, ray: &Ray, max_distance: f64) -> Option<Hit<'a>> {
        self.intersect_nearest(ray, max_distance)
    }

    fn exit_refraction(&self, ray: &Ray, hit: &Hit) -> Result<Ray, RefractionError> {
        let eta = hit.material.refractive_index;
        let inside = refract(-ray.direction(), hit.normal, 1.0, eta)?;

        // The chord through a sphere is symmetric about the center's projection
        let exit_point = hit.point + 2.0 * inside.dot(self.center - hit.point) * inside;
        let inward_normal = (self.center - exit_point).normalize();
        let exit_dir = refract(-inside, inward_normal, eta, 1.0)?;

        Ok(Ray::new(exit_point + EXIT_OFFSET * exit_dir, exit_dir))
    }

    fn always_reflects_at_grazing_angle(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glass(index: f64) -> Arc<Material> {
        Arc::new(Material {
            refractive_index: index,
            ..Material::default()
        })
    }

    fn unit_sphere() -> Sphere {
        Sphere::new(Vec3::ZERO, 1.0, glass(1.5))
    }

    #[test]
    fn test_sphere_hit_head_on() {
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        let hit = sphere.intersect_nearest(&ray, f64::INFINITY).unwrap();
        assert!((hit.distance - 4.0).abs() < 1e-12);
        assert!((hit.point - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-12);
        assert!((hit.normal - Vec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_sphere_hit_matches_quadratic_root() {
        let sphere = Sphere::new(Vec3::new(1.0, -2.0, 0.5), 2.5, glass(1.5));
        let ray = Ray::new(Vec3::new(-6.0, 1.0, 3.0), Vec3::new(1.0, -0.4, -0.2));

        // |o + t d - c|^2 = r^2 with unit d
        let oc = ray.origin() - sphere.center();
        let b = oc.dot(ray.direction());
        let c = oc.length_squared() - sphere.radius() * sphere.radius();
        let expected = -b - (b * b - c).sqrt();

        let hit = sphere.intersect_nearest(&ray, f64::INFINITY).unwrap();
        assert!((hit.distance - expected).abs() < 1e-9);
        assert!((hit.normal.length() - 1.0).abs() < 1e-12);
        assert!((hit.normal - (hit.point - sphere.center()) / sphere.radius()).length() < 1e-12);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::new(0.0, 2.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(sphere.intersect_nearest(&ray, f64::INFINITY).is_none());

        // Behind the origin
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(sphere.intersect_nearest(&ray, f64::INFINITY).is_none());
    }

    #[test]
    fn test_sphere_ray_from_inside_misses() {
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(sphere.intersect_nearest(&ray, f64::INFINITY).is_none());
    }

    #[test]
    fn test_sphere_respects_max_distance_with_bias() {
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        assert!(sphere.intersect_nearest(&ray, 3.0).is_none());
        // Slightly farther than the current best still wins within the bias
        assert!(sphere.intersect_nearest(&ray, 4.0 - 0.5 * HIT_BIAS).is_some());
        assert!(sphere.intersect_any(&ray, 4.5).is_some());
    }

    #[test]
    fn test_exit_refraction_head_on() {
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = sphere.intersect_nearest(&ray, f64::INFINITY).unwrap();

        let exit = sphere.exit_refraction(&ray, &hit).unwrap();
        assert!((exit.direction() - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-9);
        let expected_origin = Vec3::new(0.0, 0.0, -1.0 - EXIT_OFFSET);
        assert!((exit.origin() - expected_origin).length() < 1e-9);
    }

    #[test]
    fn test_exit_refraction_off_axis_is_parallel_shifted() {
        // A sphere acts like a lens; an off-axis ray exits bent toward the axis
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::new(0.0, 0.5, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = sphere.intersect_nearest(&ray, f64::INFINITY).unwrap();

        let exit = sphere.exit_refraction(&ray, &hit).unwrap();
        assert!((exit.direction().length() - 1.0).abs() < 1e-9);
        assert!(exit.direction().y < 0.0);
        assert!(exit.direction().z < 0.0);
        // Exit point lies on the far side of the sphere
        let exit_point = exit.origin() - EXIT_OFFSET * exit.direction();
        assert!((exit_point.length() - 1.0).abs() < 1e-9);
        assert!(exit_point.z < 0.0);
    }

    #[test]
    fn test_exit_refraction_grazing_is_total_internal_reflection() {
        let sphere = Sphere::new(Vec3::ZERO, 10.0, glass(1.5));
        // cos^2 of the incidence angle is 5e-5, below the feasibility threshold
        let ray = Ray::new(
            Vec3::new((100.0f64 - 0.005).sqrt(), 0.0, 20.0),
            Vec3::new(0.0, 0.0, -1.0),
        );
        let hit = sphere.intersect_nearest(&ray, f64::INFINITY).unwrap();

        assert_eq!(
            sphere.exit_refraction(&ray, &hit).unwrap_err(),
            RefractionError::TotalInternalReflection
        );
    }
}
