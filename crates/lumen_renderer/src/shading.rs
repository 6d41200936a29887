//! Recursive Whitted shading.
//!
//! Local Phong illumination (ambient, diffuse, specular) with shadow rays,
//! then mirror reflection and refraction traced recursively until the depth
//! budget runs out. Colors are never clamped here.

use lumen_math::{Color, Ray};

use crate::hittable::Hittable;
use crate::refraction::reflect;
use crate::world::World;

/// Shadow rays start this far along the light direction.
const SHADOW_RAY_OFFSET: f64 = 1e-8;

/// Below this cosine between the view direction and the normal, reflection is
/// skipped (unless the primitive always reflects).
const MIN_REFLECTION_COSINE: f64 = 0.1;

/// Color seen along `ray`, recursing at most `depth` more times.
pub fn shade(ray: &Ray, world: &World, depth: u32) -> Color {
    let Some(hit) = world.nearest_hit(ray) else {
        return Color::ZERO;
    };
    let material = hit.material;

    let mut color = world.ambient() * material.ambient;

    for light in world.lights() {
        let to_light = (light.position - hit.point).normalize_or_zero();
        let cosine = to_light.dot(hit.normal);
        if cosine <= 0.0 {
            continue;
        }

        let shadow_ray = Ray::new(hit.point + to_light * SHADOW_RAY_OFFSET, to_light);
        let light_distance = (light.position - shadow_ray.origin()).length();
        let shadow = shadow_coefficient(&shadow_ray, light_distance, world);
        if shadow == Color::ZERO {
            continue;
        }

        color += material.diffuse * light.color * cosine * shadow;

        let to_viewer = (ray.origin() - hit.point).normalize_or_zero();
        let specular_cosine = reflect(to_light, hit.normal).normalize_or_zero().dot(to_viewer);
        if specular_cosine > 0.0 {
            color += material.specular
                * light.color
                * specular_cosine.powf(material.specular_exponent)
                * shadow;
        }
    }

    if depth == 0 {
        return color;
    }

    if material.reflects() {
        let incoming = -ray.direction();
        if incoming.dot(hit.normal) >= MIN_REFLECTION_COSINE
            || hit.object.always_reflects_at_grazing_angle()
        {
            let reflected = Ray::new(hit.point, reflect(incoming, hit.normal));
            color += material.reflective * shade(&reflected, world, depth - 1);
        }
    }

    if material.refracts() {
        match hit.object.exit_refraction(ray, &hit) {
            Ok(exit) => color += material.transparency * shade(&exit, world, depth - 1),
            Err(err) => log::trace!("Dropping refraction at {}: {err}", hit.point),
        }
    }

    color
}

/// Per-channel attenuation of a light along `ray`, out to `light_distance`.
///
/// Every primitive is tested. Any occluder blocks the light completely unless
/// transparent shadows are on and it has non-zero transparency, in which case
/// its transparency multiplies the result.
pub fn shadow_coefficient(ray: &Ray, light_distance: f64, world: &World) -> Color {
    let mut coefficient = Color::ONE;
    for primitive in world.primitives() {
        let Some(hit) = primitive.intersect_any(ray, light_distance) else {
            continue;
        };
        if !world.transparent_shadows() || hit.material.is_opaque() {
            return Color::ZERO;
        }
        coefficient *= hit.material.transparency;
    }
    coefficient
}
