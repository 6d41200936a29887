//! Snell's-law refraction and mirror reflection.
//!
//! Both helpers take the incoming direction pointing *away* from the surface
//! (the negated ray direction) and the normal on the incidence side.

use lumen_math::Vec3;
use thiserror::Error;

/// Radicands below this are treated as total internal reflection.
const MIN_RADICAND: f64 = 1e-4;

/// Why a refracted ray could not be produced.
///
/// Neither case is fatal; shading drops the refraction term.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RefractionError {
    #[error("refraction is not feasible (total internal reflection)")]
    TotalInternalReflection,

    #[error("refracted ray found no exit surface")]
    NoExitSurface,
}

/// Refract `incoming` through a surface with normal `normal`, going from a
/// medium with index `eta_from` into one with index `eta_to`.
///
/// Returns the transmitted direction, which points away from the surface on
/// the far side.
pub fn refract(
    incoming: Vec3,
    normal: Vec3,
    eta_from: f64,
    eta_to: f64,
) -> Result<Vec3, RefractionError> {
    let ratio = eta_from / eta_to;
    let cos_i = incoming.dot(normal);
    let radicand = ratio * ratio * (cos_i * cos_i - 1.0) + 1.0;
    if radicand < MIN_RADICAND {
        return Err(RefractionError::TotalInternalReflection);
    }

    Ok(-ratio * incoming + (ratio * cos_i - radicand.sqrt()) * normal)
}

/// Mirror `incoming` about `normal`: `2(v·n)n - v`.
#[inline]
pub fn reflect(incoming: Vec3, normal: Vec3) -> Vec3 {
    2.0 * incoming.dot(normal) * normal - incoming
}
