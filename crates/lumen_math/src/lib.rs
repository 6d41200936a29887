//! Lumen math types.
//!
//! The renderer works in double precision throughout, so the glam `D*`
//! types are re-exported under their short names.

pub use glam::{DMat3 as Mat3, DMat4 as Mat4, DVec3 as Vec3, DVec4 as Vec4};

mod interval;
mod ray;
mod transform;

pub use interval::Interval;
pub use ray::Ray;
pub use transform::{GeometricTransform, TransformError};

/// RGB color, one linear channel per component.
pub type Color = Vec3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_is_double_precision() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let x: f64 = v.x;
        assert_eq!(x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_color_componentwise_product() {
        let a = Color::new(0.5, 1.0, 0.25);
        let b = Color::new(2.0, 0.5, 4.0);
        assert_eq!(a * b, Color::new(1.0, 0.5, 1.0));
    }
}
