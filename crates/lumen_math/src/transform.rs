// Model placement transforms.
//
// A model line describes an axis-angle rotation, a uniform scale and a
// translation. They are composed once into a single homogeneous matrix that
// is applied to every vertex of the mesh at load time.

use glam::{DMat4 as Mat4, DVec3 as Vec3, DVec4 as Vec4};
use thiserror::Error;

/// Errors raised while building a [`GeometricTransform`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("rotation axis ({0}, {1}, {2}) has zero length")]
    ZeroAxis(f64, f64, f64),

    #[error("scale factor {0} must be finite and non-zero")]
    InvalidScale(f64),
}

/// Translate · Scale · Rotate, computed once and cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricTransform {
    matrix: Mat4,
}

impl GeometricTransform {
    /// Build a transform from a rotation axis (need not be unit length), an
    /// angle in degrees, a uniform scale and a translation.
    pub fn new(
        axis: Vec3,
        angle_degrees: f64,
        scale: f64,
        translation: Vec3,
    ) -> Result<Self, TransformError> {
        if !axis.is_finite() || axis.length_squared() == 0.0 {
            return Err(TransformError::ZeroAxis(axis.x, axis.y, axis.z));
        }
        if !scale.is_finite() || scale == 0.0 {
            return Err(TransformError::InvalidScale(scale));
        }

        let rotation = axis_angle_rotation(axis, angle_degrees);
        let scaling = Mat4::from_scale(Vec3::splat(scale));
        let translate = Mat4::from_translation(translation);

        Ok(Self {
            matrix: translate * scaling * rotation,
        })
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
        }
    }

    /// Apply to a point (w = 1, so translation is respected).
    pub fn apply_point(&self, point: Vec3) -> Vec3 {
        let transformed = self.matrix * Vec4::new(point.x, point.y, point.z, 1.0);
        transformed.truncate()
    }
}

impl Default for GeometricTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Orthonormal basis with `axis` as its local z, stored as matrix rows so
/// that multiplying a point by it expresses the point in that basis.
fn axis_basis(axis: Vec3) -> Mat4 {
    let z_axis = axis.normalize();

    // Any vector not parallel to the axis works as a helper.
    let mut helper = z_axis;
    if z_axis.x.abs() > 0.9 {
        helper.y = 1.0;
    } else {
        helper.x = 1.0;
    }

    let x_axis = z_axis.cross(helper).normalize();
    let y_axis = z_axis.cross(x_axis);

    Mat4::from_cols(
        x_axis.extend(0.0),
        y_axis.extend(0.0),
        z_axis.extend(0.0),
        Vec4::W,
    )
    .transpose()
}

/// Rᵗ · Rz(θ) · R: rotate into the axis frame, spin about z, rotate back.
fn axis_angle_rotation(axis: Vec3, angle_degrees: f64) -> Mat4 {
    let basis = axis_basis(axis);
    let spin = Mat4::from_rotation_z(angle_degrees.to_radians());
    basis.transpose() * spin * basis
}
