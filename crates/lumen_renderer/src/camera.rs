//! Pinhole camera for primary ray generation.

use lumen_core::{CameraSetup, ImageBounds};
use lumen_math::{Ray, Vec3};
use thiserror::Error;

/// `up × w` shorter than this means `up` is (nearly) parallel to the view axis.
const MIN_BASIS_LENGTH: f64 = 1e-9;

/// Camera settings that cannot produce an image.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum CameraError {
    #[error("image resolution must be non-zero, got {0}x{1}")]
    ZeroResolution(u32, u32),

    #[error("focal length must be non-zero")]
    ZeroFocalLength,

    #[error("eye and look point coincide")]
    EyeAtLook,

    #[error("up vector is zero or parallel to the view direction")]
    DegenerateUp,
}

/// Camera for generating rays into the scene.
///
/// `w` points from the look point back toward the eye; `u` is image-right
/// and `v` image-up.
#[derive(Debug, Clone)]
pub struct Camera {
    eye: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    focal_length: f64,
    bounds: ImageBounds,
    width: u32,
    height: u32,
}

impl Camera {
    /// Build the camera basis, rejecting setups that would produce
    /// degenerate rays.
    pub fn new(setup: &CameraSetup) -> Result<Self, CameraError> {
        if setup.width == 0 || setup.height == 0 {
            return Err(CameraError::ZeroResolution(setup.width, setup.height));
        }
        if setup.focal_length == 0.0 {
            return Err(CameraError::ZeroFocalLength);
        }

        let w = (setup.eye - setup.look).normalize_or_zero();
        if w == Vec3::ZERO {
            return Err(CameraError::EyeAtLook);
        }
        let u = setup.up.cross(w);
        if u.length() < MIN_BASIS_LENGTH {
            return Err(CameraError::DegenerateUp);
        }
        let u = u.normalize();
        let v = w.cross(u);

        Ok(Self {
            eye: setup.eye,
            u,
            v,
            w,
            focal_length: setup.focal_length,
            bounds: setup.bounds,
            width: setup.width,
            height: setup.height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Ray through pixel (`col`, `row`); row 0 is the top of the image.
    ///
    /// The ray starts on the image plane, not at the eye.
    pub fn primary_ray(&self, col: u32, row: u32) -> Ray {
        let b = &self.bounds;
        let dist_x = if self.width > 1 {
            f64::from(col) / f64::from(self.width - 1) * (b.max_hor - b.min_hor) + b.min_hor
        } else {
            b.min_hor
        };
        let dist_y = if self.height > 1 {
            f64::from(row) / f64::from(self.height - 1) * (b.min_ver - b.max_ver) + b.max_ver
        } else {
            b.min_ver
        };

        let origin = self.eye - self.focal_length * self.w + dist_x * self.u + dist_y * self.v;
        Ray::new(origin, origin - self.eye)
    }
}
