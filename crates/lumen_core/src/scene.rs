//! Scene description types.
//!
//! A `SceneDescription` is what the driver file says, before any mesh is
//! loaded or transformed. The renderer turns it into an immutable world.

use std::path::PathBuf;
use std::sync::Arc;

use lumen_math::{Color, Vec3};

/// Refractive indices at or below this value mean "opaque".
pub const MIN_REFRACTIVE_INDEX: f64 = 1e-4;

/// Phong-style surface material.
///
/// Shared by reference between every face or sphere that uses it and never
/// mutated once loaded.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Material name (from `newmtl`, empty for spheres)
    pub name: String,

    /// Ambient reflectance (Ka)
    pub ambient: Color,

    /// Diffuse reflectance (Kd)
    pub diffuse: Color,

    /// Specular reflectance (Ks)
    pub specular: Color,

    /// Mirror reflectance (Kr)
    pub reflective: Color,

    /// Transmission color (Tr)
    pub transparency: Color,

    /// Phong exponent (Ns)
    pub specular_exponent: f64,

    /// Illumination model tier, 0 through 6
    pub illumination_model: u32,

    /// Index of refraction (Ni), 0 for opaque
    pub refractive_index: f64,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            ambient: Color::ZERO,
            diffuse: Color::ZERO,
            specular: Color::ZERO,
            reflective: Color::ZERO,
            transparency: Color::ZERO,
            specular_exponent: 0.0,
            illumination_model: 6,
            refractive_index: 0.0,
        }
    }
}

impl Material {
    /// Create an empty material with a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Material for a driver-file sphere.
    ///
    /// Spheres carry no transparency of their own: whatever is not reflected
    /// is transmitted.
    pub fn for_sphere(
        ambient: Color,
        diffuse: Color,
        specular: Color,
        reflective: Color,
        refractive_index: f64,
    ) -> Self {
        Self {
            name: String::new(),
            ambient,
            diffuse,
            specular,
            reflective,
            transparency: Color::ONE - reflective,
            specular_exponent: 16.0,
            illumination_model: 6,
            refractive_index,
        }
    }

    /// True if the illumination model includes mirror reflection.
    pub fn reflects(&self) -> bool {
        self.illumination_model >= 3
    }

    /// True if the illumination model includes refraction and the index
    /// says the material is not opaque.
    pub fn refracts(&self) -> bool {
        self.illumination_model >= 6 && self.refractive_index > MIN_REFRACTIVE_INDEX
    }

    /// True if the material blocks all light passing through it.
    pub fn is_opaque(&self) -> bool {
        self.transparency == Color::ZERO
    }
}

/// A light source.
#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    /// Light position
    pub position: Vec3,

    /// Set when the driver file gives w = 0. The flag is kept but every light
    /// is shaded as a point light at `position`.
    pub at_infinity: bool,

    /// Light color
    pub color: Color,
}

/// Image plane extent in camera coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ImageBounds {
    pub min_hor: f64,
    pub max_hor: f64,
    pub min_ver: f64,
    pub max_ver: f64,
}

/// Camera placement and image plane, as written in the driver file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CameraSetup {
    pub eye: Vec3,
    pub look: Vec3,
    pub up: Vec3,
    /// Distance from the eye to the image plane (always non-negative)
    pub focal_length: f64,
    pub bounds: ImageBounds,
    pub width: u32,
    pub height: u32,
}

/// A sphere placed directly by the driver file.
#[derive(Clone, Debug, PartialEq)]
pub struct SphereDesc {
    pub center: Vec3,
    pub radius: f64,
    pub material: Arc<Material>,
}

/// A mesh model placed by the driver file.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelDesc {
    /// Rotation axis (need not be unit length)
    pub axis: Vec3,
    /// Rotation angle in degrees
    pub angle_degrees: f64,
    /// Uniform scale
    pub scale: f64,
    /// Translation applied last
    pub translation: Vec3,
    /// Smoothing angle cutoff in radians
    pub smoothing_cutoff: f64,
    /// OBJ file, already resolved against the driver file's directory
    pub path: PathBuf,
}

/// One renderable object, in driver-file order.
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectDesc {
    Sphere(SphereDesc),
    Model(ModelDesc),
}

/// Everything a driver file describes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneDescription {
    /// Camera and image plane
    pub camera: CameraSetup,

    /// Ambient light color
    pub ambient: Color,

    /// Light sources
    pub lights: Vec<Light>,

    /// Spheres and models in the order they were declared
    pub objects: Vec<ObjectDesc>,

    /// Maximum number of reflection/refraction bounces
    pub recursion_level: u32,

    /// When set, transparent occluders attenuate shadows instead of
    /// blocking them
    pub transparent_shadows: bool,
}

impl SceneDescription {
    /// Number of sphere objects.
    pub fn sphere_count(&self) -> usize {
        self.objects
            .iter()
            .filter(|o| matches!(o, ObjectDesc::Sphere(_)))
            .count()
    }

    /// Number of model objects.
    pub fn model_count(&self) -> usize {
        self.objects
            .iter()
            .filter(|o| matches!(o, ObjectDesc::Model(_)))
            .count()
    }
}
