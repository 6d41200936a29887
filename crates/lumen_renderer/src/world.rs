//! The immutable scene the shader traces against.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use lumen_core::{load_obj, Light, ObjectDesc, ParseError, SceneDescription};
use lumen_math::{Color, GeometricTransform, Ray, TransformError};
use rayon::prelude::*;
use thiserror::Error;

use crate::hittable::{Hit, Hittable, Primitive};
use crate::{Sphere, TriangleMesh};

/// Errors while building a [`World`].
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to load model '{}'", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("invalid transform for model '{}'", path.display())]
    Transform {
        path: PathBuf,
        #[source]
        source: TransformError,
    },

    #[error("invalid mesh '{}'", path.display())]
    Mesh {
        path: PathBuf,
        #[source]
        source: Box<SceneError>,
    },

    #[error("face {face}: {message}")]
    InvalidFace { face: usize, message: String },

    #[error("sphere radius must be positive, got {0}")]
    InvalidSphere(f64),
}

/// Counts reported before rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub spheres: usize,
    pub meshes: usize,
    pub faces: usize,
    pub lights: usize,
    pub recursion_level: u32,
}

impl fmt::Display for WorldStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} spheres, {} meshes ({} faces), {} lights, recursion level {}",
            self.spheres, self.meshes, self.faces, self.lights, self.recursion_level
        )
    }
}

/// Primitives, lights and global shading settings.
///
/// Built once before rendering, then shared read-only across threads.
pub struct World {
    primitives: Vec<Primitive>,
    lights: Vec<Light>,
    ambient: Color,
    recursion_level: u32,
    transparent_shadows: bool,
}

impl World {
    /// An empty world.
    pub fn new(ambient: Color, recursion_level: u32, transparent_shadows: bool) -> Self {
        Self {
            primitives: Vec::new(),
            lights: Vec::new(),
            ambient,
            recursion_level,
            transparent_shadows,
        }
    }

    /// Build a world from a parsed driver file.
    ///
    /// Models are loaded and transformed in parallel; object order is kept.
    pub fn from_description(desc: &SceneDescription) -> Result<Self, SceneError> {
        let primitives = desc
            .objects
            .par_iter()
            .map(build_primitive)
            .collect::<Result<Vec<_>, _>>()?;

        let world = Self {
            primitives,
            lights: desc.lights.clone(),
            ambient: desc.ambient,
            recursion_level: desc.recursion_level,
            transparent_shadows: desc.transparent_shadows,
        };
        log::info!("Built world: {}", world.stats());

        Ok(world)
    }

    pub fn add(&mut self, primitive: impl Into<Primitive>) {
        self.primitives.push(primitive.into());
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn ambient(&self) -> Color {
        self.ambient
    }

    pub fn recursion_level(&self) -> u32 {
        self.recursion_level
    }

    pub fn transparent_shadows(&self) -> bool {
        self.transparent_shadows
    }

    /// Nearest hit across every primitive.
    pub fn nearest_hit(&self, ray: &Ray) -> Option<Hit<'_>> {
        let mut closest: Option<Hit<'_>> = None;
        for primitive in &self.primitives {
            let limit = closest.map_or(f64::INFINITY, |hit| hit.distance);
            if let Some(hit) = primitive.intersect_nearest(ray, limit) {
                closest = Some(hit);
            }
        }
        closest
    }

    pub fn stats(&self) -> WorldStats {
        let mut stats = WorldStats {
            lights: self.lights.len(),
            recursion_level: self.recursion_level,
            ..WorldStats::default()
        };
        for primitive in &self.primitives {
            match primitive {
                Primitive::Sphere(_) => stats.spheres += 1,
                Primitive::Mesh(mesh) => {
                    stats.meshes += 1;
                    stats.faces += mesh.face_count();
                }
            }
        }
        stats
    }
}

fn build_primitive(object: &ObjectDesc) -> Result<Primitive, SceneError> {
    match object {
        ObjectDesc::Sphere(sphere) => {
            if sphere.radius <= 0.0 {
                return Err(SceneError::InvalidSphere(sphere.radius));
            }
            Ok(Sphere::new(sphere.center, sphere.radius, Arc::clone(&sphere.material)).into())
        }
        ObjectDesc::Model(model) => {
            let transform = GeometricTransform::new(
                model.axis,
                model.angle_degrees,
                model.scale,
                model.translation,
            )
            .map_err(|source| SceneError::Transform {
                path: model.path.clone(),
                source,
            })?;

            let mesh = load_obj(&model.path).map_err(|source| SceneError::Load {
                path: model.path.clone(),
                source,
            })?;
            let mesh = TriangleMesh::new(mesh, &transform, model.smoothing_cutoff).map_err(
                |source| SceneError::Mesh {
                    path: model.path.clone(),
                    source: Box::new(source),
                },
            )?;
            Ok(mesh.into())
        }
    }
}
