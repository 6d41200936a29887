//! Lumen Renderer - recursive ray tracing.
//!
//! Local Phong illumination with shadow rays, plus mirror reflection and
//! refraction through spheres and triangle meshes up to a fixed depth.
//! Primitives are scanned linearly; there is no acceleration structure.

mod bucket;
mod camera;
mod hittable;
mod output;
mod refraction;
mod renderer;
mod shading;
mod sphere;
mod triangle_mesh;
mod world;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::{Camera, CameraError};
pub use hittable::{Hit, Hittable, Primitive};
pub use output::{color_to_rgb, OutputError};
pub use refraction::{reflect, refract, RefractionError};
pub use renderer::{render, render_pixel, render_with_progress, ImageBuffer, RenderConfig};
pub use shading::{shade, shadow_coefficient};
pub use sphere::Sphere;
pub use triangle_mesh::{solve_triangle, TriangleMesh};
pub use world::{SceneError, World, WorldStats};

/// Re-export common math and scene types
pub use lumen_core::{Light, Material};
pub use lumen_math::{Color, Ray, Vec3};
