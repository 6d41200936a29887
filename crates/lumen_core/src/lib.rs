//! Lumen Core - scene description types and text formats.
//!
//! This crate provides:
//!
//! - **Scene types**: `SceneDescription`, `Material`, `Light`, `CameraSetup`
//! - **Mesh data**: `Mesh`, the untransformed vertex/face/material lists of a model
//! - **Formats**: the driver file, and the OBJ / MTL subsets models are written in
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::load_driver;
//!
//! let scene = load_driver("demos/glass_and_mirror.txt")?;
//! println!("{} lights, {} objects", scene.lights.len(), scene.objects.len());
//! ```

pub mod format;
pub mod mesh;
pub mod scene;

// Re-export commonly used types
pub use format::{load_driver, load_mtl, load_obj, parse_driver, ParseError, ParseResult};
pub use mesh::{Face, Mesh};
pub use scene::{
    CameraSetup, ImageBounds, Light, Material, ModelDesc, ObjectDesc, SceneDescription,
    SphereDesc,
};
