//! Driver file parser.
//!
//! # Supported Syntax
//!
//! - `eye x y z`, `look x y z`, `up x y z`
//! - `d focal_length`
//! - `bounds min_hor max_hor min_ver max_ver`
//! - `res width height`
//! - `ambient r g b`
//! - `light x y z w r g b`
//! - `sphere cx cy cz radius ka(3) kd(3) ks(3) kr(3) ni`
//! - `model wx wy wz theta scale tx ty tz cutoff_degrees file.obj`
//! - `recursionlevel n`
//! - `transparentShadows 0|1`
//! - `# comment`

use std::path::Path;
use std::sync::Arc;

use super::{content_lines, read_file, ParseResult, Tokens};
use crate::scene::{Light, Material, ModelDesc, ObjectDesc, SceneDescription, SphereDesc};

/// Load and parse a driver file. Model paths are resolved against the
/// directory the driver file lives in.
pub fn load_driver<P: AsRef<Path>>(path: P) -> ParseResult<SceneDescription> {
    let path = path.as_ref();
    let content = read_file(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    parse_driver(&content, base_dir).map_err(|e| e.in_file(path))
}

/// Parse driver file content.
pub fn parse_driver(content: &str, base_dir: &Path) -> ParseResult<SceneDescription> {
    let mut scene = SceneDescription::default();

    for (line_num, line) in content_lines(content) {
        let mut tokens = Tokens::new(line_num, line);
        let directive = tokens.next_str()?;

        match directive {
            "eye" => scene.camera.eye = tokens.next_vec3()?,
            "look" => scene.camera.look = tokens.next_vec3()?,
            "up" => scene.camera.up = tokens.next_vec3()?,
            "d" => scene.camera.focal_length = tokens.next_f64()?.abs(),
            "bounds" => {
                let bounds = &mut scene.camera.bounds;
                bounds.min_hor = tokens.next_f64()?;
                bounds.max_hor = tokens.next_f64()?;
                bounds.min_ver = tokens.next_f64()?;
                bounds.max_ver = tokens.next_f64()?;
            }
            "res" => {
                scene.camera.width = tokens.next_u32()?;
                scene.camera.height = tokens.next_u32()?;
            }
            "ambient" => scene.ambient = tokens.next_vec3()?,
            "light" => scene.lights.push(parse_light(&mut tokens)?),
            "sphere" => scene.objects.push(ObjectDesc::Sphere(parse_sphere(&mut tokens)?)),
            "model" => scene
                .objects
                .push(ObjectDesc::Model(parse_model(&mut tokens, base_dir)?)),
            "recursionlevel" => scene.recursion_level = tokens.next_u32()?,
            "transparentShadows" => scene.transparent_shadows = tokens.next_f64()? == 1.0,
            comment if comment.starts_with('#') => {}
            other => {
                return Err(tokens.error(format!("driver file contains invalid directive '{other}'")))
            }
        }
    }

    log::debug!(
        "Parsed driver: {} lights, {} spheres, {} models, recursion level {}",
        scene.lights.len(),
        scene.sphere_count(),
        scene.model_count(),
        scene.recursion_level
    );

    Ok(scene)
}

fn parse_light(tokens: &mut Tokens) -> ParseResult<Light> {
    let position = tokens.next_vec3()?;
    let w = tokens.next_f64()?;
    let color = tokens.next_vec3()?;
    Ok(Light {
        position,
        at_infinity: w == 0.0,
        color,
    })
}

fn parse_sphere(tokens: &mut Tokens) -> ParseResult<SphereDesc> {
    let center = tokens.next_vec3()?;
    let radius = tokens.next_f64()?;
    if radius <= 0.0 {
        return Err(tokens.error(format!("sphere radius must be positive, found {radius}")));
    }
    let ambient = tokens.next_vec3()?;
    let diffuse = tokens.next_vec3()?;
    let specular = tokens.next_vec3()?;
    let reflective = tokens.next_vec3()?;
    let refractive_index = tokens.next_f64()?;

    Ok(SphereDesc {
        center,
        radius,
        material: Arc::new(Material::for_sphere(
            ambient,
            diffuse,
            specular,
            reflective,
            refractive_index,
        )),
    })
}

fn parse_model(tokens: &mut Tokens, base_dir: &Path) -> ParseResult<ModelDesc> {
    let axis = tokens.next_vec3()?;
    let angle_degrees = tokens.next_f64()?;
    let scale = tokens.next_f64()?;
    let translation = tokens.next_vec3()?;
    let cutoff_degrees = tokens.next_f64()?;
    let file = tokens.rest()?;

    Ok(ModelDesc {
        axis,
        angle_degrees,
        scale,
        translation,
        smoothing_cutoff: cutoff_degrees.to_radians(),
        path: base_dir.join(file),
    })
}
