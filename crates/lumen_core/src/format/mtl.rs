//! MTL (material library) parser.
//!
//! Only the statements the shading model uses are read: `newmtl`, `Ka`,
//! `Kd`, `Ks`, `Ns`, `Ni`, `Tr` and `illum`. `Ks` sets the mirror
//! reflectance as well as the specular color.

use std::path::Path;

use super::{content_lines, read_file, ParseResult, Tokens};
use crate::scene::Material;

/// Load and parse a material library file.
pub fn load_mtl<P: AsRef<Path>>(path: P) -> ParseResult<Vec<Material>> {
    let path = path.as_ref();
    let content = read_file(path)?;
    let materials = parse_mtl(&content).map_err(|e| e.in_file(path))?;
    log::debug!("Loaded {} materials from {}", materials.len(), path.display());
    Ok(materials)
}

/// Parse material library content.
pub fn parse_mtl(content: &str) -> ParseResult<Vec<Material>> {
    let mut materials: Vec<Material> = Vec::new();

    for (line_num, line) in content_lines(content) {
        let mut tokens = Tokens::new(line_num, line);
        let statement = tokens.next_str()?;

        if statement.starts_with('#') {
            continue;
        }
        if statement == "newmtl" {
            materials.push(Material::new(tokens.rest()?));
            continue;
        }

        let Some(material) = materials.last_mut() else {
            return Err(tokens.error("material statement before any newmtl"));
        };

        match statement {
            "Ka" => material.ambient = tokens.next_vec3()?,
            "Kd" => material.diffuse = tokens.next_vec3()?,
            "Ks" => {
                material.specular = tokens.next_vec3()?;
                material.reflective = material.specular;
            }
            "Ns" => material.specular_exponent = tokens.next_f64()?,
            "Ni" => material.refractive_index = tokens.next_f64()?,
            "Tr" => material.transparency = tokens.next_vec3()?,
            "illum" => material.illumination_model = tokens.next_u32()?,
            other => log::debug!("Ignoring MTL statement '{}' on line {}", other, line_num),
        }
    }

    Ok(materials)
}
