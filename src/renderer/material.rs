use gl::types::GLint;
use std::collections::HashMap;

use super::shader::UniformWriter;

/// Specular response of a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub specular_intensity: f32,
    pub shininess: f32,
}

impl Material {
    pub fn new(specular_intensity: f32, shininess: f32) -> Self {
        Self {
            specular_intensity,
            shininess,
        }
    }

    pub fn apply(&self, writer: &mut impl UniformWriter, specular_loc: GLint, shininess_loc: GLint) {
        writer.write_float(specular_loc, self.specular_intensity);
        writer.write_float(shininess_loc, self.shininess);
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

#[derive(Default)]
pub struct MaterialStore {
    materials: HashMap<String, Material>,
}

impl MaterialStore {
    pub fn insert(&mut self, name: &str, material: Material) {
        self.materials.insert(name.to_string(), material);
    }

    /// Unknown names resolve to a matte default.
    pub fn get(&self, name: &str) -> Material {
        self.materials.get(name).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::shader::tests::RecordingWriter;

    #[test]
    fn apply_writes_both_uniforms() {
        let mut w = RecordingWriter::default();
        let spec = w.location("u_material.specular_intensity");
        let shine = w.location("u_material.shininess");
        Material::new(5.0, 128.0).apply(&mut w, spec, shine);
        assert_eq!(w.float("u_material.specular_intensity"), Some(5.0));
        assert_eq!(w.float("u_material.shininess"), Some(128.0));
    }

    #[test]
    fn unknown_material_is_matte() {
        let mut store = MaterialStore::default();
        store.insert("Metal", Material::new(5.0, 128.0));
        assert_eq!(store.get("Metal").shininess, 128.0);
        assert_eq!(store.get("Velvet"), Material::default());
    }
}
