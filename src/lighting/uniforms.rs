use gl::types::GLint;

use super::{Light, LightKind};
use crate::renderer::shader::UniformWriter;

/// Which shader struct a set of locations belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightSlot {
    Directional,
    Point(usize),
    Spot(usize),
}

/// Uniform locations for one light, resolved once after program link.
/// Fields a light kind doesn't have stay at -1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightLocations {
    pub color: GLint,
    pub ambient_intensity: GLint,
    pub diffuse_intensity: GLint,
    pub direction: GLint,
    pub position: GLint,
    pub quadratic: GLint,
    pub linear: GLint,
    pub constant: GLint,
    pub inner_radius: GLint,
    pub outer_radius: GLint,
    pub radius_sharpness: GLint,
    pub cutoff_cos: GLint,
}

impl Default for LightLocations {
    fn default() -> Self {
        Self {
            color: -1,
            ambient_intensity: -1,
            diffuse_intensity: -1,
            direction: -1,
            position: -1,
            quadratic: -1,
            linear: -1,
            constant: -1,
            inner_radius: -1,
            outer_radius: -1,
            radius_sharpness: -1,
            cutoff_cos: -1,
        }
    }
}

impl LightLocations {
    pub fn resolve(writer: &mut impl UniformWriter, slot: LightSlot) -> Self {
        let (base, point, own) = match slot {
            LightSlot::Directional => (
                "u_directional_light.base".to_string(),
                None,
                "u_directional_light".to_string(),
            ),
            LightSlot::Point(i) => {
                let own = format!("u_point_lights[{i}]");
                (format!("{own}.base"), Some(own.clone()), own)
            }
            LightSlot::Spot(i) => {
                let own = format!("u_spot_lights[{i}]");
                (format!("{own}.point.base"), Some(format!("{own}.point")), own)
            }
        };

        let mut locs = Self {
            color: writer.location(&format!("{base}.color")),
            ambient_intensity: writer.location(&format!("{base}.ambient_intensity")),
            diffuse_intensity: writer.location(&format!("{base}.diffuse_intensity")),
            ..Self::default()
        };

        if let Some(point) = point {
            locs.position = writer.location(&format!("{point}.position"));
            locs.quadratic = writer.location(&format!("{point}.quadratic"));
            locs.linear = writer.location(&format!("{point}.linear"));
            locs.constant = writer.location(&format!("{point}.constant"));
            locs.inner_radius = writer.location(&format!("{point}.inner_radius"));
            locs.outer_radius = writer.location(&format!("{point}.outer_radius"));
            locs.radius_sharpness = writer.location(&format!("{point}.radius_sharpness"));
        }

        if matches!(slot, LightSlot::Directional | LightSlot::Spot(_)) {
            locs.direction = writer.location(&format!("{own}.direction"));
        }
        if matches!(slot, LightSlot::Spot(_)) {
            locs.cutoff_cos = writer.location(&format!("{own}.cutoff_cos"));
        }

        locs
    }
}

impl Light {
    /// Write this light's state into the bound program.
    pub fn apply(&self, writer: &mut impl UniformWriter, locs: &LightLocations) {
        writer.write_vec4(locs.color, self.base.color);
        writer.write_float(locs.ambient_intensity, self.base.ambient_intensity);
        writer.write_float(locs.diffuse_intensity, self.base.diffuse_intensity);

        if let Some(point) = self.point_params() {
            writer.write_vec3(locs.position, point.position);
            writer.write_float(locs.quadratic, point.quadratic);
            writer.write_float(locs.linear, point.linear);
            writer.write_float(locs.constant, point.constant);
            writer.write_float(locs.inner_radius, point.inner_radius);
            writer.write_float(locs.outer_radius, point.outer_radius);
            writer.write_float(locs.radius_sharpness, point.radius_sharpness);
        }
        if let Some(direction) = self.direction() {
            writer.write_vec3(locs.direction, direction);
        }
        if let LightKind::Spot { cutoff_cos, .. } = self.kind {
            writer.write_float(locs.cutoff_cos, cutoff_cos);
        }
    }
}
