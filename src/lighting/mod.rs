//! Light types and their shading parameters.
//!
//! All lights share a [`LightBase`] (color, intensities, shadow map,
//! light-space projection). What differs per kind lives in [`LightKind`];
//! callers ask for capabilities (`position()`, `direction()`, `cone_cos()`)
//! instead of matching on the kind.

mod bounded;
mod directional;
mod uniforms;

pub use bounded::{BoundedLights, LightError, LightRig, MAX_POINT_LIGHTS, MAX_SPOT_LIGHTS};
pub use uniforms::{LightLocations, LightSlot};

use glam::{Mat4, Vec3, Vec4};

use crate::config::ShadowConfig;
use crate::error::Result;
use crate::renderer::shadow_map::ShadowMap;

/// State common to every light.
pub struct LightBase {
    pub color: Vec4,
    pub ambient_intensity: f32,
    pub diffuse_intensity: f32,
    pub shadow_map: ShadowMap,
    /// Orthographic projection of the shadow frustum. Never changes after
    /// construction.
    projection: Mat4,
    eye_distance: f32,
}

impl LightBase {
    pub fn new(
        color: Vec4,
        ambient_intensity: f32,
        diffuse_intensity: f32,
        shadow: &ShadowConfig,
    ) -> Result<Self> {
        Ok(Self {
            color,
            ambient_intensity,
            diffuse_intensity,
            shadow_map: ShadowMap::new(shadow.resolution, shadow.resolution)?,
            projection: directional::shadow_projection(shadow)?,
            eye_distance: shadow.eye_distance,
        })
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }
}

/// Distance attenuation plus the inner/outer radius falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointParams {
    pub position: Vec3,
    pub quadratic: f32,
    pub linear: f32,
    pub constant: f32,
    /// Full intensity up to this distance.
    pub inner_radius: f32,
    /// Zero intensity beyond this distance.
    pub outer_radius: f32,
    /// Exponent shaping the fade between the radii.
    pub radius_sharpness: f32,
}

impl PointParams {
    pub fn new(position: Vec3, quadratic: f32, linear: f32, constant: f32) -> Self {
        Self {
            position,
            quadratic,
            linear,
            constant,
            inner_radius: 1.0,
            outer_radius: 1.0,
            radius_sharpness: 5.0,
        }
    }

    pub fn with_radius(mut self, inner: f32, outer: f32, sharpness: f32) -> Self {
        self.inner_radius = inner;
        self.outer_radius = outer;
        self.radius_sharpness = sharpness;
        self
    }

    /// 1 / (q d^2 + l d + c). Mirrors `point_light_color` in lit.frag.
    #[cfg(test)]
    pub fn attenuation(&self, distance: f32) -> f32 {
        let denom = self.quadratic * distance * distance + self.linear * distance + self.constant;
        if denom <= f32::EPSILON {
            return 0.0;
        }
        1.0 / denom
    }

    /// Fade between the inner and outer radius. Mirrors `point_light_color`
    /// in lit.frag.
    #[cfg(test)]
    pub fn radius_falloff(&self, distance: f32) -> f32 {
        if distance <= self.inner_radius {
            return 1.0;
        }
        if distance >= self.outer_radius {
            return 0.0;
        }
        let t = (distance - self.inner_radius) / (self.outer_radius - self.inner_radius);
        (1.0 - t).powf(self.radius_sharpness)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Directional {
        direction: Vec3,
    },
    Point(PointParams),
    Spot {
        point: PointParams,
        direction: Vec3,
        cutoff_cos: f32,
    },
}

pub struct Light {
    pub base: LightBase,
    pub kind: LightKind,
}

impl Light {
    pub fn directional(base: LightBase, direction: Vec3) -> Self {
        Self {
            base,
            kind: LightKind::Directional {
                direction: direction.normalize_or_zero(),
            },
        }
    }

    pub fn point(base: LightBase, params: PointParams) -> Self {
        Self {
            base,
            kind: LightKind::Point(params),
        }
    }

    /// `cutoff_degrees` is the half-angle of the cone.
    pub fn spot(base: LightBase, params: PointParams, direction: Vec3, cutoff_degrees: f32) -> Self {
        Self {
            base,
            kind: LightKind::Spot {
                point: params,
                direction: direction.normalize_or_zero(),
                cutoff_cos: cutoff_degrees.to_radians().cos(),
            },
        }
    }

    pub fn position(&self) -> Option<Vec3> {
        self.point_params().map(|p| p.position)
    }

    pub fn direction(&self) -> Option<Vec3> {
        match self.kind {
            LightKind::Directional { direction } | LightKind::Spot { direction, .. } => {
                Some(direction)
            }
            LightKind::Point(_) => None,
        }
    }

    pub fn cone_cos(&self) -> Option<f32> {
        match self.kind {
            LightKind::Spot { cutoff_cos, .. } => Some(cutoff_cos),
            _ => None,
        }
    }

    pub fn point_params(&self) -> Option<&PointParams> {
        match &self.kind {
            LightKind::Point(point) | LightKind::Spot { point, .. } => Some(point),
            LightKind::Directional { .. } => None,
        }
    }

    /// Move a positioned light and, for spots, re-aim it. Directional
    /// lights only take the direction.
    pub fn set_transform(&mut self, position: Vec3, direction: Vec3) {
        let direction = direction.normalize_or_zero();
        match &mut self.kind {
            LightKind::Directional { direction: d } => *d = direction,
            LightKind::Point(point) => point.position = position,
            LightKind::Spot {
                point,
                direction: d,
                ..
            } => {
                point.position = position;
                *d = direction;
            }
        }
    }

    /// Light-space transform for shadow mapping. Directional lights look at
    /// the origin from `eye_distance` away; spots look along their direction
    /// from their own position. Point lights have none.
    pub fn light_space_transform(&self) -> Option<Mat4> {
        let view = match &self.kind {
            LightKind::Directional { direction } => {
                directional::light_view(*direction, self.base.eye_distance)
            }
            LightKind::Spot {
                point, direction, ..
            } => directional::spot_view(point.position, *direction),
            LightKind::Point(_) => return None,
        };
        Some(self.base.projection * view)
    }

    /// Spot cone factor for a unit vector from the light toward a surface.
    /// Linear fade from 1 on the axis to 0 at the cutoff. Mirrors
    /// `spot_light_color` in lit.frag.
    #[cfg(test)]
    pub fn cone_factor(&self, to_surface: Vec3) -> f32 {
        let (Some(direction), Some(cutoff_cos)) = (self.direction(), self.cone_cos()) else {
            return 1.0;
        };
        let cos = direction.dot(to_surface.normalize_or_zero());
        if cos <= cutoff_cos {
            return 0.0;
        }
        1.0 - (1.0 - cos) / (1.0 - cutoff_cos)
    }
}
