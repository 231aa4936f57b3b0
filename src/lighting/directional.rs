//! Light-space matrices for directional shadow mapping.

use glam::{Mat4, Vec3};

use crate::config::ShadowConfig;
use crate::error::{RenderError, Result};

/// Below this distance from ±1, `dot(direction, +Y)` is treated as
/// parallel to the up vector.
const PARALLEL_EPSILON: f32 = 1e-4;

/// Symmetric orthographic frustum of the shadow camera. Depends only on the
/// configured bounds, never on the light direction.
///
/// Rejects an empty box (`half_extent <= 0`) or inverted depth range
/// (`far <= near`), either of which makes the matrix non-finite.
pub(super) fn shadow_projection(shadow: &ShadowConfig) -> Result<Mat4> {
    let h = shadow.half_extent;
    // Written negated so NaN bounds are rejected too.
    if !(h > 0.0) || !(shadow.far > shadow.near) {
        return Err(RenderError::InvalidShadowFrustum {
            half_extent: h,
            near: shadow.near,
            far: shadow.far,
        });
    }
    Ok(Mat4::orthographic_rh_gl(-h, h, -h, h, shadow.near, shadow.far))
}

/// Up is +Y, except when the light points (nearly) straight up or down: the
/// look-at basis would collapse to NaN, so +Z is used instead.
fn up_for(direction: Vec3) -> Vec3 {
    if (direction.dot(Vec3::Y).abs() - 1.0).abs() < PARALLEL_EPSILON {
        Vec3::Z
    } else {
        Vec3::Y
    }
}

/// View from `-direction * eye_distance` toward the origin.
pub(super) fn light_view(direction: Vec3, eye_distance: f32) -> Mat4 {
    let direction = direction.normalize_or_zero();
    Mat4::look_at_rh(-direction * eye_distance, Vec3::ZERO, up_for(direction))
}

/// View from a positioned light looking along `direction`.
pub(super) fn spot_view(position: Vec3, direction: Vec3) -> Mat4 {
    let direction = direction.normalize_or_zero();
    Mat4::look_at_rh(position, position + direction, up_for(direction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lighting::{Light, LightBase, PointParams};
    use glam::Vec4;

    fn sun(direction: Vec3) -> Light {
        let base = LightBase::new(Vec4::ONE, 0.2, 1.8, &ShadowConfig::default()).unwrap();
        Light::directional(base, direction)
    }

    #[test]
    fn transform_is_deterministic() {
        let light = sun(Vec3::new(2.0, -1.0, 0.3));
        let a = light.light_space_transform().unwrap();
        let b = light.light_space_transform().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn direction_change_leaves_projection_alone() {
        let mut light = sun(Vec3::new(2.0, -1.0, 0.3));
        let projection = light.base.projection();
        let before = light.light_space_transform().unwrap();

        light.set_transform(Vec3::ZERO, Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(light.base.projection(), projection);
        assert_ne!(light.light_space_transform().unwrap(), before);
    }

    #[test]
    fn origin_lands_on_frustum_axis() {
        let light = sun(Vec3::new(2.0, -1.0, 0.3));
        let clip = light.light_space_transform().unwrap() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }

    #[test]
    fn straight_down_falls_back_to_z_up() {
        let light = sun(Vec3::new(0.0, -1.0, 0.0));
        let m = light.light_space_transform().unwrap();
        assert!(m.is_finite());
        // World point below the origin moves deeper into the light's view.
        let near = m * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let far = m * Vec4::new(0.0, -5.0, 0.0, 1.0);
        assert!(far.z > near.z);
    }

    #[test]
    fn projection_matches_config_bounds() {
        let config = ShadowConfig::default();
        let p = shadow_projection(&config).unwrap();
        let corner = p * Vec4::new(config.half_extent, config.half_extent, -config.near, 1.0);
        assert!((corner.x - 1.0).abs() < 1e-5);
        assert!((corner.y - 1.0).abs() < 1e-5);
        assert!((corner.z + 1.0).abs() < 1e-5);
    }

    #[test]
    fn inverted_or_empty_frustum_is_rejected() {
        let inverted = ShadowConfig { near: 30.0, far: 0.1, ..Default::default() };
        assert!(matches!(
            shadow_projection(&inverted),
            Err(RenderError::InvalidShadowFrustum { .. })
        ));
        let flat = ShadowConfig { half_extent: 0.0, ..Default::default() };
        assert!(shadow_projection(&flat).is_err());
        let nan = ShadowConfig { far: f32::NAN, ..Default::default() };
        assert!(shadow_projection(&nan).is_err());
        assert!(LightBase::new(Vec4::ONE, 0.2, 1.8, &inverted).is_err());
    }

    #[test]
    fn spot_transform_follows_its_position() {
        let spot_at = |position: Vec3| {
            let base = LightBase::new(Vec4::ONE, 0.0, 1.0, &ShadowConfig::default()).unwrap();
            Light::spot(base, PointParams::new(position, 0.3, 0.2, 0.1), -Vec3::Z, 20.0)
        };
        let here = spot_at(Vec3::ZERO).light_space_transform().unwrap();
        let there = spot_at(Vec3::new(100.0, 0.0, 0.0)).light_space_transform().unwrap();
        assert_ne!(here, there);

        // A point just in front of the spot sits on its frustum axis.
        let ahead = there * Vec4::new(100.0, 0.0, -5.0, 1.0);
        assert!(ahead.x.abs() < 1e-5);
        assert!(ahead.y.abs() < 1e-5);
    }

    #[test]
    fn spot_aimed_straight_down_stays_finite() {
        let base = LightBase::new(Vec4::ONE, 0.0, 1.0, &ShadowConfig::default()).unwrap();
        let spot = Light::spot(base, PointParams::new(Vec3::Y * 4.0, 0.3, 0.2, 0.1), -Vec3::Y, 20.0);
        assert!(spot.light_space_transform().unwrap().is_finite());
    }
}
