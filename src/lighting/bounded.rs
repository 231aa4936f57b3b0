use super::{Light, LightKind};

/// Must match `MAX_POINT_LIGHTS` in shaders/lit.frag.
pub const MAX_POINT_LIGHTS: usize = 3;
/// Must match `MAX_SPOT_LIGHTS` in shaders/lit.frag.
pub const MAX_SPOT_LIGHTS: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum LightError {
    #[error("{kind} light list is full (capacity {capacity})")]
    CapacityExceeded { kind: &'static str, capacity: usize },

    #[error("scene already has a directional light")]
    DirectionalTaken,

    #[error("sun must be a directional light")]
    NotDirectional,
}

/// A list of lights that refuses to grow past the shader's array size.
pub struct BoundedLights {
    kind: &'static str,
    capacity: usize,
    lights: Vec<Light>,
}

impl BoundedLights {
    pub fn new(kind: &'static str, capacity: usize) -> Self {
        Self {
            kind,
            capacity,
            lights: Vec::with_capacity(capacity),
        }
    }

    /// On overflow the light is handed back alongside the error.
    pub fn push(&mut self, light: Light) -> Result<(), (LightError, Light)> {
        if self.lights.len() >= self.capacity {
            return Err((
                LightError::CapacityExceeded {
                    kind: self.kind,
                    capacity: self.capacity,
                },
                light,
            ));
        }
        self.lights.push(light);
        Ok(())
    }

    /// Push as many as fit and return how many were dropped.
    pub fn extend_truncating(&mut self, lights: impl IntoIterator<Item = Light>) -> usize {
        let mut dropped = 0;
        for light in lights {
            if self.push(light).is_err() {
                dropped += 1;
            }
        }
        if dropped > 0 {
            log::warn!(
                "Dropped {dropped} {} light(s): shader supports {}",
                self.kind,
                self.capacity
            );
        }
        dropped
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Light> {
        self.lights.iter()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Light> {
        self.lights.get_mut(index)
    }
}

/// Every light in the scene: one shadow-casting sun plus bounded point and
/// spot lists.
pub struct LightRig {
    pub sun: Light,
    pub points: BoundedLights,
    pub spots: BoundedLights,
}

impl LightRig {
    pub fn new(sun: Light) -> Result<Self, LightError> {
        if !matches!(sun.kind, LightKind::Directional { .. }) {
            return Err(LightError::NotDirectional);
        }
        Ok(Self {
            sun,
            points: BoundedLights::new("point", MAX_POINT_LIGHTS),
            spots: BoundedLights::new("spot", MAX_SPOT_LIGHTS),
        })
    }

    /// Route each light into the list matching its kind and return how many
    /// were dropped: extra directional lights plus whatever overflowed the
    /// point and spot capacities.
    pub fn extend(&mut self, lights: impl IntoIterator<Item = Light>) -> usize {
        let mut points = Vec::new();
        let mut spots = Vec::new();
        let mut dropped = 0;
        for light in lights {
            match light.kind {
                LightKind::Directional { .. } => {
                    log::warn!("{}; light dropped", LightError::DirectionalTaken);
                    dropped += 1;
                }
                LightKind::Point(_) => points.push(light),
                LightKind::Spot { .. } => spots.push(light),
            }
        }
        dropped + self.points.extend_truncating(points) + self.spots.extend_truncating(spots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShadowConfig;
    use crate::lighting::{LightBase, PointParams};
    use glam::{Vec3, Vec4};

    fn base() -> LightBase {
        LightBase::new(Vec4::ONE, 0.0, 1.0, &ShadowConfig { resolution: 16, ..Default::default() })
            .unwrap()
    }

    fn bulb(x: f32) -> Light {
        Light::point(base(), PointParams::new(Vec3::new(x, 0.0, 0.0), 0.3, 0.2, 0.1))
    }

    #[test]
    fn push_past_capacity_returns_the_light() {
        let mut list = BoundedLights::new("point", 2);
        assert!(list.push(bulb(0.0)).is_ok());
        assert!(list.push(bulb(1.0)).is_ok());
        let (err, light) = list.push(bulb(2.0)).unwrap_err();
        assert!(matches!(err, LightError::CapacityExceeded { capacity: 2, .. }));
        assert_eq!(light.position(), Some(Vec3::new(2.0, 0.0, 0.0)));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn extend_truncating_counts_dropped_lights() {
        let mut list = BoundedLights::new("point", MAX_POINT_LIGHTS);
        let dropped = list.extend_truncating((0..5).map(|i| bulb(i as f32)));
        assert_eq!(dropped, 5 - MAX_POINT_LIGHTS);
        assert_eq!(list.len(), MAX_POINT_LIGHTS);
        // First-come order survives truncation.
        let xs: Vec<f32> = list.iter().map(|l| l.position().unwrap().x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn rig_routes_by_kind() {
        let sun = Light::directional(base(), Vec3::new(0.0, -1.0, 0.5));
        let mut rig = LightRig::new(sun).unwrap();
        let spot = Light::spot(base(), PointParams::new(Vec3::ZERO, 0.3, 0.2, 0.1), -Vec3::Z, 20.0);
        let second_sun = Light::directional(base(), Vec3::X);
        let dropped = rig.extend([bulb(0.0), spot, second_sun]);
        assert_eq!(dropped, 1);
        assert_eq!(rig.points.len(), 1);
        assert_eq!(rig.spots.len(), 1);
    }

    #[test]
    fn rig_extend_truncates_each_list_separately() {
        let sun = Light::directional(base(), Vec3::new(0.0, -1.0, 0.5));
        let mut rig = LightRig::new(sun).unwrap();
        let spots = (0..4).map(|_| {
            Light::spot(base(), PointParams::new(Vec3::ZERO, 0.3, 0.2, 0.1), -Vec3::Z, 20.0)
        });
        let dropped = rig.extend((0..5).map(|i| bulb(i as f32)).chain(spots));
        assert_eq!(dropped, (5 - MAX_POINT_LIGHTS) + (4 - MAX_SPOT_LIGHTS));
        assert_eq!(rig.points.len(), MAX_POINT_LIGHTS);
        assert_eq!(rig.spots.len(), MAX_SPOT_LIGHTS);
    }

    #[test]
    fn rig_requires_directional_sun() {
        assert!(matches!(LightRig::new(bulb(0.0)), Err(LightError::NotDirectional)));
    }
}
