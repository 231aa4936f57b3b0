use glam::Quat;
use hecs::World;

use crate::components::{LocalTransform, Oscillate, Pulse, Spin};

impl Oscillate {
    /// Advance by `dt` seconds and return the new offset. Direction flips
    /// once the offset reaches `max_offset` in either direction.
    pub fn step(&mut self, dt: f32) -> f32 {
        let delta = self.speed * dt;
        self.offset += if self.forward { delta } else { -delta };
        if self.offset.abs() >= self.max_offset {
            self.offset = self.offset.clamp(-self.max_offset, self.max_offset);
            self.forward = !self.forward;
        }
        self.offset
    }
}

impl Spin {
    pub fn step(&mut self, dt: f32) -> f32 {
        self.angle = (self.angle + self.speed * dt).rem_euclid(360.0);
        self.angle
    }
}

impl Pulse {
    pub fn step(&mut self, dt: f32) -> f32 {
        let delta = self.speed * dt;
        self.ratio += if self.growing { delta } else { -delta };
        if self.ratio >= self.max {
            self.ratio = self.max;
            self.growing = false;
        } else if self.ratio <= self.min {
            self.ratio = self.min;
            self.growing = true;
        }
        self.ratio
    }
}

/// Advance every animator and write the result into the entity's transform.
pub fn animation_system(world: &mut World, dt: f32) {
    for (_e, (transform, oscillate)) in world.query_mut::<(&mut LocalTransform, &mut Oscillate)>() {
        let offset = oscillate.step(dt);
        transform.position = oscillate.origin + oscillate.axis * offset;
    }

    for (_e, (transform, spin)) in world.query_mut::<(&mut LocalTransform, &mut Spin)>() {
        let angle = spin.step(dt);
        transform.rotation = Quat::from_axis_angle(spin.axis, angle.to_radians());
    }

    for (_e, (transform, pulse)) in world.query_mut::<(&mut LocalTransform, &mut Pulse)>() {
        let ratio = pulse.step(dt);
        transform.scale = pulse.base_scale * (1.0 + ratio);
    }
}
