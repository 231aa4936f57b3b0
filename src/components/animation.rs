use glam::Vec3;

/// Ping-pong translation along `axis`, relative to `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillate {
    pub origin: Vec3,
    pub axis: Vec3,
    /// Units per second.
    pub speed: f32,
    pub max_offset: f32,
    pub offset: f32,
    pub forward: bool,
}

impl Oscillate {
    pub fn new(origin: Vec3, axis: Vec3, speed: f32, max_offset: f32) -> Self {
        Self {
            origin,
            axis: axis.normalize_or_zero(),
            speed,
            max_offset,
            offset: 0.0,
            forward: true,
        }
    }
}

/// Continuous rotation around `axis`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    pub axis: Vec3,
    /// Degrees per second.
    pub speed: f32,
    /// Degrees, kept in [0, 360).
    pub angle: f32,
}

impl Spin {
    pub fn new(axis: Vec3, speed: f32) -> Self {
        Self {
            axis: axis.normalize_or_zero(),
            speed,
            angle: 0.0,
        }
    }
}

/// Scale that breathes as `base_scale * (1 + ratio)`, with `ratio`
/// bouncing between `min` and `max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    pub base_scale: Vec3,
    pub min: f32,
    pub max: f32,
    /// Ratio change per second.
    pub speed: f32,
    pub ratio: f32,
    pub growing: bool,
}

impl Pulse {
    pub fn new(base_scale: Vec3, min: f32, max: f32, speed: f32) -> Self {
        Self {
            base_scale,
            min,
            max,
            speed,
            ratio: min,
            growing: true,
        }
    }
}
