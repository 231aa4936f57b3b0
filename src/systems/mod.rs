mod animation;

pub use animation::animation_system;
