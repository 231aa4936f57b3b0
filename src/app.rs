use glam::Vec3;
use sdl2::keyboard::Scancode;

use crate::camera::Camera;
use crate::config::RendererConfig;
use crate::engine::input::InputState;
use crate::engine::window::GameWindow;
use crate::error::Result;
use crate::lighting::Light;
use crate::renderer::pass::FrameStats;
use crate::renderer::{Renderer, View};
use crate::scene::demo::{load_demo_scene, FLASHLIGHT};
use crate::scene::Scene;
use crate::systems::animation_system;

/// The flashlight hangs slightly below the eye.
const FLASHLIGHT_DROP: f32 = 0.1;

pub struct DemoApp {
    scene: Scene,
    camera: Camera,
    renderer: Renderer,
    flashlight_intensity: Option<f32>,
    last_stats: FrameStats,
}

impl DemoApp {
    /// Needs the window's GL context to be current.
    pub fn new(config: &RendererConfig) -> Result<Self> {
        let renderer = Renderer::init(&config.assets.shader_dir);
        let scene = load_demo_scene(&config.assets, &config.shadow)?;
        Ok(Self {
            scene,
            camera: Camera::new(&config.camera),
            renderer,
            flashlight_intensity: None,
            last_stats: FrameStats::default(),
        })
    }

    pub fn update(&mut self, input: &InputState, dt: f32) {
        if input.was_pressed(Scancode::F) {
            self.toggle_flashlight();
        }

        self.camera.look(input.mouse_dx, input.mouse_dy);
        self.camera.move_wasd(input, dt);

        animation_system(&mut self.scene.world, dt);

        if let Some(spot) = self.scene.lights.spots.get_mut(FLASHLIGHT) {
            follow_camera(spot, self.camera.position, self.camera.front());
        }
    }

    pub fn render(&mut self, window: &GameWindow) -> FrameStats {
        let (w, h) = window.drawable_size();
        let view = View {
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(window.aspect_ratio()),
            camera_position: self.camera.position,
            viewport: (w as i32, h as i32),
        };
        let stats = self.renderer.draw_scene(&self.scene, &view);
        if stats != self.last_stats {
            log::debug!(
                "Frame draws: {} shadow, {} lit",
                stats.shadow_draws,
                stats.lit_draws
            );
            self.last_stats = stats;
        }
        stats
    }

    /// Off stores the spot's diffuse intensity and zeroes it; on restores it.
    fn toggle_flashlight(&mut self) {
        let Some(spot) = self.scene.lights.spots.get_mut(FLASHLIGHT) else {
            return;
        };
        match self.flashlight_intensity.take() {
            Some(intensity) => spot.base.diffuse_intensity = intensity,
            None => {
                self.flashlight_intensity = Some(spot.base.diffuse_intensity);
                spot.base.diffuse_intensity = 0.0;
            }
        }
        log::info!(
            "Flashlight {}",
            if self.flashlight_intensity.is_some() { "off" } else { "on" }
        );
    }
}

fn follow_camera(spot: &mut Light, eye: Vec3, front: Vec3) {
    spot.set_transform(eye - Vec3::Y * FLASHLIGHT_DROP, front);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShadowConfig;
    use crate::scene::demo::demo_lights;

    #[test]
    fn flashlight_sits_below_eye_and_aims_forward() {
        let mut rig = demo_lights(&ShadowConfig::default()).unwrap();
        let spot = rig.spots.get_mut(FLASHLIGHT).unwrap();
        follow_camera(spot, Vec3::new(1.0, 2.0, 3.0), Vec3::NEG_Z);
        let position = spot.position().unwrap();
        assert!((position - Vec3::new(1.0, 1.9, 3.0)).length() < 1e-6);
        assert_eq!(spot.direction(), Some(Vec3::NEG_Z));
    }
}
