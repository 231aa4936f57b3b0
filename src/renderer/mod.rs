pub mod material;
pub mod mesh;
pub mod model;
pub mod pass;
pub mod shader;
pub mod shadow_map;
pub mod texture;

use std::path::Path;

use glam::{Mat4, Vec3};
use mesh::Mesh;
use pass::{render_frame, FrameStats, LitPass, LitUniforms, ScenePass, ShadowPass, ShadowUniforms};
use shader::ShaderProgram;

use crate::components::MeshHandle;
use crate::scene::Scene;

/// Holds all loaded meshes. Entities reference meshes by MeshHandle index.
#[derive(Default)]
pub struct MeshStore {
    meshes: Vec<Mesh>,
}

impl MeshStore {
    pub fn new() -> Self {
        Self { meshes: Vec::new() }
    }

    pub fn add(&mut self, mesh: Mesh) -> MeshHandle {
        let handle = MeshHandle(self.meshes.len());
        self.meshes.push(mesh);
        handle
    }

    pub fn get(&self, handle: MeshHandle) -> Option<&Mesh> {
        self.meshes.get(handle.0)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }
}

/// Per-frame camera state handed to the lit pass.
pub struct View {
    pub view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec3,
    pub viewport: (i32, i32),
}

pub struct Renderer {
    lit: ShaderProgram,
    lit_uniforms: LitUniforms,
    shadow: ShaderProgram,
    shadow_uniforms: ShadowUniforms,
}

impl Renderer {
    /// Build both programs from `shader_dir`. A program that fails to build
    /// is logged and replaced by program 0.
    pub fn init(shader_dir: &Path) -> Self {
        unsafe {
            gl::Enable(gl::DEPTH_TEST);
        }

        let mut lit = ShaderProgram::load_or_invalid(
            &shader_dir.join("lit.vert"),
            &shader_dir.join("lit.frag"),
        );
        let mut shadow = ShaderProgram::load_or_invalid(
            &shader_dir.join("shadow_map.vert"),
            &shader_dir.join("shadow_map.frag"),
        );
        let lit_uniforms = LitUniforms::resolve(&mut lit);
        let shadow_uniforms = ShadowUniforms::resolve(&mut shadow);

        Self {
            lit,
            lit_uniforms,
            shadow,
            shadow_uniforms,
        }
    }

    pub fn draw_scene(&mut self, scene: &Scene, view: &View) -> FrameStats {
        let items = scene.draw_list();
        let sun = &scene.lights.sun;

        let mut shadow_pass = ShadowPass {
            program: &mut self.shadow,
            uniforms: &self.shadow_uniforms,
            meshes: &scene.meshes,
            shadow_map: &sun.base.shadow_map,
            light_space: sun.light_space_transform().unwrap_or(Mat4::IDENTITY),
        };
        let mut lit_pass = LitPass {
            program: &mut self.lit,
            uniforms: &self.lit_uniforms,
            meshes: &scene.meshes,
            textures: &scene.textures,
            materials: &scene.materials,
            lights: &scene.lights,
            view: view.view,
            projection: view.projection,
            camera_position: view.camera_position,
            viewport: view.viewport,
        };

        // No allocated map means nothing to render depth into.
        let shadow = sun
            .base
            .shadow_map
            .is_initialized()
            .then_some(&mut shadow_pass as &mut dyn ScenePass);
        let stats = render_frame(shadow, &mut lit_pass, &items);
        unsafe {
            gl::UseProgram(0);
        }
        stats
    }
}
