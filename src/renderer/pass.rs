use gl::types::GLint;
use glam::{Mat4, Vec3};

use super::material::MaterialStore;
use super::shader::{ShaderProgram, UniformWriter};
use super::shadow_map::ShadowMap;
use super::texture::TextureStore;
use super::MeshStore;
use crate::components::MeshHandle;
use crate::lighting::{LightLocations, LightRig, LightSlot, MAX_POINT_LIGHTS, MAX_SPOT_LIGHTS};

/// Texture unit the lit shader samples the shadow map from. Unit 0 is the
/// surface texture.
pub const SHADOW_TEXTURE_UNIT: u32 = 1;

/// One object to draw this frame. Both passes walk the same list.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub model: Mat4,
    pub mesh: MeshHandle,
    pub texture: &'static str,
    pub material: &'static str,
}

/// A render pass over the frame's draw list.
pub trait ScenePass {
    fn begin(&mut self);
    /// Returns whether a draw call was issued for `item`.
    fn draw(&mut self, item: &DrawItem) -> bool;
    fn end(&mut self) {}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub shadow_draws: usize,
    pub lit_draws: usize,
}

/// Run one pass and return the number of draw calls it issued.
pub fn run_pass(pass: &mut dyn ScenePass, items: &[DrawItem]) -> usize {
    pass.begin();
    let draws = items.iter().filter(|item| pass.draw(item)).count();
    pass.end();
    draws
}

/// Depth pass into the shadow map, then the lit pass. `shadow` is `None`
/// when there is no allocated shadow map; only the lit pass runs then.
pub fn render_frame(
    shadow: Option<&mut dyn ScenePass>,
    lit: &mut dyn ScenePass,
    items: &[DrawItem],
) -> FrameStats {
    let shadow_draws = shadow.map(|pass| run_pass(pass, items));
    let lit_draws = run_pass(lit, items);
    if let Some(shadow_draws) = shadow_draws.filter(|&n| n != lit_draws) {
        log::warn!("Shadow pass drew {shadow_draws} objects, lit pass {lit_draws}");
    }
    FrameStats {
        shadow_draws: shadow_draws.unwrap_or(0),
        lit_draws,
    }
}

pub struct ShadowUniforms {
    pub model: GLint,
    pub light_space: GLint,
}

impl ShadowUniforms {
    pub fn resolve(writer: &mut impl UniformWriter) -> Self {
        Self {
            model: writer.location("u_model"),
            light_space: writer.location("u_light_space"),
        }
    }
}

pub struct ShadowPass<'a> {
    pub program: &'a mut ShaderProgram,
    pub uniforms: &'a ShadowUniforms,
    pub meshes: &'a MeshStore,
    pub shadow_map: &'a ShadowMap,
    pub light_space: Mat4,
}

impl ScenePass for ShadowPass<'_> {
    fn begin(&mut self) {
        self.program.bind();
        unsafe {
            gl::Viewport(
                0,
                0,
                self.shadow_map.width() as i32,
                self.shadow_map.height() as i32,
            );
        }
        if let Err(e) = self.shadow_map.bind_for_write() {
            log::error!("Shadow pass: {e}");
        }
        unsafe {
            gl::Clear(gl::DEPTH_BUFFER_BIT);
        }
        self.program.write_mat4(self.uniforms.light_space, &self.light_space);
    }

    fn draw(&mut self, item: &DrawItem) -> bool {
        let Some(mesh) = self.meshes.get(item.mesh) else {
            return false;
        };
        self.program.write_mat4(self.uniforms.model, &item.model);
        mesh.draw();
        true
    }

    fn end(&mut self) {
        unsafe {
            gl::BindFramebuffer(gl::FRAMEBUFFER, 0);
        }
    }
}

pub struct LitUniforms {
    pub model: GLint,
    pub view: GLint,
    pub projection: GLint,
    pub camera_position: GLint,
    pub light_space: GLint,
    pub texture: GLint,
    pub shadow_map: GLint,
    pub shadows_enabled: GLint,
    pub specular_intensity: GLint,
    pub shininess: GLint,
    pub directional: LightLocations,
    pub points: [LightLocations; MAX_POINT_LIGHTS],
    pub spots: [LightLocations; MAX_SPOT_LIGHTS],
    pub point_count: GLint,
    pub spot_count: GLint,
}

impl LitUniforms {
    pub fn resolve(writer: &mut impl UniformWriter) -> Self {
        Self {
            model: writer.location("u_model"),
            view: writer.location("u_view"),
            projection: writer.location("u_projection"),
            camera_position: writer.location("u_camera_position"),
            light_space: writer.location("u_light_space"),
            texture: writer.location("u_texture"),
            shadow_map: writer.location("u_shadow_map"),
            shadows_enabled: writer.location("u_shadows_enabled"),
            specular_intensity: writer.location("u_material.specular_intensity"),
            shininess: writer.location("u_material.shininess"),
            directional: LightLocations::resolve(writer, LightSlot::Directional),
            points: std::array::from_fn(|i| LightLocations::resolve(writer, LightSlot::Point(i))),
            spots: std::array::from_fn(|i| LightLocations::resolve(writer, LightSlot::Spot(i))),
            point_count: writer.location("u_point_light_count"),
            spot_count: writer.location("u_spot_light_count"),
        }
    }
}

/// Upload camera and light state. Split out of `LitPass::begin` so it runs
/// without a GL context in tests.
pub fn upload_frame_uniforms(
    writer: &mut impl UniformWriter,
    uniforms: &LitUniforms,
    lights: &LightRig,
    view: &Mat4,
    projection: &Mat4,
    camera_position: Vec3,
) {
    writer.write_mat4(uniforms.projection, projection);
    writer.write_mat4(uniforms.view, view);
    writer.write_vec3(uniforms.camera_position, camera_position);

    lights.sun.apply(writer, &uniforms.directional);
    for (light, locs) in lights.points.iter().zip(uniforms.points.iter()) {
        light.apply(writer, locs);
    }
    for (light, locs) in lights.spots.iter().zip(uniforms.spots.iter()) {
        light.apply(writer, locs);
    }
    writer.write_int(uniforms.point_count, lights.points.len() as i32);
    writer.write_int(uniforms.spot_count, lights.spots.len() as i32);

    if let Some(light_space) = lights.sun.light_space_transform() {
        writer.write_mat4(uniforms.light_space, &light_space);
    }
    writer.write_int(uniforms.texture, 0);
    writer.write_int(uniforms.shadow_map, SHADOW_TEXTURE_UNIT as i32);
    let shadows = lights.sun.base.shadow_map.is_initialized();
    writer.write_int(uniforms.shadows_enabled, shadows as i32);
}

pub struct LitPass<'a> {
    pub program: &'a mut ShaderProgram,
    pub uniforms: &'a LitUniforms,
    pub meshes: &'a MeshStore,
    pub textures: &'a TextureStore,
    pub materials: &'a MaterialStore,
    pub lights: &'a LightRig,
    pub view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec3,
    pub viewport: (i32, i32),
}

impl ScenePass for LitPass<'_> {
    fn begin(&mut self) {
        self.program.bind();
        unsafe {
            gl::Viewport(0, 0, self.viewport.0, self.viewport.1);
            gl::ClearColor(0.0, 0.0, 0.0, 1.0);
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }
        upload_frame_uniforms(
            &mut *self.program,
            self.uniforms,
            self.lights,
            &self.view,
            &self.projection,
            self.camera_position,
        );
        let shadow_map = &self.lights.sun.base.shadow_map;
        if shadow_map.is_initialized() {
            if let Err(e) = shadow_map.bind_for_read(SHADOW_TEXTURE_UNIT) {
                log::error!("Lit pass: {e}");
            }
        }
    }

    fn draw(&mut self, item: &DrawItem) -> bool {
        let Some(mesh) = self.meshes.get(item.mesh) else {
            return false;
        };
        self.program.write_mat4(self.uniforms.model, &item.model);
        self.textures.get(item.texture).apply();
        self.materials.get(item.material).apply(
            &mut *self.program,
            self.uniforms.specular_intensity,
            self.uniforms.shininess,
        );
        mesh.draw();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShadowConfig;
    use crate::lighting::{Light, LightBase, PointParams};
    use crate::renderer::shader::tests::RecordingWriter;
    use glam::Vec4;

    #[derive(Default)]
    struct CountingPass {
        name: &'static str,
        began: usize,
        ended: usize,
        meshes: Vec<MeshHandle>,
        /// Items with this mesh are skipped, as a pass does for a missing mesh.
        skip: Option<MeshHandle>,
        log: Option<std::rc::Rc<std::cell::RefCell<Vec<&'static str>>>>,
    }

    impl ScenePass for CountingPass {
        fn begin(&mut self) {
            self.began += 1;
            if let Some(log) = &self.log {
                log.borrow_mut().push(self.name);
            }
        }

        fn draw(&mut self, item: &DrawItem) -> bool {
            if self.skip == Some(item.mesh) {
                return false;
            }
            self.meshes.push(item.mesh);
            true
        }

        fn end(&mut self) {
            self.ended += 1;
        }
    }

    fn items(n: usize) -> Vec<DrawItem> {
        (0..n)
            .map(|i| DrawItem {
                model: Mat4::from_translation(Vec3::new(i as f32, 0.0, 0.0)),
                mesh: MeshHandle(i % 2),
                texture: "Brick",
                material: "Mat",
            })
            .collect()
    }

    #[test]
    fn both_passes_draw_the_same_objects() {
        let mut shadow = CountingPass::default();
        let mut lit = CountingPass::default();
        let list = items(5);
        let stats = render_frame(Some(&mut shadow), &mut lit, &list);
        assert_eq!(stats, FrameStats { shadow_draws: 5, lit_draws: 5 });
        assert_eq!(shadow.meshes, lit.meshes);
        assert_eq!((shadow.began, shadow.ended), (1, 1));
        assert_eq!((lit.began, lit.ended), (1, 1));
    }

    #[test]
    fn shadow_pass_runs_before_lit_pass() {
        let log = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut shadow = CountingPass { name: "shadow", log: Some(log.clone()), ..Default::default() };
        let mut lit = CountingPass { name: "lit", log: Some(log.clone()), ..Default::default() };
        render_frame(Some(&mut shadow), &mut lit, &items(2));
        assert_eq!(*log.borrow(), vec!["shadow", "lit"]);
    }

    #[test]
    fn empty_scene_still_runs_both_passes() {
        let mut shadow = CountingPass::default();
        let mut lit = CountingPass::default();
        let stats = render_frame(Some(&mut shadow), &mut lit, &[]);
        assert_eq!(stats, FrameStats::default());
        assert_eq!(shadow.began, 1);
        assert_eq!(lit.began, 1);
    }

    #[test]
    fn skipped_draws_show_up_as_a_mismatch() {
        let mut shadow = CountingPass { skip: Some(MeshHandle(1)), ..Default::default() };
        let mut lit = CountingPass::default();
        // Meshes alternate 0, 1, 0, 1.
        let stats = render_frame(Some(&mut shadow), &mut lit, &items(4));
        assert_eq!(stats, FrameStats { shadow_draws: 2, lit_draws: 4 });
    }

    #[test]
    fn missing_shadow_pass_runs_lit_only() {
        let mut lit = CountingPass::default();
        let stats = render_frame(None, &mut lit, &items(3));
        assert_eq!(stats, FrameStats { shadow_draws: 0, lit_draws: 3 });
        assert_eq!(lit.began, 1);
    }

    #[test]
    fn frame_uniforms_cover_lights_and_samplers() {
        let shadow = ShadowConfig { resolution: 8, ..Default::default() };
        let base = || LightBase::new(Vec4::ONE, 0.0, 2.0, &shadow).unwrap();
        let sun = Light::directional(
            LightBase::new(Vec4::ONE, 0.2, 1.8, &shadow).unwrap(),
            Vec3::new(2.0, -1.0, 0.3),
        );
        let mut rig = LightRig::new(sun).unwrap();
        let dropped = rig.extend([
            Light::point(base(), PointParams::new(Vec3::new(0.0, 0.8, 3.0), 0.3, 0.2, 0.1)),
            Light::point(base(), PointParams::new(Vec3::new(8.0, 0.8, 3.0), 0.3, 0.2, 0.1)),
        ]);
        assert_eq!(dropped, 0);

        let mut w = RecordingWriter::default();
        let uniforms = LitUniforms::resolve(&mut w);
        upload_frame_uniforms(&mut w, &uniforms, &rig, &Mat4::IDENTITY, &Mat4::IDENTITY, Vec3::ONE);

        assert_eq!(w.int("u_point_light_count"), Some(2));
        assert_eq!(w.int("u_spot_light_count"), Some(0));
        assert_eq!(w.int("u_shadow_map"), Some(SHADOW_TEXTURE_UNIT as i32));
        assert_eq!(w.int("u_texture"), Some(0));
        // Test lights never allocate GL objects.
        assert_eq!(w.int("u_shadows_enabled"), Some(0));
        assert_eq!(w.vec3("u_point_lights[1].position"), Some(Vec3::new(8.0, 0.8, 3.0)));
        assert_eq!(w.vec3("u_point_lights[2].position"), None);
        assert_eq!(w.float("u_directional_light.base.ambient_intensity"), Some(0.2));
        let light_space = w.names["u_light_space"];
        assert_eq!(w.mat4s.get(&light_space), rig.sun.light_space_transform().as_ref());
    }
}
