pub mod demo;

use hecs::World;

use crate::components::{LocalTransform, Renderable};
use crate::lighting::LightRig;
use crate::renderer::material::MaterialStore;
use crate::renderer::pass::DrawItem;
use crate::renderer::texture::TextureStore;
use crate::renderer::MeshStore;

/// Everything the renderer draws, owned in one place and passed in by
/// reference each frame.
pub struct Scene {
    pub world: World,
    pub meshes: MeshStore,
    pub textures: TextureStore,
    pub materials: MaterialStore,
    pub lights: LightRig,
}

impl Scene {
    pub fn draw_list(&self) -> Vec<DrawItem> {
        collect_draw_items(&self.world, self.meshes.len())
    }
}

/// Every renderable entity whose mesh handle is valid, in world iteration
/// order. Entities with a dangling handle are skipped (and logged) so both
/// passes see the same list.
pub fn collect_draw_items(world: &World, mesh_count: usize) -> Vec<DrawItem> {
    let mut query = world.query::<(&LocalTransform, &Renderable)>();
    query
        .iter()
        .filter_map(|(entity, (transform, renderable))| {
            if renderable.mesh.0 >= mesh_count {
                log::warn!("Entity {entity:?} references missing mesh {}", renderable.mesh.0);
                return None;
            }
            Some(DrawItem {
                model: transform.matrix(),
                mesh: renderable.mesh,
                texture: renderable.texture,
                material: renderable.material,
            })
        })
        .collect()
}
