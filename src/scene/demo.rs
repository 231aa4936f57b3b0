use glam::{Vec3, Vec4};
use hecs::World;

use super::Scene;
use crate::components::{LocalTransform, MeshHandle, Oscillate, Pulse, Renderable, Spin};
use crate::config::{AssetConfig, ShadowConfig};
use crate::error::Result;
use crate::lighting::{Light, LightBase, LightRig, PointParams};
use crate::renderer::material::{Material, MaterialStore};
use crate::renderer::mesh::{Mesh, MeshData};
use crate::renderer::model::load_model;
use crate::renderer::texture::TextureStore;
use crate::renderer::MeshStore;

const TEXTURES: [(&str, &str); 6] = [
    ("Brick", "brick.jpg"),
    ("Rock", "rock.jpg"),
    ("Metal", "metal.jpg"),
    ("Sand", "sand.png"),
    ("Gold", "gold.jpg"),
    ("Grid", "small_grid.png"),
];

/// Index of the spot light that follows the camera.
pub const FLASHLIGHT: usize = 0;

/// Mesh handles the demo entities are built from.
pub struct DemoMeshes {
    pub pyramid: MeshHandle,
    pub floor: MeshHandle,
    pub model: Option<MeshHandle>,
}

/// Build the demo scene. Needs a current GL context.
pub fn load_demo_scene(assets: &AssetConfig, shadow: &ShadowConfig) -> Result<Scene> {
    let mut textures = TextureStore::new();
    for (name, file) in TEXTURES {
        textures.load(name, &assets.texture_dir.join(file));
    }

    let mut materials = MaterialStore::default();
    materials.insert("Metal", Material::new(5.0, 128.0));
    materials.insert("Mat", Material::new(0.5, 1.0));

    let mut meshes = MeshStore::new();
    let pyramid = meshes.add(Mesh::upload(&MeshData::pyramid()?));
    let floor = meshes.add(Mesh::upload(&MeshData::floor()));
    let model = assets.model_path.as_ref().and_then(|path| match load_model(path) {
        Ok(data) => Some(meshes.add(Mesh::upload(&data))),
        Err(e) => {
            log::warn!("{e}; skipping model");
            None
        }
    });

    let mut world = World::new();
    spawn_demo_entities(
        &mut world,
        &DemoMeshes {
            pyramid,
            floor,
            model,
        },
        assets.model_scale,
    );

    let mut lights = demo_lights(shadow)?;
    if let Err(e) = lights.sun.base.shadow_map.initialize() {
        log::error!("{e}; shadows disabled");
    }

    log::info!(
        "Scene ready: {} meshes, {} textures, {} point / {} spot lights",
        meshes.len(),
        textures.len(),
        lights.points.len(),
        lights.spots.len()
    );

    Ok(Scene {
        world,
        meshes,
        textures,
        materials,
        lights,
    })
}

pub fn spawn_demo_entities(world: &mut World, meshes: &DemoMeshes, model_scale: f32) {
    let brick_pyramid = Vec3::new(2.0, -0.05, 0.0);
    world.spawn((
        LocalTransform::new(brick_pyramid),
        Renderable {
            mesh: meshes.pyramid,
            texture: "Brick",
            material: "Mat",
        },
        Pulse::new(Vec3::ONE, 0.1, 0.3, 0.06),
    ));

    let rock_pyramid = Vec3::new(5.0, 2.0, 0.0);
    world.spawn((
        LocalTransform::new(rock_pyramid),
        Renderable {
            mesh: meshes.pyramid,
            texture: "Rock",
            material: "Metal",
        },
        Oscillate::new(rock_pyramid, Vec3::X, 0.3, 3.5),
    ));

    world.spawn((
        LocalTransform::new(Vec3::new(8.0, 0.0, 0.0)),
        Renderable {
            mesh: meshes.pyramid,
            texture: "Metal",
            material: "Metal",
        },
        Spin::new(Vec3::Y, 30.0),
    ));

    world.spawn((
        LocalTransform::new(Vec3::new(5.0, -1.0, 0.0)),
        Renderable {
            mesh: meshes.floor,
            texture: "Grid",
            material: "Mat",
        },
    ));

    if let Some(model) = meshes.model {
        world.spawn((
            LocalTransform::new(Vec3::new(4.0, -1.05, 3.0)).with_scale(Vec3::splat(model_scale)),
            Renderable {
                mesh: model,
                texture: "Gold",
                material: "Metal",
            },
        ));
    }
}

/// Sun, two colored point lights and the flashlight spot.
pub fn demo_lights(shadow: &ShadowConfig) -> Result<LightRig> {
    let sun = Light::directional(
        LightBase::new(Vec4::ONE, 0.2, 1.8, shadow)?,
        Vec3::new(2.0, -1.0, 0.3),
    );
    let mut rig = LightRig::new(sun)?;

    let positioned = [
        Light::point(
            LightBase::new(Vec4::new(0.0, 1.0, 0.0, 1.0), 0.0, 2.0, shadow)?,
            PointParams::new(Vec3::new(0.0, 0.8, 3.0), 0.3, 0.2, 0.1).with_radius(3.0, 15.0, 10.0),
        ),
        Light::point(
            LightBase::new(Vec4::new(0.0, 0.0, 1.0, 1.0), 0.0, 2.0, shadow)?,
            PointParams::new(Vec3::new(8.0, 0.8, 3.0), 0.3, 0.2, 0.1).with_radius(5.0, 5.0, 15.0),
        ),
        Light::spot(
            LightBase::new(Vec4::ONE, 0.0, 1.0, shadow)?,
            PointParams::new(Vec3::new(0.0, 0.8, 3.0), 0.3, 0.2, 0.1).with_radius(3.0, 15.0, 10.0),
            -Vec3::Z,
            20.0,
        ),
    ];
    rig.extend(positioned);
    Ok(rig)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::collect_draw_items;

    fn demo_meshes(model: bool) -> DemoMeshes {
        DemoMeshes {
            pyramid: MeshHandle(0),
            floor: MeshHandle(1),
            model: model.then_some(MeshHandle(2)),
        }
    }

    #[test]
    fn demo_lights_fill_expected_slots() {
        let rig = demo_lights(&ShadowConfig::default()).unwrap();
        assert_eq!(rig.points.len(), 2);
        assert_eq!(rig.spots.len(), 1);
        assert_eq!(rig.sun.base.shadow_map.width(), 2048);
        assert_eq!(rig.sun.base.shadow_map.height(), 2048);
        let dir = rig.sun.direction().unwrap();
        assert!((dir - Vec3::new(2.0, -1.0, 0.3).normalize()).length() < 1e-6);
    }

    #[test]
    fn demo_entities_without_model() {
        let mut world = World::new();
        spawn_demo_entities(&mut world, &demo_meshes(false), 0.004);
        assert_eq!(collect_draw_items(&world, 2).len(), 4);
    }

    #[test]
    fn model_entity_uses_configured_scale() {
        let mut world = World::new();
        spawn_demo_entities(&mut world, &demo_meshes(true), 0.01);
        let items = collect_draw_items(&world, 3);
        assert_eq!(items.len(), 5);
        let model = items.iter().find(|i| i.mesh == MeshHandle(2)).unwrap();
        let (scale, _, translation) = model.model.to_scale_rotation_translation();
        assert!((scale - Vec3::splat(0.01)).length() < 1e-6);
        assert!((translation - Vec3::new(4.0, -1.05, 3.0)).length() < 1e-6);
    }
}
