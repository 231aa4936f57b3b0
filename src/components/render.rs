/// Index into the MeshStore resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshHandle(pub usize);

/// Marks an entity as drawn by both passes. Texture and material are looked
/// up by name; unknown names fall back to the placeholder texture and a
/// matte material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Renderable {
    pub mesh: MeshHandle,
    pub texture: &'static str,
    pub material: &'static str,
}
