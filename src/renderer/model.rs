//! glTF import into a single interleaved mesh.

use std::path::Path;

use glam::{Mat3, Mat4, Vec2, Vec3};

use super::mesh::{calculate_average_normals, MeshData, NORMAL_OFFSET, VERTEX_STRIDE};
use crate::error::{RenderError, Result};

/// Load every triangle primitive of the default scene at `path`, with node
/// transforms baked in. Files without a default scene contribute all of
/// their scenes.
pub fn load_model(path: &Path) -> Result<MeshData> {
    let (document, buffers, _images) = gltf::import(path).map_err(|source| RenderError::Model {
        path: path.to_path_buf(),
        source,
    })?;
    let data = collect_document(&document, &buffers, path)?;

    log::info!(
        "Loaded model {}: {} vertices, {} triangles",
        path.display(),
        data.vertex_count(),
        data.indices.len() / 3
    );
    Ok(data)
}

fn collect_document(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    origin: &Path,
) -> Result<MeshData> {
    let scenes: Vec<gltf::Scene> = match document.default_scene() {
        Some(scene) => vec![scene],
        None => document.scenes().collect(),
    };

    let mut data = MeshData::default();
    for scene in scenes {
        for node in scene.nodes() {
            process_node(&node, buffers, Mat4::IDENTITY, &mut data)?;
        }
    }

    if data.indices.is_empty() {
        return Err(RenderError::EmptyModel(origin.to_path_buf()));
    }
    Ok(data)
}

fn process_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent: Mat4,
    data: &mut MeshData,
) -> Result<()> {
    let transform = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                continue;
            }
            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));
            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<Vec3> = positions.map(Vec3::from_array).collect();
            let uvs: Vec<Vec2> = reader
                .read_tex_coords(0)
                .map(|tc| tc.into_f32().map(Vec2::from_array).collect())
                .unwrap_or_default();
            let normals: Option<Vec<Vec3>> =
                reader.read_normals().map(|n| n.map(Vec3::from_array).collect());
            let indices: Vec<u32> = reader
                .read_indices()
                .map(|i| i.into_u32().collect())
                .unwrap_or_else(|| (0..positions.len() as u32).collect());

            append_primitive(data, &positions, &uvs, normals.as_deref(), &indices, transform)?;
        }
    }

    for child in node.children() {
        process_node(&child, buffers, transform, data)?;
    }
    Ok(())
}

/// Append one primitive to `data`. Missing uvs become (0, 0); missing
/// normals are computed by averaging face normals.
pub fn append_primitive(
    data: &mut MeshData,
    positions: &[Vec3],
    uvs: &[Vec2],
    normals: Option<&[Vec3]>,
    indices: &[u32],
    transform: Mat4,
) -> Result<()> {
    let normal_matrix = Mat3::from_mat4(transform).inverse().transpose();
    let mut vertices = Vec::with_capacity(positions.len() * VERTEX_STRIDE);
    for (i, p) in positions.iter().enumerate() {
        let p = transform.transform_point3(*p);
        let uv = uvs.get(i).copied().unwrap_or(Vec2::ZERO);
        let n = normals
            .and_then(|n| n.get(i))
            .map(|n| (normal_matrix * *n).normalize_or_zero())
            .unwrap_or(Vec3::ZERO);
        vertices.extend_from_slice(&[p.x, p.y, p.z, uv.x, uv.y, n.x, n.y, n.z]);
    }

    if normals.is_none() {
        calculate_average_normals(indices, &mut vertices, VERTEX_STRIDE, NORMAL_OFFSET)?;
    } else if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
        return Err(RenderError::MeshIndex {
            index,
            vertex_count: positions.len(),
        });
    }

    let base = data.vertex_count() as u32;
    data.vertices.extend(vertices);
    data.indices.extend(indices.iter().map(|i| i + base));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<Vec3> {
        vec![Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0), Vec3::X]
    }

    #[test]
    fn second_primitive_indices_are_rebased() {
        let mut data = MeshData::default();
        let normals = vec![Vec3::Y; 3];
        append_primitive(&mut data, &triangle(), &[], Some(&normals), &[0, 1, 2], Mat4::IDENTITY)
            .unwrap();
        append_primitive(&mut data, &triangle(), &[], Some(&normals), &[0, 1, 2], Mat4::IDENTITY)
            .unwrap();
        assert_eq!(data.vertex_count(), 6);
        assert_eq!(data.indices, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn missing_normals_are_generated() {
        let mut data = MeshData::default();
        append_primitive(&mut data, &triangle(), &[], None, &[0, 1, 2], Mat4::IDENTITY).unwrap();
        let n = Vec3::from_slice(&data.vertices[NORMAL_OFFSET..NORMAL_OFFSET + 3]);
        assert!((n - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn node_transform_is_baked() {
        let mut data = MeshData::default();
        let t = Mat4::from_translation(Vec3::new(4.0, -1.05, 3.0)) * Mat4::from_scale(Vec3::splat(2.0));
        let normals = vec![Vec3::Y; 3];
        append_primitive(&mut data, &triangle(), &[], Some(&normals), &[0, 1, 2], t).unwrap();
        let last = Vec3::from_slice(&data.vertices[2 * VERTEX_STRIDE..2 * VERTEX_STRIDE + 3]);
        assert!((last - Vec3::new(6.0, -1.05, 3.0)).length() < 1e-5);
        let n = Vec3::from_slice(&data.vertices[NORMAL_OFFSET..NORMAL_OFFSET + 3]);
        assert!((n - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn bad_index_with_normals_is_rejected() {
        let mut data = MeshData::default();
        let normals = vec![Vec3::Y; 3];
        let err = append_primitive(&mut data, &triangle(), &[], Some(&normals), &[0, 1, 9], Mat4::IDENTITY)
            .unwrap_err();
        assert!(matches!(err, RenderError::MeshIndex { index: 9, .. }));
        assert!(data.vertices.is_empty());
    }

    #[test]
    fn missing_file_is_a_model_error() {
        let err = load_model(Path::new("/nonexistent/pony.glb")).unwrap_err();
        assert!(matches!(err, RenderError::Model { .. }));
    }

    /// Two scenes sharing one triangle mesh; scene 1 (the default) places it
    /// at x = 5.
    const TWO_SCENES: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 1,
        "scenes": [{ "nodes": [0] }, { "nodes": [1] }],
        "nodes": [
            { "mesh": 0 },
            { "mesh": 0, "translation": [5.0, 0.0, 0.0] }
        ],
        "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 } }] }],
        "buffers": [{
            "byteLength": 36,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAA"
        }],
        "bufferViews": [{ "buffer": 0, "byteLength": 36 }],
        "accessors": [{
            "bufferView": 0,
            "componentType": 5126,
            "count": 3,
            "type": "VEC3",
            "min": [0.0, 0.0, 0.0],
            "max": [1.0, 1.0, 0.0]
        }]
    }"#;

    #[test]
    fn only_the_default_scene_is_imported() {
        let (document, buffers, _) = gltf::import_slice(TWO_SCENES.as_bytes()).unwrap();
        let data = collect_document(&document, &buffers, Path::new("two_scenes.gltf")).unwrap();
        assert_eq!(data.vertex_count(), 3);
        assert_eq!(data.indices, vec![0, 1, 2]);
        let first = Vec3::from_slice(&data.vertices[..3]);
        assert!((first - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-6);
    }
}
