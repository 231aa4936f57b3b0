use gl::types::*;
use glam::Vec3;
use std::mem;
use std::ptr;

use crate::error::{RenderError, Result};

/// Floats per vertex: position (3), uv (2), normal (3).
pub const VERTEX_STRIDE: usize = 8;
pub const UV_OFFSET: usize = 3;
pub const NORMAL_OFFSET: usize = 5;

/// CPU-side interleaved geometry, ready for `Mesh::upload`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / VERTEX_STRIDE
    }

    /// Four-sided pyramid with smoothed normals.
    pub fn pyramid() -> Result<Self> {
        #[rustfmt::skip]
        let mut vertices = vec![
        //    x     y     z     u    v    nx   ny   nz
            -1.0, -1.0, -0.6, 0.0, 0.0, 0.0, 0.0, 0.0,
             0.0, -1.0,  1.0, 0.5, 0.0, 0.0, 0.0, 0.0,
             1.0, -1.0, -0.6, 1.0, 0.0, 0.0, 0.0, 0.0,
             0.0,  1.0,  0.0, 0.5, 1.0, 0.0, 0.0, 0.0,
        ];
        let indices = vec![
            0, 1, 3, //
            1, 2, 3, //
            2, 0, 3, //
            0, 2, 1,
        ];
        calculate_average_normals(&indices, &mut vertices, VERTEX_STRIDE, NORMAL_OFFSET)?;
        Ok(Self { vertices, indices })
    }

    /// 20x20 ground quad at y = 0, uv tiled ten times.
    pub fn floor() -> Self {
        #[rustfmt::skip]
        let vertices = vec![
            -10.0, 0.0, -10.0,  0.0,  0.0, 0.0, 1.0, 0.0,
             10.0, 0.0, -10.0, 10.0,  0.0, 0.0, 1.0, 0.0,
            -10.0, 0.0,  10.0,  0.0, 10.0, 0.0, 1.0, 0.0,
             10.0, 0.0,  10.0, 10.0, 10.0, 0.0, 1.0, 0.0,
        ];
        Self {
            vertices,
            indices: vec![0, 2, 1, 1, 2, 3],
        }
    }
}

/// Replace the normal of every vertex with the normalized sum of the face
/// normals of the triangles that use it.
///
/// `stride` is floats per vertex; `normal_offset` is where nx starts within
/// a vertex. Positions are assumed to be the first three floats.
pub fn calculate_average_normals(
    indices: &[u32],
    vertices: &mut [f32],
    stride: usize,
    normal_offset: usize,
) -> Result<()> {
    let vertex_count = vertices.len() / stride;
    if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(RenderError::MeshIndex {
            index,
            vertex_count,
        });
    }

    let position = |v: &[f32], i: u32| {
        let at = i as usize * stride;
        Vec3::new(v[at], v[at + 1], v[at + 2])
    };

    for v in 0..vertex_count {
        let at = v * stride + normal_offset;
        vertices[at..at + 3].fill(0.0);
    }

    for tri in indices.chunks_exact(3) {
        let p0 = position(&*vertices, tri[0]);
        let e1 = position(&*vertices, tri[1]) - p0;
        let e2 = position(&*vertices, tri[2]) - p0;
        let face = e1.cross(e2).normalize_or_zero();

        for &i in tri {
            let at = i as usize * stride + normal_offset;
            vertices[at] += face.x;
            vertices[at + 1] += face.y;
            vertices[at + 2] += face.z;
        }
    }

    for v in 0..vertex_count {
        let at = v * stride + normal_offset;
        let n = Vec3::new(vertices[at], vertices[at + 1], vertices[at + 2]).normalize_or_zero();
        vertices[at..at + 3].copy_from_slice(&n.to_array());
    }

    Ok(())
}

pub struct Mesh {
    vao: GLuint,
    vbo: GLuint,
    ebo: GLuint,
    pub index_count: i32,
}

impl Mesh {
    pub fn upload(data: &MeshData) -> Mesh {
        let mut vao = 0;
        let mut vbo = 0;
        let mut ebo = 0;

        unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::GenBuffers(1, &mut vbo);
            gl::GenBuffers(1, &mut ebo);

            gl::BindVertexArray(vao);

            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                (data.vertices.len() * mem::size_of::<f32>()) as GLsizeiptr,
                data.vertices.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
            gl::BufferData(
                gl::ELEMENT_ARRAY_BUFFER,
                (data.indices.len() * mem::size_of::<u32>()) as GLsizeiptr,
                data.indices.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            let stride = (VERTEX_STRIDE * mem::size_of::<f32>()) as GLsizei;

            // position attribute (location 0)
            gl::VertexAttribPointer(0, 3, gl::FLOAT, gl::FALSE, stride, ptr::null());
            gl::EnableVertexAttribArray(0);

            // uv attribute (location 1)
            gl::VertexAttribPointer(
                1,
                2,
                gl::FLOAT,
                gl::FALSE,
                stride,
                (UV_OFFSET * mem::size_of::<f32>()) as *const _,
            );
            gl::EnableVertexAttribArray(1);

            // normal attribute (location 2)
            gl::VertexAttribPointer(
                2,
                3,
                gl::FLOAT,
                gl::FALSE,
                stride,
                (NORMAL_OFFSET * mem::size_of::<f32>()) as *const _,
            );
            gl::EnableVertexAttribArray(2);

            gl::BindVertexArray(0);
        }

        Mesh {
            vao,
            vbo,
            ebo,
            index_count: data.indices.len() as i32,
        }
    }

    pub fn draw(&self) {
        unsafe {
            gl::BindVertexArray(self.vao);
            gl::DrawElements(gl::TRIANGLES, self.index_count, gl::UNSIGNED_INT, ptr::null());
            gl::BindVertexArray(0);
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteBuffers(1, &self.ebo);
        }
    }
}
