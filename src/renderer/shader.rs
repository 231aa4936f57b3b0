use gl::types::*;
use glam::{Mat4, Vec3, Vec4};
use std::collections::HashMap;
use std::ffi::CString;
use std::path::Path;
use std::ptr;

use crate::error::{RenderError, Result};

/// Writes uniform values at pre-resolved locations of the bound program.
///
/// Location -1 is GL's "no such uniform" and must be silently ignored by
/// implementations, matching glUniform* semantics.
pub trait UniformWriter {
    fn location(&mut self, name: &str) -> GLint;
    fn write_mat4(&mut self, loc: GLint, mat: &Mat4);
    fn write_vec3(&mut self, loc: GLint, v: Vec3);
    fn write_vec4(&mut self, loc: GLint, v: Vec4);
    fn write_float(&mut self, loc: GLint, val: f32);
    fn write_int(&mut self, loc: GLint, val: i32);
}

pub struct ShaderProgram {
    pub id: GLuint,
    uniform_cache: HashMap<String, GLint>,
}

impl ShaderProgram {
    /// Read a vertex/fragment pair from disk and link it.
    pub fn from_files(vert_path: &Path, frag_path: &Path) -> Result<Self> {
        let vert_src = read_source(vert_path)?;
        let frag_src = read_source(frag_path)?;
        let program = Self::from_sources(&vert_src, &frag_src)?;
        log::info!(
            "Linked shader program {} ({}, {})",
            program.id,
            vert_path.display(),
            frag_path.display()
        );
        Ok(program)
    }

    pub fn from_sources(vert_src: &str, frag_src: &str) -> Result<Self> {
        unsafe {
            let vert = compile_shader(vert_src, gl::VERTEX_SHADER)?;
            let frag = match compile_shader(frag_src, gl::FRAGMENT_SHADER) {
                Ok(frag) => frag,
                Err(e) => {
                    gl::DeleteShader(vert);
                    return Err(e);
                }
            };

            let program = gl::CreateProgram();
            gl::AttachShader(program, vert);
            gl::AttachShader(program, frag);
            gl::LinkProgram(program);

            let mut success = 0;
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
            if success == 0 {
                let mut len = 0;
                gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
                let mut buf = vec![0u8; len.max(1) as usize];
                gl::GetProgramInfoLog(program, len, ptr::null_mut(), buf.as_mut_ptr() as *mut _);
                buf.pop(); // remove null terminator
                let msg = String::from_utf8_lossy(&buf).to_string();
                gl::DeleteProgram(program);
                gl::DeleteShader(vert);
                gl::DeleteShader(frag);
                return Err(RenderError::ShaderLink(msg));
            }

            gl::DeleteShader(vert);
            gl::DeleteShader(frag);

            Ok(Self {
                id: program,
                uniform_cache: HashMap::new(),
            })
        }
    }

    /// Program 0: binding it draws nothing. Stands in for a program that
    /// failed to build.
    pub fn invalid() -> Self {
        Self {
            id: 0,
            uniform_cache: HashMap::new(),
        }
    }

    /// Load from disk, logging failures and falling back to `invalid()`.
    pub fn load_or_invalid(vert_path: &Path, frag_path: &Path) -> Self {
        match Self::from_files(vert_path, frag_path) {
            Ok(program) => program,
            Err(e) => {
                log::error!("{e}; continuing with an unlinked program");
                Self::invalid()
            }
        }
    }

    pub fn bind(&self) {
        unsafe {
            gl::UseProgram(self.id);
        }
    }
}

impl UniformWriter for ShaderProgram {
    fn location(&mut self, name: &str) -> GLint {
        if self.id == 0 {
            return -1;
        }
        if let Some(&loc) = self.uniform_cache.get(name) {
            return loc;
        }
        let loc = match CString::new(name) {
            Ok(cname) => unsafe { gl::GetUniformLocation(self.id, cname.as_ptr()) },
            Err(_) => -1,
        };
        if loc < 0 {
            log::debug!("Uniform '{name}' not active in program {}", self.id);
        }
        self.uniform_cache.insert(name.to_string(), loc);
        loc
    }

    fn write_mat4(&mut self, loc: GLint, mat: &Mat4) {
        unsafe {
            gl::UniformMatrix4fv(loc, 1, gl::FALSE, mat.to_cols_array().as_ptr());
        }
    }

    fn write_vec3(&mut self, loc: GLint, v: Vec3) {
        unsafe {
            gl::Uniform3f(loc, v.x, v.y, v.z);
        }
    }

    fn write_vec4(&mut self, loc: GLint, v: Vec4) {
        unsafe {
            gl::Uniform4f(loc, v.x, v.y, v.z, v.w);
        }
    }

    fn write_float(&mut self, loc: GLint, val: f32) {
        unsafe {
            gl::Uniform1f(loc, val);
        }
    }

    fn write_int(&mut self, loc: GLint, val: i32) {
        unsafe {
            gl::Uniform1i(loc, val);
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        if self.id != 0 {
            unsafe {
                gl::DeleteProgram(self.id);
            }
        }
    }
}

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| RenderError::ShaderSource {
        path: path.to_path_buf(),
        source,
    })
}

unsafe fn compile_shader(src: &str, shader_type: GLenum) -> Result<GLuint> {
    let stage = if shader_type == gl::VERTEX_SHADER {
        "vertex"
    } else {
        "fragment"
    };
    let c_src = CString::new(src).map_err(|_| RenderError::ShaderCompile {
        stage,
        log: "source contains a NUL byte".to_string(),
    })?;

    let shader = gl::CreateShader(shader_type);
    gl::ShaderSource(shader, 1, &c_src.as_ptr(), ptr::null());
    gl::CompileShader(shader);

    let mut success = 0;
    gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
    if success == 0 {
        let mut len = 0;
        gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
        let mut buf = vec![0u8; len.max(1) as usize];
        gl::GetShaderInfoLog(shader, len, ptr::null_mut(), buf.as_mut_ptr() as *mut _);
        buf.pop();
        let log = String::from_utf8_lossy(&buf).to_string();
        gl::DeleteShader(shader);
        return Err(RenderError::ShaderCompile { stage, log });
    }
    Ok(shader)
}
