use gl::types::*;
use std::ptr;

use crate::error::{RenderError, Result};

/// Depth-only render target sampled by the lit pass.
///
/// Dimensions are fixed by `new`; GL objects are allocated separately by
/// `initialize` once a context is current, so lights can be built (and
/// tested) without one.
pub struct ShadowMap {
    width: u32,
    height: u32,
    target: Option<DepthTarget>,
}

struct DepthTarget {
    fbo: GLuint,
    texture: GLuint,
}

impl ShadowMap {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(RenderError::InvalidShadowSize { width, height });
        }
        Ok(Self {
            width,
            height,
            target: None,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_initialized(&self) -> bool {
        self.target.is_some()
    }

    /// Allocate the depth texture and framebuffer. Calling it again on an
    /// initialized map is a no-op.
    pub fn initialize(&mut self) -> Result<()> {
        if self.target.is_some() {
            return Ok(());
        }

        let mut fbo = 0;
        let mut texture = 0;
        unsafe {
            gl::GenFramebuffers(1, &mut fbo);
            gl::GenTextures(1, &mut texture);

            gl::BindTexture(gl::TEXTURE_2D, texture);
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                gl::DEPTH_COMPONENT as GLint,
                self.width as GLsizei,
                self.height as GLsizei,
                0,
                gl::DEPTH_COMPONENT,
                gl::FLOAT,
                ptr::null(),
            );
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::LINEAR as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as GLint);
            // Outside the light frustum reads as maximum depth (lit).
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::CLAMP_TO_BORDER as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::CLAMP_TO_BORDER as GLint);
            let border = [1.0f32, 1.0, 1.0, 1.0];
            gl::TexParameterfv(gl::TEXTURE_2D, gl::TEXTURE_BORDER_COLOR, border.as_ptr());

            gl::BindFramebuffer(gl::FRAMEBUFFER, fbo);
            gl::FramebufferTexture2D(
                gl::FRAMEBUFFER,
                gl::DEPTH_ATTACHMENT,
                gl::TEXTURE_2D,
                texture,
                0,
            );
            gl::DrawBuffer(gl::NONE);
            gl::ReadBuffer(gl::NONE);

            let status = gl::CheckFramebufferStatus(gl::FRAMEBUFFER);
            gl::BindFramebuffer(gl::FRAMEBUFFER, 0);
            gl::BindTexture(gl::TEXTURE_2D, 0);

            if status != gl::FRAMEBUFFER_COMPLETE {
                gl::DeleteFramebuffers(1, &fbo);
                gl::DeleteTextures(1, &texture);
                return Err(RenderError::FramebufferIncomplete(status));
            }
        }

        log::debug!("Allocated {}x{} shadow map", self.width, self.height);
        self.target = Some(DepthTarget { fbo, texture });
        Ok(())
    }

    /// Direct subsequent draws into the depth texture.
    pub fn bind_for_write(&self) -> Result<()> {
        let target = self.target.as_ref().ok_or(RenderError::ShadowMapNotInitialized)?;
        unsafe {
            gl::BindFramebuffer(gl::FRAMEBUFFER, target.fbo);
        }
        Ok(())
    }

    /// Bind the depth texture to texture unit `unit` (0-based).
    pub fn bind_for_read(&self, unit: u32) -> Result<()> {
        let target = self.target.as_ref().ok_or(RenderError::ShadowMapNotInitialized)?;
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit);
            gl::BindTexture(gl::TEXTURE_2D, target.texture);
        }
        Ok(())
    }
}

impl Drop for ShadowMap {
    fn drop(&mut self) {
        if let Some(target) = self.target.take() {
            unsafe {
                gl::DeleteFramebuffers(1, &target.fbo);
                gl::DeleteTextures(1, &target.texture);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_creation_dimensions() {
        let map = ShadowMap::new(2048, 2048).unwrap();
        assert_eq!(map.width(), 2048);
        assert_eq!(map.height(), 2048);
        assert!(!map.is_initialized());
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(
            ShadowMap::new(0, 512),
            Err(RenderError::InvalidShadowSize { width: 0, height: 512 })
        ));
    }

    #[test]
    fn binding_before_initialize_fails_without_touching_gl() {
        let map = ShadowMap::new(1024, 512).unwrap();
        assert!(matches!(map.bind_for_write(), Err(RenderError::ShadowMapNotInitialized)));
        assert!(matches!(map.bind_for_read(1), Err(RenderError::ShadowMapNotInitialized)));
    }
}
