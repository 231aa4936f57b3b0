use gl::types::*;
use std::collections::HashMap;
use std::path::Path;

use crate::error::{RenderError, Result};

/// RGBA8 pixels decoded from an image file.
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn open(path: &Path) -> Result<Self> {
        let img = image::open(path).map_err(|source| RenderError::Texture {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = img.to_rgba8();
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            pixels: rgba.into_raw(),
        })
    }

    /// Single opaque white texel, so untextured surfaces shade with their
    /// light color alone.
    pub fn white() -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![255, 255, 255, 255],
        }
    }
}

pub struct Texture {
    id: GLuint,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    pub fn upload(image: &DecodedImage) -> Self {
        let mut id = 0;
        unsafe {
            gl::GenTextures(1, &mut id);
            gl::BindTexture(gl::TEXTURE_2D, id);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::REPEAT as GLint);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::REPEAT as GLint);
            gl::TexParameteri(
                gl::TEXTURE_2D,
                gl::TEXTURE_MIN_FILTER,
                gl::LINEAR_MIPMAP_LINEAR as GLint,
            );
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as GLint);
            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                gl::RGBA as GLint,
                image.width as GLsizei,
                image.height as GLsizei,
                0,
                gl::RGBA,
                gl::UNSIGNED_BYTE,
                image.pixels.as_ptr() as *const _,
            );
            gl::GenerateMipmap(gl::TEXTURE_2D);
            gl::BindTexture(gl::TEXTURE_2D, 0);
        }
        Self {
            id,
            width: image.width,
            height: image.height,
        }
    }

    /// Bind to texture unit 0, the lit shader's diffuse sampler.
    pub fn apply(&self) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0);
            gl::BindTexture(gl::TEXTURE_2D, self.id);
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteTextures(1, &self.id);
        }
    }
}

/// Named textures plus the placeholder returned for anything missing.
pub struct TextureStore {
    textures: HashMap<String, Texture>,
    placeholder: Texture,
}

impl TextureStore {
    pub fn new() -> Self {
        Self {
            textures: HashMap::new(),
            placeholder: Texture::upload(&DecodedImage::white()),
        }
    }

    /// Decode and upload `path` under `name`. Failures are logged and the
    /// name keeps resolving to the placeholder.
    pub fn load(&mut self, name: &str, path: &Path) {
        match DecodedImage::open(path) {
            Ok(image) => {
                log::info!("Loaded texture {name}: {} ({}x{})", path.display(), image.width, image.height);
                self.textures.insert(name.to_string(), Texture::upload(&image));
            }
            Err(e) => log::warn!("{e}; using placeholder for {name}"),
        }
    }

    pub fn get(&self, name: &str) -> &Texture {
        self.textures.get(name).unwrap_or(&self.placeholder)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_image_reports_path() {
        let err = DecodedImage::open(Path::new("/nonexistent/brick.jpg"))
            .err()
            .map(|e| e.to_string())
            .unwrap_or_default();
        assert!(err.contains("brick.jpg"));
    }

    #[test]
    fn white_placeholder_is_one_opaque_texel() {
        let white = DecodedImage::white();
        assert_eq!((white.width, white.height), (1, 1));
        assert_eq!(white.pixels, vec![255; 4]);
    }
}
