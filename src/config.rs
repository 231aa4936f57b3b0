//! Startup configuration, optionally read from a TOML file.
//!
//! Every field has a default, so an empty file (or no file) yields the
//! stock demo scene.

use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::Deserialize;

use crate::error::{RenderError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub shadow: ShadowConfig,
    pub assets: AssetConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Umbra".to_string(),
            width: 1366,
            height: 768,
            vsync: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    /// Degrees. -90 looks down -Z.
    pub yaw: f32,
    pub pitch: f32,
    pub speed: f32,
    pub sensitivity: f32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            yaw: -90.0,
            pitch: 0.0,
            speed: 5.0,
            sensitivity: 0.2,
            fov: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl CameraConfig {
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// Directional shadow frustum. Fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    /// Shadow map width = height, in texels.
    pub resolution: u32,
    /// Half width/height of the symmetric orthographic frustum.
    pub half_extent: f32,
    pub near: f32,
    pub far: f32,
    /// Distance of the light's eye from the origin, along -direction.
    pub eye_distance: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            resolution: 2048,
            half_extent: 15.0,
            near: 0.1,
            far: 30.0,
            eye_distance: 15.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub shader_dir: PathBuf,
    pub texture_dir: PathBuf,
    pub model_path: Option<PathBuf>,
    pub model_scale: f32,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            shader_dir: PathBuf::from("shaders"),
            texture_dir: PathBuf::from("content/textures"),
            model_path: Some(PathBuf::from("content/meshes/pony.glb")),
            model_scale: 0.004,
        }
    }
}

impl RendererConfig {
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|source| RenderError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| RenderError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content, path)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }
}
