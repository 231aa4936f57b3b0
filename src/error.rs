use std::path::PathBuf;

/// Errors raised by the renderer and its asset loaders.
///
/// Most of these are logged and rendering continues with degraded visuals;
/// only window/context failures abort startup.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("window error: {0}")]
    Window(String),

    #[error("failed to read shader '{path}': {source}")]
    ShaderSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} shader compile error: {log}")]
    ShaderCompile { stage: &'static str, log: String },

    #[error("shader link error: {0}")]
    ShaderLink(String),

    #[error("shadow map framebuffer incomplete (status 0x{0:x})")]
    FramebufferIncomplete(u32),

    #[error("shadow map used before initialize()")]
    ShadowMapNotInitialized,

    #[error("invalid shadow map size {width}x{height}")]
    InvalidShadowSize { width: u32, height: u32 },

    #[error("invalid shadow frustum: half_extent {half_extent}, near {near}, far {far}")]
    InvalidShadowFrustum { half_extent: f32, near: f32, far: f32 },

    #[error("failed to load texture '{path}': {source}")]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to import model '{path}': {source}")]
    Model {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },

    #[error("model '{0}' has no triangle primitives with positions")]
    EmptyModel(PathBuf),

    #[error("mesh index {index} out of range for {vertex_count} vertices")]
    MeshIndex { index: u32, vertex_count: usize },

    #[error(transparent)]
    Light(#[from] crate::lighting::LightError),

    #[error("failed to read config '{path}': {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, RenderError>;
