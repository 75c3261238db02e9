use crate::geometry::GeometryError;
use crate::shader::ShaderError;
use crate::texture::PixelError;

use super::TextureId;

/// Failures raised while preparing or issuing GPU work.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Pixels(#[from] PixelError),

    #[error("texture error: {0}")]
    Texture(String),

    #[error("layout mismatch: {0}")]
    Layout(String),

    #[error("unknown or released handle: {0}")]
    InvalidHandle(String),

    /// The handle outlived its surface generation. Recoverable by reallocating.
    #[error("stale texture handle {0}")]
    StaleTextureHandle(TextureId),

    #[error("surface error: {0}")]
    Surface(String),
}
