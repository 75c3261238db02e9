//! GPU backend seam.
//!
//! Renderers talk to the device only through [`GpuBackend`]. The production
//! implementation is [`WgpuBackend`]; tests use a recording fake. Every call
//! on a backend must come from the render thread that owns it.

mod error;
mod handle;
mod scope;
mod native;

#[cfg(test)]
pub(crate) mod recording;

pub use error::RenderError;
pub use handle::{GeometryId, ProgramId, TextureId};
pub use scope::BindScope;
pub use native::WgpuBackend;

use crate::geometry::GeometryBuffer;
use crate::shader::ShaderProgram;
use crate::texture::{PixelBuffer, TextureDesc};
use crate::transform::Mat4;

/// Per-draw uniform values, matched to reflected uniforms by name.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawUniforms {
    /// `u_mvp`
    pub mvp: Mat4,
    /// `u_tex_matrix`, identity when absent.
    pub tex_matrix: Option<Mat4>,
    /// `u_color`, opaque white when absent.
    pub color: Option<[f32; 4]>,
}

impl DrawUniforms {
    pub fn new(mvp: Mat4) -> Self {
        Self {
            mvp,
            tex_matrix: None,
            color: None,
        }
    }
}

/// Device operations needed by the renderers.
///
/// Handles are only meaningful to the backend that issued them; a backend
/// built for a newer surface reports older handles as stale.
pub trait GpuBackend {
    fn create_program(&mut self, program: &ShaderProgram) -> Result<ProgramId, RenderError>;
    fn release_program(&mut self, id: ProgramId);

    fn upload_geometry(&mut self, geometry: &GeometryBuffer) -> Result<GeometryId, RenderError>;
    fn release_geometry(&mut self, id: GeometryId);

    fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureId, RenderError>;
    /// Replaces the texture contents, resizing the storage if needed.
    fn upload_texture(&mut self, id: TextureId, pixels: &PixelBuffer) -> Result<(), RenderError>;
    fn release_texture(&mut self, id: TextureId);
    fn is_texture_live(&self, id: TextureId) -> bool;

    fn set_viewport(&mut self, width: u32, height: u32);

    /// Acquires the next surface image and schedules a clear.
    ///
    /// `Ok(false)` means the frame must be skipped (transient surface error).
    fn begin_frame(&mut self, clear: [f32; 4]) -> Result<bool, RenderError>;
    fn bind_program(&mut self, id: ProgramId) -> Result<(), RenderError>;
    fn bind_texture(&mut self, id: TextureId) -> Result<(), RenderError>;
    fn unbind_all(&mut self);
    fn draw(&mut self, geometry: GeometryId, uniforms: &DrawUniforms) -> Result<(), RenderError>;
    /// Submits and presents the frame, if one was begun.
    fn end_frame(&mut self);
}
