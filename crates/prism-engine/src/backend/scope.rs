use super::{DrawUniforms, GeometryId, GpuBackend, ProgramId, RenderError, TextureId};

/// Binding guard for a single draw.
///
/// Whatever happens between creation and drop, including an early `?`
/// return, the backend is left with nothing bound.
pub struct BindScope<'a> {
    gpu: &'a mut dyn GpuBackend,
}

impl<'a> BindScope<'a> {
    pub fn new(gpu: &'a mut dyn GpuBackend) -> Self {
        Self { gpu }
    }

    pub fn program(&mut self, id: ProgramId) -> Result<(), RenderError> {
        self.gpu.bind_program(id)
    }

    pub fn texture(&mut self, id: TextureId) -> Result<(), RenderError> {
        self.gpu.bind_texture(id)
    }

    pub fn draw(&mut self, geometry: GeometryId, uniforms: &DrawUniforms) -> Result<(), RenderError> {
        self.gpu.draw(geometry, uniforms)
    }
}

impl Drop for BindScope<'_> {
    fn drop(&mut self) {
        self.gpu.unbind_all();
    }
}
