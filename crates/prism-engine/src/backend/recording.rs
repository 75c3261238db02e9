//! Test double that records every backend call.

use std::collections::HashSet;

use super::{DrawUniforms, GeometryId, GpuBackend, ProgramId, RenderError, TextureId};
use crate::geometry::GeometryBuffer;
use crate::shader::ShaderProgram;
use crate::texture::{PixelBuffer, TextureDesc};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    CreateProgram(String),
    ReleaseProgram(ProgramId),
    UploadGeometry(u32),
    ReleaseGeometry(GeometryId),
    CreateTexture(TextureDesc),
    UploadTexture(TextureId, PixelBuffer),
    ReleaseTexture(TextureId),
    Viewport(u32, u32),
    BeginFrame,
    BindProgram(ProgramId),
    BindTexture(TextureId),
    UnbindAll,
    Draw(GeometryId, DrawUniforms),
    EndFrame,
}

#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    pub calls: Vec<Call>,
    pub generation: u32,
    next: u32,
    live_textures: HashSet<TextureId>,

    pub bound_program: Option<ProgramId>,
    pub bound_texture: Option<TextureId>,

    pub fail_create_program: bool,
    pub fail_draw: bool,
    pub skip_frames: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates a lost context: every handle issued so far becomes stale.
    pub fn lose_context(&mut self) {
        self.generation += 1;
        self.live_textures.clear();
    }

    pub fn draws(&self) -> Vec<&DrawUniforms> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Draw(_, u) => Some(u),
                _ => None,
            })
            .collect()
    }

    pub fn uploads(&self) -> Vec<&PixelBuffer> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::UploadTexture(_, p) => Some(p),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }

    fn next_index(&mut self) -> u32 {
        self.next += 1;
        self.next
    }
}

impl GpuBackend for RecordingBackend {
    fn create_program(&mut self, program: &ShaderProgram) -> Result<ProgramId, RenderError> {
        self.calls.push(Call::CreateProgram(program.label().to_owned()));
        if self.fail_create_program {
            return Err(RenderError::Layout("injected program failure".into()));
        }
        Ok(ProgramId::new(self.next_index(), self.generation))
    }

    fn release_program(&mut self, id: ProgramId) {
        self.calls.push(Call::ReleaseProgram(id));
    }

    fn upload_geometry(&mut self, geometry: &GeometryBuffer) -> Result<GeometryId, RenderError> {
        self.calls.push(Call::UploadGeometry(geometry.vertex_count()));
        Ok(GeometryId::new(self.next_index(), self.generation))
    }

    fn release_geometry(&mut self, id: GeometryId) {
        self.calls.push(Call::ReleaseGeometry(id));
    }

    fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureId, RenderError> {
        self.calls.push(Call::CreateTexture(*desc));
        let id = TextureId::new(self.next_index(), self.generation);
        self.live_textures.insert(id);
        Ok(id)
    }

    fn upload_texture(&mut self, id: TextureId, pixels: &PixelBuffer) -> Result<(), RenderError> {
        self.calls.push(Call::UploadTexture(id, pixels.clone()));
        if !self.live_textures.contains(&id) {
            return Err(RenderError::StaleTextureHandle(id));
        }
        Ok(())
    }

    fn release_texture(&mut self, id: TextureId) {
        self.calls.push(Call::ReleaseTexture(id));
        self.live_textures.remove(&id);
    }

    fn is_texture_live(&self, id: TextureId) -> bool {
        self.live_textures.contains(&id)
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.calls.push(Call::Viewport(width, height));
    }

    fn begin_frame(&mut self, _clear: [f32; 4]) -> Result<bool, RenderError> {
        self.calls.push(Call::BeginFrame);
        Ok(!self.skip_frames)
    }

    fn bind_program(&mut self, id: ProgramId) -> Result<(), RenderError> {
        self.calls.push(Call::BindProgram(id));
        self.bound_program = Some(id);
        Ok(())
    }

    fn bind_texture(&mut self, id: TextureId) -> Result<(), RenderError> {
        self.calls.push(Call::BindTexture(id));
        self.bound_texture = Some(id);
        Ok(())
    }

    fn unbind_all(&mut self) {
        self.calls.push(Call::UnbindAll);
        self.bound_program = None;
        self.bound_texture = None;
    }

    fn draw(&mut self, geometry: GeometryId, uniforms: &DrawUniforms) -> Result<(), RenderError> {
        self.calls.push(Call::Draw(geometry, *uniforms));
        if self.fail_draw {
            return Err(RenderError::Layout("injected draw failure".into()));
        }
        Ok(())
    }

    fn end_frame(&mut self) {
        self.calls.push(Call::EndFrame);
    }
}
