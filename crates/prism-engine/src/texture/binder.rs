use crate::backend::{BindScope, GpuBackend, RenderError, TextureId};
use crate::shader::ShaderProgram;

use super::{PixelBuffer, TextureDesc, TextureKind};

/// Sampled texture binding expected by textured programs.
pub const TEXTURE_UNIFORM: &str = "t_image";
/// Sampler binding paired with [`TEXTURE_UNIFORM`].
pub const SAMPLER_UNIFORM: &str = "s_image";

/// Owns one device texture and wires it to a program's sampler slot.
///
/// Filter and wrap state is fixed at creation from the [`TextureKind`].
/// Static (2D) textures are uploaded once; streaming textures are refilled by
/// whoever holds the stream's writer, with the render thread doing the upload.
#[derive(Debug)]
pub struct TextureBinder {
    id: TextureId,
    kind: TextureKind,
}

impl TextureBinder {
    pub fn create(
        gpu: &mut dyn GpuBackend,
        label: &'static str,
        kind: TextureKind,
    ) -> Result<Self, RenderError> {
        let id = gpu.create_texture(&TextureDesc::new(label, kind))?;
        log::debug!("created {kind:?} texture {id} ({label})");
        Ok(Self { id, kind })
    }

    /// Creates a static texture and uploads `pixels` into it.
    pub fn create_2d(
        gpu: &mut dyn GpuBackend,
        label: &'static str,
        pixels: &PixelBuffer,
    ) -> Result<Self, RenderError> {
        let binder = Self::create(gpu, label, TextureKind::Texture2D)?;
        if let Err(e) = gpu.upload_texture(binder.id, pixels) {
            gpu.release_texture(binder.id);
            return Err(e);
        }
        Ok(binder)
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn kind(&self) -> TextureKind {
        self.kind
    }

    pub fn is_live(&self, gpu: &dyn GpuBackend) -> bool {
        gpu.is_texture_live(self.id)
    }

    /// Replaces the contents of a streaming texture with a claimed frame.
    pub fn upload(&self, gpu: &mut dyn GpuBackend, pixels: &PixelBuffer) -> Result<(), RenderError> {
        if self.kind == TextureKind::Texture2D {
            return Err(RenderError::Texture(format!(
                "{} is a static texture; it is uploaded once at creation",
                self.id
            )));
        }
        gpu.upload_texture(self.id, pixels)
    }

    /// Binds the texture for the next draw in `scope`.
    ///
    /// The program must declare both [`TEXTURE_UNIFORM`] and [`SAMPLER_UNIFORM`].
    pub fn bind(&self, scope: &mut BindScope<'_>, program: &ShaderProgram) -> Result<(), RenderError> {
        program.locate_uniform(TEXTURE_UNIFORM)?;
        program.locate_uniform(SAMPLER_UNIFORM)?;
        scope.texture(self.id)
    }

    pub fn release(self, gpu: &mut dyn GpuBackend) {
        log::debug!("releasing texture {}", self.id);
        gpu.release_texture(self.id);
    }
}
