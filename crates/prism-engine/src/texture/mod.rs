//! Texture descriptions, decoded pixel data and the binder that wires a
//! texture to a program's sampler.

mod binder;
mod pixels;

pub use binder::{TextureBinder, SAMPLER_UNIFORM, TEXTURE_UNIFORM};
pub use pixels::{PixelBuffer, PixelError, PixelFormat};

/// Texture family.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TextureKind {
    /// Uploaded once from decoded pixels.
    Texture2D,
    /// Fed by a frame producer; contents change every frame.
    Streaming,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FilterMode {
    Nearest,
    Linear,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum WrapMode {
    ClampToEdge,
    Repeat,
}

/// Filter/wrap state configured once at texture creation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SamplerConfig {
    pub min_filter: FilterMode,
    pub mag_filter: FilterMode,
    pub wrap_u: WrapMode,
    pub wrap_v: WrapMode,
}

impl SamplerConfig {
    /// Policy per kind: static images minify with nearest and magnify
    /// linearly; streams filter linearly both ways. Both clamp.
    pub fn for_kind(kind: TextureKind) -> Self {
        let min_filter = match kind {
            TextureKind::Texture2D => FilterMode::Nearest,
            TextureKind::Streaming => FilterMode::Linear,
        };
        Self {
            min_filter,
            mag_filter: FilterMode::Linear,
            wrap_u: WrapMode::ClampToEdge,
            wrap_v: WrapMode::ClampToEdge,
        }
    }
}

/// Everything a backend needs to allocate a texture object.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TextureDesc {
    pub label: &'static str,
    pub kind: TextureKind,
    pub sampler: SamplerConfig,
}

impl TextureDesc {
    pub fn new(label: &'static str, kind: TextureKind) -> Self {
        Self {
            label,
            kind,
            sampler: SamplerConfig::for_kind(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_textures_minify_nearest_magnify_linear() {
        let s = SamplerConfig::for_kind(TextureKind::Texture2D);
        assert_eq!(s.min_filter, FilterMode::Nearest);
        assert_eq!(s.mag_filter, FilterMode::Linear);
        assert_eq!((s.wrap_u, s.wrap_v), (WrapMode::ClampToEdge, WrapMode::ClampToEdge));
    }

    #[test]
    fn streaming_textures_filter_linear() {
        let s = SamplerConfig::for_kind(TextureKind::Streaming);
        assert_eq!(s.min_filter, FilterMode::Linear);
        assert_eq!(s.wrap_v, WrapMode::ClampToEdge);
    }
}
