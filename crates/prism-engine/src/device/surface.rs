//! Surface format/alpha selection and the per-frame objects.

/// What the caller should do after `get_current_texture` failed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// The swapchain was rebuilt; the next frame can proceed.
    Reconfigured,
    /// Drop this frame and wait for the next draw request.
    SkipFrame,
    /// The device cannot continue.
    Fatal,
}

/// An acquired swapchain image plus the encoder recording into it.
///
/// Render passes are appended to `encoder` one draw at a time and submitted
/// together by [`Gpu::submit`](super::Gpu::submit). Holding a frame blocks
/// acquisition of the next one.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// First sRGB format the surface offers when `prefer_srgb`, else its
/// preferred one.
pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let first = caps.formats.first().copied()?;
    if !prefer_srgb {
        return Some(first);
    }
    Some(caps.formats.iter().copied().find(|f| f.is_srgb()).unwrap_or(first))
}

/// Honors `requested` when supported; otherwise opaque, then whatever the
/// surface lists first.
pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    let supported = |m: &wgpu::CompositeAlphaMode| caps.alpha_modes.contains(m);
    requested
        .filter(supported)
        .or_else(|| Some(wgpu::CompositeAlphaMode::Opaque).filter(supported))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

pub(crate) fn classify(err: &wgpu::SurfaceError) -> SurfaceErrorAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceErrorAction::Reconfigured,
        wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::{CompositeAlphaMode as Alpha, TextureFormat as Format};

    fn caps(formats: &[Format], alpha_modes: &[Alpha]) -> wgpu::SurfaceCapabilities {
        wgpu::SurfaceCapabilities {
            formats: formats.to_vec(),
            alpha_modes: alpha_modes.to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn prefers_an_srgb_format() {
        let c = caps(&[Format::Bgra8Unorm, Format::Bgra8UnormSrgb], &[]);
        assert_eq!(choose_surface_format(&c, true), Some(Format::Bgra8UnormSrgb));
        assert_eq!(choose_surface_format(&c, false), Some(Format::Bgra8Unorm));
    }

    #[test]
    fn falls_back_to_the_first_format() {
        let c = caps(&[Format::Rgba16Float], &[]);
        assert_eq!(choose_surface_format(&c, true), Some(Format::Rgba16Float));
        assert_eq!(choose_surface_format(&caps(&[], &[]), true), None);
    }

    #[test]
    fn alpha_mode_defaults_to_opaque() {
        let c = caps(&[], &[Alpha::PreMultiplied, Alpha::Opaque]);
        assert_eq!(choose_alpha_mode(&c, None), Alpha::Opaque);
        assert_eq!(choose_alpha_mode(&c, Some(Alpha::PreMultiplied)), Alpha::PreMultiplied);
        assert_eq!(choose_alpha_mode(&c, Some(Alpha::PostMultiplied)), Alpha::Opaque);
        assert_eq!(choose_alpha_mode(&caps(&[], &[]), None), Alpha::Auto);
    }

    #[test]
    fn lost_surfaces_are_reconfigured() {
        assert_eq!(classify(&wgpu::SurfaceError::Lost), SurfaceErrorAction::Reconfigured);
        assert_eq!(classify(&wgpu::SurfaceError::Timeout), SurfaceErrorAction::SkipFrame);
        assert_eq!(classify(&wgpu::SurfaceError::OutOfMemory), SurfaceErrorAction::Fatal);
    }
}
