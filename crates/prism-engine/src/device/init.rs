/// Knobs for adapter selection and surface setup.
///
/// The defaults suit a preview window: vsync'd presentation, an opaque
/// sRGB surface and no optional device features.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Integrated GPUs are fine for a handful of quads per frame.
    pub power_preference: wgpu::PowerPreference,

    /// Pick an sRGB swapchain format if the surface offers one. Images and
    /// camera frames are sRGB-encoded, so a linear surface shows them too dark.
    pub prefer_srgb: bool,

    pub present_mode: wgpu::PresentMode,

    /// Falls back to opaque (or the first supported mode) when unsupported.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    pub required_features: wgpu::Features,
    pub required_limits: wgpu::Limits,

    /// Frames the CPU may queue ahead of the display. A hint only.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::LowPower,
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            desired_maximum_frame_latency: 2,
        }
    }
}
