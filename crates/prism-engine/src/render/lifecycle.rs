use crate::backend::{GpuBackend, RenderError};

/// Capability set shared by every renderer.
///
/// Each hook receives the backend of the current surface; renderers never
/// keep it between calls.
pub trait Renderer {
    /// Compiles programs and allocates device resources.
    fn on_ready(&mut self, gpu: &mut dyn GpuBackend) -> Result<(), RenderError>;
    /// Recomputes the transform for the new surface size.
    fn on_resize(&mut self, gpu: &mut dyn GpuBackend, width: u32, height: u32);
    /// Draws one frame.
    fn on_draw(&mut self, gpu: &mut dyn GpuBackend) -> Result<(), RenderError>;
    /// Releases everything allocated in `on_ready`.
    fn on_destroy(&mut self, gpu: &mut dyn GpuBackend);
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Phase {
    Uninitialized,
    Ready,
    Sized,
    Drawing,
    /// Setup failed for the current surface; draws are ignored until the
    /// host creates a new surface.
    Inert,
    Destroyed,
}

/// Drives a [`Renderer`] from host surface callbacks.
///
/// ```text
/// Uninitialized -> Ready -> Sized <-> Drawing
///        any    -> Destroyed
/// ```
///
/// Draw requests outside `Sized` are ignored, not errors: hosts request draws
/// speculatively before setup completes.
pub struct RendererLifecycle<R> {
    renderer: R,
    phase: Phase,
    generation: u64,
    size: Option<(u32, u32)>,
}

impl<R: Renderer> RendererLifecycle<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            phase: Phase::Uninitialized,
            generation: 0,
            size: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of surfaces seen so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    pub fn surface_created(&mut self, gpu: &mut dyn GpuBackend) -> Result<(), RenderError> {
        if self.is_live() {
            log::debug!("surface re-created while live; dropping previous resources");
            self.renderer.on_destroy(gpu);
        }

        self.generation += 1;
        self.size = None;

        match self.renderer.on_ready(gpu) {
            Ok(()) => {
                log::debug!("renderer ready (surface generation {})", self.generation);
                self.phase = Phase::Ready;
                Ok(())
            }
            Err(e) => {
                log::error!(
                    "renderer setup failed for surface generation {}: {e}",
                    self.generation
                );
                self.renderer.on_destroy(gpu);
                self.phase = Phase::Inert;
                Err(e)
            }
        }
    }

    pub fn surface_changed(&mut self, gpu: &mut dyn GpuBackend, width: u32, height: u32) {
        match self.phase {
            Phase::Ready | Phase::Sized => {
                self.renderer.on_resize(gpu, width, height);
                self.size = Some((width, height));
                self.phase = Phase::Sized;
            }
            phase => log::debug!("resize to {width}x{height} ignored in {phase:?}"),
        }
    }

    pub fn draw_requested(&mut self, gpu: &mut dyn GpuBackend) -> Result<(), RenderError> {
        if self.phase != Phase::Sized {
            log::debug!("draw requested in {:?}; ignored", self.phase);
            return Ok(());
        }

        self.phase = Phase::Drawing;
        let result = self.renderer.on_draw(gpu);
        self.phase = Phase::Sized;
        result
    }

    pub fn surface_destroyed(&mut self, gpu: &mut dyn GpuBackend) {
        if self.is_live() {
            self.renderer.on_destroy(gpu);
        }
        self.size = None;
        self.phase = Phase::Destroyed;
    }

    fn is_live(&self) -> bool {
        matches!(self.phase, Phase::Ready | Phase::Sized | Phase::Drawing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::recording::{Call, RecordingBackend};
    use crate::render::{Scene, SceneRenderer};

    fn lifecycle() -> RendererLifecycle<SceneRenderer> {
        RendererLifecycle::new(SceneRenderer::new(Scene::Triangle))
    }

    #[test]
    fn draw_before_ready_touches_nothing() {
        let mut gpu = RecordingBackend::new();
        let mut lc = lifecycle();

        assert!(lc.draw_requested(&mut gpu).is_ok());
        lc.surface_changed(&mut gpu, 100, 100);
        assert!(lc.draw_requested(&mut gpu).is_ok());

        assert!(gpu.calls.is_empty());
        assert_eq!(lc.phase(), Phase::Uninitialized);
    }

    #[test]
    fn draw_before_first_resize_is_ignored() {
        let mut gpu = RecordingBackend::new();
        let mut lc = lifecycle();
        lc.surface_created(&mut gpu).unwrap();
        gpu.clear();

        lc.draw_requested(&mut gpu).unwrap();

        assert!(gpu.calls.is_empty());
        assert_eq!(lc.phase(), Phase::Ready);
    }

    #[test]
    fn full_cycle() {
        let mut gpu = RecordingBackend::new();
        let mut lc = lifecycle();

        lc.surface_created(&mut gpu).unwrap();
        assert_eq!(lc.phase(), Phase::Ready);
        lc.surface_changed(&mut gpu, 640, 480);
        assert_eq!(lc.phase(), Phase::Sized);
        lc.draw_requested(&mut gpu).unwrap();
        assert_eq!(lc.phase(), Phase::Sized);
        assert_eq!(gpu.draws().len(), 1);

        lc.surface_destroyed(&mut gpu);
        assert_eq!(lc.phase(), Phase::Destroyed);
        assert_eq!(gpu.count(|c| matches!(c, Call::ReleaseProgram(_))), 1);

        gpu.clear();
        lc.draw_requested(&mut gpu).unwrap();
        assert!(gpu.calls.is_empty());
    }

    #[test]
    fn resize_recomputes_the_transform() {
        let mut gpu = RecordingBackend::new();
        let mut lc = lifecycle();
        lc.surface_created(&mut gpu).unwrap();

        lc.surface_changed(&mut gpu, 1920, 1080);
        let landscape = lc.renderer().mvp();
        lc.surface_changed(&mut gpu, 1080, 1920);

        assert_ne!(lc.renderer().mvp(), landscape);
        assert_eq!(lc.size(), Some((1080, 1920)));
    }

    #[test]
    fn failed_setup_is_inert_until_next_surface() {
        let mut gpu = RecordingBackend::new();
        gpu.fail_create_program = true;
        let mut lc = lifecycle();

        assert!(lc.surface_created(&mut gpu).is_err());
        assert_eq!(lc.phase(), Phase::Inert);

        gpu.clear();
        lc.surface_changed(&mut gpu, 10, 10);
        lc.draw_requested(&mut gpu).unwrap();
        assert!(gpu.calls.is_empty());

        gpu.fail_create_program = false;
        gpu.lose_context();
        lc.surface_created(&mut gpu).unwrap();
        assert_eq!(lc.phase(), Phase::Ready);
        assert_eq!(lc.generation(), 2);
    }

    #[test]
    fn recreated_surface_rebuilds_resources() {
        let mut gpu = RecordingBackend::new();
        let mut lc = lifecycle();
        lc.surface_created(&mut gpu).unwrap();
        lc.surface_changed(&mut gpu, 10, 10);

        gpu.lose_context();
        lc.surface_created(&mut gpu).unwrap();

        assert_eq!(gpu.count(|c| matches!(c, Call::CreateProgram(_))), 2);
        assert_eq!(lc.phase(), Phase::Ready);
        assert_eq!(lc.size(), None);
    }

    #[test]
    fn missing_position_attribute_fails_ready() {
        struct NoPosition;
        impl Renderer for NoPosition {
            fn on_ready(&mut self, _gpu: &mut dyn GpuBackend) -> Result<(), RenderError> {
                let program = crate::shader::ShaderProgram::build(
                    "no position",
                    "@vertex fn vs_main(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> { return vec4<f32>(p, 1.0); }",
                    "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }",
                )?;
                program.locate_attribute("position")?;
                Ok(())
            }
            fn on_resize(&mut self, _gpu: &mut dyn GpuBackend, _w: u32, _h: u32) {}
            fn on_draw(&mut self, _gpu: &mut dyn GpuBackend) -> Result<(), RenderError> {
                Ok(())
            }
            fn on_destroy(&mut self, _gpu: &mut dyn GpuBackend) {}
        }

        let mut gpu = RecordingBackend::new();
        let mut lc = RendererLifecycle::new(NoPosition);
        let err = lc.surface_created(&mut gpu).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Shader(crate::shader::ShaderError::MissingSymbol { .. })
        ));
        assert_eq!(lc.phase(), Phase::Inert);
    }
}
