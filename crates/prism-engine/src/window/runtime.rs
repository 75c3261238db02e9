use std::sync::Arc;

use anyhow::{Context, Result};
use parking_lot::Mutex;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy};
use winit::window::{Window, WindowId};

use crate::backend::WgpuBackend;
use crate::camera::{CameraSession, StreamHandoff, StreamingTexture};
use crate::device::{Gpu, GpuInit};
use crate::render::Renderer;

use super::render_thread::{RedrawHandle, RenderThread};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub gpu: GpuInit,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "prism".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            gpu: GpuInit::default(),
        }
    }
}

/// Work posted to the main thread from other threads.
#[derive(Debug)]
pub enum HostEvent {
    /// The render thread allocated a camera stream.
    StreamReady(StreamingTexture),
}

/// Render-thread side of the main-thread mailbox.
pub struct HostLink {
    proxy: Mutex<EventLoopProxy<HostEvent>>,
}

impl StreamHandoff for HostLink {
    fn hand_off(&self, stream: StreamingTexture) {
        if self.proxy.lock().send_event(HostEvent::StreamReady(stream)).is_err() {
            log::warn!("event loop closed; camera stream handoff dropped");
        }
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens a window and runs until it is closed.
    ///
    /// `make_renderer` runs on the render thread; the [`HostLink`] it receives
    /// posts camera streams back to the main thread, where `camera` (if any)
    /// is started on them.
    pub fn run<R, F>(config: RuntimeConfig, camera: Option<CameraSession>, make_renderer: F) -> Result<()>
    where
        R: Renderer + 'static,
        F: FnOnce(HostLink, RedrawHandle) -> R + Send + 'static,
    {
        let event_loop = EventLoop::<HostEvent>::with_user_event()
            .build()
            .context("failed to create winit EventLoop")?;

        let link = HostLink {
            proxy: Mutex::new(event_loop.create_proxy()),
        };
        let render = RenderThread::spawn(move |redraw| make_renderer(link, redraw))?;

        let mut state = AppState {
            config,
            render: Some(render),
            window: None,
            surface_live: false,
            camera,
        };

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

struct AppState {
    config: RuntimeConfig,
    render: Option<RenderThread>,
    window: Option<Arc<Window>>,
    surface_live: bool,
    camera: Option<CameraSession>,
}

impl AppState {
    fn ensure_window(&mut self, event_loop: &ActiveEventLoop) -> Result<Arc<Window>> {
        if let Some(window) = &self.window {
            return Ok(Arc::clone(window));
        }
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );
        self.window = Some(Arc::clone(&window));
        Ok(window)
    }

    fn create_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = self.ensure_window(event_loop)?;
        let size = window.inner_size();
        let size = PhysicalSize::new(size.width.max(1), size.height.max(1));

        let gpu = pollster::block_on(Gpu::new(Arc::clone(&window), size, self.config.gpu.clone()))
            .context("GPU initialization failed for window")?;

        if let Some(render) = &self.render {
            render.surface_created(Box::new(WgpuBackend::new(gpu)));
            render.surface_changed(size.width, size.height);
        }
        self.surface_live = true;
        window.request_redraw();
        Ok(())
    }

    fn destroy_surface(&mut self) {
        if !self.surface_live {
            return;
        }
        self.surface_live = false;
        if let Some(render) = &self.render {
            render.surface_destroyed();
        }
    }

    /// Stops the camera first so no frame lands after the surface is gone.
    fn teardown(&mut self) {
        if let Some(camera) = &mut self.camera {
            camera.stop();
        }
        self.destroy_surface();
        if let Some(render) = self.render.take() {
            render.shutdown();
        }
    }
}

impl ApplicationHandler<HostEvent> for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        if !self.surface_live {
            if let Err(e) = self.create_surface(event_loop) {
                log::error!("failed to create surface: {e:#}");
                self.teardown();
                event_loop.exit();
                return;
            }
        }

        if let Some(camera) = &mut self.camera {
            if let Err(e) = camera.resume() {
                log::warn!("camera not resumed: {e}");
            }
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(camera) = &mut self.camera {
            camera.pause();
        }
        self.destroy_surface();
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: HostEvent) {
        match event {
            HostEvent::StreamReady(stream) => match &mut self.camera {
                Some(camera) => {
                    if let Err(e) = camera.attach(stream) {
                        log::warn!("camera unavailable: {e}");
                    }
                }
                None => {
                    log::debug!("no camera configured; closing stream {}", stream.target());
                    stream.close();
                }
            },
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.teardown();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if size.width == 0 || size.height == 0 {
                    return;
                }
                if let Some(render) = &self.render {
                    render.surface_changed(size.width, size.height);
                    render.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(render) = &self.render {
                    render.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}
