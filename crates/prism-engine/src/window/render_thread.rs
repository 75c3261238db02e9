use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender};

use crate::backend::GpuBackend;
use crate::camera::RedrawRequester;
use crate::render::{Renderer, RendererLifecycle};

/// A backend handed to the render thread, which owns it from then on.
pub type BoxedBackend = Box<dyn GpuBackend + Send>;

/// Host surface callbacks, delivered to the render thread in order.
pub enum SurfaceEvent {
    Created(BoxedBackend),
    Changed { width: u32, height: u32 },
    DrawRequested,
    Destroyed,
    Shutdown,
}

impl std::fmt::Debug for SurfaceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurfaceEvent::Created(_) => f.write_str("Created"),
            SurfaceEvent::Changed { width, height } => write!(f, "Changed({width}x{height})"),
            SurfaceEvent::DrawRequested => f.write_str("DrawRequested"),
            SurfaceEvent::Destroyed => f.write_str("Destroyed"),
            SurfaceEvent::Shutdown => f.write_str("Shutdown"),
        }
    }
}

/// Schedules draw ticks on the render thread.
///
/// Requests coalesce: at most one `DrawRequested` is queued at a time. The
/// flag is cleared when the render thread picks the request up, so a request
/// made during a draw schedules exactly one more.
#[derive(Clone)]
pub struct RedrawHandle {
    tx: Sender<SurfaceEvent>,
    pending: Arc<AtomicBool>,
}

impl RedrawHandle {
    fn new(tx: Sender<SurfaceEvent>) -> Self {
        Self {
            tx,
            pending: Arc::new(AtomicBool::new(false)),
        }
    }

    fn acknowledge(&self) {
        self.pending.store(false, Ordering::Release);
    }
}

impl RedrawRequester for RedrawHandle {
    fn request_redraw(&self) {
        if self.pending.swap(true, Ordering::AcqRel) {
            return;
        }
        if self.tx.send(SurfaceEvent::DrawRequested).is_err() {
            self.pending.store(false, Ordering::Release);
        }
    }
}

/// Dedicated thread that owns the GPU backend and drives a renderer.
///
/// Dropping the handle shuts the thread down and joins it.
pub struct RenderThread {
    tx: Sender<SurfaceEvent>,
    redraw: RedrawHandle,
    handle: Option<JoinHandle<()>>,
}

impl RenderThread {
    /// Spawns the thread. The renderer is built on it, so it never has to
    /// cross threads itself.
    pub fn spawn<R, F>(make_renderer: F) -> Result<Self>
    where
        R: Renderer + 'static,
        F: FnOnce(RedrawHandle) -> R + Send + 'static,
    {
        let (tx, rx) = crossbeam_channel::unbounded();
        let redraw = RedrawHandle::new(tx.clone());
        let thread_redraw = redraw.clone();

        let handle = thread::Builder::new()
            .name("prism-render".into())
            .spawn(move || {
                let lifecycle = RendererLifecycle::new(make_renderer(thread_redraw.clone()));
                run(lifecycle, rx, thread_redraw);
            })
            .context("failed to spawn render thread")?;

        Ok(Self {
            tx,
            redraw,
            handle: Some(handle),
        })
    }

    pub fn redraw_handle(&self) -> RedrawHandle {
        self.redraw.clone()
    }

    pub fn surface_created(&self, backend: BoxedBackend) {
        self.send(SurfaceEvent::Created(backend));
    }

    pub fn surface_changed(&self, width: u32, height: u32) {
        self.send(SurfaceEvent::Changed { width, height });
    }

    pub fn request_redraw(&self) {
        self.redraw.request_redraw();
    }

    pub fn surface_destroyed(&self) {
        self.send(SurfaceEvent::Destroyed);
    }

    /// Processes every queued event, then joins the thread.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn send(&self, event: SurfaceEvent) {
        if let Err(e) = self.tx.send(event) {
            log::warn!("render thread is gone; dropped {:?}", e.into_inner());
        }
    }

    fn stop(&mut self) {
        let Some(handle) = self.handle.take() else { return };
        let _ = self.tx.send(SurfaceEvent::Shutdown);
        if handle.join().is_err() {
            log::error!("render thread panicked");
        }
    }
}

impl Drop for RenderThread {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run<R: Renderer>(
    mut lifecycle: RendererLifecycle<R>,
    events: Receiver<SurfaceEvent>,
    redraw: RedrawHandle,
) {
    log::debug!("render thread started");
    let mut gpu: Option<BoxedBackend> = None;

    for event in events.iter() {
        match event {
            SurfaceEvent::Created(backend) => {
                if let Some(old) = gpu.as_deref_mut() {
                    lifecycle.surface_destroyed(old);
                }
                let gpu = gpu.insert(backend);
                if lifecycle.surface_created(gpu.as_mut()).is_err() {
                    log::warn!("renderer stays inert until the next surface");
                }
            }
            SurfaceEvent::Changed { width, height } => {
                if let Some(gpu) = gpu.as_deref_mut() {
                    lifecycle.surface_changed(gpu, width, height);
                }
            }
            SurfaceEvent::DrawRequested => {
                redraw.acknowledge();
                match gpu.as_deref_mut() {
                    Some(gpu) => {
                        if let Err(e) = lifecycle.draw_requested(gpu) {
                            log::warn!("draw failed: {e}");
                        }
                    }
                    None => log::debug!("draw requested without a surface; ignored"),
                }
            }
            SurfaceEvent::Destroyed => {
                if let Some(mut old) = gpu.take() {
                    lifecycle.surface_destroyed(old.as_mut());
                }
            }
            SurfaceEvent::Shutdown => break,
        }
    }

    if let Some(mut old) = gpu.take() {
        lifecycle.surface_destroyed(old.as_mut());
    }
    log::debug!("render thread stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::recording::RecordingBackend;
    use crate::backend::RenderError;
    use parking_lot::Mutex;

    type Log = Arc<Mutex<Vec<String>>>;

    struct Probe(Log);

    impl Renderer for Probe {
        fn on_ready(&mut self, _gpu: &mut dyn GpuBackend) -> Result<(), RenderError> {
            self.0.lock().push("ready".into());
            Ok(())
        }
        fn on_resize(&mut self, _gpu: &mut dyn GpuBackend, width: u32, height: u32) {
            self.0.lock().push(format!("resize {width}x{height}"));
        }
        fn on_draw(&mut self, _gpu: &mut dyn GpuBackend) -> Result<(), RenderError> {
            self.0.lock().push("draw".into());
            Ok(())
        }
        fn on_destroy(&mut self, _gpu: &mut dyn GpuBackend) {
            self.0.lock().push("destroy".into());
        }
    }

    #[test]
    fn redraw_requests_coalesce() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let handle = RedrawHandle::new(tx);

        handle.request_redraw();
        handle.request_redraw();
        handle.request_redraw();
        assert_eq!(rx.len(), 1);

        handle.acknowledge();
        handle.request_redraw();
        assert_eq!(rx.len(), 2);
    }

    #[test]
    fn events_reach_the_lifecycle_in_order() {
        let log: Log = Arc::default();
        let probe_log = Arc::clone(&log);
        let thread = RenderThread::spawn(move |_| Probe(probe_log)).unwrap();

        thread.surface_created(Box::new(RecordingBackend::new()));
        thread.surface_changed(320, 240);
        thread.request_redraw();
        thread.surface_destroyed();
        thread.shutdown();

        assert_eq!(
            *log.lock(),
            vec!["ready", "resize 320x240", "draw", "destroy"]
        );
    }

    #[test]
    fn shutdown_destroys_a_live_surface() {
        let log: Log = Arc::default();
        let probe_log = Arc::clone(&log);
        let thread = RenderThread::spawn(move |_| Probe(probe_log)).unwrap();

        thread.surface_created(Box::new(RecordingBackend::new()));
        drop(thread);

        assert_eq!(*log.lock(), vec!["ready", "destroy"]);
    }
}
