//! Window + runtime loop.
//!
//! The main thread owns the `winit` EventLoop, the Window and the camera
//! session. GPU work happens on a dedicated render thread fed with surface
//! events.

mod render_thread;
mod runtime;

pub use render_thread::{BoxedBackend, RedrawHandle, RenderThread, SurfaceEvent};
pub use runtime::{HostEvent, HostLink, Runtime, RuntimeConfig};
