//! Renderer lifecycle and the shared scene draw routine.
//!
//! Convention:
//! - one dedicated render thread owns the backend and calls every hook here
//! - a draw always runs inside a `BindScope`, so a failure leaves nothing bound
//! - transforms are recomputed on resize, never during a draw

mod lifecycle;
mod scene;
pub mod shaders;

pub use lifecycle::{Phase, Renderer, RendererLifecycle};
pub use scene::{Scene, SceneRenderer, CLEAR_COLOR, DEFAULT_COLOR};
