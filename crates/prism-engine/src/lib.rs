//! Prism engine crate.
//!
//! Shader-based rendering of simple primitives, decoded images and a live
//! camera feed. GPU work runs on one render thread behind the `GpuBackend`
//! seam; camera frames reach it through a latest-wins streaming slot.

pub mod backend;
pub mod camera;
pub mod device;
pub mod geometry;
pub mod logging;
pub mod render;
pub mod shader;
pub mod texture;
pub mod transform;
pub mod window;
