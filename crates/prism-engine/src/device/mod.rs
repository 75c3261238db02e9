//! GPU device + surface management.
//!
//! `Gpu` is created on the main thread (surface creation needs the window)
//! and then moved into the render thread's backend, which is its only user.

mod gpu;
mod init;
mod surface;

pub use gpu::Gpu;
pub use init::GpuInit;
pub use surface::{GpuFrame, SurfaceErrorAction};
