//! Camera-to-GPU frame pipeline.
//!
//! Threads involved:
//! - the frame producer ([`FrameSource`]) writes into a [`StreamingTexture`]
//!   slot from its own thread and never waits on anyone
//! - the render thread owns the [`CameraFrameBridge`], claims the newest
//!   frame at the top of each draw tick and uploads it
//! - the host control thread owns the [`CameraSession`] and receives each new
//!   stream through a [`StreamHandoff`]

mod bridge;
mod pattern;
mod session;
mod source;
mod stream;

pub use bridge::{BridgeState, CameraFrameBridge, RedrawRequester, StreamDraw, StreamHandoff};
pub use pattern::{bars, PatternConfig, PatternSource};
pub use session::{CameraEvent, CameraSession};
pub use source::{CameraError, FrameSource};
pub use stream::{Frame, FrameWriter, StreamingTexture};
