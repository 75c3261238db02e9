use super::FrameWriter;

/// Camera collaborator failures. Reported to the host, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CameraError {
    #[error("camera device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("camera stream failed to start: {0}")]
    StreamStart(String),

    #[error("camera is not open")]
    NotOpen,

    #[error("camera stream is closed")]
    Closed,
}

/// Capture pipeline that delivers decoded frames into a streaming texture.
///
/// Frames are produced on the source's own thread. `open` and
/// `start_streaming_into` may be retried after a failure.
pub trait FrameSource: Send {
    fn open(&mut self) -> Result<(), CameraError>;

    fn is_open(&self) -> bool;

    /// Starts producing into `writer`, replacing any previous target.
    fn start_streaming_into(&mut self, writer: FrameWriter) -> Result<(), CameraError>;

    /// Stops production. When this returns no further frame will be written.
    fn stop(&mut self);

    fn close(&mut self);
}
