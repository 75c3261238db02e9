use super::{CameraError, FrameSource, StreamingTexture};

/// Reportable camera conditions, delivered to the host's event callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraEvent {
    Started,
    Failed(CameraError),
    Stopped,
}

type EventSink = Box<dyn FnMut(&CameraEvent)>;

/// Host-side owner of a [`FrameSource`].
///
/// Lives on the control (main) thread. The render thread hands it each new
/// streaming texture through [`attach`](Self::attach); the session opens the
/// source if needed and starts streaming into it. Pausing closes the device,
/// resuming re-opens it when a stream is attached.
pub struct CameraSession {
    source: Box<dyn FrameSource>,
    stream: Option<StreamingTexture>,
    paused: bool,
    on_event: EventSink,
}

impl CameraSession {
    pub fn new(source: Box<dyn FrameSource>) -> Self {
        Self {
            source,
            stream: None,
            paused: false,
            on_event: Box::new(|_| {}),
        }
    }

    pub fn with_events(mut self, sink: impl FnMut(&CameraEvent) + 'static) -> Self {
        self.on_event = Box::new(sink);
        self
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.as_ref().is_some_and(|s| !s.is_closed()) && self.source.is_open() && !self.paused
    }

    /// Takes over a freshly allocated stream and starts the source on it.
    pub fn attach(&mut self, stream: StreamingTexture) -> Result<(), CameraError> {
        log::debug!("camera stream attached to {}", stream.target());
        self.source.stop();
        self.stream = Some(stream);
        if self.paused {
            return Ok(());
        }
        self.start()
    }

    pub fn pause(&mut self) {
        if self.paused {
            return;
        }
        self.paused = true;
        self.source.stop();
        self.source.close();
        if let Some(stream) = &self.stream {
            stream.discard_pending();
        }
    }

    /// Re-opens the source if a live stream is attached. Retrying after a
    /// failure is just another `resume`.
    ///
    /// A stream closed while paused (its surface went away) is dropped; the
    /// source then waits for the next [`attach`](Self::attach).
    pub fn resume(&mut self) -> Result<(), CameraError> {
        self.paused = false;
        if let Some(stream) = self.stream.take_if(|s| s.is_closed()) {
            log::debug!("stream {} closed while paused; awaiting a new one", stream.target());
        }
        if self.stream.is_none() {
            return Ok(());
        }
        self.start()
    }

    /// Stops streaming and closes the stream. After this returns no frame
    /// written concurrently can reach a draw.
    pub fn stop(&mut self) {
        self.source.stop();
        self.source.close();
        if let Some(stream) = self.stream.take() {
            stream.close();
            self.emit(CameraEvent::Stopped);
        }
    }

    fn start(&mut self) -> Result<(), CameraError> {
        let result = self.try_start();
        match &result {
            Ok(()) => self.emit(CameraEvent::Started),
            Err(e) => {
                log::warn!("camera start failed: {e}");
                self.emit(CameraEvent::Failed(e.clone()));
            }
        }
        result
    }

    fn try_start(&mut self) -> Result<(), CameraError> {
        let Some(stream) = &self.stream else {
            return Err(CameraError::Closed);
        };
        if stream.is_closed() {
            return Err(CameraError::Closed);
        }
        if !self.source.is_open() {
            self.source.open()?;
        }
        self.source.start_streaming_into(stream.writer())
    }

    fn emit(&mut self, event: CameraEvent) {
        (self.on_event)(&event);
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.stop();
    }
}
