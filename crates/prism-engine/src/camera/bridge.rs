use std::sync::Arc;

use crate::backend::{GpuBackend, RenderError};
use crate::texture::{TextureBinder, TextureKind};
use crate::transform::Mat4;

use super::StreamingTexture;

/// Asks the host to schedule one more draw tick. Called from producer threads.
pub trait RedrawRequester: Send + Sync {
    fn request_redraw(&self);
}

/// Delivers a freshly allocated stream to the host's control thread, where
/// the frame source is started.
pub trait StreamHandoff: Send {
    fn hand_off(&self, stream: StreamingTexture);
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BridgeState {
    Idle,
    StreamingTextureReady,
    FrameAvailable,
    Consumed,
    Closed,
}

/// What the draw routine needs to sample the current camera image.
#[derive(Debug)]
pub struct StreamDraw<'a> {
    pub texture: &'a TextureBinder,
    pub tex_matrix: Mat4,
}

/// Couples a frame producer to the render thread's draw cycle.
///
/// The producer writes into the [`StreamingTexture`] slot and fires the
/// listener, which requests a redraw. On each draw tick the render thread
/// claims the newest frame (if any), uploads it and samples it. When no new
/// frame arrived the last uploaded one is drawn again.
///
/// Every method runs on the render thread.
pub struct CameraFrameBridge {
    state: BridgeState,
    texture: Option<TextureBinder>,
    stream: Option<StreamingTexture>,
    tex_matrix: Mat4,
    last_sequence: Option<u64>,

    handoff: Box<dyn StreamHandoff>,
    redraw: Arc<dyn RedrawRequester>,
}

impl CameraFrameBridge {
    pub fn new(handoff: Box<dyn StreamHandoff>, redraw: Arc<dyn RedrawRequester>) -> Self {
        Self {
            state: BridgeState::Idle,
            texture: None,
            stream: None,
            tex_matrix: Mat4::IDENTITY,
            last_sequence: None,
            handoff,
            redraw,
        }
    }

    /// Current state. `FrameAvailable` is derived from the shared slot, so it
    /// can be observed before the render thread wakes up.
    pub fn state(&self) -> BridgeState {
        match (&self.state, &self.stream) {
            (BridgeState::StreamingTextureReady | BridgeState::Consumed, Some(stream))
                if stream.has_pending() =>
            {
                BridgeState::FrameAvailable
            }
            (state, _) => *state,
        }
    }

    /// Sequence number of the frame currently in the texture.
    pub fn last_sequence(&self) -> Option<u64> {
        self.last_sequence
    }

    pub fn stream(&self) -> Option<&StreamingTexture> {
        self.stream.as_ref()
    }

    /// Allocates the streaming texture and posts it to the host.
    ///
    /// Any stream from a previous surface is closed first.
    pub fn on_surface_created(&mut self, gpu: &mut dyn GpuBackend) -> Result<(), RenderError> {
        self.release(gpu);

        let texture = TextureBinder::create(gpu, "camera stream", TextureKind::Streaming)?;
        let stream = StreamingTexture::new(texture.id());
        let redraw = Arc::clone(&self.redraw);
        stream.set_listener(move || redraw.request_redraw());

        self.texture = Some(texture);
        self.stream = Some(stream.clone());
        self.tex_matrix = Mat4::IDENTITY;
        self.last_sequence = None;
        self.transition(BridgeState::StreamingTextureReady);

        self.handoff.hand_off(stream);
        Ok(())
    }

    /// Claims the pending frame, if any, and returns what to draw.
    ///
    /// `None` means there is nothing to show yet (no frame ever arrived, the
    /// stream closed, or the texture had to be reallocated).
    pub fn prepare(&mut self, gpu: &mut dyn GpuBackend) -> Result<Option<StreamDraw<'_>>, RenderError> {
        let (Some(stream), Some(texture)) = (&self.stream, &self.texture) else {
            return Ok(None);
        };

        if stream.is_closed() {
            log::debug!("camera stream closed by its owner");
            self.close(gpu);
            return Ok(None);
        }

        if !texture.is_live(gpu) {
            log::warn!("camera texture {} is stale; reallocating", texture.id());
            self.recover(gpu)?;
            return Ok(None);
        }

        if let Some(frame) = stream.claim() {
            match texture.upload(gpu, &frame.pixels) {
                Ok(()) => {}
                Err(RenderError::StaleTextureHandle(id)) => {
                    log::warn!("camera texture {id} went stale during upload; reallocating");
                    self.recover(gpu)?;
                    return Ok(None);
                }
                Err(e) => return Err(e),
            }
            self.tex_matrix = frame.transform;
            self.last_sequence = Some(frame.sequence);
            self.transition(BridgeState::Consumed);
        }

        if self.state != BridgeState::Consumed {
            return Ok(None);
        }

        Ok(self.texture.as_ref().map(|texture| StreamDraw {
            texture,
            tex_matrix: self.tex_matrix,
        }))
    }

    /// Closes the stream and releases the texture. Terminal until the next
    /// surface-created.
    pub fn close(&mut self, gpu: &mut dyn GpuBackend) {
        self.release(gpu);
        self.transition(BridgeState::Closed);
    }

    fn recover(&mut self, gpu: &mut dyn GpuBackend) -> Result<(), RenderError> {
        self.release(gpu);
        self.transition(BridgeState::Idle);
        self.on_surface_created(gpu)
    }

    fn release(&mut self, gpu: &mut dyn GpuBackend) {
        if let Some(stream) = self.stream.take() {
            stream.close();
        }
        if let Some(texture) = self.texture.take() {
            texture.release(gpu);
        }
    }

    fn transition(&mut self, next: BridgeState) {
        if self.state != next {
            log::debug!("camera bridge: {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::recording::{Call, RecordingBackend};
    use crate::camera::Frame;
    use crate::texture::PixelBuffer;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Host {
        streams: Mutex<Vec<StreamingTexture>>,
        redraws: AtomicUsize,
    }

    struct Handoff(Arc<Host>);

    impl StreamHandoff for Handoff {
        fn hand_off(&self, stream: StreamingTexture) {
            self.0.streams.lock().push(stream);
        }
    }

    impl RedrawRequester for Host {
        fn request_redraw(&self) {
            self.redraws.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn bridge() -> (CameraFrameBridge, Arc<Host>) {
        let host = Arc::new(Host::default());
        let bridge = CameraFrameBridge::new(Box::new(Handoff(Arc::clone(&host))), host.clone());
        (bridge, host)
    }

    fn frame(seq: u64) -> Frame {
        let mut f = Frame::new(PixelBuffer::solid(2, 2, [seq as u8, 0, 0, 255]).unwrap(), seq);
        f.transform = Mat4::from_scale(glam::Vec3::splat(seq as f32));
        f
    }

    #[test]
    fn surface_created_hands_the_stream_to_the_host() {
        let (mut bridge, host) = bridge();
        let mut gpu = RecordingBackend::new();
        assert_eq!(bridge.state(), BridgeState::Idle);

        bridge.on_surface_created(&mut gpu).unwrap();

        assert_eq!(bridge.state(), BridgeState::StreamingTextureReady);
        let streams = host.streams.lock();
        assert_eq!(streams.len(), 1);
        assert!(gpu.is_texture_live(streams[0].target()));
    }

    #[test]
    fn nothing_to_draw_until_the_first_frame() {
        let (mut bridge, _host) = bridge();
        let mut gpu = RecordingBackend::new();
        bridge.on_surface_created(&mut gpu).unwrap();

        assert!(bridge.prepare(&mut gpu).unwrap().is_none());
        assert!(gpu.uploads().is_empty());
    }

    #[test]
    fn frame_ready_requests_a_redraw() {
        let (mut bridge, host) = bridge();
        let mut gpu = RecordingBackend::new();
        bridge.on_surface_created(&mut gpu).unwrap();
        let writer = host.streams.lock()[0].writer();

        writer.write(frame(1));

        assert_eq!(host.redraws.load(Ordering::SeqCst), 1);
        assert_eq!(bridge.state(), BridgeState::FrameAvailable);
    }

    #[test]
    fn draw_consumes_only_the_latest_frame() {
        let (mut bridge, host) = bridge();
        let mut gpu = RecordingBackend::new();
        bridge.on_surface_created(&mut gpu).unwrap();
        let writer = host.streams.lock()[0].writer();

        for seq in 1..=4 {
            writer.write(frame(seq));
        }
        let draw = bridge.prepare(&mut gpu).unwrap().unwrap();
        assert_eq!(draw.tex_matrix, frame(4).transform);

        assert_eq!(gpu.uploads(), vec![&frame(4).pixels]);
        assert_eq!(bridge.last_sequence(), Some(4));
        assert_eq!(bridge.state(), BridgeState::Consumed);
    }

    #[test]
    fn redraw_without_new_frame_reuses_the_last_one() {
        let (mut bridge, host) = bridge();
        let mut gpu = RecordingBackend::new();
        bridge.on_surface_created(&mut gpu).unwrap();
        host.streams.lock()[0].writer().write(frame(7));

        bridge.prepare(&mut gpu).unwrap();
        let again = bridge.prepare(&mut gpu).unwrap().unwrap();

        assert_eq!(again.tex_matrix, frame(7).transform);
        assert_eq!(gpu.uploads().len(), 1);
    }

    #[test]
    fn stale_texture_reenters_idle_and_reallocates() {
        let (mut bridge, host) = bridge();
        let mut gpu = RecordingBackend::new();
        bridge.on_surface_created(&mut gpu).unwrap();
        let first = host.streams.lock()[0].clone();
        first.writer().write(frame(1));

        gpu.lose_context();
        assert!(bridge.prepare(&mut gpu).unwrap().is_none());

        let streams = host.streams.lock();
        assert_eq!(streams.len(), 2);
        assert!(first.is_closed());
        assert!(gpu.is_texture_live(streams[1].target()));
        assert_eq!(bridge.state(), BridgeState::StreamingTextureReady);
        assert_eq!(gpu.count(|c| matches!(c, Call::CreateTexture(_))), 2);
    }

    #[test]
    fn closed_bridge_ignores_late_frames() {
        let (mut bridge, host) = bridge();
        let mut gpu = RecordingBackend::new();
        bridge.on_surface_created(&mut gpu).unwrap();
        let writer = host.streams.lock()[0].writer();

        bridge.close(&mut gpu);

        assert!(!writer.write(frame(1)));
        assert_eq!(bridge.state(), BridgeState::Closed);
        assert!(bridge.prepare(&mut gpu).unwrap().is_none());
        assert!(gpu.uploads().is_empty());
        assert_eq!(host.redraws.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn stream_closed_by_owner_closes_the_bridge() {
        let (mut bridge, host) = bridge();
        let mut gpu = RecordingBackend::new();
        bridge.on_surface_created(&mut gpu).unwrap();
        let stream = host.streams.lock()[0].clone();
        stream.writer().write(frame(1));

        stream.close();

        assert!(bridge.prepare(&mut gpu).unwrap().is_none());
        assert_eq!(bridge.state(), BridgeState::Closed);
        assert!(!gpu.is_texture_live(stream.target()));
    }
}
