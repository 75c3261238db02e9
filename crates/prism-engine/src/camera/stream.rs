use std::sync::Arc;

use parking_lot::Mutex;

use crate::backend::TextureId;
use crate::texture::PixelBuffer;
use crate::transform::Mat4;

/// One decoded camera image plus its sampling correction.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub pixels: PixelBuffer,
    /// Texture-coordinate transform supplied by the producer (sensor
    /// orientation and crop). Passed to the shader untouched.
    pub transform: Mat4,
    /// Producer-assigned, increasing.
    pub sequence: u64,
}

impl Frame {
    /// Flips `v` so the first row of `pixels` is shown at the top of the quad.
    pub const UPRIGHT: Mat4 = Mat4::from_cols_array(&[
        1.0, 0.0, 0.0, 0.0, //
        0.0, -1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 1.0, 0.0, 1.0,
    ]);

    pub fn new(pixels: PixelBuffer, sequence: u64) -> Self {
        Self {
            pixels,
            transform: Self::UPRIGHT,
            sequence,
        }
    }
}

type Listener = Arc<dyn Fn() + Send + Sync>;

struct Slot {
    pending: Option<Frame>,
    /// Frames replaced before the render thread claimed them.
    overwritten: u64,
    closed: bool,
    listener: Option<Listener>,
}

/// Single-slot, latest-wins handoff between a frame producer and the render
/// thread, paired with the device texture the frames end up in.
///
/// Cloning shares the same slot. The lock only guards the slot itself; it is
/// never held while the render thread talks to the GPU.
#[derive(Clone)]
pub struct StreamingTexture {
    texture: TextureId,
    slot: Arc<Mutex<Slot>>,
}

impl StreamingTexture {
    pub fn new(texture: TextureId) -> Self {
        Self {
            texture,
            slot: Arc::new(Mutex::new(Slot {
                pending: None,
                overwritten: 0,
                closed: false,
                listener: None,
            })),
        }
    }

    /// Identity of the texture target frames are streamed into.
    pub fn target(&self) -> TextureId {
        self.texture
    }

    /// Registers the frame-ready callback. It runs on the producer thread,
    /// outside the slot lock, and must not block.
    pub fn set_listener(&self, listener: impl Fn() + Send + Sync + 'static) {
        self.slot.lock().listener = Some(Arc::new(listener));
    }

    pub fn writer(&self) -> FrameWriter {
        FrameWriter {
            slot: Arc::clone(&self.slot),
        }
    }

    pub fn has_pending(&self) -> bool {
        self.slot.lock().pending.is_some()
    }

    /// Takes the newest unclaimed frame, if any.
    pub fn claim(&self) -> Option<Frame> {
        let mut slot = self.slot.lock();
        let frame = slot.pending.take()?;
        if slot.overwritten > 0 {
            log::trace!(
                "{}: coalesced {} frame(s) into #{}",
                self.texture,
                slot.overwritten,
                frame.sequence
            );
            slot.overwritten = 0;
        }
        Some(frame)
    }

    /// Drops any unclaimed frame without closing the stream.
    pub fn discard_pending(&self) {
        let mut slot = self.slot.lock();
        slot.pending = None;
        slot.overwritten = 0;
    }

    /// Closes the stream. Once this returns no further frame is accepted and
    /// the listener is unregistered. A write racing with `close` may still
    /// notify, but the slot is empty by then so no draw can see its frame.
    pub fn close(&self) {
        let mut slot = self.slot.lock();
        slot.closed = true;
        slot.pending = None;
        slot.listener = None;
    }

    pub fn is_closed(&self) -> bool {
        self.slot.lock().closed
    }
}

impl std::fmt::Debug for StreamingTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingTexture")
            .field("texture", &self.texture)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Producer end of a [`StreamingTexture`].
#[derive(Clone)]
pub struct FrameWriter {
    slot: Arc<Mutex<Slot>>,
}

impl FrameWriter {
    /// Publishes `frame`, replacing any frame the render thread has not
    /// claimed yet, and fires the listener.
    ///
    /// Never blocks on the render thread. Returns `false` once the stream is
    /// closed; the frame is dropped in that case.
    pub fn write(&self, frame: Frame) -> bool {
        let mut slot = self.slot.lock();
        if slot.closed {
            return false;
        }
        if slot.pending.is_some() {
            slot.overwritten += 1;
        }
        slot.pending = Some(frame);
        let listener = slot.listener.clone();
        drop(slot);

        if let Some(listener) = listener {
            listener();
        }
        true
    }

    pub fn is_closed(&self) -> bool {
        self.slot.lock().closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn frame(seq: u64) -> Frame {
        Frame::new(PixelBuffer::solid(1, 1, [seq as u8, 0, 0, 255]).unwrap(), seq)
    }

    #[test]
    fn latest_frame_wins() {
        let stream = StreamingTexture::new(TextureId::new(1, 0));
        let writer = stream.writer();

        assert!(writer.write(frame(1)));
        assert!(writer.write(frame(2)));
        assert!(writer.write(frame(3)));

        assert_eq!(stream.claim().map(|f| f.sequence), Some(3));
        assert_eq!(stream.claim(), None);
    }

    #[test]
    fn every_write_notifies() {
        let stream = StreamingTexture::new(TextureId::new(1, 0));
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        stream.set_listener(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let writer = stream.writer();
        writer.write(frame(1));
        writer.write(frame(2));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn closed_stream_drops_frames_silently() {
        let stream = StreamingTexture::new(TextureId::new(1, 0));
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        stream.set_listener(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        let writer = stream.writer();
        writer.write(frame(1));

        stream.close();

        assert!(!writer.write(frame(2)));
        assert!(writer.is_closed());
        assert_eq!(stream.claim(), None);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn listener_may_inspect_the_stream() {
        let stream = StreamingTexture::new(TextureId::new(1, 0));
        let seen = Arc::new(AtomicUsize::new(0));
        let (observer, counter) = (stream.clone(), Arc::clone(&seen));
        stream.set_listener(move || {
            if observer.has_pending() {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        assert!(stream.writer().write(frame(1)));
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn upright_transform_flips_v() {
        let uv = Frame::UPRIGHT * glam::Vec4::new(0.0, 1.0, 0.0, 1.0);
        assert_eq!((uv.x, uv.y), (0.0, 0.0));
        let uv = Frame::UPRIGHT * glam::Vec4::new(1.0, 0.0, 0.0, 1.0);
        assert_eq!((uv.x, uv.y), (1.0, 1.0));
    }
}
