use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::texture::{PixelBuffer, PixelFormat};

use super::{CameraError, Frame, FrameSource, FrameWriter};

const BARS: [[u8; 4]; 8] = [
    [255, 255, 255, 255],
    [255, 255, 0, 255],
    [0, 255, 255, 255],
    [0, 255, 0, 255],
    [255, 0, 255, 255],
    [255, 0, 0, 255],
    [0, 0, 255, 255],
    [16, 16, 16, 255],
];

/// Synthetic camera settings.
#[derive(Debug, Clone)]
pub struct PatternConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// When false, `open` fails with `DeviceUnavailable`.
    pub available: bool,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fps: 30,
            available: true,
        }
    }
}

struct Worker {
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// [`FrameSource`] that scrolls SMPTE-style color bars on its own thread.
pub struct PatternSource {
    config: PatternConfig,
    open: bool,
    worker: Option<Worker>,
}

impl PatternSource {
    pub fn new(config: PatternConfig) -> Self {
        Self {
            config,
            open: false,
            worker: None,
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.worker.is_some()
    }
}

impl FrameSource for PatternSource {
    fn open(&mut self) -> Result<(), CameraError> {
        if !self.config.available {
            return Err(CameraError::DeviceUnavailable("pattern source disabled".into()));
        }
        if !self.open {
            log::info!(
                "pattern camera opened ({}x{} @ {} fps)",
                self.config.width,
                self.config.height,
                self.config.fps
            );
            self.open = true;
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn start_streaming_into(&mut self, writer: FrameWriter) -> Result<(), CameraError> {
        if !self.open {
            return Err(CameraError::NotOpen);
        }
        if writer.is_closed() {
            return Err(CameraError::Closed);
        }
        let PatternConfig { width, height, fps, .. } = self.config;
        if fps == 0 {
            return Err(CameraError::StreamStart("frame rate must be positive".into()));
        }
        // Validate dimensions before a thread exists.
        bars(width, height, 0).map_err(|e| CameraError::StreamStart(e.to_string()))?;

        self.stop();

        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let period = Duration::from_secs_f64(1.0 / f64::from(fps));

        let handle = thread::Builder::new()
            .name("prism-pattern".into())
            .spawn(move || {
                let mut sequence = 0u64;
                while flag.load(Ordering::Acquire) {
                    sequence += 1;
                    let Ok(pixels) = bars(width, height, sequence) else { break };
                    if !writer.write(Frame::new(pixels, sequence)) {
                        log::debug!("pattern stream closed after {sequence} frame(s)");
                        break;
                    }
                    thread::sleep(period);
                }
            })
            .map_err(|e| CameraError::StreamStart(e.to_string()))?;

        self.worker = Some(Worker { running, handle });
        Ok(())
    }

    fn stop(&mut self) {
        let Some(worker) = self.worker.take() else { return };
        worker.running.store(false, Ordering::Release);
        if worker.handle.join().is_err() {
            log::error!("pattern producer thread panicked");
        }
        log::debug!("pattern stream stopped");
    }

    fn close(&mut self) {
        self.stop();
        if self.open {
            log::info!("pattern camera closed");
            self.open = false;
        }
    }
}

impl Drop for PatternSource {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Vertical color bars scrolled left by `phase` pixels.
pub fn bars(width: u32, height: u32, phase: u64) -> Result<PixelBuffer, crate::texture::PixelError> {
    let band = (width / BARS.len() as u32).max(1) as u64;
    let row: Vec<u8> = (0..u64::from(width))
        .flat_map(|x| BARS[(((x + phase) / band) % BARS.len() as u64) as usize])
        .collect();
    let data: Vec<u8> = row.iter().copied().cycle().take(row.len() * height as usize).collect();
    PixelBuffer::new(width, height, PixelFormat::Rgba8, data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::TextureId;
    use crate::camera::StreamingTexture;
    use std::time::Instant;

    fn fast() -> PatternConfig {
        PatternConfig {
            width: 16,
            height: 4,
            fps: 500,
            available: true,
        }
    }

    #[test]
    fn bars_are_stacked_left_to_right() {
        let img = bars(16, 2, 0).unwrap();
        assert_eq!(img.pixel(0, 0), Some(BARS[0]));
        assert_eq!(img.pixel(2, 1), Some(BARS[1]));
        assert_eq!(img.pixel(15, 0), Some(BARS[7]));
    }

    #[test]
    fn unavailable_device_fails_to_open() {
        let mut source = PatternSource::new(PatternConfig {
            available: false,
            ..fast()
        });
        assert!(matches!(source.open(), Err(CameraError::DeviceUnavailable(_))));
        assert!(!source.is_open());
    }

    #[test]
    fn streaming_requires_open() {
        let mut source = PatternSource::new(fast());
        let stream = StreamingTexture::new(TextureId::new(1, 0));
        assert_eq!(source.start_streaming_into(stream.writer()), Err(CameraError::NotOpen));
    }

    #[test]
    fn produces_frames_until_stopped() {
        let mut source = PatternSource::new(fast());
        let stream = StreamingTexture::new(TextureId::new(1, 0));
        source.open().unwrap();
        source.start_streaming_into(stream.writer()).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let first = loop {
            if let Some(frame) = stream.claim() {
                break frame;
            }
            assert!(Instant::now() < deadline, "no frame produced");
            thread::sleep(Duration::from_millis(1));
        };
        assert_eq!(first.pixels.size(), (16, 4));

        source.stop();
        stream.claim();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(stream.claim(), None);
        assert!(!source.is_streaming());
    }
}
