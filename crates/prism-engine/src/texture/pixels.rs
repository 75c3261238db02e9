use std::sync::Arc;

/// Channel layout of decoded pixel data. Both are 8 bits per channel, sRGB.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PixelFormat {
    Rgba8,
    Bgra8,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> u32 {
        4
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PixelError {
    #[error("zero-sized image ({width}x{height})")]
    Empty { width: u32, height: u32 },
    #[error("expected {expected} bytes for {width}x{height}, got {actual}")]
    Length {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Decoded image supplied by an asset loader or a frame producer.
///
/// Rows are stored top to bottom, tightly packed. Clones share storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Arc<[u8]>,
}

impl PixelBuffer {
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: impl Into<Arc<[u8]>>,
    ) -> Result<Self, PixelError> {
        if width == 0 || height == 0 {
            return Err(PixelError::Empty { width, height });
        }
        let data = data.into();
        let expected = width as usize * height as usize * format.bytes_per_pixel() as usize;
        if data.len() != expected {
            return Err(PixelError::Length {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// Single-color image.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, PixelError> {
        let count = width as usize * height as usize;
        let data: Vec<u8> = rgba.iter().copied().cycle().take(count * 4).collect();
        Self::new(width, height, PixelFormat::Rgba8, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn bytes_per_row(&self) -> u32 {
        self.width * self.format.bytes_per_pixel()
    }

    /// Pixel at `(x, y)`, `y = 0` being the first (top) row.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let at = (y * self.bytes_per_row() + x * 4) as usize;
        let p = &self.data[at..at + 4];
        Some([p[0], p[1], p[2], p[3]])
    }
}
