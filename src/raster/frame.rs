use crate::foundation::core::Canvas;
use crate::foundation::error::{QuadwarpError, QuadwarpResult};

/// A frame-sized RGBA8 raster, tightly packed, row-major.
///
/// Decoded video frames are opaque. The warped overlay uses the same type with premultiplied
/// alpha, transparent wherever the overlay does not reach.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Wrap `data`, checking it holds exactly `width * height` pixels.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> QuadwarpResult<Self> {
        let canvas = Canvas { width, height };
        if data.len() != canvas.rgba8_len() {
            return Err(QuadwarpError::validation(format!(
                "rgba8 buffer has {} bytes, expected {} for {width}x{height}",
                data.len(),
                canvas.rgba8_len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A frame filled with one RGBA8 color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let canvas = Canvas { width, height };
        Self {
            width,
            height,
            data: rgba.repeat(canvas.pixel_count()),
        }
    }

    /// A fully transparent frame.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self::solid(width, height, [0, 0, 0, 0])
    }

    /// Frame dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// RGBA8 value at `(x, y)`.
    ///
    /// Panics when the coordinate is out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let off = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[off],
            self.data[off + 1],
            self.data[off + 2],
            self.data[off + 3],
        ]
    }
}
