use std::path::Path;

use crate::foundation::error::{QuadwarpError, QuadwarpResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Decoded overlay image, premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Vec<u8>,
}

impl OverlayImage {
    /// Build an overlay from straight-alpha RGBA8 pixels.
    pub fn from_straight_rgba8(width: u32, height: u32, mut rgba: Vec<u8>) -> QuadwarpResult<Self> {
        if width == 0 || height == 0 {
            return Err(QuadwarpError::unreadable_image("overlay image has zero size"));
        }
        if rgba.len() != width as usize * height as usize * 4 {
            return Err(QuadwarpError::validation(format!(
                "overlay buffer has {} bytes, expected {} for {width}x{height}",
                rgba.len(),
                width as usize * height as usize * 4
            )));
        }
        premultiply_rgba8_in_place(&mut rgba);
        Ok(Self {
            width,
            height,
            rgba8_premul: rgba,
        })
    }

    /// A single-color opaque overlay.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> QuadwarpResult<Self> {
        let px = [rgb[0], rgb[1], rgb[2], 255];
        Self::from_straight_rgba8(width, height, px.repeat(width as usize * height as usize))
    }
}

/// Read and decode the overlay image at `path`.
#[tracing::instrument(level = "debug")]
pub fn load_overlay(path: &Path) -> QuadwarpResult<OverlayImage> {
    let bytes = std::fs::read(path).map_err(|e| {
        QuadwarpError::unreadable_image(format!("failed to read '{}': {e}", path.display()))
    })?;
    decode_overlay(&bytes).map_err(|e| match e {
        QuadwarpError::UnreadableImage(msg) => {
            QuadwarpError::unreadable_image(format!("'{}': {msg}", path.display()))
        }
        other => other,
    })
}

/// Decode an in-memory encoded image (PNG, JPEG, ...).
pub fn decode_overlay(bytes: &[u8]) -> QuadwarpResult<OverlayImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| QuadwarpError::unreadable_image(format!("decode failed: {e}")))?;
    let color = dyn_img.color();
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    tracing::debug!(width, height, ?color, "decoded overlay image");
    OverlayImage::from_straight_rgba8(width, height, rgba.into_raw())
}
