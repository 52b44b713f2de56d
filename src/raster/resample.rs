use image::imageops::{self, FilterType};

use crate::assets::overlay::OverlayImage;
use crate::foundation::error::{QuadwarpError, QuadwarpResult};

/// Resize `overlay` to exactly `width × height` with bilinear (triangle) filtering.
///
/// Filtering runs on the premultiplied buffer so transparent texels do not bleed color into their
/// neighbours. Same-size requests return a copy.
#[tracing::instrument(level = "debug", skip(overlay), fields(src_w = overlay.width, src_h = overlay.height))]
pub fn resize_overlay(overlay: &OverlayImage, width: u32, height: u32) -> QuadwarpResult<OverlayImage> {
    if width == 0 || height == 0 {
        return Err(QuadwarpError::validation(format!(
            "resize target must be non-empty, got {width}x{height}"
        )));
    }
    if overlay.width == width && overlay.height == height {
        return Ok(overlay.clone());
    }

    let src = image::RgbaImage::from_raw(
        overlay.width,
        overlay.height,
        overlay.rgba8_premul.clone(),
    )
    .ok_or_else(|| QuadwarpError::validation("overlay buffer does not match its dimensions"))?;
    let resized = imageops::resize(&src, width, height, FilterType::Triangle);

    Ok(OverlayImage {
        width,
        height,
        rgba8_premul: resized.into_raw(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/raster/resample.rs"]
mod tests;
