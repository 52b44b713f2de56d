use crate::foundation::core::FrameIndex;
use crate::foundation::error::{QuadwarpError, QuadwarpResult};
use crate::foundation::math::mul_div255_u16;
use crate::raster::frame::FrameRGBA;
use crate::raster::mask::{MASK_ON, Mask};

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied RGBA8.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    match src[3] {
        0 => dst,
        255 => src,
        sa => {
            let inv = 255u16 - u16::from(sa);
            let mut out = [0u8; 4];
            for i in 0..4 {
                let dc = mul_div255_u16(u16::from(dst[i]), inv);
                out[i] = (u16::from(src[i]) + dc).min(255) as u8;
            }
            out
        }
    }
}

/// Composite one frame.
///
/// Frames before `start` are returned untouched. From `start` on, every pixel under the mask gets
/// the warped overlay composited over it (a plain replacement where the overlay is opaque) and
/// every other pixel keeps its original value.
pub fn composite_frame(
    mut frame: FrameRGBA,
    idx: FrameIndex,
    start: FrameIndex,
    warped: &FrameRGBA,
    mask: &Mask,
) -> QuadwarpResult<FrameRGBA> {
    if idx < start {
        return Ok(frame);
    }
    if frame.width != warped.width || frame.height != warped.height {
        return Err(QuadwarpError::validation(format!(
            "frame {} is {}x{}, overlay was prepared for {}x{}",
            idx.0, frame.width, frame.height, warped.width, warped.height
        )));
    }
    if mask.width() != frame.width || mask.height() != frame.height {
        return Err(QuadwarpError::validation(format!(
            "frame {} is {}x{}, mask is {}x{}",
            idx.0,
            frame.width,
            frame.height,
            mask.width(),
            mask.height()
        )));
    }
    if frame.data.len() != warped.data.len() {
        return Err(QuadwarpError::validation(
            "frame buffer length does not match its dimensions",
        ));
    }

    for ((d, s), &m) in frame
        .data
        .chunks_exact_mut(4)
        .zip(warped.data.chunks_exact(4))
        .zip(mask.as_raw())
    {
        if m != MASK_ON {
            continue;
        }
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(frame)
}

#[cfg(test)]
#[path = "../tests/unit/composite.rs"]
mod tests;
