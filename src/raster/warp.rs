use rayon::prelude::*;

use crate::assets::overlay::OverlayImage;
use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::{QuadwarpError, QuadwarpResult};
use crate::geometry::homography::Homography;
use crate::raster::frame::FrameRGBA;

/// Project `overlay` into a `canvas`-sized raster through `homography`.
///
/// `homography` maps overlay pixel coordinates to frame pixel coordinates. Every frame pixel is
/// inverse-mapped and bilinearly sampled; pixels that land outside the overlay (beyond a half
/// pixel of its edge) or on the far side of the projective horizon come out fully transparent.
/// The result is premultiplied RGBA8.
#[tracing::instrument(level = "debug", skip(overlay, homography))]
pub fn warp_perspective(
    overlay: &OverlayImage,
    homography: &Homography,
    canvas: Canvas,
) -> QuadwarpResult<FrameRGBA> {
    if canvas.width == 0 || canvas.height == 0 {
        return Err(QuadwarpError::validation("warp canvas must be non-empty"));
    }
    if overlay.rgba8_premul.len() != overlay.width as usize * overlay.height as usize * 4 {
        return Err(QuadwarpError::validation(
            "overlay buffer does not match its dimensions",
        ));
    }

    let inv = homography.inverse()?;
    let m = inv.matrix();

    // Frame pixels whose inverse denominator has the opposite sign to the overlay center's lie
    // behind the horizon and must not wrap around onto the overlay.
    let center = Point::new(
        f64::from(overlay.width - 1) * 0.5,
        f64::from(overlay.height - 1) * 0.5,
    );
    let center_dst = homography.apply(center).ok_or_else(|| {
        QuadwarpError::degenerate("overlay center maps to infinity")
    })?;
    let w_sign = (m[6] * center_dst.x + m[7] * center_dst.y + m[8]).signum();

    let sampler = BilinearSampler::new(overlay);
    let row_len = canvas.width as usize * 4;
    let mut out = FrameRGBA::transparent(canvas.width, canvas.height);

    out.data
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| {
            let fy = y as f64;
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                let fx = x as f64;
                let w = m[6] * fx + m[7] * fy + m[8];
                if w * w_sign <= 0.0 {
                    continue;
                }
                let sx = (m[0] * fx + m[1] * fy + m[2]) / w;
                let sy = (m[3] * fx + m[4] * fy + m[5]) / w;
                if let Some(rgba) = sampler.sample(sx, sy) {
                    px.copy_from_slice(&rgba);
                }
            }
        });

    Ok(out)
}

struct BilinearSampler<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    max_x: f64,
    max_y: f64,
}

impl<'a> BilinearSampler<'a> {
    fn new(img: &'a OverlayImage) -> Self {
        Self {
            data: &img.rgba8_premul,
            width: img.width as usize,
            height: img.height as usize,
            max_x: f64::from(img.width - 1),
            max_y: f64::from(img.height - 1),
        }
    }

    fn sample(&self, sx: f64, sy: f64) -> Option<[u8; 4]> {
        if !(sx >= -0.5 && sx <= self.max_x + 0.5 && sy >= -0.5 && sy <= self.max_y + 0.5) {
            return None;
        }
        let sx = sx.clamp(0.0, self.max_x);
        let sy = sy.clamp(0.0, self.max_y);

        let x0 = sx.floor() as usize;
        let y0 = sy.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let tx = sx - x0 as f64;
        let ty = sy - y0 as f64;

        let p00 = self.texel(x0, y0);
        let p10 = self.texel(x1, y0);
        let p01 = self.texel(x0, y1);
        let p11 = self.texel(x1, y1);

        let mut out = [0u8; 4];
        for c in 0..4 {
            let top = f64::from(p00[c]) + (f64::from(p10[c]) - f64::from(p00[c])) * tx;
            let bottom = f64::from(p01[c]) + (f64::from(p11[c]) - f64::from(p01[c])) * tx;
            let v = top + (bottom - top) * ty;
            out[c] = v.round().clamp(0.0, 255.0) as u8;
        }
        Some(out)
    }

    fn texel(&self, x: usize, y: usize) -> &[u8] {
        let off = (y * self.width + x) * 4;
        &self.data[off..off + 4]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/warp.rs"]
mod tests;
