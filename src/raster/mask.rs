use image::{GrayImage, Luma};

use crate::foundation::core::{Canvas, Point};
use crate::geometry::quad::Quad;

/// Tolerance for pixel centers sitting on a polygon edge.
const EDGE_EPS: f64 = 1e-9;

/// Mask value for pixels inside the quad.
pub const MASK_ON: u8 = 255;

/// Frame-sized single-channel mask: [`MASK_ON`] inside the quad, `0` elsewhere.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    img: GrayImage,
}

impl Mask {
    /// An all-off mask.
    pub fn empty(canvas: Canvas) -> Self {
        Self {
            img: GrayImage::new(canvas.width, canvas.height),
        }
    }

    /// Mask width in pixels.
    pub fn width(&self) -> u32 {
        self.img.width()
    }

    /// Mask height in pixels.
    pub fn height(&self) -> u32 {
        self.img.height()
    }

    /// Whether pixel `(x, y)` is inside the quad.
    pub fn is_on(&self, x: u32, y: u32) -> bool {
        self.img.get_pixel(x, y).0[0] == MASK_ON
    }

    /// One byte per pixel, row-major.
    pub fn as_raw(&self) -> &[u8] {
        self.img.as_raw()
    }

    /// Number of pixels switched on.
    pub fn count_on(&self) -> usize {
        self.img.as_raw().iter().filter(|&&v| v == MASK_ON).count()
    }

    fn fill_span(&mut self, y: u32, x_from: f64, x_to: f64) {
        let max_x = f64::from(self.img.width()) - 1.0;
        let a = x_from.max(0.0);
        let b = x_to.min(max_x);
        if a > b {
            return;
        }
        for x in (a as u32)..=(b as u32) {
            self.img.put_pixel(x, y, Luma([MASK_ON]));
        }
    }
}

/// Rasterize `quad` into a `canvas`-sized mask with a scan-line fill.
///
/// Pixel `(x, y)` is on when the point `(x, y)` lies inside the quad or on its boundary. Interior
/// spans follow the even-odd rule over half-open edge crossings, then boundary pixels (horizontal
/// edges and centers lying exactly on an edge) are added. A zero-area quad yields an empty mask.
/// The pipeline only passes convex quads (see [`Quad::ensure_non_degenerate`]).
#[tracing::instrument(level = "debug", skip(quad))]
pub fn build_mask(quad: &Quad, canvas: Canvas) -> Mask {
    let mut mask = Mask::empty(canvas);
    if canvas.width == 0 || canvas.height == 0 {
        return mask;
    }
    if quad.signed_area().abs() <= EDGE_EPS {
        tracing::debug!("zero-area quad, mask left empty");
        return mask;
    }

    let bounds = quad.bounds();
    let max_y = f64::from(canvas.height - 1);
    let y_start = (bounds.y0 - EDGE_EPS).ceil().max(0.0);
    let y_end = (bounds.y1 + EDGE_EPS).floor().min(max_y);
    if y_start > y_end {
        return mask;
    }

    let edges: [(Point, Point); 4] = std::array::from_fn(|i| {
        (quad.corners[i], quad.corners[(i + 1) % 4])
    });
    let mut crossings = Vec::with_capacity(4);

    for y in (y_start as u32)..=(y_end as u32) {
        let fy = f64::from(y);

        crossings.clear();
        for &(p, q) in &edges {
            if p.y == q.y {
                continue;
            }
            let (lo, hi) = if p.y < q.y { (p, q) } else { (q, p) };
            if fy >= lo.y && fy < hi.y {
                crossings.push(edge_x_at(lo, hi, fy));
            }
        }
        crossings.sort_by(f64::total_cmp);
        for pair in crossings.chunks_exact(2) {
            mask.fill_span(y, (pair[0] - EDGE_EPS).ceil(), (pair[1] + EDGE_EPS).floor());
        }

        for &(p, q) in &edges {
            if p.y == q.y {
                if (fy - p.y).abs() <= EDGE_EPS {
                    let (x0, x1) = (p.x.min(q.x), p.x.max(q.x));
                    mask.fill_span(y, (x0 - EDGE_EPS).ceil(), (x1 + EDGE_EPS).floor());
                }
                continue;
            }
            let (lo, hi) = if p.y < q.y { (p, q) } else { (q, p) };
            if fy < lo.y - EDGE_EPS || fy > hi.y + EDGE_EPS {
                continue;
            }
            let x = edge_x_at(lo, hi, fy.clamp(lo.y, hi.y));
            let xr = x.round();
            if (x - xr).abs() <= EDGE_EPS {
                mask.fill_span(y, xr, xr);
            }
        }
    }

    mask
}

fn edge_x_at(lo: Point, hi: Point, y: f64) -> f64 {
    lo.x + (y - lo.y) * (hi.x - lo.x) / (hi.y - lo.y)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/mask.rs"]
mod tests;
