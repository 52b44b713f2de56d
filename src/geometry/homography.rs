use crate::foundation::core::Point;
use crate::foundation::error::{QuadwarpError, QuadwarpResult};
use crate::geometry::quad::Quad;

/// Pivots smaller than this fraction of the system's largest coefficient count as singular.
const PIVOT_REL_EPS: f64 = 1e-12;

/// Largest working overlay side, in pixels.
pub const MAX_WORKING_SIDE: u32 = 32_768;

/// Largest working overlay area, in pixels (256 MiB of RGBA8).
pub const MAX_WORKING_PIXELS: u64 = 1 << 26;

/// Projective denominators closer to zero than this map to infinity.
const W_EPS: f64 = 1e-12;

/// 3×3 perspective transform, row-major, normalized so the bottom-right entry is 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    m: [f64; 9],
}

impl Homography {
    /// The identity transform.
    pub fn identity() -> Self {
        Self {
            m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        }
    }

    /// Wrap a row-major matrix, normalizing so `m[8] == 1`.
    pub fn from_matrix(m: [f64; 9]) -> QuadwarpResult<Self> {
        if m.iter().any(|v| !v.is_finite()) {
            return Err(QuadwarpError::degenerate("homography has non-finite entries"));
        }
        if m[8].abs() <= W_EPS {
            return Err(QuadwarpError::degenerate(
                "homography cannot be normalized (h33 is zero)",
            ));
        }
        let s = 1.0 / m[8];
        let mut out = m;
        for v in &mut out {
            *v *= s;
        }
        out[8] = 1.0;
        Ok(Self { m: out })
    }

    /// Solve the transform taking each `src[i]` onto `dst[i]` (four-point DLT).
    ///
    /// Both point sets are translated to their centroid and scaled to a mean distance of `√2`
    /// before solving, so the system stays well conditioned at any coordinate magnitude.
    pub fn from_correspondences(src: [Point; 4], dst: [Point; 4]) -> QuadwarpResult<Self> {
        let src_norm = Similarity::normalizing(&src)?;
        let dst_norm = Similarity::normalizing(&dst)?;
        let src = src.map(|p| src_norm.apply(p));
        let dst = dst.map(|p| dst_norm.apply(p));

        // Unknowns h0..h7 with h8 fixed to 1. Each correspondence (x, y) -> (u, v) contributes
        //   h0 x + h1 y + h2 - u h6 x - u h7 y = u
        //   h3 x + h4 y + h5 - v h6 x - v h7 y = v
        let mut a = [[0.0f64; 8]; 8];
        let mut b = [0.0f64; 8];
        for i in 0..4 {
            let (x, y) = (src[i].x, src[i].y);
            let (u, v) = (dst[i].x, dst[i].y);
            a[2 * i] = [x, y, 1.0, 0.0, 0.0, 0.0, -u * x, -u * y];
            b[2 * i] = u;
            a[2 * i + 1] = [0.0, 0.0, 0.0, x, y, 1.0, -v * x, -v * y];
            b[2 * i + 1] = v;
        }

        let h = solve_8x8(a, b).ok_or_else(|| {
            QuadwarpError::degenerate("point correspondences give a singular linear system")
        })?;
        let normalized = [h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0];
        Self::from_matrix(mul3(
            &mul3(&dst_norm.inverse_matrix(), &normalized),
            &src_norm.matrix(),
        ))
    }

    /// Row-major matrix entries.
    pub fn matrix(&self) -> [f64; 9] {
        self.m
    }

    /// Map a point through the transform. `None` when it lands on the line at infinity.
    pub fn apply(&self, p: Point) -> Option<Point> {
        let m = &self.m;
        let w = m[6] * p.x + m[7] * p.y + m[8];
        if w.abs() <= W_EPS {
            return None;
        }
        let x = (m[0] * p.x + m[1] * p.y + m[2]) / w;
        let y = (m[3] * p.x + m[4] * p.y + m[5]) / w;
        Some(Point::new(x, y))
    }

    /// Inverse transform via the adjugate.
    pub fn inverse(&self) -> QuadwarpResult<Self> {
        let m = &self.m;
        let c00 = m[4] * m[8] - m[5] * m[7];
        let c01 = m[5] * m[6] - m[3] * m[8];
        let c02 = m[3] * m[7] - m[4] * m[6];
        let det = m[0] * c00 + m[1] * c01 + m[2] * c02;
        if !det.is_finite() || det.abs() <= f64::MIN_POSITIVE {
            return Err(QuadwarpError::degenerate("homography is not invertible"));
        }

        let adj = [
            c00,
            m[2] * m[7] - m[1] * m[8],
            m[1] * m[5] - m[2] * m[4],
            c01,
            m[0] * m[8] - m[2] * m[6],
            m[2] * m[3] - m[0] * m[5],
            c02,
            m[1] * m[6] - m[0] * m[7],
            m[0] * m[4] - m[1] * m[3],
        ];
        let inv_det = 1.0 / det;
        Self::from_matrix(adj.map(|v| v * inv_det))
    }
}

/// Output of solving the destination quad: the transform plus the overlay's working size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadGeometry {
    /// Maps the `width × height` overlay rectangle onto the destination quad.
    pub homography: Homography,
    /// Working overlay width in pixels.
    pub width: u32,
    /// Working overlay height in pixels.
    pub height: u32,
}

/// Compute working dimensions and the rectangle-to-quad homography for `quad`.
///
/// Width is the longer of the top and bottom edges, height the longer of the left and right
/// edges, both rounded to whole pixels. The source rectangle runs from `(0, 0)` to
/// `(width - 1, height - 1)` in the same corner order as the quad.
///
/// Quads far outside the frame can imply a huge working overlay; sizes beyond
/// [`MAX_WORKING_SIDE`] or [`MAX_WORKING_PIXELS`] are rejected with a validation error.
#[tracing::instrument(level = "debug", skip_all)]
pub fn solve_quad(quad: &Quad) -> QuadwarpResult<QuadGeometry> {
    quad.ensure_non_degenerate()?;

    let (top, bottom) = quad.horizontal_edges();
    let (left, right) = quad.vertical_edges();
    let width = top.max(bottom).round();
    let height = left.max(right).round();
    if width < 2.0 || height < 2.0 {
        return Err(QuadwarpError::degenerate(format!(
            "quad spans {width}x{height} pixels; at least 2x2 is required"
        )));
    }
    if width > f64::from(MAX_WORKING_SIDE)
        || height > f64::from(MAX_WORKING_SIDE)
        || width * height > MAX_WORKING_PIXELS as f64
    {
        return Err(QuadwarpError::validation(format!(
            "quad spans {width}x{height} pixels; the working overlay is limited to \
             {MAX_WORKING_SIDE} px per side and {MAX_WORKING_PIXELS} px in total"
        )));
    }

    let (w1, h1) = (width - 1.0, height - 1.0);
    let src = [
        Point::new(0.0, 0.0),
        Point::new(w1, 0.0),
        Point::new(w1, h1),
        Point::new(0.0, h1),
    ];
    let homography = Homography::from_correspondences(src, quad.corners)?;

    let geom = QuadGeometry {
        homography,
        width: width as u32,
        height: height as u32,
    };
    tracing::debug!(
        width = geom.width,
        height = geom.height,
        matrix = ?geom.homography.matrix(),
        "solved quad geometry"
    );
    Ok(geom)
}

/// Uniform scale about a centroid: `p -> (p - center) * scale`.
#[derive(Clone, Copy, Debug)]
struct Similarity {
    center: Point,
    scale: f64,
}

impl Similarity {
    fn normalizing(pts: &[Point; 4]) -> QuadwarpResult<Self> {
        let cx = pts.iter().map(|p| p.x).sum::<f64>() / 4.0;
        let cy = pts.iter().map(|p| p.y).sum::<f64>() / 4.0;
        let center = Point::new(cx, cy);
        let mean_dist = pts.iter().map(|p| p.distance(center)).sum::<f64>() / 4.0;
        let scale = std::f64::consts::SQRT_2 / mean_dist;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(QuadwarpError::degenerate("correspondence points coincide"));
        }
        Ok(Self { center, scale })
    }

    fn apply(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.center.x) * self.scale,
            (p.y - self.center.y) * self.scale,
        )
    }

    fn matrix(&self) -> [f64; 9] {
        let s = self.scale;
        [
            s,
            0.0,
            -s * self.center.x,
            0.0,
            s,
            -s * self.center.y,
            0.0,
            0.0,
            1.0,
        ]
    }

    fn inverse_matrix(&self) -> [f64; 9] {
        let inv = 1.0 / self.scale;
        [inv, 0.0, self.center.x, 0.0, inv, self.center.y, 0.0, 0.0, 1.0]
    }
}

fn mul3(a: &[f64; 9], b: &[f64; 9]) -> [f64; 9] {
    let mut out = [0.0f64; 9];
    for r in 0..3 {
        for c in 0..3 {
            out[r * 3 + c] = (0..3).map(|k| a[r * 3 + k] * b[k * 3 + c]).sum();
        }
    }
    out
}

/// Gaussian elimination with partial pivoting. `None` when the system is singular.
fn solve_8x8(mut a: [[f64; 8]; 8], mut b: [f64; 8]) -> Option<[f64; 8]> {
    const N: usize = 8;
    let scale = a
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0f64, |acc, v| acc.max(v.abs()))
        .max(1.0);
    let tol = PIVOT_REL_EPS * scale;

    for col in 0..N {
        let pivot_row = (col..N).max_by(|&r1, &r2| a[r1][col].abs().total_cmp(&a[r2][col].abs()))?;
        if a[pivot_row][col].abs() <= tol {
            return None;
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        let pivot = a[col][col];
        for row in (col + 1)..N {
            let factor = a[row][col] / pivot;
            if factor == 0.0 {
                continue;
            }
            for k in col..N {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0f64; N];
    for row in (0..N).rev() {
        let mut acc = b[row];
        for k in (row + 1)..N {
            acc -= a[row][k] * x[k];
        }
        x[row] = acc / a[row][row];
    }
    if x.iter().any(|v| !v.is_finite()) {
        return None;
    }
    Some(x)
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/homography.rs"]
mod tests;
