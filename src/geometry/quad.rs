use crate::foundation::core::Point;
use crate::foundation::error::{QuadwarpError, QuadwarpResult};

/// Relative tolerance for treating a vertex triple as collinear.
const COLLINEAR_REL_EPS: f64 = 1e-9;

/// Destination quadrilateral in frame pixel coordinates.
///
/// Corners are ordered top-left, top-right, bottom-right, bottom-left. A point `(x, y)` addresses
/// the center of pixel `(x, y)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Quad {
    /// Corners in TL, TR, BR, BL order.
    pub corners: [Point; 4],
}

impl Quad {
    /// Create a quad from four corners, rejecting non-finite coordinates.
    ///
    /// Degeneracy is not checked here; see [`Quad::ensure_non_degenerate`].
    pub fn new(corners: [Point; 4]) -> QuadwarpResult<Self> {
        for (i, p) in corners.iter().enumerate() {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(QuadwarpError::validation(format!(
                    "quad corner {i} has a non-finite coordinate ({}, {})",
                    p.x, p.y
                )));
            }
        }
        Ok(Self { corners })
    }

    /// Build a quad from `[x, y]` pairs; exactly four pairs are required.
    pub fn from_xy(points: &[[f64; 2]]) -> QuadwarpResult<Self> {
        let [a, b, c, d] = points else {
            return Err(QuadwarpError::validation(format!(
                "a quadrilateral needs exactly 4 points, got {}",
                points.len()
            )));
        };
        Self::new([
            Point::new(a[0], a[1]),
            Point::new(b[0], b[1]),
            Point::new(c[0], c[1]),
            Point::new(d[0], d[1]),
        ])
    }

    /// Axis-aligned quad with corners `(x0, y0)` and `(x1, y1)`.
    pub fn from_rect(x0: f64, y0: f64, x1: f64, y1: f64) -> QuadwarpResult<Self> {
        Self::new([
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ])
    }

    /// Shoelace signed area. Positive for clockwise order in y-down frame space.
    pub fn signed_area(&self) -> f64 {
        let c = &self.corners;
        let mut acc = 0.0;
        for i in 0..4 {
            let p = c[i];
            let q = c[(i + 1) % 4];
            acc += p.x * q.y - q.x * p.y;
        }
        acc * 0.5
    }

    /// Lengths of the top and bottom edges.
    pub fn horizontal_edges(&self) -> (f64, f64) {
        let [tl, tr, br, bl] = self.corners;
        (tl.distance(tr), br.distance(bl))
    }

    /// Lengths of the left and right edges.
    pub fn vertical_edges(&self) -> (f64, f64) {
        let [tl, tr, br, bl] = self.corners;
        (tl.distance(bl), tr.distance(br))
    }

    /// Axis-aligned bounding box of the corners.
    pub fn bounds(&self) -> kurbo::Rect {
        let mut r = kurbo::Rect::from_points(self.corners[0], self.corners[0]);
        for p in &self.corners[1..] {
            r = r.union_pt(*p);
        }
        r
    }

    /// `true` when any three corners are collinear (which includes coincident corners).
    pub fn is_degenerate(&self) -> bool {
        self.collinear_triple().is_some()
    }

    /// `true` when every interior angle turns the same way: no reflex corner and no
    /// self-intersection. Either winding is accepted.
    pub fn is_convex(&self) -> bool {
        let c = &self.corners;
        let turns = [0usize, 1, 2, 3].map(|i| {
            let e0 = c[(i + 1) % 4] - c[i];
            let e1 = c[(i + 2) % 4] - c[(i + 1) % 4];
            e0.cross(e1)
        });
        turns.iter().all(|&t| t > 0.0) || turns.iter().all(|&t| t < 0.0)
    }

    /// Check the quad can be mapped from a rectangle.
    ///
    /// Collinear or coincident corners, concave quads and bowties are all rejected: the
    /// projective image of a rectangle is always convex, so the mask of a non-convex quad would
    /// contain pixels the overlay can never reach.
    pub fn ensure_non_degenerate(&self) -> QuadwarpResult<()> {
        if let Some([a, b, c]) = self.collinear_triple() {
            return Err(QuadwarpError::degenerate(format!(
                "corners {a}, {b} and {c} are collinear or coincident"
            )));
        }
        if !self.is_convex() {
            return Err(QuadwarpError::degenerate(
                "quad is not convex (concave or self-intersecting corner order)",
            ));
        }
        Ok(())
    }

    fn collinear_triple(&self) -> Option<[usize; 3]> {
        let c = &self.corners;
        let scale = self.bounds();
        let extent = scale.width().max(scale.height()).max(1.0);
        let tol = COLLINEAR_REL_EPS * extent * extent;

        const TRIPLES: [[usize; 3]; 4] = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];
        TRIPLES.into_iter().find(|&[a, b, d]| {
            let ab = c[b] - c[a];
            let ad = c[d] - c[a];
            ab.cross(ad).abs() <= tol
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/quad.rs"]
mod tests;
