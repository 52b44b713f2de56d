/// Rectangle-to-quad perspective solving.
pub mod homography;
/// Destination quadrilateral type and degeneracy checks.
pub mod quad;
