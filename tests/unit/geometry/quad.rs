use super::*;

#[test]
fn from_xy_requires_exactly_four_points() {
    assert!(Quad::from_xy(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]).is_err());
    assert!(
        Quad::from_xy(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [2.0, 2.0]]).is_err()
    );
    let q = Quad::from_xy(&[[0.0, 0.0], [4.0, 0.0], [4.0, 3.0], [0.0, 3.0]]).unwrap();
    assert_eq!(q.corners[2], Point::new(4.0, 3.0));
}

#[test]
fn new_rejects_non_finite() {
    let err = Quad::from_xy(&[[0.0, 0.0], [f64::NAN, 0.0], [1.0, 1.0], [0.0, 1.0]]).unwrap_err();
    assert!(matches!(err, QuadwarpError::Validation(_)));
}

#[test]
fn signed_area_of_rect() {
    let q = Quad::from_rect(0.0, 0.0, 10.0, 5.0).unwrap();
    assert!((q.signed_area() - 50.0).abs() < 1e-12);
}

#[test]
fn edges_measure_opposite_sides() {
    let q = Quad::from_xy(&[[150.0, 150.0], [250.0, 150.0], [200.0, 300.0], [150.0, 300.0]])
        .unwrap();
    let (top, bottom) = q.horizontal_edges();
    assert!((top - 100.0).abs() < 1e-12);
    assert!((bottom - 50.0).abs() < 1e-12);
    let (left, right) = q.vertical_edges();
    assert!((left - 150.0).abs() < 1e-12);
    assert!((right - (50.0f64.powi(2) + 150.0f64.powi(2)).sqrt()).abs() < 1e-9);
}

#[test]
fn collinear_points_are_degenerate() {
    let q = Quad::from_xy(&[[0.0, 0.0], [5.0, 5.0], [10.0, 10.0], [0.0, 10.0]]).unwrap();
    assert!(q.is_degenerate());
    let err = q.ensure_non_degenerate().unwrap_err();
    assert!(matches!(err, QuadwarpError::DegenerateQuadrilateral(_)));
}

#[test]
fn coincident_points_are_degenerate() {
    let q = Quad::from_xy(&[[0.0, 0.0], [10.0, 0.0], [10.0, 0.0], [0.0, 10.0]]).unwrap();
    assert!(q.is_degenerate());
}

#[test]
fn fully_collinear_points_are_degenerate() {
    let q = Quad::from_xy(&[[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [3.0, 0.0]]).unwrap();
    assert!(q.is_degenerate());
    assert_eq!(q.signed_area(), 0.0);
}

#[test]
fn skewed_quad_is_not_degenerate() {
    let q = Quad::from_xy(&[[150.0, 150.0], [250.0, 150.0], [200.0, 300.0], [150.0, 300.0]])
        .unwrap();
    assert!(!q.is_degenerate());
    q.ensure_non_degenerate().unwrap();
}

#[test]
fn bounds_cover_all_corners() {
    let q = Quad::from_xy(&[[3.0, 1.0], [9.0, 2.0], [8.0, 7.0], [1.0, 6.0]]).unwrap();
    let b = q.bounds();
    assert_eq!((b.x0, b.y0, b.x1, b.y1), (1.0, 1.0, 9.0, 7.0));
}

#[test]
fn convex_quads_pass_in_either_winding() {
    let cw = Quad::from_xy(&[[3.0, 1.0], [9.0, 2.0], [8.0, 7.0], [1.0, 6.0]]).unwrap();
    assert!(cw.is_convex());
    cw.ensure_non_degenerate().unwrap();

    let mirrored = Quad::from_xy(&[[9.0, 2.0], [3.0, 1.0], [1.0, 6.0], [8.0, 7.0]]).unwrap();
    assert!(mirrored.is_convex());
    mirrored.ensure_non_degenerate().unwrap();
}

#[test]
fn concave_quad_is_rejected() {
    let dart = Quad::from_xy(&[[0.0, 0.0], [20.0, 0.0], [6.0, 6.0], [0.0, 20.0]]).unwrap();
    assert!(!dart.is_degenerate());
    assert!(!dart.is_convex());
    let err = dart.ensure_non_degenerate().unwrap_err();
    assert!(matches!(err, QuadwarpError::DegenerateQuadrilateral(_)));
}

#[test]
fn bowtie_is_rejected() {
    let bowtie = Quad::from_xy(&[[0.0, 0.0], [10.0, 0.0], [0.0, 10.0], [10.0, 10.0]]).unwrap();
    assert!(!bowtie.is_convex());
    let err = bowtie.ensure_non_degenerate().unwrap_err();
    assert!(matches!(err, QuadwarpError::DegenerateQuadrilateral(_)));
}
