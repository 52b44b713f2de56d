use super::*;
use crate::geometry::homography::solve_quad;
use crate::geometry::quad::Quad;

fn gradient_overlay(w: u32, h: u32) -> OverlayImage {
    let mut rgba = Vec::new();
    for y in 0..h {
        for x in 0..w {
            rgba.extend_from_slice(&[(x * 10) as u8, (y * 10) as u8, 77, 255]);
        }
    }
    OverlayImage::from_straight_rgba8(w, h, rgba).unwrap()
}

#[test]
fn identity_warp_copies_overlay_and_clears_rest() {
    let overlay = gradient_overlay(4, 3);
    let canvas = Canvas {
        width: 6,
        height: 5,
    };
    let out = warp_perspective(&overlay, &Homography::identity(), canvas).unwrap();
    assert_eq!((out.width, out.height), (6, 5));
    for y in 0..5u32 {
        for x in 0..6u32 {
            let px = out.pixel(x, y);
            if x < 4 && y < 3 {
                assert_eq!(px, [(x * 10) as u8, (y * 10) as u8, 77, 255]);
            } else {
                assert_eq!(px, [0, 0, 0, 0], "({x},{y}) should be empty");
            }
        }
    }
}

#[test]
fn translated_warp_shifts_content() {
    let overlay = gradient_overlay(3, 3);
    let h = Homography::from_matrix([1.0, 0.0, 2.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0]).unwrap();
    let out = warp_perspective(
        &overlay,
        &h,
        Canvas {
            width: 8,
            height: 8,
        },
    )
    .unwrap();
    assert_eq!(out.pixel(2, 1), [0, 0, 77, 255]);
    assert_eq!(out.pixel(4, 3), [20, 20, 77, 255]);
    assert_eq!(out.pixel(1, 1)[3], 0);
    assert_eq!(out.pixel(5, 1)[3], 0);
}

#[test]
fn quad_interior_is_fully_covered() {
    let canvas = Canvas {
        width: 64,
        height: 48,
    };
    let quad = Quad::from_xy(&[[10.0, 5.0], [50.0, 8.0], [55.0, 40.0], [6.0, 44.0]]).unwrap();
    let geom = solve_quad(&quad).unwrap();
    let overlay = OverlayImage::solid(geom.width, geom.height, [30, 60, 220]).unwrap();
    let out = warp_perspective(&overlay, &geom.homography, canvas).unwrap();

    // The centroid and points just inside each corner must carry the overlay color.
    for (x, y) in [(30u32, 24u32), (11, 6), (49, 9), (54, 39), (7, 43)] {
        assert_eq!(out.pixel(x, y), [30, 60, 220, 255], "({x},{y})");
    }
    assert_eq!(out.pixel(0, 0)[3], 0);
    assert_eq!(out.pixel(63, 47)[3], 0);
}

#[test]
fn full_frame_quad_covers_every_pixel() {
    let canvas = Canvas {
        width: 16,
        height: 12,
    };
    let quad = Quad::from_rect(0.0, 0.0, 15.0, 11.0).unwrap();
    let geom = solve_quad(&quad).unwrap();
    let overlay = OverlayImage::solid(geom.width, geom.height, [1, 2, 3]).unwrap();
    let out = warp_perspective(&overlay, &geom.homography, canvas).unwrap();
    assert!(out.data.chunks_exact(4).all(|px| px == [1, 2, 3, 255]));
}

#[test]
fn warp_is_deterministic() {
    let canvas = Canvas {
        width: 40,
        height: 30,
    };
    let quad = Quad::from_xy(&[[3.0, 2.0], [35.0, 6.0], [30.0, 27.0], [5.0, 25.0]]).unwrap();
    let geom = solve_quad(&quad).unwrap();
    let overlay = gradient_overlay(geom.width.min(25), geom.height.min(25));
    let a = warp_perspective(&overlay, &geom.homography, canvas).unwrap();
    let b = warp_perspective(&overlay, &geom.homography, canvas).unwrap();
    assert_eq!(a, b);
}

#[test]
fn bilinear_sample_blends_neighbours() {
    let overlay = OverlayImage::from_straight_rgba8(
        2,
        1,
        vec![0, 0, 0, 255, 200, 100, 50, 255],
    )
    .unwrap();
    let sampler = BilinearSampler::new(&overlay);
    assert_eq!(sampler.sample(0.5, 0.0), Some([100, 50, 25, 255]));
    assert_eq!(sampler.sample(-0.4, 0.0), Some([0, 0, 0, 255]));
    assert_eq!(sampler.sample(1.4, 0.0), Some([200, 100, 50, 255]));
    assert_eq!(sampler.sample(-0.6, 0.0), None);
    assert_eq!(sampler.sample(0.0, 0.6), None);
}

#[test]
fn warp_rejects_empty_canvas() {
    let overlay = gradient_overlay(2, 2);
    let err = warp_perspective(
        &overlay,
        &Homography::identity(),
        Canvas {
            width: 0,
            height: 4,
        },
    )
    .unwrap_err();
    assert!(matches!(err, QuadwarpError::Validation(_)));
}
