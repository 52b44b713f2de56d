use super::*;
use crate::foundation::core::Canvas;
use crate::geometry::quad::Quad;
use crate::raster::mask::build_mask;

const A: [u8; 4] = [200, 40, 40, 255];
const B: [u8; 4] = [30, 60, 220, 255];

fn left_half_setup() -> (FrameRGBA, Mask) {
    let canvas = Canvas {
        width: 8,
        height: 4,
    };
    let warped = FrameRGBA::solid(canvas.width, canvas.height, B);
    let mask = build_mask(&Quad::from_rect(0.0, 0.0, 3.0, 3.0).unwrap(), canvas);
    (warped, mask)
}

#[test]
fn over_handles_alpha_extremes() {
    assert_eq!(over(A, [0, 0, 0, 0]), A);
    assert_eq!(over(A, B), B);
}

#[test]
fn over_blends_premultiplied_half_alpha() {
    let out = over([200, 100, 0, 255], [64, 0, 64, 128]);
    assert_eq!(out, [64 + 100, 50, 64, 255]);
}

#[test]
fn frames_before_start_pass_through_unchanged() {
    let (warped, mask) = left_half_setup();
    let frame = FrameRGBA::solid(8, 4, A);
    let out = composite_frame(frame.clone(), FrameIndex(4), FrameIndex(5), &warped, &mask).unwrap();
    assert_eq!(out, frame);
}

#[test]
fn start_frame_itself_is_replaced() {
    let (warped, mask) = left_half_setup();
    let frame = FrameRGBA::solid(8, 4, A);
    let out = composite_frame(frame, FrameIndex(5), FrameIndex(5), &warped, &mask).unwrap();
    for y in 0..4 {
        for x in 0..8 {
            let want = if x <= 3 { B } else { A };
            assert_eq!(out.pixel(x, y), want, "({x},{y})");
        }
    }
}

#[test]
fn transparent_overlay_pixels_keep_frame_under_mask() {
    let canvas = Canvas {
        width: 4,
        height: 1,
    };
    let mut warped = FrameRGBA::transparent(4, 1);
    warped.data[..4].copy_from_slice(&B);
    let mask = build_mask(&Quad::from_rect(0.0, -1.0, 3.0, 1.0).unwrap(), canvas);
    assert_eq!(mask.count_on(), 4);

    let frame = FrameRGBA::solid(4, 1, A);
    let out = composite_frame(frame, FrameIndex(0), FrameIndex(0), &warped, &mask).unwrap();
    assert_eq!(out.pixel(0, 0), B);
    assert_eq!(out.pixel(1, 0), A);
    assert_eq!(out.pixel(3, 0), A);
}

#[test]
fn mismatched_sizes_are_rejected() {
    let (warped, mask) = left_half_setup();
    let frame = FrameRGBA::solid(6, 4, A);
    let err = composite_frame(frame, FrameIndex(0), FrameIndex(0), &warped, &mask).unwrap_err();
    assert!(matches!(err, QuadwarpError::Validation(_)));
}

#[test]
fn composite_is_pure() {
    let (warped, mask) = left_half_setup();
    let frame = FrameRGBA::solid(8, 4, A);
    let a = composite_frame(frame.clone(), FrameIndex(7), FrameIndex(0), &warped, &mask).unwrap();
    let b = composite_frame(frame, FrameIndex(7), FrameIndex(0), &warped, &mask).unwrap();
    assert_eq!(a, b);
}
