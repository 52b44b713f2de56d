use super::*;

#[test]
fn resize_hits_exact_dimensions() {
    let overlay = OverlayImage::solid(7, 5, [10, 20, 30]).unwrap();
    let out = resize_overlay(&overlay, 31, 3).unwrap();
    assert_eq!((out.width, out.height), (31, 3));
    assert_eq!(out.rgba8_premul.len(), 31 * 3 * 4);
}

#[test]
fn resize_preserves_solid_color() {
    let overlay = OverlayImage::solid(4, 4, [200, 100, 50]).unwrap();
    for (w, h) in [(9, 13), (2, 2), (40, 3)] {
        let out = resize_overlay(&overlay, w, h).unwrap();
        for px in out.rgba8_premul.chunks_exact(4) {
            for (c, want) in px.iter().zip([200u8, 100, 50, 255]) {
                assert!((i16::from(*c) - i16::from(want)).abs() <= 1, "{px:?}");
            }
        }
    }
}

#[test]
fn resize_interpolates_between_columns() {
    // Left half black, right half white; upscaling must produce intermediate values rather than
    // a hard nearest-neighbour step.
    let mut rgba = Vec::new();
    for _y in 0..2 {
        for x in 0..4 {
            let v = if x < 2 { 0 } else { 255 };
            rgba.extend_from_slice(&[v, v, v, 255]);
        }
    }
    let overlay = OverlayImage::from_straight_rgba8(4, 2, rgba).unwrap();
    let out = resize_overlay(&overlay, 16, 2).unwrap();
    let row: Vec<u8> = out.rgba8_premul.chunks_exact(4).take(16).map(|px| px[0]).collect();
    assert!(row.windows(2).all(|w| w[0] <= w[1]), "row not monotonic: {row:?}");
    assert!(row.iter().any(|&v| v > 10 && v < 245), "no intermediate values: {row:?}");
}

#[test]
fn resize_same_size_is_copy() {
    let overlay = OverlayImage::solid(3, 3, [1, 2, 3]).unwrap();
    assert_eq!(resize_overlay(&overlay, 3, 3).unwrap(), overlay);
}

#[test]
fn resize_rejects_empty_target() {
    let overlay = OverlayImage::solid(3, 3, [1, 2, 3]).unwrap();
    assert!(resize_overlay(&overlay, 0, 3).is_err());
}
