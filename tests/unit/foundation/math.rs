use super::*;

#[test]
fn mul_div255_identities() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(0, 255), 0);
    assert_eq!(mul_div255_u16(200, 255), 200);
    assert_eq!(mul_div255_u8(128, 128), 64);
}

#[test]
fn premultiply_leaves_opaque_pixels_alone() {
    let mut px = vec![10u8, 20, 30, 255];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![10, 20, 30, 255]);
}

#[test]
fn premultiply_scales_by_alpha_and_zeroes_transparent() {
    let mut px = vec![100u8, 50, 200, 128, 9, 9, 9, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(
        px,
        vec![
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128,
            0,
            0,
            0,
            0
        ]
    );
}
