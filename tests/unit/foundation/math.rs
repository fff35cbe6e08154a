use super::*;
use std::f64::consts::PI;

#[test]
fn normalize_angle_wraps_into_range() {
    assert!((normalize_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-12);
    assert!((normalize_angle(5.0 * PI) - PI).abs() < 1e-12);
    assert_eq!(normalize_angle(0.0), 0.0);
    assert!(normalize_angle(-1e-18) < TAU);
}

#[test]
fn polar_and_rotate_agree() {
    let p = polar_to_cartesian(10.0, PI / 2.0);
    assert!(p.x.abs() < 1e-9 && (p.y - 10.0).abs() < 1e-9);
    let r = rotate(Vec2::new(10.0, 0.0), PI / 2.0);
    assert!((r - p).hypot() < 1e-9);
}

#[test]
fn unpremultiply_restores_straight_alpha() {
    let src = [64u8, 0, 128, 128, 1, 2, 3, 255, 9, 9, 9, 0];
    let mut dst = [0u8; 12];
    unpremultiply_rgba8(&mut dst, &src);
    assert_eq!(&dst[0..4], &[128, 0, 255, 128]);
    assert_eq!(&dst[4..8], &[1, 2, 3, 255]);
    assert_eq!(&dst[8..12], &[0, 0, 0, 0]);
}
