use std::f64::consts::TAU;

use kurbo::Vec2;

/// Normalize an angle to `[0, 2π)`.
#[inline]
pub(crate) fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if a >= TAU { 0.0 } else { a }
}

/// Convert polar `(r, theta)` to a cartesian offset.
#[inline]
pub(crate) fn polar_to_cartesian(r: f64, theta: f64) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Rotate a vector by `theta` radians.
#[inline]
pub(crate) fn rotate(v: Vec2, theta: f64) -> Vec2 {
    let (s, c) = theta.sin_cos();
    Vec2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

pub(crate) fn hsl_to_rgb(hue_deg: f64, saturation: f64, lightness: f64) -> [u8; 3] {
    let h = hue_deg.rem_euclid(360.0) / 60.0;
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = l - c / 2.0;
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    [to_u8(r), to_u8(g), to_u8(b)]
}

pub(crate) fn rgb_to_hue(r: u8, g: u8, b: u8) -> f64 {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;
    if d <= f64::EPSILON {
        return 0.0;
    }
    let h = if max == r {
        ((g - b) / d).rem_euclid(6.0)
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (h * 60.0).rem_euclid(360.0)
}

/// Convert premultiplied RGBA8 into straight-alpha RGBA8 (`dst` and `src` equal length).
pub(crate) fn unpremultiply_rgba8(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = s[3];
        match a {
            0 => d.copy_from_slice(&[0, 0, 0, 0]),
            255 => d.copy_from_slice(s),
            _ => {
                let a16 = u32::from(a);
                let un = |c: u8| ((u32::from(c) * 255 + a16 / 2) / a16).min(255) as u8;
                d[0] = un(s[0]);
                d[1] = un(s[1]);
                d[2] = un(s[2]);
                d[3] = a;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
