//! Ball versus ring tests.
//!
//! A ring only collides inside its band: the annulus `[radius - width/2, radius + width/2]`
//! widened on both sides by the ball radius. Inside the band, the ball's angle relative to the
//! ring rotation decides between the solid arc (bounce) and the gap (pass-through).

use std::f64::consts::TAU;

use crate::foundation::core::Point;
use crate::foundation::math::normalize_angle;
use crate::scene::ring::Ring;

/// Upper clamp for `sin` of the ball's half-angle.
pub const HALF_ANGLE_SIN_LIMIT: f64 = 0.99;
/// Safety factor on the ball radius when widening the solid arc.
pub const HALF_ANGLE_SAFETY: f64 = 1.1;

/// Outcome of testing one ring in one sub-step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RingContact {
    /// The ball touches the solid arc.
    Bounce {
        /// `true` when the ball reached the band from the center side.
        from_inside: bool,
        /// Depth of the ball inside the band, measured from the side it came from.
        penetration: f64,
    },
    /// The ball entered the band through the gap.
    PassThrough,
}

/// Half of the angle the ball subtends at distance `dist`.
#[inline]
pub fn ball_half_angle(ball_radius: f64, dist: f64) -> f64 {
    (HALF_ANGLE_SAFETY * ball_radius / dist)
        .min(HALF_ANGLE_SIN_LIMIT)
        .asin()
}

/// Angular distance from the gap center beyond which the ball hits the solid arc.
#[inline]
pub fn solid_arc_threshold(hole_arc_width: f64, ball_radius: f64, dist: f64) -> f64 {
    hole_arc_width / 2.0 + ball_half_angle(ball_radius, dist)
}

/// Angle of `pos` around `center` measured from the gap center of `ring`, in `[0, 2π)`.
#[inline]
pub fn angle_from_gap(ring: &Ring, center: Point, pos: Point) -> f64 {
    let d = pos - center;
    normalize_angle(d.y.atan2(d.x) - ring.angle)
}

/// Test one ring for the sub-step that moved the ball from `prev` to `pos`.
///
/// The crossing check compares the previous and current distances with the band edges so a fast
/// ball cannot tunnel through a thin ring between two samples.
pub fn test_ring(
    ring: &Ring,
    center: Point,
    prev: Point,
    pos: Point,
    ball_radius: f64,
) -> Option<RingContact> {
    let inner = ring.band_inner(ball_radius);
    let outer = ring.band_outer(ball_radius);
    let dist = (pos - center).hypot();
    let prev_dist = (prev - center).hypot();

    let in_band = |d: f64| d >= inner && d <= outer;
    let now = in_band(dist);
    let crossed = (prev_dist < inner && dist > outer) || (prev_dist > outer && dist < inner);
    if !now && !crossed {
        return None;
    }
    let entered = !in_band(prev_dist);

    let rel = angle_from_gap(ring, center, pos);
    let from_gap = rel.min(TAU - rel);
    if from_gap > solid_arc_threshold(ring.hole_arc_width, ball_radius, dist) {
        let from_inside = prev_dist <= ring.radius;
        let penetration = if from_inside {
            dist - inner
        } else {
            outer - dist
        };
        return Some(RingContact::Bounce {
            from_inside,
            penetration: penetration.max(0.0),
        });
    }
    if entered {
        return Some(RingContact::PassThrough);
    }
    None
}

#[cfg(test)]
#[path = "../../tests/unit/physics/collision.rs"]
mod tests;
