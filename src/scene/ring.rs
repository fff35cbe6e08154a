use std::f64::consts::{PI, TAU};

use rand::Rng;

use crate::config::params::SimParams;
use crate::foundation::core::Rgba8;

/// A rotating annular arc with a single gap.
///
/// The gap is centered on `angle`; the solid part covers the remaining `2π - hole_arc_width`.
#[derive(Clone, Debug, PartialEq)]
pub struct Ring {
    /// Centerline radius.
    pub radius: f64,
    /// Stroke width.
    pub width: f64,
    /// Angular width of the gap (radians).
    pub hole_arc_width: f64,
    /// Current rotation: the angle of the gap center (radians).
    pub angle: f64,
    /// Signed angular speed (radians/sec).
    pub angular_speed: f64,
    /// Stroke color.
    pub color: Rgba8,
    /// `false` once the ball has passed through the gap during the current wave.
    pub visible: bool,
}

impl Ring {
    /// Visible ring at `radius` with a gap at angle 0 and no rotation.
    pub fn new(radius: f64, params: &SimParams, color: Rgba8) -> Self {
        Self {
            radius,
            width: params.ring_width,
            hole_arc_width: params.hole_arc_width,
            angle: 0.0,
            angular_speed: 0.0,
            color,
            visible: true,
        }
    }

    /// Inner edge of the collision band for a ball of `ball_radius`.
    #[inline]
    pub fn band_inner(&self, ball_radius: f64) -> f64 {
        self.radius - self.width / 2.0 - ball_radius
    }

    /// Outer edge of the collision band for a ball of `ball_radius`.
    #[inline]
    pub fn band_outer(&self, ball_radius: f64) -> f64 {
        self.radius + self.width / 2.0 + ball_radius
    }

    /// Start angle and sweep of the solid arc, for drawing.
    pub fn solid_arc(&self) -> (f64, f64) {
        (
            self.angle + self.hole_arc_width / 2.0,
            TAU - self.hole_arc_width,
        )
    }
}

/// Random angular speed magnitude within the configured range, with a random sign.
pub(crate) fn random_speed(params: &SimParams, rng: &mut impl Rng) -> f64 {
    let magnitude = if params.ring_speed_max > params.ring_speed_min {
        rng.random_range(params.ring_speed_min..=params.ring_speed_max)
    } else {
        params.ring_speed_min
    };
    if rng.random_bool(0.5) {
        magnitude
    } else {
        -magnitude
    }
}

/// How the initial ring set gets its angles and speeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RingLayout {
    /// Independent random angle and speed per ring.
    Random,
    /// One shared angle and direction; speed decays with radius.
    Aligned,
    /// Gaps alternate between two opposite angles and rotation alternates direction.
    Checkerboard,
}

impl RingLayout {
    /// Every layout, in selection order.
    pub const ALL: [Self; 3] = [Self::Random, Self::Aligned, Self::Checkerboard];

    /// Stable lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::Aligned => "aligned",
            Self::Checkerboard => "checkerboard",
        }
    }

    /// Assign starting angle and angular speed to every ring of the initial set.
    pub fn assign(self, rings: &mut [Ring], params: &SimParams, rng: &mut impl Rng) {
        match self {
            Self::Random => {
                for ring in rings.iter_mut() {
                    ring.angle = rng.random_range(0.0..TAU);
                    ring.angular_speed = random_speed(params, rng);
                }
            }
            Self::Aligned => {
                let angle = rng.random_range(0.0..TAU);
                let lead_speed = random_speed(params, rng);
                for ring in rings.iter_mut() {
                    ring.angle = angle;
                    ring.angular_speed = lead_speed * (params.base_radius / ring.radius).min(1.0);
                }
            }
            Self::Checkerboard => {
                let offset = rng.random_range(0.0..TAU);
                let speed = random_speed(params, rng);
                for (i, ring) in rings.iter_mut().enumerate() {
                    let odd = i % 2 == 1;
                    ring.angle = if odd { offset + PI } else { offset };
                    ring.angular_speed = if odd { -speed } else { speed };
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/ring.rs"]
mod tests;
