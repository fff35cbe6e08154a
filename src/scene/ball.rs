use std::f64::consts::TAU;

use rand::Rng;

use crate::config::params::SimParams;
use crate::foundation::core::{Point, Rgba8, Vec2};
use crate::foundation::math::polar_to_cartesian;

/// Hue advance of [`BallStyle::HueCycle`] at base speed (degrees/sec).
const HUE_CYCLE_DEG_PER_SEC: f64 = 120.0;
/// Pulse rate of [`BallStyle::PulsingGlow`] at base speed (radians/sec).
const PULSE_RAD_PER_SEC: f64 = 5.0;

/// Appearance state driven by the active [`BallStyle`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BallLook {
    /// Current fill color.
    pub color: Rgba8,
    /// Current hue in degrees (hue cycling).
    pub hue: f64,
    /// Pulse phase in radians (pulsing glow).
    pub phase: f64,
    /// Glow brightness in `[0, 1]`.
    pub brightness: f64,
}

/// The single ball.
#[derive(Clone, Debug, PartialEq)]
pub struct Ball {
    /// Absolute position in pixels.
    pub pos: Point,
    /// Velocity in pixels/sec.
    pub vel: Vec2,
    /// Radius in pixels.
    pub radius: f64,
    /// Appearance state.
    pub look: BallLook,
}

impl Ball {
    /// Ball at `center` moving in a random direction at base speed.
    pub fn launch(center: Point, params: &SimParams, rng: &mut impl Rng) -> Self {
        let mut ball = Self {
            pos: center,
            vel: Vec2::ZERO,
            radius: params.ball_radius,
            look: BallLook {
                color: Rgba8::WHITE,
                hue: 0.0,
                phase: 0.0,
                brightness: 1.0,
            },
        };
        ball.reset(center, params, rng);
        ball
    }

    /// Put the ball back at `center` with a fresh random direction at base speed.
    pub fn reset(&mut self, center: Point, params: &SimParams, rng: &mut impl Rng) {
        let theta = rng.random_range(0.0..TAU);
        self.pos = center;
        self.vel = polar_to_cartesian(params.base_speed, theta);
    }

    /// Current speed in pixels/sec.
    #[inline]
    pub fn speed(&self) -> f64 {
        self.vel.hypot()
    }
}

/// How the ball looks and how its look evolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BallStyle {
    /// Flat base color.
    Solid,
    /// Hue rotates continuously, faster when the ball is fast.
    HueCycle,
    /// Radial glow that pulses around a bright core.
    PulsingGlow,
}

impl BallStyle {
    /// Every style, in selection order.
    pub const ALL: [Self; 3] = [Self::Solid, Self::HueCycle, Self::PulsingGlow];

    /// Stable lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::HueCycle => "hue_cycle",
            Self::PulsingGlow => "pulsing_glow",
        }
    }

    /// Seed the ball's look from the scheme's base color.
    pub fn init_ball(self, ball: &mut Ball, base: Rgba8) {
        ball.look = BallLook {
            color: base,
            hue: base.hue(),
            phase: 0.0,
            brightness: 1.0,
        };
        if self == Self::HueCycle {
            ball.look.color = Rgba8::from_hsl(ball.look.hue, 0.9, 0.65);
        }
    }

    /// Advance the look by `dt`; `speed_ratio` is the ball speed over base speed.
    pub fn update_color(self, ball: &mut Ball, dt: f64, speed_ratio: f64) {
        let look = &mut ball.look;
        match self {
            Self::Solid => {}
            Self::HueCycle => {
                look.hue = (look.hue + HUE_CYCLE_DEG_PER_SEC * speed_ratio * dt).rem_euclid(360.0);
                look.color = Rgba8::from_hsl(look.hue, 0.9, 0.65);
            }
            Self::PulsingGlow => {
                look.phase = (look.phase + PULSE_RAD_PER_SEC * speed_ratio * dt).rem_euclid(TAU);
                look.brightness = 0.6 + 0.4 * look.phase.sin();
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/ball.rs"]
mod tests;
