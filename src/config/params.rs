use std::f64::consts::{PI, TAU};
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::Canvas;
use crate::foundation::error::{RingburstError, RingburstResult};

/// Canvas short side the default pixel values are tuned for.
pub const REFERENCE_SIDE_PX: f64 = 480.0;

/// Tunable constants of the simulation.
///
/// Pixel-valued fields are expressed for a 480px canvas; call [`SimParams::scaled_for`] to adapt
/// them to the probed video. Missing JSON fields fall back to [`SimParams::default`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimParams {
    /// Number of rings kept alive at all times.
    pub ring_count: usize,
    /// Radius of the innermost ring at scene start.
    pub base_radius: f64,
    /// Radial distance between neighbouring rings.
    pub ring_spacing: f64,
    /// Stroke width of a ring.
    pub ring_width: f64,
    /// Angular width of the gap in every ring (radians).
    pub hole_arc_width: f64,
    /// Lower bound of random ring angular speed magnitude (radians/sec).
    pub ring_speed_min: f64,
    /// Upper bound of random ring angular speed magnitude (radians/sec).
    pub ring_speed_max: f64,
    /// Radius lost by every ring per second.
    pub shrink_rate: f64,
    /// Rings smaller than this are removed and recycled.
    pub min_ring_radius: f64,

    /// Ball radius.
    pub ball_radius: f64,
    /// Speed after a reset.
    pub base_speed: f64,
    /// Lower speed bound enforced after each bounce.
    pub min_speed: f64,
    /// Upper speed bound enforced after each bounce.
    pub max_speed: f64,
    /// Smallest random energy factor applied on bounce.
    pub energy_min: f64,
    /// Largest random energy factor applied on bounce.
    pub energy_max: f64,
    /// Maximum random deflection applied to the reflected velocity (radians).
    pub bounce_jitter: f64,
    /// Ball translation sub-steps per frame.
    pub sub_steps: u32,
    /// Extra distance the ball is pushed out of a ring band after a bounce.
    pub push_margin: f64,
    /// Distance past the outermost ring at which the ball is reset.
    pub escape_margin: f64,

    /// Chance that the combined effect also spawns an explosion.
    pub explosion_chance: f64,
    /// Capacity of the sparkle pool.
    pub max_sparkles: usize,
    /// Capacity of the explosion fragment pool (flashes + debris).
    pub max_fragments: usize,
    /// Capacity of the shockwave pool.
    pub max_shockwaves: usize,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            ring_count: 10,
            base_radius: 50.0,
            ring_spacing: 18.0,
            ring_width: 5.0,
            hole_arc_width: PI / 3.0,
            ring_speed_min: 0.5,
            ring_speed_max: 1.8,
            shrink_rate: 6.0,
            min_ring_radius: 16.0,

            ball_radius: 7.0,
            base_speed: 220.0,
            min_speed: 160.0,
            max_speed: 460.0,
            energy_min: 0.92,
            energy_max: 1.12,
            bounce_jitter: 0.12,
            sub_steps: 2,
            push_margin: 0.5,
            escape_margin: 30.0,

            explosion_chance: 0.35,
            max_sparkles: 600,
            max_fragments: 400,
            max_shockwaves: 32,
        }
    }
}

impl SimParams {
    /// Read params from a JSON file; absent fields keep their defaults.
    pub fn from_json_path(path: &Path) -> RingburstResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read params '{}'", path.display()))?;
        let params: Self = serde_json::from_str(&text).map_err(|e| {
            RingburstError::validation(format!("invalid params '{}': {e}", path.display()))
        })?;
        params.validate()?;
        Ok(params)
    }

    /// Scale every pixel-valued field by `canvas.min_side() / 480`.
    pub fn scaled_for(&self, canvas: Canvas) -> Self {
        let k = f64::from(canvas.min_side()) / REFERENCE_SIDE_PX;
        Self {
            base_radius: self.base_radius * k,
            ring_spacing: self.ring_spacing * k,
            ring_width: self.ring_width * k,
            shrink_rate: self.shrink_rate * k,
            min_ring_radius: self.min_ring_radius * k,
            ball_radius: self.ball_radius * k,
            base_speed: self.base_speed * k,
            min_speed: self.min_speed * k,
            max_speed: self.max_speed * k,
            push_margin: self.push_margin * k,
            escape_margin: self.escape_margin * k,
            ..self.clone()
        }
    }

    /// Reject parameter sets the simulation cannot run with.
    pub fn validate(&self) -> RingburstResult<()> {
        let positive = [
            ("base_radius", self.base_radius),
            ("ring_spacing", self.ring_spacing),
            ("ring_width", self.ring_width),
            ("min_ring_radius", self.min_ring_radius),
            ("ball_radius", self.ball_radius),
            ("base_speed", self.base_speed),
            ("min_speed", self.min_speed),
            ("max_speed", self.max_speed),
            ("energy_min", self.energy_min),
            ("energy_max", self.energy_max),
        ];
        for (name, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(RingburstError::validation(format!(
                    "{name} must be a positive finite number (got {v})"
                )));
            }
        }
        let non_negative = [
            ("shrink_rate", self.shrink_rate),
            ("ring_speed_min", self.ring_speed_min),
            ("ring_speed_max", self.ring_speed_max),
            ("bounce_jitter", self.bounce_jitter),
            ("push_margin", self.push_margin),
            ("escape_margin", self.escape_margin),
        ];
        for (name, v) in non_negative {
            if !(v.is_finite() && v >= 0.0) {
                return Err(RingburstError::validation(format!(
                    "{name} must be a non-negative finite number (got {v})"
                )));
            }
        }

        if self.ring_count == 0 {
            return Err(RingburstError::validation("ring_count must be at least 1"));
        }
        if self.sub_steps == 0 {
            return Err(RingburstError::validation("sub_steps must be at least 1"));
        }
        if !(self.hole_arc_width > 0.0 && self.hole_arc_width < TAU) {
            return Err(RingburstError::validation(
                "hole_arc_width must be within (0, 2π)",
            ));
        }
        if self.ring_speed_min > self.ring_speed_max {
            return Err(RingburstError::validation(
                "ring_speed_min must be <= ring_speed_max",
            ));
        }
        if !(self.min_speed <= self.base_speed && self.base_speed <= self.max_speed) {
            return Err(RingburstError::validation(
                "speeds must satisfy min_speed <= base_speed <= max_speed",
            ));
        }
        if self.energy_min > 1.0 || self.energy_max < 1.0 {
            return Err(RingburstError::validation(
                "energy range must straddle 1.0 (energy_min <= 1 <= energy_max)",
            ));
        }
        if self.min_ring_radius >= self.base_radius {
            return Err(RingburstError::validation(
                "min_ring_radius must be smaller than base_radius",
            ));
        }
        if !(0.0..=1.0).contains(&self.explosion_chance) {
            return Err(RingburstError::validation(
                "explosion_chance must be within [0, 1]",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/params.rs"]
mod tests;
