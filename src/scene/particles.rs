use std::f64::consts::TAU;

use rand::Rng;

use crate::config::params::SimParams;
use crate::foundation::core::{Point, Rgba8, Vec2};
use crate::foundation::math::polar_to_cartesian;

/// Downward acceleration applied to debris (pixels/sec², y grows downward).
pub const DEBRIS_GRAVITY: f64 = 320.0;
/// Per-second velocity retention of sparkles.
const SPARKLE_DRAG_PER_SEC: f64 = 0.25;

const SPARKLE_COUNT: usize = 24;
const DEBRIS_COUNT: usize = 14;

/// A small glowing dot.
#[derive(Clone, Debug, PartialEq)]
pub struct Sparkle {
    /// Position.
    pub pos: Point,
    /// Velocity.
    pub vel: Vec2,
    /// Hue in degrees.
    pub hue: f64,
    /// Radius.
    pub size: f64,
    /// Seconds left.
    pub life: f64,
    /// Initial lifetime.
    pub max_life: f64,
}

/// Outline of a debris piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebrisShape {
    /// Axis-aligned square before rotation.
    Square,
    /// Equilateral triangle before rotation.
    Triangle,
}

/// A tumbling shard thrown out by an explosion.
#[derive(Clone, Debug, PartialEq)]
pub struct Debris {
    /// Position.
    pub pos: Point,
    /// Velocity.
    pub vel: Vec2,
    /// Current rotation (radians).
    pub rotation: f64,
    /// Rotation speed (radians/sec).
    pub spin: f64,
    /// Half extent.
    pub size: f64,
    /// Outline.
    pub shape: DebrisShape,
    /// Fill color.
    pub color: Rgba8,
    /// Seconds left.
    pub life: f64,
    /// Initial lifetime.
    pub max_life: f64,
}

/// A short-lived expanding radial glow.
#[derive(Clone, Debug, PartialEq)]
pub struct Flash {
    /// Center.
    pub pos: Point,
    /// Radius reached at the end of the flash.
    pub max_radius: f64,
    /// Inner color.
    pub color: Rgba8,
    /// Seconds left.
    pub life: f64,
    /// Initial lifetime.
    pub max_life: f64,
}

impl Flash {
    /// Radius at the current age.
    pub fn radius(&self) -> f64 {
        self.max_radius * (0.25 + 0.75 * (1.0 - life_fraction(self.life, self.max_life)))
    }
}

/// One entry of the explosion pool.
#[derive(Clone, Debug, PartialEq)]
pub enum Fragment {
    /// Radial flash.
    Flash(Flash),
    /// Tumbling shard.
    Debris(Debris),
}

impl Fragment {
    fn life(&self) -> f64 {
        match self {
            Self::Flash(f) => f.life,
            Self::Debris(d) => d.life,
        }
    }
}

/// An expanding, thinning circle.
#[derive(Clone, Debug, PartialEq)]
pub struct Shockwave {
    /// Center.
    pub pos: Point,
    /// Current radius.
    pub radius: f64,
    /// Expansion speed (pixels/sec).
    pub speed: f64,
    /// Stroke width at birth.
    pub start_width: f64,
    /// Stroke color.
    pub color: Rgba8,
    /// Seconds left.
    pub life: f64,
    /// Initial lifetime.
    pub max_life: f64,
}

impl Shockwave {
    /// Stroke width at the current age.
    pub fn width(&self) -> f64 {
        self.start_width * life_fraction(self.life, self.max_life)
    }
}

/// Remaining-life fraction in `[0, 1]`.
#[inline]
pub fn life_fraction(life: f64, max_life: f64) -> f64 {
    if max_life <= 0.0 {
        0.0
    } else {
        (life / max_life).clamp(0.0, 1.0)
    }
}

/// The three particle pools of a scene.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticlePools {
    /// Sparkles.
    pub sparkles: Vec<Sparkle>,
    /// Explosion flashes and debris.
    pub fragments: Vec<Fragment>,
    /// Shockwaves.
    pub shockwaves: Vec<Shockwave>,
}

impl ParticlePools {
    /// Total live particles across all pools.
    pub fn len(&self) -> usize {
        self.sparkles.len() + self.fragments.len() + self.shockwaves.len()
    }

    /// `true` when every pool is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move, age and cull every particle.
    pub fn age(&mut self, dt: f64) {
        let drag = SPARKLE_DRAG_PER_SEC.powf(dt);
        for s in &mut self.sparkles {
            s.pos += s.vel * dt;
            s.vel *= drag;
            s.life -= dt;
        }
        self.sparkles.retain(|s| s.life > 0.0);

        for f in &mut self.fragments {
            match f {
                Fragment::Flash(flash) => flash.life -= dt,
                Fragment::Debris(d) => {
                    d.vel.y += DEBRIS_GRAVITY * dt;
                    d.pos += d.vel * dt;
                    d.rotation += d.spin * dt;
                    d.life -= dt;
                }
            }
        }
        self.fragments.retain(|f| f.life() > 0.0);

        for w in &mut self.shockwaves {
            w.radius += w.speed * dt;
            w.life -= dt;
        }
        self.shockwaves.retain(|w| w.life > 0.0);
    }

    fn push_sparkle(&mut self, s: Sparkle, cap: usize) {
        push_capped(&mut self.sparkles, s, cap);
    }

    fn push_fragment(&mut self, f: Fragment, cap: usize) {
        push_capped(&mut self.fragments, f, cap);
    }

    fn push_shockwave(&mut self, w: Shockwave, cap: usize) {
        push_capped(&mut self.shockwaves, w, cap);
    }
}

// Oldest entries go first when a pool is full.
fn push_capped<T>(pool: &mut Vec<T>, item: T, cap: usize) {
    if cap == 0 {
        return;
    }
    if pool.len() >= cap {
        let excess = pool.len() + 1 - cap;
        pool.drain(..excess);
    }
    pool.push(item);
}

/// Visual response to a ring being consumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestructionEffect {
    /// A burst of sparkles.
    Sparkles,
    /// A flash plus tumbling debris.
    Explosion,
    /// A single expanding shockwave.
    Shockwave,
    /// Sparkles and a shockwave, sometimes an explosion on top.
    Combined,
}

impl DestructionEffect {
    /// Every effect, in selection order.
    pub const ALL: [Self; 4] = [
        Self::Sparkles,
        Self::Explosion,
        Self::Shockwave,
        Self::Combined,
    ];

    /// Stable lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sparkles => "sparkles",
            Self::Explosion => "explosion",
            Self::Shockwave => "shockwave",
            Self::Combined => "combined",
        }
    }

    /// Spawn this effect's particles at `pos` in the consumed ring's `color`.
    pub fn trigger(
        self,
        pools: &mut ParticlePools,
        pos: Point,
        color: Rgba8,
        params: &SimParams,
        rng: &mut impl Rng,
    ) {
        match self {
            Self::Sparkles => spawn_sparkles(pools, pos, color, params, rng),
            Self::Explosion => spawn_explosion(pools, pos, color, params, rng),
            Self::Shockwave => spawn_shockwave(pools, pos, color, params),
            Self::Combined => {
                spawn_sparkles(pools, pos, color, params, rng);
                spawn_shockwave(pools, pos, color, params);
                if rng.random_bool(params.explosion_chance) {
                    spawn_explosion(pools, pos, color, params, rng);
                }
            }
        }
    }
}

// Particle sizes and speeds follow the ball radius so they scale with the canvas.
fn spawn_sparkles(
    pools: &mut ParticlePools,
    pos: Point,
    color: Rgba8,
    params: &SimParams,
    rng: &mut impl Rng,
) {
    let unit = params.ball_radius;
    let base_hue = color.hue();
    for _ in 0..SPARKLE_COUNT {
        let theta = rng.random_range(0.0..TAU);
        let speed = rng.random_range(8.0..26.0) * unit;
        let life = rng.random_range(0.6..1.0);
        pools.push_sparkle(
            Sparkle {
                pos,
                vel: polar_to_cartesian(speed, theta),
                hue: (base_hue + rng.random_range(-25.0..25.0)).rem_euclid(360.0),
                size: rng.random_range(0.2..0.5) * unit,
                life,
                max_life: life,
            },
            params.max_sparkles,
        );
    }
}

fn spawn_explosion(
    pools: &mut ParticlePools,
    pos: Point,
    color: Rgba8,
    params: &SimParams,
    rng: &mut impl Rng,
) {
    let unit = params.ball_radius;
    pools.push_fragment(
        Fragment::Flash(Flash {
            pos,
            max_radius: 8.0 * unit,
            color: color.lighten(0.5),
            life: 0.35,
            max_life: 0.35,
        }),
        params.max_fragments,
    );
    for i in 0..DEBRIS_COUNT {
        let theta = rng.random_range(0.0..TAU);
        let speed = rng.random_range(12.0..34.0) * unit;
        let life = rng.random_range(0.8..1.4);
        pools.push_fragment(
            Fragment::Debris(Debris {
                pos,
                vel: polar_to_cartesian(speed, theta),
                rotation: rng.random_range(0.0..TAU),
                spin: rng.random_range(-9.0..9.0),
                size: rng.random_range(0.4..1.0) * unit,
                shape: if i % 2 == 0 {
                    DebrisShape::Square
                } else {
                    DebrisShape::Triangle
                },
                color,
                life,
                max_life: life,
            }),
            params.max_fragments,
        );
    }
}

fn spawn_shockwave(pools: &mut ParticlePools, pos: Point, color: Rgba8, params: &SimParams) {
    let unit = params.ball_radius;
    pools.push_shockwave(
        Shockwave {
            pos,
            radius: unit,
            speed: 30.0 * unit,
            start_width: 0.9 * unit,
            color,
            life: 0.6,
            max_life: 0.6,
        },
        params.max_shockwaves,
    );
}

#[cfg(test)]
#[path = "../../tests/unit/scene/particles.rs"]
mod tests;
