use rand::Rng;
use rand_pcg::Pcg32;

use crate::config::params::SimParams;
use crate::config::profile::Profile;
use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::RingburstResult;
use crate::scene::ball::Ball;
use crate::scene::particles::ParticlePools;
use crate::scene::ring::{Ring, random_speed};

/// Everything one render simulates: rings, ball, particles and the random source.
///
/// A scene is owned by exactly one frame loop and advanced in order; two scenes built from the
/// same inputs and seed evolve identically.
#[derive(Clone, Debug)]
pub struct Scene {
    /// Output canvas.
    pub canvas: Canvas,
    /// Pixel center all rings revolve around.
    pub center: Point,
    /// Parameters already scaled to `canvas`.
    pub params: SimParams,
    /// Frozen visual profile.
    pub profile: Profile,
    /// Rings in increasing-radius order.
    pub rings: Vec<Ring>,
    /// The ball.
    pub ball: Ball,
    /// Particle pools.
    pub particles: ParticlePools,
    /// Completed escape resets so far.
    pub wave: u64,
    /// Rings the ball has passed through so far.
    pub rings_consumed: u64,
    pub(crate) rng: Pcg32,
}

impl Scene {
    /// Build the initial scene. `params` are given for the 480px reference canvas and scaled here.
    pub fn new(
        canvas: Canvas,
        params: &SimParams,
        profile: Profile,
        mut rng: Pcg32,
    ) -> RingburstResult<Self> {
        params.validate()?;
        let params = params.scaled_for(canvas);
        let center = canvas.center();

        let count = params.ring_count;
        let mut rings: Vec<Ring> = (0..count)
            .map(|i| {
                Ring::new(
                    params.base_radius + i as f64 * params.ring_spacing,
                    &params,
                    profile.scheme.ring_color(i, count),
                )
            })
            .collect();
        profile.layout.assign(&mut rings, &params, &mut rng);

        let mut ball = Ball::launch(center, &params, &mut rng);
        profile.ball.init_ball(&mut ball, profile.scheme.ball_color());

        Ok(Self {
            canvas,
            center,
            params,
            profile,
            rings,
            ball,
            particles: ParticlePools::default(),
            wave: 0,
            rings_consumed: 0,
            rng,
        })
    }

    /// Outer radius beyond which the ball counts as escaped.
    pub fn escape_radius(&self) -> f64 {
        let p = &self.params;
        let edge = match self.rings.last() {
            Some(outer) => outer.radius + outer.width,
            None => p.base_radius,
        };
        edge + self.ball.radius + p.escape_margin
    }

    /// Ball distance from the scene center.
    pub fn ball_distance(&self) -> f64 {
        (self.ball.pos - self.center).hypot()
    }

    /// Start a new wave: ball back to center at base speed, every ring visible again.
    pub fn reset_wave(&mut self) {
        self.ball.reset(self.center, &self.params, &mut self.rng);
        for ring in &mut self.rings {
            ring.visible = true;
        }
        self.wave += 1;
        tracing::debug!(wave = self.wave, "ball escaped; new wave");
    }

    /// Drop rings below the minimum size and append fresh outer rings up to the target count.
    ///
    /// Returns how many rings were appended.
    pub fn recycle_rings(&mut self) -> usize {
        let min = self.params.min_ring_radius;
        let before = self.rings.len();
        let mut removed = 0;
        while self.rings.first().is_some_and(|r| r.radius < min) {
            self.rings.remove(0);
            removed += 1;
        }

        let target = self.params.ring_count;
        let mut added = 0;
        while self.rings.len() < target {
            let radius = match self.rings.last() {
                Some(last) => last.radius + self.params.ring_spacing,
                None => self.params.base_radius,
            };
            let color = self
                .profile
                .scheme
                .ring_color(self.rng.random_range(0..target), target);
            let mut ring = Ring::new(radius, &self.params, color);
            ring.angle = self.rng.random_range(0.0..std::f64::consts::TAU);
            ring.angular_speed = random_speed(&self.params, &mut self.rng);
            self.rings.push(ring);
            added += 1;
        }
        if removed > 0 || added > 0 {
            tracing::trace!(before, removed, added, "recycled rings");
        }
        added
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/state.rs"]
mod tests;
