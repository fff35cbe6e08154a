use rand::Rng;

use crate::config::params::SimParams;
use crate::foundation::core::Vec2;
use crate::foundation::math::rotate;
use crate::physics::collision::{RingContact, test_ring};
use crate::scene::state::Scene;

/// What happened during one [`step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Bounces resolved across all sub-steps.
    pub bounces: u32,
    /// Rings consumed through their gap.
    pub pass_throughs: u32,
    /// Whether the ball escaped and a new wave began.
    pub reset: bool,
    /// Rings appended by recycling.
    pub rings_added: u32,
}

/// Advance the scene by one output frame of length `dt` seconds.
pub fn step(scene: &mut Scene, dt: f64) -> StepReport {
    let mut report = StepReport::default();

    for ring in &mut scene.rings {
        ring.angle += ring.angular_speed * dt;
    }

    let speed_ratio = scene.ball.speed() / scene.params.base_speed;
    scene
        .profile
        .ball
        .update_color(&mut scene.ball, dt, speed_ratio);

    let sub_steps = scene.params.sub_steps.max(1);
    let sub_dt = dt / f64::from(sub_steps);
    for _ in 0..sub_steps {
        match advance_ball(scene, sub_dt) {
            Some(RingContact::Bounce { .. }) => report.bounces += 1,
            Some(RingContact::PassThrough) => report.pass_throughs += 1,
            None => {}
        }
    }

    if scene.ball_distance() > scene.escape_radius() {
        scene.reset_wave();
        report.reset = true;
    }

    let shrink = scene.params.shrink_rate * dt;
    for ring in &mut scene.rings {
        ring.radius -= shrink;
    }
    report.rings_added = scene.recycle_rings() as u32;

    scene.particles.age(dt);
    report
}

/// Move the ball for one sub-step and resolve at most one ring interaction.
///
/// Rings are tested in ascending radius order and the first contact wins, even when a later
/// ring's band overlaps the same position.
fn advance_ball(scene: &mut Scene, sub_dt: f64) -> Option<RingContact> {
    let prev = scene.ball.pos;
    scene.ball.pos += scene.ball.vel * sub_dt;
    let pos = scene.ball.pos;
    let ball_radius = scene.ball.radius;

    let (index, contact) = scene
        .rings
        .iter()
        .enumerate()
        .filter(|(_, ring)| ring.visible)
        .find_map(|(i, ring)| {
            test_ring(ring, scene.center, prev, pos, ball_radius).map(|c| (i, c))
        })?;

    match contact {
        RingContact::Bounce {
            from_inside,
            penetration,
        } => {
            let ring_radius = scene.rings[index].radius;
            resolve_bounce(scene, from_inside, penetration, ring_radius);
        }
        RingContact::PassThrough => {
            let ring = &mut scene.rings[index];
            ring.visible = false;
            let color = ring.color;
            scene.rings_consumed += 1;
            tracing::trace!(ring = index, "ball passed through gap");
            scene.profile.effect.trigger(
                &mut scene.particles,
                pos,
                color,
                &scene.params,
                &mut scene.rng,
            );
        }
    }
    Some(contact)
}

fn resolve_bounce(scene: &mut Scene, from_inside: bool, penetration: f64, ring_radius: f64) {
    let offset = scene.ball.pos - scene.center;
    let dist = offset.hypot();
    let normal = if dist > f64::EPSILON {
        offset / dist
    } else {
        Vec2::new(1.0, 0.0)
    };

    let reflected = reflect_velocity(scene.ball.vel, normal);
    scene.ball.vel = rescale_after_bounce(reflected, &scene.params, &mut scene.rng);

    let margin = scene.params.push_margin;
    let target = if from_inside {
        (dist - penetration - margin).max(0.0)
    } else {
        dist + penetration + margin
    };
    scene.ball.pos = scene.center + normal * target;
    tracing::trace!(ring_radius, from_inside, "ball bounced");
}

/// Mirror `v` about the unit normal `n`: `v - 2(v·n)n`.
#[inline]
pub fn reflect_velocity(v: Vec2, n: Vec2) -> Vec2 {
    v - n * (2.0 * v.dot(n))
}

/// Apply the random energy factor, clamp the speed and deflect the direction slightly.
///
/// Slow balls are more likely to be boosted and fast balls more likely to be damped. The result
/// always has a speed within `[min_speed, max_speed]`.
pub fn rescale_after_bounce(v: Vec2, params: &SimParams, rng: &mut impl Rng) -> Vec2 {
    let speed = v.hypot();
    let span = params.max_speed - params.min_speed;
    let boost_chance = if span > f64::EPSILON {
        ((params.max_speed - speed) / span).clamp(0.0, 1.0)
    } else {
        0.5
    };
    let factor = if rng.random_bool(boost_chance) {
        rng.random_range(1.0..=params.energy_max)
    } else {
        rng.random_range(params.energy_min..=1.0)
    };
    let new_speed = (speed * factor).clamp(params.min_speed, params.max_speed);

    let dir = if speed > f64::EPSILON {
        v / speed
    } else {
        Vec2::new(1.0, 0.0)
    };
    let jitter = if params.bounce_jitter > 0.0 {
        rng.random_range(-params.bounce_jitter..=params.bounce_jitter)
    } else {
        0.0
    };
    rotate(dir, jitter) * new_speed
}

#[cfg(test)]
#[path = "../../tests/unit/physics/step.rs"]
mod tests;
