use super::*;
use crate::config::palette::ColorScheme;
use crate::scene::ball::BallStyle;
use crate::scene::particles::DestructionEffect;
use crate::scene::ring::RingLayout;
use rand::SeedableRng;

fn profile() -> Profile {
    Profile {
        scheme: ColorScheme::Rainbow,
        layout: RingLayout::Random,
        ball: BallStyle::Solid,
        effect: DestructionEffect::Sparkles,
    }
}

fn scene(seed: u64) -> Scene {
    Scene::new(
        Canvas::new(480, 480).unwrap(),
        &SimParams::default(),
        profile(),
        Pcg32::seed_from_u64(seed),
    )
    .unwrap()
}

#[test]
fn initial_rings_are_ordered_and_complete() {
    let s = scene(1);
    assert_eq!(s.rings.len(), s.params.ring_count);
    for w in s.rings.windows(2) {
        assert!(w[0].radius < w[1].radius);
    }
    assert!(s.rings.iter().all(|r| r.visible));
    assert_eq!(s.ball.pos, s.center);
}

#[test]
fn params_are_scaled_to_canvas() {
    let s = Scene::new(
        Canvas::new(1920, 960).unwrap(),
        &SimParams::default(),
        profile(),
        Pcg32::seed_from_u64(0),
    )
    .unwrap();
    assert!((s.params.base_radius - SimParams::default().base_radius * 2.0).abs() < 1e-9);
    assert_eq!(s.center, Point::new(960.0, 480.0));
}

#[test]
fn invalid_params_are_rejected() {
    let bad = SimParams {
        ring_count: 0,
        ..SimParams::default()
    };
    assert!(
        Scene::new(
            Canvas::new(64, 64).unwrap(),
            &bad,
            profile(),
            Pcg32::seed_from_u64(0)
        )
        .is_err()
    );
}

#[test]
fn recycling_replaces_small_rings_at_the_outer_edge() {
    let mut s = scene(2);
    let outer_before = s.rings.last().unwrap().radius;
    s.rings[0].radius = s.params.min_ring_radius - 0.1;
    s.rings[1].radius = s.params.min_ring_radius - 0.05;

    let added = s.recycle_rings();
    assert_eq!(added, 2);
    assert_eq!(s.rings.len(), s.params.ring_count);
    let n = s.rings.len();
    assert!((s.rings[n - 2].radius - (outer_before + s.params.ring_spacing)).abs() < 1e-9);
    assert!((s.rings[n - 1].radius - (outer_before + 2.0 * s.params.ring_spacing)).abs() < 1e-9);
    for w in s.rings.windows(2) {
        assert!(w[0].radius < w[1].radius);
    }
}

#[test]
fn recycling_from_empty_starts_at_base_radius() {
    let mut s = scene(3);
    s.rings.clear();
    s.recycle_rings();
    assert_eq!(s.rings.len(), s.params.ring_count);
    assert_eq!(s.rings[0].radius, s.params.base_radius);
}

#[test]
fn reset_wave_restores_center_speed_and_visibility() {
    let mut s = scene(4);
    s.ball.pos = Point::new(5.0, 5.0);
    s.ball.vel = kurbo::Vec2::new(1.0, 0.0);
    s.rings[3].visible = false;
    s.reset_wave();
    assert_eq!(s.ball.pos, s.center);
    assert!((s.ball.speed() - s.params.base_speed).abs() < 1e-9);
    assert!(s.rings.iter().all(|r| r.visible));
    assert_eq!(s.wave, 1);
}
