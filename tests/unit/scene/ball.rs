use super::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

#[test]
fn launch_starts_at_center_with_base_speed() {
    let p = SimParams::default();
    let mut rng = Pcg32::seed_from_u64(1);
    let ball = Ball::launch(Point::new(240.0, 240.0), &p, &mut rng);
    assert_eq!(ball.pos, Point::new(240.0, 240.0));
    assert!((ball.speed() - p.base_speed).abs() < 1e-9);
    assert_eq!(ball.radius, p.ball_radius);
}

#[test]
fn hue_cycle_advances_faster_with_speed() {
    let p = SimParams::default();
    let mut rng = Pcg32::seed_from_u64(2);
    let mut slow = Ball::launch(Point::ZERO, &p, &mut rng);
    BallStyle::HueCycle.init_ball(&mut slow, Rgba8::from_hsl(10.0, 1.0, 0.5));
    let mut fast = slow.clone();

    BallStyle::HueCycle.update_color(&mut slow, 0.1, 1.0);
    BallStyle::HueCycle.update_color(&mut fast, 0.1, 2.0);
    let d_slow = slow.look.hue - 10.0;
    let d_fast = fast.look.hue - 10.0;
    assert!((d_slow - 12.0).abs() < 1.0);
    assert!(d_fast > d_slow);
}

#[test]
fn pulsing_glow_brightness_stays_bounded() {
    let p = SimParams::default();
    let mut rng = Pcg32::seed_from_u64(3);
    let mut ball = Ball::launch(Point::ZERO, &p, &mut rng);
    BallStyle::PulsingGlow.init_ball(&mut ball, Rgba8::WHITE);
    for _ in 0..200 {
        BallStyle::PulsingGlow.update_color(&mut ball, 1.0 / 30.0, 1.3);
        assert!((0.2..=1.0).contains(&ball.look.brightness));
    }
}

#[test]
fn solid_keeps_base_color() {
    let p = SimParams::default();
    let mut rng = Pcg32::seed_from_u64(4);
    let mut ball = Ball::launch(Point::ZERO, &p, &mut rng);
    let base = Rgba8::rgb(12, 200, 99);
    BallStyle::Solid.init_ball(&mut ball, base);
    BallStyle::Solid.update_color(&mut ball, 1.0, 3.0);
    assert_eq!(ball.look.color, base);
}
