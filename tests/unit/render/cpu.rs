use super::*;
use crate::config::palette::ColorScheme;
use crate::config::params::SimParams;
use crate::config::profile::Profile;
use crate::foundation::math::polar_to_cartesian;
use crate::scene::particles::DestructionEffect;
use crate::scene::ring::RingLayout;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use std::f64::consts::PI;

fn scene(w: u32, h: u32, ball: BallStyle) -> Scene {
    Scene::new(
        Canvas::new(w, h).unwrap(),
        &SimParams::default(),
        Profile {
            scheme: ColorScheme::Warm,
            layout: RingLayout::Checkerboard,
            ball,
            effect: DestructionEffect::Combined,
        },
        Pcg32::seed_from_u64(9),
    )
    .unwrap()
}

fn alpha_at(frame: &FrameRGBA, p: Point) -> u8 {
    let x = p.x.floor() as usize;
    let y = p.y.floor() as usize;
    frame.data[(y * frame.width as usize + x) * 4 + 3]
}

#[test]
fn frame_has_canvas_size_and_is_premultiplied() {
    let s = scene(320, 240, BallStyle::Solid);
    let mut r = CpuRenderer::new(s.canvas).unwrap();
    let f = r.render(&s).unwrap();
    assert_eq!((f.width, f.height), (320, 240));
    assert_eq!(f.data.len(), 320 * 240 * 4);
    assert!(f.premultiplied);
}

#[test]
fn background_stays_transparent() {
    let s = scene(200, 200, BallStyle::Solid);
    let f = CpuRenderer::new(s.canvas).unwrap().render(&s).unwrap();
    assert_eq!(alpha_at(&f, Point::new(1.0, 1.0)), 0);
    assert_eq!(alpha_at(&f, Point::new(198.0, 198.0)), 0);
}

#[test]
fn ring_is_drawn_on_the_solid_arc_but_not_in_the_gap() {
    let s = scene(480, 480, BallStyle::Solid);
    let ring = &s.rings[0];
    let f = CpuRenderer::new(s.canvas).unwrap().render(&s).unwrap();

    let solid = s.center + polar_to_cartesian(ring.radius, ring.angle + PI);
    let gap = s.center + polar_to_cartesian(ring.radius, ring.angle);
    assert!(alpha_at(&f, solid) > 200);
    assert_eq!(alpha_at(&f, gap), 0);
}

#[test]
fn hidden_rings_are_not_drawn() {
    let mut s = scene(480, 480, BallStyle::Solid);
    s.rings[0].visible = false;
    let ring = &s.rings[0];
    let solid = s.center + polar_to_cartesian(ring.radius, ring.angle + PI);
    let f = CpuRenderer::new(s.canvas).unwrap().render(&s).unwrap();
    assert_eq!(alpha_at(&f, solid), 0);
}

#[test]
fn every_ball_style_draws_the_ball() {
    for style in BallStyle::ALL {
        let s = scene(240, 240, style);
        let f = CpuRenderer::new(s.canvas).unwrap().render(&s).unwrap();
        assert!(alpha_at(&f, s.ball.pos) > 0, "{}", style.name());
    }
}

#[test]
fn particles_are_drawn() {
    let mut s = scene(480, 480, BallStyle::Solid);
    let pos = Point::new(60.0, 60.0);
    let params = s.params.clone();
    DestructionEffect::Shockwave.trigger(
        &mut s.particles,
        pos,
        Rgba8::WHITE,
        &params,
        &mut s.rng,
    );
    let w = &s.particles.shockwaves[0];
    let on_wave = w.pos + polar_to_cartesian(w.radius, 0.3);
    let f = CpuRenderer::new(s.canvas).unwrap().render(&s).unwrap();
    assert!(alpha_at(&f, on_wave) > 0);
}

#[test]
fn rendering_is_pure_and_repeatable() {
    let s = scene(160, 120, BallStyle::PulsingGlow);
    let before = s.clone();
    let mut r = CpuRenderer::new(s.canvas).unwrap();
    let a = r.render(&s).unwrap();
    let b = r.render(&s).unwrap();
    assert_eq!(a, b);
    assert_eq!(s.rings, before.rings);
    assert_eq!(s.ball, before.ball);
}

#[test]
fn oversized_canvas_is_a_render_error() {
    let err = CpuRenderer::new(Canvas::new(70_000, 10).unwrap()).unwrap_err();
    assert!(matches!(err, RingburstError::Render(_)));
}

#[test]
fn mismatched_scene_canvas_is_rejected() {
    let s = scene(100, 100, BallStyle::Solid);
    let mut r = CpuRenderer::new(Canvas::new(120, 100).unwrap()).unwrap();
    assert!(r.render(&s).is_err());
}

#[test]
fn radial_glow_peaks_at_the_color_alpha_and_fades_out() {
    let mut ctx = vello_cpu::RenderContext::new(64, 64);
    let mut pixmap = vello_cpu::Pixmap::new(64, 64);
    let center = Point::new(32.0, 32.0);
    fill_radial_glow(&mut ctx, center, 24.0, Rgba8 { r: 255, g: 255, b: 255, a: 160 });
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);

    let bytes = pixmap.data_as_u8_slice();
    let alpha = |x: usize, y: usize| bytes[(y * 64 + x) * 4 + 3];
    let peak = alpha(32, 32);
    assert!(peak.abs_diff(160) <= 8, "center alpha {peak}");
    let mid = alpha(44, 32);
    assert!(mid > 0 && mid < peak, "mid alpha {mid}");
    assert!(alpha(55, 32) < mid);
    assert_eq!(alpha(60, 32), 0);
    assert_eq!(alpha(2, 2), 0);
}
