use std::f64::consts::{FRAC_PI_2, TAU};

use kurbo::Shape;

use crate::foundation::core::{Affine, Canvas, Point, Rgba8};
use crate::foundation::error::{RingburstError, RingburstResult};
use crate::render::backend::{FrameRGBA, SceneRenderer};
use crate::scene::ball::{Ball, BallStyle};
use crate::scene::particles::{
    Debris, DebrisShape, Flash, Fragment, ParticlePools, life_fraction,
};
use crate::scene::ring::Ring;
use crate::scene::state::Scene;

const TOLERANCE: f64 = 0.1;
/// Glow radius of [`BallStyle::PulsingGlow`] relative to the ball radius.
const GLOW_SPREAD: f64 = 2.6;

/// CPU rasterizer for scenes, backed by `vello_cpu`.
///
/// The render context and target pixmap are allocated once and reused for every frame.
pub struct CpuRenderer {
    canvas: Canvas,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for CpuRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuRenderer")
            .field("canvas", &self.canvas)
            .finish_non_exhaustive()
    }
}

impl CpuRenderer {
    /// Create a renderer for `canvas`.
    ///
    /// Fails when either side exceeds what the rasterizer addresses (`u16`).
    pub fn new(canvas: Canvas) -> RingburstResult<Self> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| RingburstError::render("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| RingburstError::render("canvas height exceeds u16"))?;
        Ok(Self {
            canvas,
            ctx: vello_cpu::RenderContext::new(width, height),
            pixmap: vello_cpu::Pixmap::new(width, height),
        })
    }

    /// Canvas this renderer draws into.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Draw `scene` and copy the premultiplied pixels into `out`.
    pub fn render_into(&mut self, scene: &Scene, out: &mut FrameRGBA) -> RingburstResult<()> {
        if scene.canvas != self.canvas {
            return Err(RingburstError::render(format!(
                "scene canvas {}x{} does not match renderer canvas {}x{}",
                scene.canvas.width, scene.canvas.height, self.canvas.width, self.canvas.height
            )));
        }

        clear_pixmap(&mut self.pixmap);
        let ctx = &mut self.ctx;
        ctx.reset();

        for ring in scene.rings.iter().filter(|r| r.visible) {
            draw_ring(ctx, scene.center, ring);
        }
        scene.profile.ball.draw(ctx, &scene.ball);
        draw_particles(ctx, &scene.particles);

        ctx.flush();
        ctx.render_to_pixmap(&mut self.pixmap);

        let bytes = self.pixmap.data_as_u8_slice();
        out.width = self.canvas.width;
        out.height = self.canvas.height;
        out.premultiplied = true;
        out.data.clear();
        out.data.extend_from_slice(bytes);
        Ok(())
    }
}

impl SceneRenderer for CpuRenderer {
    fn render(&mut self, scene: &Scene) -> RingburstResult<FrameRGBA> {
        let mut out = FrameRGBA::transparent(self.canvas);
        self.render_into(scene, &mut out)?;
        Ok(out)
    }
}

impl BallStyle {
    /// Draw `ball` with this style's look.
    pub(crate) fn draw(self, ctx: &mut vello_cpu::RenderContext, ball: &Ball) {
        let look = &ball.look;
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        match self {
            Self::Solid | Self::HueCycle => {
                fill_circle(ctx, ball.pos, ball.radius, look.color);
            }
            Self::PulsingGlow => {
                let glow = look.color.with_opacity(0.55 * look.brightness);
                fill_radial_glow(ctx, ball.pos, ball.radius * GLOW_SPREAD, glow);
                let core = look.color.darken(0.5 + 0.5 * look.brightness);
                fill_circle(ctx, ball.pos, ball.radius, core);
                fill_circle(
                    ctx,
                    ball.pos,
                    ball.radius * 0.45,
                    core.lighten(0.6 * look.brightness),
                );
            }
        }
    }
}

fn draw_ring(ctx: &mut vello_cpu::RenderContext, center: Point, ring: &Ring) {
    let (start, sweep) = ring.solid_arc();
    let arc = kurbo::Arc::new(center, (ring.radius, ring.radius), start, sweep, 0.0);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(paint(ring.color));
    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(ring.width));
    ctx.stroke_path(&shape_to_cpu(&arc));
}

fn draw_particles(ctx: &mut vello_cpu::RenderContext, pools: &ParticlePools) {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    for s in &pools.sparkles {
        let alpha = life_fraction(s.life, s.max_life);
        let color = Rgba8::from_hsl(s.hue, 1.0, 0.7).with_opacity(alpha);
        fill_circle(ctx, s.pos, s.size, color);
    }

    for f in &pools.fragments {
        match f {
            Fragment::Flash(flash) => draw_flash(ctx, flash),
            Fragment::Debris(debris) => draw_debris(ctx, debris),
        }
    }

    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    for w in &pools.shockwaves {
        let width = w.width();
        if width <= 0.0 {
            continue;
        }
        let alpha = life_fraction(w.life, w.max_life);
        ctx.set_paint(paint(w.color.with_opacity(alpha)));
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        ctx.stroke_path(&shape_to_cpu(&kurbo::Circle::new(w.pos, w.radius)));
    }
}

fn draw_flash(ctx: &mut vello_cpu::RenderContext, flash: &Flash) {
    let alpha = life_fraction(flash.life, flash.max_life);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    fill_radial_glow(ctx, flash.pos, flash.radius(), flash.color.with_opacity(alpha));
}

fn draw_debris(ctx: &mut vello_cpu::RenderContext, d: &Debris) {
    let alpha = life_fraction(d.life, d.max_life);
    let s = d.size;
    let mut path = vello_cpu::kurbo::BezPath::new();
    match d.shape {
        DebrisShape::Square => {
            path.move_to((-s, -s));
            path.line_to((s, -s));
            path.line_to((s, s));
            path.line_to((-s, s));
        }
        DebrisShape::Triangle => {
            for k in 0..3 {
                let theta = -FRAC_PI_2 + f64::from(k) * TAU / 3.0;
                let p = (s * theta.cos(), s * theta.sin());
                if k == 0 {
                    path.move_to(p);
                } else {
                    path.line_to(p);
                }
            }
        }
    }
    path.close_path();

    ctx.set_transform(affine_to_cpu(
        Affine::translate(d.pos.to_vec2()) * Affine::rotate(d.rotation),
    ));
    ctx.set_paint(paint(d.color.with_opacity(alpha)));
    ctx.fill_path(&path);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
}

fn fill_circle(ctx: &mut vello_cpu::RenderContext, center: Point, radius: f64, color: Rgba8) {
    if radius <= 0.0 || color.a == 0 {
        return;
    }
    ctx.set_paint(paint(color));
    ctx.fill_path(&shape_to_cpu(&kurbo::Circle::new(center, radius)));
}

/// Radial falloff from `color` at the center to transparent at `radius`.
fn fill_radial_glow(ctx: &mut vello_cpu::RenderContext, center: Point, radius: f64, color: Rgba8) {
    if radius <= 0.0 || color.a == 0 {
        return;
    }
    let gradient = vello_cpu::peniko::Gradient::new_radial(point_to_cpu(center), radius as f32)
        .with_stops([
            (0.0, paint(color)),
            (1.0, paint(Rgba8 { a: 0, ..color })),
        ]);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(gradient);
    ctx.fill_path(&shape_to_cpu(&kurbo::Circle::new(center, radius)));
}

fn paint(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn shape_to_cpu(shape: &impl Shape) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in shape.path_elements(TOLERANCE) {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3))
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
