use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::params::SimParams;
use crate::config::profile::Profile;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, FrameIndex, Timeline};
use crate::foundation::error::{RingburstError, RingburstResult};
use crate::physics::step::step;
use crate::render::backend::FrameRGBA;
use crate::render::cpu::CpuRenderer;
use crate::scene::state::Scene;

/// Frame loop statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames the timeline asks for.
    pub frames_total: u64,
    /// Frames rendered and handed to the sink.
    pub frames_rendered: u64,
    /// Escape resets during the run.
    pub waves: u64,
    /// Rings the ball passed through.
    pub rings_consumed: u64,
    /// Solid-arc bounces.
    pub bounces: u64,
}

/// One overlay render: a seeded scene, its renderer and the output timeline.
///
/// A session is one-shot. Frames are simulated strictly in order and never rewound, so a
/// session either streams its whole timeline once or renders a single snapshot.
#[derive(Debug)]
pub struct OverlaySession {
    scene: Scene,
    renderer: CpuRenderer,
    timeline: Timeline,
    seed: u64,
    next_frame: u64,
    bounces: u64,
}

impl OverlaySession {
    /// Build a session. Without a `seed` a random one is drawn and logged so the run can be
    /// replayed.
    pub fn new(
        canvas: Canvas,
        timeline: Timeline,
        params: &SimParams,
        seed: Option<u64>,
    ) -> RingburstResult<Self> {
        let seed = seed.unwrap_or_else(rand::random);
        let mut rng = Pcg32::seed_from_u64(seed);
        let profile = Profile::choose(&mut rng);
        Self::build(canvas, timeline, params, profile, seed, rng)
    }

    /// Build a session with a fixed profile instead of a random one.
    pub fn with_profile(
        canvas: Canvas,
        timeline: Timeline,
        params: &SimParams,
        profile: Profile,
        seed: u64,
    ) -> RingburstResult<Self> {
        Self::build(
            canvas,
            timeline,
            params,
            profile,
            seed,
            Pcg32::seed_from_u64(seed),
        )
    }

    fn build(
        canvas: Canvas,
        timeline: Timeline,
        params: &SimParams,
        profile: Profile,
        seed: u64,
        rng: Pcg32,
    ) -> RingburstResult<Self> {
        let renderer = CpuRenderer::new(canvas)?;
        let scene = Scene::new(canvas, params, profile, rng)?;
        tracing::info!(
            seed,
            width = canvas.width,
            height = canvas.height,
            fps = timeline.fps,
            frames = timeline.frame_count(),
            "overlay session ready"
        );
        Ok(Self {
            scene,
            renderer,
            timeline,
            seed,
            next_frame: 0,
            bounces: 0,
        })
    }

    /// Seed driving every random choice of this session.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The frozen visual profile.
    pub fn profile(&self) -> Profile {
        self.scene.profile
    }

    /// Output timeline.
    pub fn timeline(&self) -> Timeline {
        self.timeline
    }

    /// Current scene state.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    fn advance(&mut self) {
        let report = step(&mut self.scene, self.timeline.frame_dt());
        self.bounces += u64::from(report.bounces);
        self.next_frame += 1;
    }

    fn stats(&self, frames_rendered: u64) -> RenderStats {
        RenderStats {
            frames_total: self.timeline.frame_count(),
            frames_rendered,
            waves: self.scene.wave,
            rings_consumed: self.scene.rings_consumed,
            bounces: self.bounces,
        }
    }

    /// Stream the whole timeline into `sink`: for every frame, step the physics, render and push.
    ///
    /// `sink.end()` is only called after the last frame was accepted; on error the sink is left to
    /// its owner, whose drop handles cleanup.
    #[tracing::instrument(
        level = "info",
        skip_all,
        fields(seed = self.seed, frames = self.timeline.frame_count())
    )]
    pub fn render_to_sink(&mut self, sink: &mut dyn FrameSink) -> RingburstResult<RenderStats> {
        if self.next_frame != 0 {
            return Err(RingburstError::validation(
                "overlay session already advanced; sessions render once",
            ));
        }
        let canvas = self.renderer.canvas();
        let frame_count = self.timeline.frame_count();
        sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps: self.timeline.fps,
            frame_count,
        })?;

        let mut frame = FrameRGBA::transparent(canvas);
        for i in 0..frame_count {
            self.advance();
            self.renderer.render_into(&self.scene, &mut frame)?;
            sink.push_frame(FrameIndex(i), &frame)?;
            tracing::trace!(frame = i, wave = self.scene.wave, "frame pushed");
        }
        sink.end()?;

        let stats = self.stats(frame_count);
        tracing::info!(
            frames = stats.frames_rendered,
            waves = stats.waves,
            rings_consumed = stats.rings_consumed,
            bounces = stats.bounces,
            "overlay render finished"
        );
        Ok(stats)
    }

    /// Simulate up to and including `idx` and render that single frame.
    ///
    /// The result equals frame `idx` of [`OverlaySession::render_to_sink`] for the same seed.
    pub fn render_snapshot(&mut self, idx: FrameIndex) -> RingburstResult<FrameRGBA> {
        let total = self.timeline.frame_count();
        if idx.0 >= total {
            return Err(RingburstError::validation(format!(
                "snapshot frame {} is outside the timeline ({} frames)",
                idx.0, total
            )));
        }
        if idx.0 < self.next_frame {
            return Err(RingburstError::validation(format!(
                "snapshot frame {} was already simulated past",
                idx.0
            )));
        }
        while self.next_frame <= idx.0 {
            self.advance();
        }
        let mut frame = FrameRGBA::transparent(self.renderer.canvas());
        self.renderer.render_into(&self.scene, &mut frame)?;
        Ok(frame)
    }

    /// Statistics for the frames simulated so far.
    pub fn stats_so_far(&self) -> RenderStats {
        self.stats(self.next_frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/overlay.rs"]
mod tests;
