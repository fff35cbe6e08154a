//! ringburst renders a rotating-rings overlay with a bouncing, ring-destroying ball and streams it
//! into `ffmpeg`, which composites it onto an existing clip.
//!
//! The flow of one run:
//!
//! - Probe the source clip ([`probe_video`])
//! - Create an [`OverlaySession`]: a random (or seeded) [`Profile`] plus a [`Scene`]
//! - Stream every frame through the physics [`step`], the [`CpuRenderer`] and a [`FrameSink`]
//!
//! [`render_overlay_video`] does all of the above for a single [`OverlayJob`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod encode;
mod foundation;
mod media;
mod physics;
mod render;
mod scene;
mod session;

pub use crate::foundation::core::{Affine, Canvas, FrameIndex, Point, Rgba8, Timeline, Vec2};
pub use crate::foundation::error::{RingburstError, RingburstResult};

pub use crate::config::palette::ColorScheme;
pub use crate::config::params::{REFERENCE_SIDE_PX, SimParams};
pub use crate::config::profile::Profile;
pub use crate::encode::ffmpeg::{
    EncodeOpts, FfmpegOverlaySink, X264_PRESETS, ensure_parent_dir, is_on_path, overlay_args,
    overlay_filter,
};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::media::probe::{VideoProbe, parse_ff_ratio, parse_probe_json, probe_video};
pub use crate::physics::collision::{RingContact, solid_arc_threshold, test_ring};
pub use crate::physics::step::{StepReport, reflect_velocity, rescale_after_bounce, step};
pub use crate::render::backend::{FrameRGBA, SceneRenderer};
pub use crate::render::cpu::CpuRenderer;
pub use crate::scene::ball::{Ball, BallLook, BallStyle};
pub use crate::scene::particles::{
    Debris, DebrisShape, DestructionEffect, Flash, Fragment, ParticlePools, Shockwave, Sparkle,
};
pub use crate::scene::ring::{Ring, RingLayout};
pub use crate::scene::state::Scene;
pub use crate::session::overlay::{OverlaySession, RenderStats};
pub use crate::session::pipeline::{
    OverlayJob, render_overlay_snapshot, render_overlay_video, session_for_video,
};
