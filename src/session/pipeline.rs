use std::path::{Path, PathBuf};

use crate::config::params::SimParams;
use crate::encode::ffmpeg::{EncodeOpts, FfmpegOverlaySink};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::RingburstResult;
use crate::media::probe::{VideoProbe, probe_video};
use crate::session::overlay::{OverlaySession, RenderStats};

/// Everything needed to turn one source clip into one composited clip.
#[derive(Clone, Debug)]
pub struct OverlayJob {
    /// Source video.
    pub input: PathBuf,
    /// Destination MP4.
    pub output: PathBuf,
    /// Simulation parameters for the 480px reference canvas.
    pub params: SimParams,
    /// Fixed seed, or `None` for a fresh random run.
    pub seed: Option<u64>,
    /// Encoder options.
    pub encode: EncodeOpts,
}

impl OverlayJob {
    /// Job with default parameters and encoder options.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            params: SimParams::default(),
            seed: None,
            encode: EncodeOpts::default(),
        }
    }
}

/// Probe `input` and build a session sized and timed to match it.
pub fn session_for_video(
    input: &Path,
    params: &SimParams,
    seed: Option<u64>,
) -> RingburstResult<(VideoProbe, OverlaySession)> {
    let probe = probe_video(input)?;
    let session = OverlaySession::new(probe.canvas()?, probe.timeline()?, params, seed)?;
    Ok((probe, session))
}

/// Probe the source, simulate and render the overlay, and let `ffmpeg` composite it.
///
/// Any probe or encoder failure aborts the run before or during streaming; a partially written
/// output file is removed.
pub fn render_overlay_video(job: &OverlayJob) -> RingburstResult<RenderStats> {
    job.params.validate()?;
    job.encode.validate()?;
    let (_, mut session) = session_for_video(&job.input, &job.params, job.seed)?;
    let mut sink = FfmpegOverlaySink::new(&job.input, &job.output, job.encode.clone())?;
    session.render_to_sink(&mut sink)
}

/// Probe the source and render a single overlay frame as straight-alpha RGBA8 bytes.
pub fn render_overlay_snapshot(
    input: &Path,
    params: &SimParams,
    seed: Option<u64>,
    frame: FrameIndex,
) -> RingburstResult<(u32, u32, Vec<u8>)> {
    let (probe, mut session) = session_for_video(input, params, seed)?;
    let rgba = session.render_snapshot(frame)?;
    let mut straight = Vec::new();
    rgba.write_straight_rgba(&mut straight);
    Ok((probe.width, probe.height, straight))
}
