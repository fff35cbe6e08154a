use std::path::Path;
use std::process::Command;

use crate::foundation::core::{Canvas, Timeline};
use crate::foundation::error::{RingburstError, RingburstResult};

/// What the frame loop needs to know about the source clip.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct VideoProbe {
    /// Width of the first video stream.
    pub width: u32,
    /// Height of the first video stream.
    pub height: u32,
    /// Frame rate rounded to the nearest integer.
    pub fps: u32,
    /// Clip duration in seconds.
    pub duration_sec: f64,
    /// Whether the clip carries at least one audio stream.
    pub has_audio: bool,
}

impl VideoProbe {
    /// Overlay canvas matching the clip.
    pub fn canvas(&self) -> RingburstResult<Canvas> {
        Canvas::new(self.width, self.height)
    }

    /// Output timeline matching the clip.
    pub fn timeline(&self) -> RingburstResult<Timeline> {
        Timeline::new(self.fps, self.duration_sec)
    }
}

#[derive(serde::Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(serde::Deserialize)]
struct ProbeOut {
    #[serde(default)]
    streams: Vec<ProbeStream>,
    format: Option<ProbeFormat>,
}

/// Run `ffprobe` on `path` and extract dimensions, frame rate, duration and audio presence.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn probe_video(path: &Path) -> RingburstResult<VideoProbe> {
    if !path.is_file() {
        return Err(RingburstError::probe(format!(
            "input video '{}' does not exist",
            path.display()
        )));
    }
    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(path)
        .output()
        .map_err(|e| {
            RingburstError::probe(format!(
                "failed to run ffprobe (is it installed and on PATH?): {e}"
            ))
        })?;
    if !out.status.success() {
        return Err(RingburstError::probe(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let probe = parse_probe_json(&out.stdout)?;
    tracing::info!(
        width = probe.width,
        height = probe.height,
        fps = probe.fps,
        duration_sec = probe.duration_sec,
        has_audio = probe.has_audio,
        "probed source video"
    );
    Ok(probe)
}

/// Parse `ffprobe -print_format json -show_streams -show_format` output.
pub fn parse_probe_json(bytes: &[u8]) -> RingburstResult<VideoProbe> {
    let parsed: ProbeOut = serde_json::from_slice(bytes)
        .map_err(|e| RingburstError::probe(format!("ffprobe json parse failed: {e}")))?;
    let video = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| RingburstError::probe("no video stream found"))?;
    let width = video
        .width
        .filter(|&w| w > 0)
        .ok_or_else(|| RingburstError::probe("missing video width from ffprobe"))?;
    let height = video
        .height
        .filter(|&h| h > 0)
        .ok_or_else(|| RingburstError::probe("missing video height from ffprobe"))?;

    let rate = [video.r_frame_rate.as_deref(), video.avg_frame_rate.as_deref()]
        .into_iter()
        .flatten()
        .filter_map(parse_ff_ratio)
        .find(|r| *r > 0.0)
        .ok_or_else(|| RingburstError::probe("invalid video frame rate"))?;
    let fps = rate.round().max(1.0) as u32;

    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_deref())
        .or(video.duration.as_deref())
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| RingburstError::probe("missing or invalid duration from ffprobe"))?;
    let has_audio = parsed
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    Ok(VideoProbe {
        width,
        height,
        fps,
        duration_sec,
        has_audio,
    })
}

/// Parse an ffmpeg rational such as `30000/1001` (or a plain number) into a value.
pub fn parse_ff_ratio(s: &str) -> Option<f64> {
    let s = s.trim();
    let value = match s.split_once('/') {
        Some((num, den)) => {
            let num = num.trim().parse::<f64>().ok()?;
            let den = den.trim().parse::<f64>().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => s.parse::<f64>().ok()?,
    };
    value.is_finite().then_some(value)
}

#[cfg(test)]
#[path = "../../tests/unit/media/probe.rs"]
mod tests;
