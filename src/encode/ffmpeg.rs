use std::ffi::{OsStr, OsString};
use std::io::{BufRead, BufReader, Read, Write as _};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{RingburstError, RingburstResult};
use crate::render::backend::FrameRGBA;

/// x264 presets accepted by [`EncodeOpts::preset`].
pub const X264_PRESETS: [&str; 10] = [
    "ultrafast",
    "superfast",
    "veryfast",
    "faster",
    "fast",
    "medium",
    "slow",
    "slower",
    "veryslow",
    "placebo",
];

/// Encoder options for [`FfmpegOverlaySink`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodeOpts {
    /// Overlay opacity in `[0, 1]`, applied to the overlay alpha channel.
    pub opacity: f64,
    /// x264 constant rate factor, `0..=51`.
    pub crf: u8,
    /// x264 preset name.
    pub preset: String,
    /// Overwrite the output file if it already exists.
    pub overwrite: bool,
}

impl Default for EncodeOpts {
    fn default() -> Self {
        Self {
            opacity: 0.7,
            crf: 18,
            preset: "fast".to_owned(),
            overwrite: true,
        }
    }
}

impl EncodeOpts {
    /// Reject options ffmpeg would choke on.
    pub fn validate(&self) -> RingburstResult<()> {
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(RingburstError::validation(format!(
                "opacity must be within [0, 1], got {}",
                self.opacity
            )));
        }
        if self.crf > 51 {
            return Err(RingburstError::validation(format!(
                "crf must be within 0..=51, got {}",
                self.crf
            )));
        }
        if !X264_PRESETS.contains(&self.preset.as_str()) {
            return Err(RingburstError::validation(format!(
                "unknown x264 preset '{}'",
                self.preset
            )));
        }
        Ok(())
    }
}

/// Filter graph that fades the overlay by `opacity` and composites it over the source video.
pub fn overlay_filter(opacity: f64) -> String {
    format!(
        "[1:v]format=rgba,colorchannelmixer=aa={opacity}[ov];\
         [0:v][ov]overlay=0:0:shortest=1,format=yuv420p[out]"
    )
}

/// Full `ffmpeg` argument list for compositing a raw RGBA stream on stdin over `input`.
pub fn overlay_args(
    input: &Path,
    output: &Path,
    cfg: &SinkConfig,
    opts: &EncodeOpts,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = Vec::with_capacity(40);
    let mut push = |s: &str| args.push(OsString::from(s));
    push(if opts.overwrite { "-y" } else { "-n" });
    push("-loglevel");
    push("error");
    push("-i");
    args.push(input.as_os_str().to_owned());

    let size = format!("{}x{}", cfg.width, cfg.height);
    let fps = cfg.fps.to_string();
    let filter = overlay_filter(opts.opacity);
    let crf = opts.crf.to_string();
    args.extend(
        [
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &size,
            "-r",
            &fps,
            "-i",
            "pipe:0",
            "-filter_complex",
            &filter,
            "-map",
            "[out]",
            "-map",
            "0:a?",
            "-c:v",
            "libx264",
            "-preset",
            &opts.preset,
            "-crf",
            &crf,
            "-c:a",
            "copy",
            "-movflags",
            "+faststart",
        ]
        .into_iter()
        .map(OsString::from),
    );
    args.push(output.as_os_str().to_owned());
    args
}

/// Sink that spawns the system `ffmpeg`, streams straight-alpha RGBA frames into its stdin and
/// lets it composite them over the source clip.
///
/// Writes block while the pipe is full, so rendering never runs ahead of the encoder by more than
/// the OS pipe buffer. Dropping an unfinished sink kills the encoder and removes the partial
/// output.
pub struct FfmpegOverlaySink {
    program: OsString,
    input: PathBuf,
    output: PathBuf,
    opts: EncodeOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<JoinHandle<Vec<String>>>,

    scratch: Vec<u8>,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl std::fmt::Debug for FfmpegOverlaySink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FfmpegOverlaySink")
            .field("program", &self.program)
            .field("input", &self.input)
            .field("output", &self.output)
            .field("opts", &self.opts)
            .field("running", &self.child.is_some())
            .finish_non_exhaustive()
    }
}

impl FfmpegOverlaySink {
    /// Create a sink compositing onto `input` and writing `output`.
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        opts: EncodeOpts,
    ) -> RingburstResult<Self> {
        opts.validate()?;
        Ok(Self {
            program: OsString::from("ffmpeg"),
            input: input.into(),
            output: output.into(),
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            scratch: Vec::new(),
            cfg: None,
            last_idx: None,
        })
    }

    /// Run `program` instead of the `ffmpeg` found on PATH.
    ///
    /// It is invoked with the same arguments as [`overlay_args`] builds.
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    /// Output path.
    pub fn output(&self) -> &Path {
        &self.output
    }

    fn collect_stderr(&mut self) -> String {
        match self.stderr_drain.take() {
            Some(handle) => match handle.join() {
                Ok(lines) => lines.join("\n"),
                Err(_) => "ffmpeg stderr drain thread panicked".to_owned(),
            },
            None => String::new(),
        }
    }

    /// Tear the encoder down after a failure and build the error to report.
    fn abort(&mut self, what: impl std::fmt::Display) -> RingburstError {
        drop(self.stdin.take());
        let status = self.child.take().map(|mut child| {
            let _ = child.kill();
            child.wait()
        });
        let stderr = self.collect_stderr();
        self.cfg = None;
        self.remove_partial_output();

        let status = match status {
            Some(Ok(s)) => format!(" ({s})"),
            _ => String::new(),
        };
        RingburstError::encoder(format!("{what}{status}: {}", stderr.trim()))
    }

    fn remove_partial_output(&self) {
        if self.output.exists() {
            match std::fs::remove_file(&self.output) {
                Ok(()) => tracing::debug!(path = %self.output.display(), "removed partial output"),
                Err(e) => tracing::warn!(
                    path = %self.output.display(),
                    error = %e,
                    "failed to remove partial output"
                ),
            }
        }
    }
}

impl FrameSink for FfmpegOverlaySink {
    fn begin(&mut self, cfg: SinkConfig) -> RingburstResult<()> {
        if self.child.is_some() {
            return Err(RingburstError::encoder("ffmpeg sink already started"));
        }
        if cfg.fps == 0 {
            return Err(RingburstError::validation("fps must be non-zero"));
        }
        cfg.canvas()?;
        if !self.input.is_file() {
            return Err(RingburstError::encoder(format!(
                "input video '{}' does not exist",
                self.input.display()
            )));
        }

        ensure_parent_dir(&self.output)?;
        if !self.opts.overwrite && self.output.exists() {
            return Err(RingburstError::validation(format!(
                "output file '{}' already exists",
                self.output.display()
            )));
        }
        if !is_on_path(&self.program) {
            return Err(RingburstError::encoder(format!(
                "{} is required for encoding, but was not found on PATH",
                self.program.to_string_lossy()
            )));
        }

        let args = overlay_args(&self.input, &self.output, &cfg, &self.opts);
        tracing::debug!(?args, "spawning ffmpeg");
        let mut child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                RingburstError::encoder(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| RingburstError::encoder("failed to open ffmpeg stdin"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| RingburstError::encoder("failed to open ffmpeg stderr"))?;
        let stderr_drain = std::thread::spawn(move || drain_lines(stderr));

        self.scratch = Vec::with_capacity((cfg.width as usize) * (cfg.height as usize) * 4);
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> RingburstResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| RingburstError::encoder("ffmpeg sink not started"))?;
        cfg.check_frame(frame)?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(RingburstError::encoder(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        let exited = match self.child.as_mut().map(Child::try_wait) {
            Some(Ok(Some(status))) => Some(format!("ffmpeg exited early with {status}")),
            Some(Ok(None)) => None,
            Some(Err(e)) => Some(format!("failed to poll ffmpeg: {e}")),
            None => Some("ffmpeg sink is already finalized".to_owned()),
        };
        if let Some(what) = exited {
            return Err(self.abort(what));
        }

        frame.write_straight_rgba(&mut self.scratch);
        let write = match self.stdin.as_mut() {
            Some(stdin) => stdin.write_all(&self.scratch),
            None => return Err(self.abort("ffmpeg stdin is closed")),
        };
        if let Err(e) = write {
            return Err(self.abort(format!("failed to write frame {} to ffmpeg: {e}", idx.0)));
        }
        tracing::trace!(frame = idx.0, "frame written to encoder");
        Ok(())
    }

    fn end(&mut self) -> RingburstResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| RingburstError::encoder("ffmpeg sink not started"))?;

        let status = child.wait();
        let stderr = self.collect_stderr();
        self.cfg = None;
        let status = match status {
            Ok(s) => s,
            Err(e) => {
                self.remove_partial_output();
                return Err(RingburstError::encoder(format!(
                    "failed to wait for ffmpeg to finish: {e}"
                )));
            }
        };
        if !status.success() {
            self.remove_partial_output();
            return Err(RingburstError::encoder(format!(
                "ffmpeg exited with status {status}: {}",
                stderr.trim()
            )));
        }
        tracing::info!(output = %self.output.display(), "encoder finished");
        Ok(())
    }
}

impl Drop for FfmpegOverlaySink {
    fn drop(&mut self) {
        if self.child.is_some() {
            tracing::warn!("ffmpeg sink dropped before end; killing encoder");
            let _ = self.abort("sink dropped");
        }
    }
}

/// Read `stderr` until EOF, logging every line.
///
/// Bytes that are not UTF-8 are replaced, so the pipe stays drained for the whole encoder run.
fn drain_lines(stderr: impl Read) -> Vec<String> {
    let mut reader = BufReader::new(stderr);
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf)
                    .trim_end_matches(['\r', '\n'])
                    .to_owned();
                tracing::debug!(target: "ringburst::ffmpeg", "{line}");
                lines.push(line);
            }
            Err(e) => {
                tracing::warn!(error = %e, "reading ffmpeg stderr failed");
                break;
            }
        }
    }
    lines
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> RingburstResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `program -version` can be invoked from `PATH`.
pub fn is_on_path(program: impl AsRef<OsStr>) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
