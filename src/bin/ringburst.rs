use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing::Level;

/// Render a rotating-rings overlay and composite it onto a video (requires `ffmpeg` and
/// `ffprobe` on PATH).
#[derive(Parser, Debug)]
#[command(name = "ringburst", version)]
struct Cli {
    /// Source video.
    input: PathBuf,

    /// Output MP4 path. Not needed with `--snapshot`.
    #[arg(required_unless_present = "snapshot")]
    output: Option<PathBuf>,

    /// Seed for the profile choice and the simulation. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Simulation parameters JSON (unset fields keep their defaults).
    #[arg(long)]
    params: Option<PathBuf>,

    /// Overlay opacity in [0, 1].
    #[arg(long, default_value_t = 0.7)]
    opacity: f64,

    /// x264 constant rate factor.
    #[arg(long, default_value_t = 18)]
    crf: u8,

    /// x264 preset.
    #[arg(long, default_value = "fast")]
    preset: String,

    /// Write a single overlay frame as PNG to this path instead of encoding the video.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Frame index (0-based) used with `--snapshot`.
    #[arg(long, default_value_t = 0, requires = "snapshot")]
    snapshot_frame: u64,

    /// More logging (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let params = match &cli.params {
        Some(path) => ringburst::SimParams::from_json_path(path)
            .with_context(|| format!("load params '{}'", path.display()))?,
        None => ringburst::SimParams::default(),
    };

    if let Some(png) = &cli.snapshot {
        return cmd_snapshot(&cli, &params, png);
    }

    let output = cli
        .output
        .clone()
        .ok_or_else(|| anyhow::anyhow!("missing OUTPUT path"))?;
    let job = ringburst::OverlayJob {
        input: cli.input.clone(),
        output,
        params,
        seed: cli.seed,
        encode: ringburst::EncodeOpts {
            opacity: cli.opacity,
            crf: cli.crf,
            preset: cli.preset.clone(),
            overwrite: true,
        },
    };
    let stats = ringburst::render_overlay_video(&job)
        .with_context(|| format!("render overlay onto '{}'", job.input.display()))?;

    eprintln!(
        "wrote {} ({} frames, {} waves, {} rings consumed)",
        job.output.display(),
        stats.frames_rendered,
        stats.waves,
        stats.rings_consumed
    );
    Ok(())
}

fn cmd_snapshot(
    cli: &Cli,
    params: &ringburst::SimParams,
    png: &std::path::Path,
) -> anyhow::Result<()> {
    let (width, height, rgba) = ringburst::render_overlay_snapshot(
        &cli.input,
        params,
        cli.seed,
        ringburst::FrameIndex(cli.snapshot_frame),
    )?;

    ringburst::ensure_parent_dir(png)?;
    image::save_buffer_with_format(
        png,
        &rgba,
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", png.display()))?;

    eprintln!("wrote {}", png.display());
    Ok(())
}
