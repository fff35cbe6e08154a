use super::*;

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 640,
        height: 360,
        fps: 30,
        frame_count: 90,
    }
}

fn strings(args: &[OsString]) -> Vec<String> {
    args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ringburst-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn filter_applies_opacity_then_overlays() {
    assert_eq!(
        overlay_filter(0.7),
        "[1:v]format=rgba,colorchannelmixer=aa=0.7[ov];\
         [0:v][ov]overlay=0:0:shortest=1,format=yuv420p[out]"
    );
}

#[test]
fn args_read_source_first_then_raw_stdin() {
    let args = strings(&overlay_args(
        Path::new("in.mp4"),
        Path::new("out.mp4"),
        &cfg(),
        &EncodeOpts::default(),
    ));
    assert_eq!(args[0], "-y");
    assert_eq!(&args[1..5], ["-loglevel", "error", "-i", "in.mp4"]);

    let pipe = args.iter().position(|a| a == "pipe:0").unwrap();
    assert_eq!(
        &args[5..pipe + 1],
        ["-f", "rawvideo", "-pix_fmt", "rgba", "-s", "640x360", "-r", "30", "-i", "pipe:0"]
    );
    let tail = &args[pipe + 1..];
    assert_eq!(tail[0], "-filter_complex");
    assert!(tail.windows(2).any(|w| w == ["-map", "[out]"]));
    assert!(tail.windows(2).any(|w| w == ["-map", "0:a?"]));
    assert!(tail.windows(2).any(|w| w == ["-preset", "fast"]));
    assert!(tail.windows(2).any(|w| w == ["-crf", "18"]));
    assert!(tail.windows(2).any(|w| w == ["-c:a", "copy"]));
    assert!(tail.windows(2).any(|w| w == ["-movflags", "+faststart"]));
    assert_eq!(args.last().map(String::as_str), Some("out.mp4"));
}

#[test]
fn args_follow_options() {
    let opts = EncodeOpts {
        opacity: 0.25,
        crf: 23,
        preset: "veryfast".to_owned(),
        overwrite: false,
    };
    let args = strings(&overlay_args(Path::new("a"), Path::new("b"), &cfg(), &opts));
    assert_eq!(args[0], "-n");
    assert!(args.iter().any(|a| a.contains("colorchannelmixer=aa=0.25")));
    assert!(args.windows(2).any(|w| w == ["-crf", "23"]));
    assert!(args.windows(2).any(|w| w == ["-preset", "veryfast"]));
}

#[test]
fn opts_validation() {
    assert!(EncodeOpts::default().validate().is_ok());
    for opacity in [-0.1, 1.01, f64::NAN] {
        let o = EncodeOpts {
            opacity,
            ..EncodeOpts::default()
        };
        assert!(matches!(o.validate(), Err(RingburstError::Validation(_))));
    }
    for opacity in [0.0, 1.0] {
        let o = EncodeOpts {
            opacity,
            ..EncodeOpts::default()
        };
        assert!(o.validate().is_ok());
    }
    let o = EncodeOpts {
        crf: 52,
        ..EncodeOpts::default()
    };
    assert!(o.validate().is_err());
    let o = EncodeOpts {
        preset: "warp".to_owned(),
        ..EncodeOpts::default()
    };
    assert!(o.validate().is_err());
    assert!(FfmpegOverlaySink::new("a", "b", o).is_err());
}

#[test]
fn missing_input_fails_before_spawning() {
    let dir = scratch_dir("missing-input");
    let mut sink =
        FfmpegOverlaySink::new(dir.join("nope.mp4"), dir.join("out.mp4"), EncodeOpts::default())
            .unwrap();
    let err = sink.begin(cfg()).unwrap_err();
    assert!(matches!(err, RingburstError::Encoder(_)));
    let frame = FrameRGBA::transparent(cfg().canvas().unwrap());
    assert!(sink.push_frame(FrameIndex(0), &frame).is_err());
}

#[test]
fn existing_output_is_kept_without_overwrite() {
    let dir = scratch_dir("no-overwrite");
    std::fs::create_dir_all(&dir).unwrap();
    let input = dir.join("in.mp4");
    let output = dir.join("out.mp4");
    std::fs::write(&input, b"x").unwrap();
    std::fs::write(&output, b"keep").unwrap();

    let opts = EncodeOpts {
        overwrite: false,
        ..EncodeOpts::default()
    };
    let mut sink = FfmpegOverlaySink::new(&input, &output, opts).unwrap();
    let err = sink.begin(cfg()).unwrap_err();
    assert!(matches!(err, RingburstError::Validation(_)));
    assert_eq!(std::fs::read(&output).unwrap(), b"keep");
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn ensure_parent_dir_creates_nested_dirs() {
    let dir = scratch_dir("parent");
    let target = dir.join("a").join("b").join("out.mp4");
    ensure_parent_dir(&target).unwrap();
    assert!(dir.join("a").join("b").is_dir());
    ensure_parent_dir(Path::new("bare.mp4")).unwrap();
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn end_without_begin_is_an_error() {
    let mut sink = FfmpegOverlaySink::new("a", "b", EncodeOpts::default()).unwrap();
    assert!(matches!(sink.end(), Err(RingburstError::Encoder(_))));
}

#[test]
fn stderr_drain_reads_past_invalid_utf8() {
    let lines = drain_lines(&b"caf\xe9 metadata\r\nError: real diagnostic\nno newline"[..]);
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("caf"));
    assert_eq!(lines[1], "Error: real diagnostic");
    assert_eq!(lines[2], "no newline");
}

fn tiny_cfg(frame_count: u64) -> SinkConfig {
    SinkConfig {
        width: 4,
        height: 2,
        fps: 10,
        frame_count,
    }
}

/// Shell script standing in for `ffmpeg`: answers `-version`, binds `$out` to the last argument
/// and then runs `body`.
#[cfg(unix)]
fn stub_encoder(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt as _;

    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join("fake-ffmpeg");
    let script = format!(
        "#!/bin/sh\n\
         if [ \"$1\" = \"-version\" ]; then exit 0; fi\n\
         for a in \"$@\"; do out=\"$a\"; done\n\
         {body}\n"
    );
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(unix)]
fn stub_sink(dir: &Path, body: &str) -> FfmpegOverlaySink {
    let program = stub_encoder(dir, body);
    let input = dir.join("in.mp4");
    std::fs::write(&input, b"x").unwrap();
    FfmpegOverlaySink::new(input, dir.join("out").join("out.mp4"), EncodeOpts::default())
        .unwrap()
        .with_program(program)
}

#[cfg(unix)]
#[test]
fn frames_reach_the_encoder_as_straight_rgba() {
    let dir = scratch_dir("stub-ok");
    let mut sink = stub_sink(&dir, "cat > \"$out\"");
    let cfg = tiny_cfg(3);
    sink.begin(cfg).unwrap();

    let mut frame = FrameRGBA::transparent(cfg.canvas().unwrap());
    frame.data[..4].copy_from_slice(&[64, 0, 0, 128]);
    for i in 0..3 {
        sink.push_frame(FrameIndex(i), &frame).unwrap();
    }
    sink.end().unwrap();

    let written = std::fs::read(sink.output()).unwrap();
    assert_eq!(written.len(), 3 * 4 * 2 * 4);
    assert_eq!(&written[..4], &[128, 0, 0, 128]);
    assert!(written[4..32].iter().all(|&b| b == 0));
    let _ = std::fs::remove_dir_all(&dir);
}

#[cfg(unix)]
#[test]
fn failing_encoder_reports_its_stderr_and_leaves_no_output() {
    let dir = scratch_dir("stub-fail");
    let mut sink = stub_sink(
        &dir,
        "cat > /dev/null\n\
         echo partial > \"$out\"\n\
         printf 'caf\\351 metadata\\n' >&2\n\
         echo 'Error: diagnostic after latin-1 byte' >&2\n\
         exit 1",
    );
    let cfg = tiny_cfg(2);
    sink.begin(cfg).unwrap();
    let frame = FrameRGBA::transparent(cfg.canvas().unwrap());
    sink.push_frame(FrameIndex(0), &frame).unwrap();
    sink.push_frame(FrameIndex(1), &frame).unwrap();

    let err = sink.end().unwrap_err();
    let msg = err.to_string();
    assert!(matches!(err, RingburstError::Encoder(_)));
    assert!(msg.contains("Error: diagnostic after latin-1 byte"), "{msg}");
    assert!(!sink.output().exists());
    let _ = std::fs::remove_dir_all(&dir);
}

#[cfg(unix)]
#[test]
fn encoder_exiting_early_stops_streaming_and_removes_output() {
    let dir = scratch_dir("stub-early");
    let mut sink = stub_sink(
        &dir,
        "echo partial > \"$out\"\n\
         echo 'Error: gave up early' >&2\n\
         exit 3",
    );
    let cfg = tiny_cfg(10_000);
    sink.begin(cfg).unwrap();
    let frame = FrameRGBA::transparent(cfg.canvas().unwrap());

    let mut failure = None;
    for i in 0..cfg.frame_count {
        if let Err(e) = sink.push_frame(FrameIndex(i), &frame) {
            failure = Some(e);
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(2));
    }
    let err = failure.expect("streaming into an exited encoder must fail");
    let msg = err.to_string();
    assert!(matches!(err, RingburstError::Encoder(_)));
    assert!(msg.contains("gave up early"), "{msg}");
    assert!(!sink.output().exists());
    assert!(sink.push_frame(FrameIndex(cfg.frame_count), &frame).is_err());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_encoder_program_fails_before_spawning() {
    let dir = scratch_dir("no-program");
    std::fs::create_dir_all(&dir).unwrap();
    let input = dir.join("in.mp4");
    std::fs::write(&input, b"x").unwrap();
    let mut sink = FfmpegOverlaySink::new(&input, dir.join("out.mp4"), EncodeOpts::default())
        .unwrap()
        .with_program(dir.join("no-such-encoder"));

    let err = sink.begin(tiny_cfg(1)).unwrap_err();
    assert!(matches!(err, RingburstError::Encoder(_)));
    assert!(err.to_string().contains("not found on PATH"));
    assert!(!dir.join("out.mp4").exists());
    let _ = std::fs::remove_dir_all(&dir);
}
