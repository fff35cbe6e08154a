use super::*;

const SAMPLE: &str = r#"{
  "streams": [
    {
      "index": 0,
      "codec_type": "video",
      "width": 1080,
      "height": 1920,
      "r_frame_rate": "30000/1001",
      "avg_frame_rate": "30000/1001",
      "duration": "12.012000"
    },
    {
      "index": 1,
      "codec_type": "audio",
      "sample_rate": "48000"
    }
  ],
  "format": {
    "filename": "clip.mp4",
    "duration": "12.034000"
  }
}"#;

#[test]
fn parses_first_video_stream_and_format_duration() {
    let p = parse_probe_json(SAMPLE.as_bytes()).unwrap();
    assert_eq!(p.width, 1080);
    assert_eq!(p.height, 1920);
    assert_eq!(p.fps, 30);
    assert!((p.duration_sec - 12.034).abs() < 1e-9);
    assert!(p.has_audio);
    assert_eq!(p.timeline().unwrap().frame_count(), 362);
}

#[test]
fn falls_back_to_avg_rate_and_stream_duration() {
    let json = r#"{
      "streams": [
        {"codec_type": "video", "width": 640, "height": 480,
         "r_frame_rate": "0/0", "avg_frame_rate": "25/1", "duration": "4.5"}
      ],
      "format": {}
    }"#;
    let p = parse_probe_json(json.as_bytes()).unwrap();
    assert_eq!(p.fps, 25);
    assert!((p.duration_sec - 4.5).abs() < 1e-12);
    assert!(!p.has_audio);
}

#[test]
fn fractional_rates_round_to_nearest() {
    let json = |rate: &str| {
        format!(
            r#"{{"streams":[{{"codec_type":"video","width":2,"height":2,"r_frame_rate":"{rate}"}}],
               "format":{{"duration":"1.0"}}}}"#
        )
    };
    assert_eq!(parse_probe_json(json("24000/1001").as_bytes()).unwrap().fps, 24);
    assert_eq!(parse_probe_json(json("60000/1001").as_bytes()).unwrap().fps, 60);
    assert_eq!(parse_probe_json(json("12.5").as_bytes()).unwrap().fps, 13);
}

#[test]
fn errors_are_probe_errors() {
    let cases = [
        "not json",
        r#"{"streams":[{"codec_type":"audio"}],"format":{"duration":"1"}}"#,
        r#"{"streams":[{"codec_type":"video","height":2,"r_frame_rate":"30/1"}],"format":{"duration":"1"}}"#,
        r#"{"streams":[{"codec_type":"video","width":2,"height":2}],"format":{"duration":"1"}}"#,
        r#"{"streams":[{"codec_type":"video","width":2,"height":2,"r_frame_rate":"30/1"}]}"#,
    ];
    for c in cases {
        let err = parse_probe_json(c.as_bytes()).unwrap_err();
        assert!(matches!(err, RingburstError::Probe(_)), "{c}: {err}");
        assert!(err.to_string().starts_with("probe error: "));
    }
}

#[test]
fn ratio_parsing() {
    assert_eq!(parse_ff_ratio("30/1"), Some(30.0));
    assert_eq!(parse_ff_ratio(" 25 "), Some(25.0));
    assert_eq!(parse_ff_ratio("1/0"), None);
    assert_eq!(parse_ff_ratio("abc"), None);
}

#[test]
fn missing_file_is_a_probe_error() {
    let err = probe_video(Path::new("/definitely/not/here.mp4")).unwrap_err();
    assert!(matches!(err, RingburstError::Probe(_)));
}
