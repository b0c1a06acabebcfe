use super::*;

#[test]
fn size_output_parsing() {
    assert_eq!(
        parse_probe_size("1080,1920\n").unwrap(),
        Canvas {
            width: 1080,
            height: 1920
        }
    );
    assert!(parse_probe_size("").is_err());
    assert!(parse_probe_size("N/A,N/A").is_err());
    assert!(parse_probe_size("0,1920").is_err());
}

#[test]
fn fractional_rates_truncate_to_integer_fps() {
    let t = parse_probe_timing("r_frame_rate=30000/1001\nnb_frames=300\nduration=10.010000\n")
        .unwrap();
    assert!((t.frame_rate - 29.97).abs() < 1e-3);
    assert_eq!(t.fps().unwrap().get(), 29);
    // 300 frames at 29.97 fps is 10.01s; at 29 fps that is 290.29 frames.
    assert_eq!(t.duration_in_frames().unwrap(), 290);
}

#[test]
fn whole_rates_keep_their_frame_count() {
    let t = parse_probe_timing("r_frame_rate=30/1\nnb_frames=450\nduration=15.0\n").unwrap();
    assert_eq!(t.fps().unwrap().get(), 30);
    assert_eq!(t.duration_in_frames().unwrap(), 450);
}

#[test]
fn container_duration_is_used_without_a_frame_count() {
    let t = parse_probe_timing("r_frame_rate=25/1\nnb_frames=N/A\nduration=2.5\n").unwrap();
    assert_eq!(t.frame_count, None);
    assert_eq!(t.duration_in_frames().unwrap(), 62);
}

#[test]
fn unusable_timing_is_rejected() {
    assert!(parse_probe_timing("").is_err());
    assert!(parse_probe_timing("r_frame_rate=0/0\nduration=3.0\n").is_err());
    assert!(parse_probe_timing("r_frame_rate=1/2\nduration=3.0\n").is_err());

    let no_length = parse_probe_timing("r_frame_rate=24/1\nnb_frames=N/A\nduration=N/A\n").unwrap();
    assert!(no_length.duration_in_frames().is_err());
}

#[test]
fn probes_a_generated_clip_when_ffprobe_is_available() {
    if !is_ffprobe_on_path() || !crate::encode::ffmpeg::is_ffmpeg_on_path() {
        return;
    }
    let dir = std::env::temp_dir().join(format!("reelcap-probe-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let clip = dir.join("clip.mp4");
    let status = Command::new("ffmpeg")
        .args(["-y", "-loglevel", "error", "-f", "lavfi", "-i", "color=c=red:s=48x64:r=24:d=2"])
        .args(["-pix_fmt", "yuv420p"])
        .arg(&clip)
        .status()
        .unwrap();
    assert!(status.success());

    assert_eq!(
        probe_video_size(&clip).unwrap(),
        Canvas {
            width: 48,
            height: 64
        }
    );
    let timing = probe_video_timing(&clip).unwrap();
    assert_eq!(timing.fps().unwrap().get(), 24);
    assert_eq!(timing.duration_in_frames().unwrap(), 48);

    std::fs::remove_dir_all(&dir).unwrap();
}
