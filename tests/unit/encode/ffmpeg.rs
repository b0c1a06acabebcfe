use super::*;

fn cfg(width: u32, height: u32, fps: u32) -> OverlayEncodeConfig {
    OverlayEncodeConfig {
        base_video: PathBuf::from("public/clip.mp4"),
        width,
        height,
        fps,
        codec: Codec::H264,
        out_path: PathBuf::from("out/clip.mp4"),
        overwrite: true,
    }
}

#[test]
fn config_validation_catches_bad_values() {
    assert!(cfg(0, 10, 30).validate().is_err());
    assert!(cfg(11, 10, 30).validate().is_err());
    assert!(cfg(10, 10, 0).validate().is_err());
    assert!(cfg(1080, 1920, 30).validate().is_ok());
}

#[test]
fn args_overlay_stdin_on_the_base_video() {
    let args: Vec<String> = cfg(1080, 1920, 24)
        .ffmpeg_args()
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();

    let pos = |needle: &str| args.iter().position(|a| a == needle).unwrap();
    assert_eq!(args[0], "-y");
    assert_eq!(args[pos("-s") + 1], "1080x1920");
    assert_eq!(args[pos("-r") + 1], "24");
    assert_eq!(args[pos("-c:v") + 1], "libx264");
    assert!(args.contains(&"[0:v][1:v]overlay=0:0:shortest=1[v]".to_string()));
    assert!(args.contains(&"0:a?".to_string()));
    // audio is cut with the video
    assert!(pos("-shortest") < args.len() - 1);
    // base video is input 0, the pipe is input 1
    assert!(pos("public/clip.mp4") < pos("pipe:0"));
    assert_eq!(args.last().unwrap(), "out/clip.mp4");
}

#[test]
fn h265_selects_libx265() {
    let c = OverlayEncodeConfig {
        codec: Codec::H265,
        ..cfg(2, 2, 1)
    };
    assert!(c.ffmpeg_args().iter().any(|a| a == "libx265"));
    assert_eq!(Codec::H265.to_string(), "h265");
}

fn ffmpeg_tools_available() -> bool {
    is_ffmpeg_on_path() && crate::encode::probe::is_ffprobe_on_path()
}

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("reelcap-encode-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// 32x32 blue clip at 10 fps with a sine audio track.
fn make_base(dir: &Path, secs: u32) -> PathBuf {
    let base = dir.join("base.mp4");
    let status = Command::new("ffmpeg")
        .args(["-y", "-loglevel", "error", "-f", "lavfi", "-i"])
        .arg(format!("color=c=blue:s=32x32:r=10:d={secs}"))
        .args(["-f", "lavfi", "-i"])
        .arg(format!("sine=frequency=440:duration={secs}"))
        .args(["-pix_fmt", "yuv420p", "-c:a", "aac", "-shortest"])
        .arg(&base)
        .status()
        .unwrap();
    assert!(status.success());
    base
}

fn output_secs(path: &Path) -> f64 {
    let out = Command::new("ffprobe")
        .args(["-v", "error", "-show_entries", "format=duration", "-of", "csv=p=0"])
        .arg(path)
        .output()
        .unwrap();
    String::from_utf8_lossy(&out.stdout).trim().parse().unwrap()
}

fn encode_blank(base: PathBuf, out: &Path, frames: i64) -> CaptionResult<u64> {
    let mut enc = FfmpegOverlayEncoder::new(OverlayEncodeConfig {
        base_video: base,
        out_path: out.to_path_buf(),
        ..cfg(32, 32, 10)
    })?;
    let frame = vec![0u8; 32 * 32 * 4];
    for i in 0..frames {
        enc.encode_frame(FrameIndex(i), &frame)?;
    }
    enc.finish()
}

#[test]
fn encodes_a_short_overlay_when_ffmpeg_is_available() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let dir = scratch("short");
    let base = dir.join("base.mp4");
    let status = Command::new("ffmpeg")
        .args(["-y", "-loglevel", "error", "-f", "lavfi", "-i", "color=c=blue:s=32x32:r=10:d=1"])
        .args(["-pix_fmt", "yuv420p"])
        .arg(&base)
        .status()
        .unwrap();
    assert!(status.success());

    let out = dir.join("out").join("captioned.mp4");
    let mut enc = FfmpegOverlayEncoder::new(OverlayEncodeConfig {
        base_video: base,
        out_path: out.clone(),
        ..cfg(32, 32, 10)
    })
    .unwrap();
    let frame = vec![0u8; 32 * 32 * 4];
    for i in 0..10 {
        enc.encode_frame(FrameIndex(i), &frame).unwrap();
    }
    assert!(enc.encode_frame(FrameIndex(3), &frame).is_err());
    assert_eq!(enc.finish().unwrap(), 10);
    assert!(out.exists());

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn overlay_shorter_than_base_cuts_video_and_audio() {
    if !ffmpeg_tools_available() {
        return;
    }
    let dir = scratch("cut");
    let base = make_base(&dir, 3);
    let out = dir.join("cut.mp4");

    assert_eq!(encode_blank(base, &out, 10).unwrap(), 10);
    let secs = output_secs(&out);
    assert!(secs < 1.5, "output lasts {secs}s, expected about 1s");

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn base_shorter_than_overlay_ends_cleanly_with_the_base() {
    if !ffmpeg_tools_available() {
        return;
    }
    let dir = scratch("early");
    let base = make_base(&dir, 1);
    let out = dir.join("early.mp4");

    // 60 overlay frames against a 10-frame base: ffmpeg stops reading early.
    let written = encode_blank(base, &out, 60).unwrap();
    assert!(written <= 60);
    let secs = output_secs(&out);
    assert!(secs < 1.5, "output lasts {secs}s, expected about 1s");

    std::fs::remove_dir_all(&dir).unwrap();
}
