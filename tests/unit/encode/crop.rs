use super::*;

fn size(width: u32, height: u32) -> Canvas {
    Canvas { width, height }
}

#[test]
fn portrait_footage_is_left_alone() {
    assert_eq!(vertical_crop(size(1080, 1920)), None);
    assert_eq!(vertical_crop(size(720, 1280)), None);
}

#[test]
fn landscape_footage_keeps_full_height_and_centers() {
    let r = vertical_crop(size(1920, 1080)).unwrap();
    assert_eq!(
        r,
        CropRect {
            width: 606,
            height: 1080,
            x: 657,
            y: 0
        }
    );
    assert_eq!(r.ffmpeg_filter(), "crop=606:1080:657:0");
}

#[test]
fn overly_tall_footage_keeps_full_width() {
    let r = vertical_crop(size(1000, 2000)).unwrap();
    assert_eq!((r.width, r.height), (1000, 1776));
    assert_eq!((r.x, r.y), (0, 112));
}

#[test]
fn crop_sides_are_even() {
    for (w, h) in [(1080, 1080), (1279, 721), (641, 480)] {
        let r = vertical_crop(size(w, h)).unwrap();
        assert_eq!(r.width % 2, 0);
        assert_eq!(r.height % 2, 0);
        assert!(r.x + r.width <= w && r.y + r.height <= h);
    }
}

#[test]
fn crops_a_landscape_clip_when_ffmpeg_is_available() {
    if !is_ffmpeg_on_path() || !crate::encode::probe::is_ffprobe_on_path() {
        return;
    }
    let dir = std::env::temp_dir().join(format!("reelcap-crop-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let input = dir.join("wide.mp4");
    let status = Command::new("ffmpeg")
        .args(["-y", "-loglevel", "error", "-f", "lavfi", "-i", "color=c=green:s=160x90:r=10:d=1"])
        .args(["-pix_fmt", "yuv420p"])
        .arg(&input)
        .status()
        .unwrap();
    assert!(status.success());

    let output = dir.join("portrait").join("background.mp4");
    let used = crop_vertical(&input, &output, Codec::H264).unwrap();
    assert_eq!(used, output);
    assert_eq!(probe_video_size(&output).unwrap(), size(50, 90));

    // already portrait: returned unchanged, nothing written
    let again = crop_vertical(&output, &dir.join("unused.mp4"), Codec::H264).unwrap();
    assert_eq!(again, output);
    assert!(!dir.join("unused.mp4").exists());

    std::fs::remove_dir_all(&dir).unwrap();
}
