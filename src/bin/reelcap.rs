use std::{
    fs::File,
    io::BufReader,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::prelude::*;

use reelcap::{
    AssetBundler, Bundler as _, Canvas, CaptionRasterizer, CaptionStyle, Codec, FfmpegRenderer,
    Fps, FrameIndex, OrchestratorSettings, RenderOrchestrator, RenderRequest, RenderThreading,
    StyleChoice, Transcript, build_track, crop_vertical, probe_video_timing,
    raster::fonts::build_fontdb, server,
};

#[derive(Parser, Debug)]
#[command(name = "reelcap", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Bundle assets once, then serve `POST /caption-video`.
    Serve(ServeArgs),
    /// Evaluate one frame of a render request: print the caption visual, or write it as a PNG.
    Frame(FrameArgs),
    /// Run a render request directly (requires `ffmpeg` and `ffprobe` on PATH).
    Render(RenderArgs),
    /// Build a render request from a seconds-based word transcript.
    Prepare(PrepareArgs),
    /// Center-crop background footage to 9:16 portrait (requires `ffmpeg` and `ffprobe`).
    Crop(CropArgs),
}

#[derive(Parser, Debug)]
struct BundleArgs {
    /// Project directory containing `public/` (base videos) and optionally `fonts/`.
    #[arg(long, env = "REELCAP_ENTRY_POINT", default_value = ".")]
    entry_point: PathBuf,

    #[arg(long, env = "REELCAP_BUNDLE_DIR", default_value = "build")]
    bundle_dir: PathBuf,

    #[arg(long, env = "REELCAP_OUT_DIR", default_value = "out")]
    out_dir: PathBuf,

    #[arg(long, env = "REELCAP_CODEC", value_enum, default_value_t = Codec::H264)]
    codec: Codec,

    /// Frames rasterized per parallel batch.
    #[arg(long, default_value_t = 32)]
    chunk_size: usize,

    /// Worker threads for rasterization (defaults to one per core).
    #[arg(long)]
    threads: Option<usize>,

    /// Only use fonts shipped with the project.
    #[arg(long)]
    no_system_fonts: bool,
}

#[derive(Parser, Debug)]
struct ServeArgs {
    #[arg(long, env = "REELCAP_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    #[arg(long, env = "REELCAP_PORT", default_value_t = server::DEFAULT_PORT)]
    port: u16,

    #[command(flatten)]
    bundle: BundleArgs,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Render request JSON (the `POST /caption-video` body).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: i64,

    /// Output PNG path; without it the frame visual is printed as JSON.
    #[arg(long)]
    out: Option<PathBuf>,

    #[arg(long, default_value_t = 1080)]
    width: u32,

    #[arg(long, default_value_t = 1920)]
    height: u32,

    /// Extra font directory for PNG output.
    #[arg(long)]
    fonts: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Render request JSON (the `POST /caption-video` body).
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    bundle: BundleArgs,
}

#[derive(Parser, Debug)]
struct PrepareArgs {
    /// Transcript JSON: `{ "segments": [{ "words": [{ "word", "start", "end" }] }] }`, seconds.
    #[arg(long)]
    transcript: PathBuf,

    #[arg(long)]
    style: CaptionStyle,

    /// Base video to read the frame rate and length from (requires `ffprobe`).
    #[arg(long, required_unless_present_all = ["fps", "duration_frames"])]
    video: Option<PathBuf>,

    /// Overrides the rate probed from `--video`.
    #[arg(long)]
    fps: Option<u32>,

    /// Overrides the length probed from `--video`.
    #[arg(long)]
    duration_frames: Option<u64>,

    /// Base video path relative to the project's `public/` directory.
    #[arg(long)]
    video_file: String,

    /// Output path; defaults to stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CropArgs {
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long, default_value = "background.mp4")]
    out: PathBuf,

    #[arg(long, value_enum, default_value_t = Codec::H264)]
    codec: Codec,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Serve(args) => cmd_serve(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Prepare(args) => cmd_prepare(args),
        Command::Crop(args) => cmd_crop(args),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(f)).with_context(|| format!("parse {what} JSON"))
}

fn write_output(out: Option<&Path>, json: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            reelcap::encode::ffmpeg::ensure_parent_dir(path)?;
            std::fs::write(path, json).with_context(|| format!("write '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn orchestrator(args: BundleArgs) -> anyhow::Result<RenderOrchestrator> {
    let bundler = AssetBundler {
        system_fonts: !args.no_system_fonts,
    };
    let serve = bundler
        .bundle(&args.entry_point, &args.bundle_dir)
        .context("bundling failed")?;

    let renderer = FfmpegRenderer::new(RenderThreading {
        chunk_size: args.chunk_size,
        threads: args.threads,
        ..RenderThreading::default()
    });
    Ok(RenderOrchestrator::new(
        Arc::new(serve),
        Arc::new(renderer),
        OrchestratorSettings {
            output_dir: args.out_dir,
            codec: args.codec,
        },
    ))
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let addr = SocketAddr::new(args.host, args.port);
    let state = server::AppState::new(orchestrator(args.bundle)?);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(server::serve(addr, state))?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let request: RenderRequest = read_json(&args.in_path, "render request")?;
    let props = request.validate()?;
    let visual = props.select_and_render(FrameIndex(args.frame));

    let Some(out) = args.out else {
        return write_output(None, &serde_json::to_string_pretty(&visual)?);
    };

    let rasterizer = CaptionRasterizer::new(
        Canvas {
            width: args.width,
            height: args.height,
        },
        build_fontdb(args.fonts, true),
    )?;
    let img = rasterizer.to_image(&visual)?;

    reelcap::encode::ffmpeg::ensure_parent_dir(&out)?;
    img.save_with_format(&out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", out.display()))?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let request: RenderRequest = read_json(&args.in_path, "render request")?;
    let output = orchestrator(args.bundle)?.render(request)?;
    write_output(None, &serde_json::to_string_pretty(&output)?)
}

/// Frame rate and length for a prepared request: explicit flags win over probed values.
fn request_timing(args: &PrepareArgs) -> anyhow::Result<(Fps, u64)> {
    let probed = match (&args.video, args.fps, args.duration_frames) {
        (_, Some(_), Some(_)) | (None, _, _) => None,
        (Some(video), _, _) => Some(
            probe_video_timing(video)
                .with_context(|| format!("probe '{}'", video.display()))?,
        ),
    };

    let fps = match (args.fps, &probed) {
        (Some(fps), _) => Fps::new(fps)?,
        (None, Some(t)) => t.fps()?,
        (None, None) => anyhow::bail!("--fps or --video is required"),
    };
    let duration = match (args.duration_frames, &probed) {
        (Some(frames), _) => frames,
        (None, Some(t)) => t.duration_in_frames()?,
        (None, None) => anyhow::bail!("--duration-frames or --video is required"),
    };
    Ok((fps, duration))
}

fn cmd_prepare(args: PrepareArgs) -> anyhow::Result<()> {
    let transcript: Transcript = read_json(&args.transcript, "transcript")?;
    let (fps, duration_in_frames) = request_timing(&args)?;
    let track = build_track(&transcript, &args.style.grouping(), fps)?;

    let request = RenderRequest {
        video_file: Some(args.video_file),
        data_subtitles: Some(track),
        fps: Some(fps.get()),
        duration_in_frames: Some(duration_in_frames),
        subtitle_type: Some(StyleChoice::Style(args.style)),
    };
    write_output(args.out.as_deref(), &serde_json::to_string_pretty(&request)?)
}

fn cmd_crop(args: CropArgs) -> anyhow::Result<()> {
    let used = crop_vertical(&args.in_path, &args.out, args.codec)?;
    println!("{}", used.display());
    Ok(())
}
