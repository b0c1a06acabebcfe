//! reelcap burns animated word-level captions into short-form video.
//!
//! The crate is split into a frame-pure caption core and the IO-bound collaborators around it.
//!
//! # Pipeline overview
//!
//! 1. **Group**: a seconds-based transcript becomes frame-based [`CaptionGroup`]s
//!    ([`build_track`]), or groups arrive pre-built in a render request.
//! 2. **Select**: `CaptionedVideo + FrameIndex -> FrameVisual` ([`select_and_render`]) picks the
//!    active group and lets the chosen [`CaptionStyle`] animate it.
//! 3. **Rasterize**: [`CaptionRasterizer`] turns the visual into a straight-alpha RGBA overlay.
//! 4. **Encode**: [`FfmpegOverlayEncoder`] composites overlays onto the base video with the system
//!    `ffmpeg` binary.
//!
//! [`RenderOrchestrator`] ties these together behind the [`Bundler`] / [`Renderer`] traits, and
//! [`server::router`] exposes it as `POST /caption-video`.
//!
//! Per-frame evaluation is deterministic and keeps no state, so frames may be evaluated in any
//! order or in parallel.
#![forbid(unsafe_code)]

pub mod animation;
pub mod compose;
pub mod encode;
pub mod foundation;
pub mod raster;
pub mod render;
pub mod server;
pub mod style;
pub mod timing;

pub use animation::interpolate::{Extrapolate, Lerp, Ramp};
pub use compose::selector::{COMPOSITION_ID, CaptionedVideo, select_and_render};
pub use encode::crop::{CropRect, crop_vertical, vertical_crop};
pub use encode::ffmpeg::{Codec, FfmpegOverlayEncoder, OverlayEncodeConfig, is_ffmpeg_on_path};
pub use encode::probe::{VideoTiming, is_ffprobe_on_path, probe_video_size, probe_video_timing};
pub use foundation::core::{Canvas, Fps, FrameIndex, FrameRange, Rgba8};
pub use foundation::error::{CaptionError, CaptionResult};
pub use raster::CaptionRasterizer;
pub use render::bundle::{AssetBundler, BundleManifest};
pub use render::ffmpeg_renderer::{FfmpegRenderer, RenderThreading};
pub use render::orchestrator::{
    OrchestratorSettings, RenderOrchestrator, RenderOutput, RenderRequest,
};
pub use render::{Bundler, CompositionHandle, RenderStats, Renderer, ServeLocation};
pub use style::visual::{CaptionOverlay, FrameVisual, WordVisual};
pub use style::{CaptionStyle, StyleChoice};
pub use timing::grouping::{GroupingMode, GroupingRules, Transcript, build_track};
pub use timing::model::{CaptionGroup, CaptionTrack, Word, active_group};
