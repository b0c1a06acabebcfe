use std::path::Path;

use rayon::prelude::*;

use crate::{
    compose::selector::{COMPOSITION_ID, CaptionedVideo},
    encode::{
        ffmpeg::{Codec, FfmpegOverlayEncoder, OverlayEncodeConfig},
        probe::probe_video_size,
    },
    foundation::{
        core::{FrameIndex, FrameRange},
        error::{CaptionError, CaptionResult},
    },
    raster::CaptionRasterizer,
    render::{CompositionHandle, RenderStats, Renderer, ServeLocation},
    style::visual::CaptionOverlay,
};

#[derive(Clone, Debug)]
pub struct RenderThreading {
    pub chunk_size: usize,
    pub threads: Option<usize>,
    /// Rasterize identical overlays once per chunk.
    pub static_frame_elision: bool,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            chunk_size: 32,
            threads: None,
            static_frame_elision: true,
        }
    }
}

/// Renders the captioned-video composition by rasterizing overlays in parallel chunks and
/// burning them into the base video with the system `ffmpeg`.
#[derive(Clone, Debug, Default)]
pub struct FfmpegRenderer {
    pub threading: RenderThreading,
}

impl FfmpegRenderer {
    pub fn new(threading: RenderThreading) -> Self {
        Self { threading }
    }
}

impl Renderer for FfmpegRenderer {
    fn select_composition(
        &self,
        serve: &ServeLocation,
        composition_id: &str,
        props: &CaptionedVideo,
    ) -> CaptionResult<CompositionHandle> {
        if composition_id != COMPOSITION_ID {
            return Err(CaptionError::composition(format!(
                "no composition named '{composition_id}' (available: {COMPOSITION_ID})"
            )));
        }

        let video = serve.resolve_static(&props.video_file)?;
        if !video.is_file() {
            return Err(CaptionError::composition(format!(
                "base video '{}' not found",
                video.display()
            )));
        }
        let canvas = probe_video_size(&video)?;

        Ok(CompositionHandle {
            id: COMPOSITION_ID.to_string(),
            canvas,
            fps: props.fps,
            duration_in_frames: props.duration_in_frames,
        })
    }

    #[tracing::instrument(skip_all, fields(composition = %composition.id, out = %output_path.display()))]
    fn render_media(
        &self,
        composition: &CompositionHandle,
        serve: &ServeLocation,
        codec: Codec,
        output_path: &Path,
        props: &CaptionedVideo,
    ) -> CaptionResult<RenderStats> {
        let rasterizer = CaptionRasterizer::new(composition.canvas, serve.fontdb())?;
        let pool = build_thread_pool(self.threading.threads)?;

        let mut enc = FfmpegOverlayEncoder::new(OverlayEncodeConfig {
            base_video: serve.resolve_static(&props.video_file)?,
            width: composition.canvas.width,
            height: composition.canvas.height,
            fps: composition.fps.get(),
            codec,
            out_path: output_path.to_path_buf(),
            overwrite: true,
        })?;

        let range = composition.frame_range();
        let chunk_size = normalized_chunk_size(self.threading.chunk_size);
        let mut stats = RenderStats::default();

        let mut chunk_start = range.start.0;
        while chunk_start < range.end.0 && enc.accepts_frames() {
            let chunk_end = (chunk_start + chunk_size).min(range.end.0);
            let chunk = FrameRange::new(FrameIndex(chunk_start), FrameIndex(chunk_end))?;

            let rendered = pool.install(|| {
                rasterize_chunk(props, chunk, &rasterizer, self.threading.static_frame_elision)
            })?;
            for (i, &u) in rendered.order.iter().enumerate() {
                enc.encode_frame(chunk.start.offset(i as i64), &rendered.unique[u])?;
            }

            stats.frames_total += rendered.order.len() as u64;
            stats.frames_rendered += rendered.unique.len() as u64;
            chunk_start = chunk_end;
        }
        stats.frames_elided = stats.frames_total - stats.frames_rendered;

        let written = enc.finish()?;
        tracing::info!(
            frames = written,
            elided = stats.frames_elided,
            "render finished"
        );
        Ok(stats)
    }
}

/// Overlay buffers for a chunk of consecutive frames. Frame `i` of the chunk uses
/// `unique[order[i]]`.
#[derive(Debug)]
pub struct RasterChunk {
    pub unique: Vec<Vec<u8>>,
    pub order: Vec<usize>,
}

pub fn rasterize_chunk(
    props: &CaptionedVideo,
    range: FrameRange,
    rasterizer: &CaptionRasterizer,
    elide: bool,
) -> CaptionResult<RasterChunk> {
    let visuals = props.evaluate_range(range);

    let mut distinct: Vec<&Option<CaptionOverlay>> = Vec::new();
    let mut first_visual = Vec::new();
    let mut order = Vec::with_capacity(visuals.len());
    for (i, v) in visuals.iter().enumerate() {
        let existing = if elide {
            distinct.iter().position(|o| **o == v.overlay)
        } else {
            None
        };
        match existing {
            Some(slot) => order.push(slot),
            None => {
                order.push(distinct.len());
                distinct.push(&v.overlay);
                first_visual.push(i);
            }
        }
    }

    let unique = first_visual
        .par_iter()
        .map(|&i| rasterizer.rasterize(&visuals[i]))
        .collect::<CaptionResult<Vec<_>>>()?;

    Ok(RasterChunk { unique, order })
}

fn build_thread_pool(threads: Option<usize>) -> CaptionResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(CaptionError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| CaptionError::render(format!("failed to build rayon thread pool: {e}")))
}

fn normalized_chunk_size(chunk_size: usize) -> i64 {
    chunk_size.max(1) as i64
}

#[cfg(test)]
#[path = "../../tests/unit/render/ffmpeg_renderer.rs"]
mod tests;
