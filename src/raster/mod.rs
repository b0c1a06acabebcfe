//! Turning a [`FrameVisual`](crate::style::visual::FrameVisual) into pixels.
//!
//! The overlay is laid out from `parley`-shaped word widths, described as a small SVG document
//! and rendered with `resvg`, both using the fonts the serve location provides.

pub mod fonts;
pub mod svg;
pub mod text;

use std::sync::Arc;

use crate::{
    foundation::{
        core::Canvas,
        error::{CaptionError, CaptionResult},
    },
    style::visual::FrameVisual,
};

use text::ShapedTextMeasurer;

/// Renders caption overlays for one canvas size. Cheap to share across threads.
#[derive(Clone)]
pub struct CaptionRasterizer {
    canvas: Canvas,
    fontdb: Arc<usvg::fontdb::Database>,
    measurer: Arc<ShapedTextMeasurer>,
}

impl CaptionRasterizer {
    pub fn new(canvas: Canvas, fontdb: Arc<usvg::fontdb::Database>) -> CaptionResult<Self> {
        Ok(Self {
            canvas: canvas.validate()?,
            measurer: Arc::new(ShapedTextMeasurer::new(fontdb.clone())),
            fontdb,
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn frame_len(&self) -> usize {
        (self.canvas.width as usize) * (self.canvas.height as usize) * 4
    }

    /// Straight-alpha RGBA8 overlay, `width * height * 4` bytes. Frames without captions are
    /// fully transparent.
    pub fn rasterize(&self, visual: &FrameVisual) -> CaptionResult<Vec<u8>> {
        let Some(doc) = svg::svg_document(visual, self.canvas, self.measurer.as_ref()) else {
            return Ok(vec![0u8; self.frame_len()]);
        };

        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            font_resolver: fonts::font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&doc, &opts).map_err(|e| {
            CaptionError::render(format!(
                "parse caption svg for frame {}: {e}",
                visual.frame.0
            ))
        })?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(self.canvas.width, self.canvas.height)
            .ok_or_else(|| CaptionError::render("failed to allocate caption pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );

        let mut data = pixmap.take();
        unpremultiply_rgba8_in_place(&mut data);
        Ok(data)
    }

    pub fn to_image(&self, visual: &FrameVisual) -> CaptionResult<image::RgbaImage> {
        let data = self.rasterize(visual)?;
        image::RgbaImage::from_raw(self.canvas.width, self.canvas.height, data)
            .ok_or_else(|| CaptionError::render("overlay buffer does not match canvas size"))
    }
}

/// tiny-skia pixmaps are premultiplied; ffmpeg's `rgba` input is straight alpha.
pub fn unpremultiply_rgba8_in_place(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        match a {
            0 => px[..3].fill(0),
            255 => {}
            _ => {
                for c in &mut px[..3] {
                    let v = (u16::from(*c) * 255 + a / 2) / a;
                    *c = v.min(255) as u8;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/mod.rs"]
mod tests;
