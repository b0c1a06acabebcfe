//! SVG description of a caption overlay.
//!
//! Words are measured with a [`TextMeasure`], wrapped greedily, centered horizontally, and
//! stacked upward from the style's bottom offset.

use crate::{
    foundation::core::{Canvas, Rgba8},
    raster::text::{TextExtent, TextMeasure},
    style::visual::{CaptionOverlay, FrameVisual, Highlight, TextShadow, Typography, WordVisual},
};

/// Lines wrap once they would exceed this share of the canvas width.
pub const WRAP_WIDTH_FRACTION: f64 = 0.9;

/// Horizontal placement of one word; `x` is the left edge.
#[derive(Clone, Debug, PartialEq)]
pub struct WordBox {
    pub word: usize,
    pub x: f64,
    pub width: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineBox {
    pub words: Vec<WordBox>,
    pub baseline: f64,
    pub left: f64,
    pub width: f64,
    pub ascent: f64,
    pub descent: f64,
}

fn word_gap(t: &Typography, measure: &dyn TextMeasure) -> f64 {
    t.word_gap_px + measure.measure(" ", t).advance
}

pub fn layout_lines(
    overlay: &CaptionOverlay,
    canvas: Canvas,
    measure: &dyn TextMeasure,
) -> Vec<LineBox> {
    let t = &overlay.typography;
    let gap = word_gap(t, measure);
    let max_width = f64::from(canvas.width) * WRAP_WIDTH_FRACTION;

    let mut rows: Vec<Vec<(usize, TextExtent)>> = Vec::new();
    let mut row_width = 0.0;
    for (i, word) in overlay.words.iter().enumerate() {
        let extent = measure.measure(&word.text, t);
        let w = extent.advance;
        match rows.last_mut() {
            Some(row) if row_width + gap + w <= max_width => {
                row.push((i, extent));
                row_width += gap + w;
            }
            _ => {
                rows.push(vec![(i, extent)]);
                row_width = w;
            }
        }
    }

    let mut lines: Vec<LineBox> = rows
        .into_iter()
        .map(|row| {
            let width = row.iter().map(|(_, e)| e.advance).sum::<f64>()
                + gap * row.len().saturating_sub(1) as f64;
            let left = (f64::from(canvas.width) - width) / 2.0;
            let ascent = row.iter().map(|(_, e)| e.ascent).fold(0.0, f64::max);
            let descent = row.iter().map(|(_, e)| e.descent).fold(0.0, f64::max);
            let mut x = left;
            let words = row
                .into_iter()
                .map(|(word, e)| {
                    let b = WordBox {
                        word,
                        x,
                        width: e.advance,
                    };
                    x += e.advance + gap;
                    b
                })
                .collect();
            LineBox {
                words,
                baseline: 0.0,
                left,
                width,
                ascent,
                descent,
            }
        })
        .collect();

    let line_height = overlay
        .words
        .first()
        .map(|w| measure.measure(&w.text, t).line_height())
        .unwrap_or(t.font_size_px);
    let mut baseline = f64::from(canvas.height) - t.bottom_px;
    for line in lines.iter_mut().rev() {
        line.baseline = baseline - line.descent;
        baseline -= line_height.max(line.ascent + line.descent);
    }
    lines
}

pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn fill_attrs(attr: &str, color: Rgba8) -> String {
    if color.a == 255 {
        format!(r#"{attr}="{}""#, color.to_hex_rgb())
    } else {
        format!(
            r#"{attr}="{}" {attr}-opacity="{:.3}""#,
            color.to_hex_rgb(),
            color.alpha_f64()
        )
    }
}

fn rect(out: &mut String, left: f64, width: f64, top: f64, height: f64, h: &Highlight) {
    let (x, y) = (left - h.pad_x_px, top - h.pad_y_px);
    let (w, ht) = (width + 2.0 * h.pad_x_px, height + 2.0 * h.pad_y_px);
    out.push_str("<rect");
    if h.scale != 1.0 {
        let (cx, cy) = (x + w / 2.0, y + ht / 2.0);
        out.push_str(&format!(
            r#" transform="translate({cx:.2} {cy:.2}) scale({:.4}) translate({:.2} {:.2})""#,
            h.scale, -cx, -cy
        ));
    }
    out.push_str(&format!(
        r#" x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{ht:.2}" rx="{:.2}" {}/>"#,
        h.corner_radius_px,
        fill_attrs("fill", h.color),
    ));
}

fn shadow_filter(out: &mut String, id: usize, shadows: &[TextShadow], canvas: Canvas) {
    let (w, h) = (canvas.width, canvas.height);
    out.push_str(&format!(
        r#"<filter id="shadow-{id}" filterUnits="userSpaceOnUse" x="-{w}" y="-{h}" width="{}" height="{}" color-interpolation-filters="sRGB">"#,
        w * 3,
        h * 3
    ));
    for (k, s) in shadows.iter().enumerate() {
        // CSS blur radius is twice the gaussian standard deviation.
        out.push_str(&format!(
            r#"<feGaussianBlur in="SourceAlpha" stdDeviation="{:.2}" result="blur{k}"/>"#,
            s.blur_px / 2.0
        ));
        out.push_str(&format!(
            r#"<feOffset in="blur{k}" dx="{:.2}" dy="{:.2}" result="offset{k}"/>"#,
            s.dx, s.dy
        ));
        out.push_str(&format!(
            r#"<feFlood flood-color="{}" flood-opacity="{:.3}" result="color{k}"/>"#,
            s.color.to_hex_rgb(),
            s.color.alpha_f64()
        ));
        out.push_str(&format!(
            r#"<feComposite in="color{k}" in2="offset{k}" operator="in" result="shadow{k}"/>"#
        ));
    }
    // First listed shadow paints on top, like CSS.
    out.push_str("<feMerge>");
    for k in (0..shadows.len()).rev() {
        out.push_str(&format!(r#"<feMergeNode in="shadow{k}"/>"#));
    }
    out.push_str(r#"<feMergeNode in="SourceGraphic"/></feMerge></filter>"#);
}

fn word_element(
    out: &mut String,
    id: usize,
    word: &WordVisual,
    b: &WordBox,
    line: &LineBox,
    t: &Typography,
) {
    let size = t.font_size_px;
    let baseline = line.baseline;
    let top = baseline - line.ascent;
    let cx = b.x + b.width / 2.0;
    let cy = top + (line.ascent + line.descent) / 2.0;

    out.push_str("<g");
    if word.scale != 1.0 {
        out.push_str(&format!(
            r#" transform="translate({cx:.2} {cy:.2}) scale({:.4}) translate({:.2} {:.2})""#,
            word.scale, -cx, -cy
        ));
    }
    if word.opacity < 1.0 {
        out.push_str(&format!(r#" opacity="{:.4}""#, word.opacity.max(0.0)));
    }
    out.push('>');

    if let Some(h) = &word.highlight {
        rect(out, b.x, b.width, top, line.ascent + line.descent, h);
    }

    out.push_str(&format!(
        r#"<text x="{cx:.2}" y="{baseline:.2}" text-anchor="middle" font-family="{}, sans-serif" font-size="{size:.1}" font-weight="{}""#,
        escape_xml(&t.font_family),
        t.font_weight
    ));
    if t.italic {
        out.push_str(r#" font-style="italic""#);
    }
    out.push(' ');
    out.push_str(&fill_attrs("fill", word.color));
    if !word.shadows.is_empty() {
        out.push_str(&format!(r#" filter="url(#shadow-{id})""#));
    }
    out.push('>');
    out.push_str(&escape_xml(&word.text));
    out.push_str("</text></g>");
}

/// Standalone SVG for the caption layer of `visual`, or `None` when nothing is drawn.
pub fn svg_document(
    visual: &FrameVisual,
    canvas: Canvas,
    measure: &dyn TextMeasure,
) -> Option<String> {
    let overlay = visual.overlay.as_ref()?;
    if overlay.words.is_empty() {
        return None;
    }

    let t = &overlay.typography;
    let lines = layout_lines(overlay, canvas, measure);
    let (w, h) = (canvas.width, canvas.height);

    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );

    out.push_str("<defs>");
    for (id, word) in overlay.words.iter().enumerate() {
        if !word.shadows.is_empty() {
            shadow_filter(&mut out, id, &word.shadows, canvas);
        }
    }
    out.push_str("</defs>");

    if let Some(panel) = &overlay.panel {
        for line in &lines {
            let top = line.baseline - line.ascent;
            rect(&mut out, line.left, line.width, top, line.ascent + line.descent, panel);
        }
    }

    for line in &lines {
        for b in &line.words {
            word_element(&mut out, b.word, &overlay.words[b.word], b, line, t);
        }
    }

    out.push_str("</svg>");
    Some(out)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/svg.rs"]
mod tests;
