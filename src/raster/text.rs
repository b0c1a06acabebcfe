//! Shaped text metrics for caption layout.
//!
//! Widths come from the same font face `usvg` picks when it draws the caption, shaped with
//! `parley`, so wrapped lines, highlight boxes and panels line up with the rendered glyphs.

use std::{
    borrow::Cow,
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use crate::{raster::fonts, style::visual::Typography};

/// Horizontal advance and vertical extent of a run of text, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextExtent {
    pub advance: f64,
    pub ascent: f64,
    pub descent: f64,
    pub leading: f64,
}

impl TextExtent {
    pub fn line_height(&self) -> f64 {
        self.ascent + self.descent + self.leading
    }
}

pub trait TextMeasure: Sync {
    fn measure(&self, text: &str, typography: &Typography) -> TextExtent;
}

#[derive(Clone, PartialEq, Eq, Hash)]
struct ExtentKey {
    face: usvg::fontdb::ID,
    weight: u16,
    italic: bool,
    size_bits: u64,
    text: String,
}

struct ShapingState {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext,
    /// Family name each registered face is known by inside `font_ctx`.
    registered: HashMap<usvg::fontdb::ID, String>,
    extents: HashMap<ExtentKey, TextExtent>,
}

/// Measures caption words with `parley` against a font database. Results are cached, so
/// repeated frames of the same caption group do not shape again.
pub struct ShapedTextMeasurer {
    fontdb: Arc<usvg::fontdb::Database>,
    state: Mutex<ShapingState>,
}

impl ShapedTextMeasurer {
    pub fn new(fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self {
            fontdb,
            state: Mutex::new(ShapingState {
                font_ctx: parley::FontContext::default(),
                layout_ctx: parley::LayoutContext::new(),
                registered: HashMap::new(),
                extents: HashMap::new(),
            }),
        }
    }

    /// Extent of the em box when no face is available. Nothing is drawn in that case, so
    /// only highlight boxes need a height.
    fn unshaped(size: f64) -> TextExtent {
        TextExtent {
            advance: 0.0,
            ascent: size * 0.8,
            descent: size * 0.2,
            leading: 0.0,
        }
    }
}

impl ShapingState {
    fn register_face(
        &mut self,
        fontdb: &usvg::fontdb::Database,
        face: usvg::fontdb::ID,
    ) -> Option<String> {
        if let Some(name) = self.registered.get(&face) {
            return Some(name.clone());
        }

        let bytes = fontdb.with_face_data(face, |data, _index| data.to_vec())?;
        let wanted = fontdb
            .face(face)
            .and_then(|f| f.families.first().map(|(name, _)| name.clone()));

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes), None);
        let names: Vec<String> = families
            .iter()
            .filter_map(|(id, _)| self.font_ctx.collection.family_name(*id).map(str::to_string))
            .collect();
        let name = match wanted {
            Some(w) if names.contains(&w) => w,
            _ => names.into_iter().next()?,
        };

        self.registered.insert(face, name.clone());
        Some(name)
    }

    fn shape(&mut self, family: String, text: &str, t: &Typography) -> TextExtent {
        let size = t.font_size_px as f32;
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(t.font_weight)),
        ));
        if t.italic {
            builder.push_default(parley::style::StyleProperty::FontStyle(
                parley::style::FontStyle::Italic,
            ));
        }

        let mut layout: parley::Layout<[u8; 4]> = builder.build(text);
        layout.break_all_lines(None);

        let mut extent = TextExtent {
            advance: 0.0,
            ascent: 0.0,
            descent: 0.0,
            leading: 0.0,
        };
        for line in layout.lines() {
            let m = line.metrics();
            extent.advance = extent.advance.max(f64::from(m.advance));
            extent.ascent = extent.ascent.max(f64::from(m.ascent));
            extent.descent = extent.descent.max(f64::from(m.descent));
            extent.leading = extent.leading.max(f64::from(m.leading));
        }
        if extent.ascent + extent.descent <= 0.0 {
            let nominal = ShapedTextMeasurer::unshaped(t.font_size_px);
            extent.ascent = nominal.ascent;
            extent.descent = nominal.descent;
        }
        extent
    }
}

impl TextMeasure for ShapedTextMeasurer {
    fn measure(&self, text: &str, typography: &Typography) -> TextExtent {
        let Some(face) = fonts::select_face(
            &self.fontdb,
            &typography.font_family,
            typography.font_weight,
            typography.italic,
        ) else {
            return Self::unshaped(typography.font_size_px);
        };

        let key = ExtentKey {
            face,
            weight: typography.font_weight,
            italic: typography.italic,
            size_bits: typography.font_size_px.to_bits(),
            text: text.to_string(),
        };

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(extent) = state.extents.get(&key) {
            return *extent;
        }

        let Some(family) = state.register_face(&self.fontdb, face) else {
            tracing::warn!(family = %typography.font_family, "font face could not be loaded for shaping");
            return Self::unshaped(typography.font_size_px);
        };
        let extent = state.shape(family, text, typography);
        state.extents.insert(key, extent);
        extent
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/text.rs"]
mod tests;
