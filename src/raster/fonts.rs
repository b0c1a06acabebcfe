use std::{path::Path, sync::Arc};

/// Font database for caption text: system fonts plus every font file found directly inside
/// `dirs`. Missing directories are skipped.
pub fn build_fontdb<I, P>(dirs: I, system_fonts: bool) -> Arc<usvg::fontdb::Database>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut db = usvg::fontdb::Database::new();
    if system_fonts {
        db.load_system_fonts();
    }
    for dir in dirs {
        load_fonts_from_dir(&mut db, dir.as_ref());
    }
    tracing::debug!(faces = db.len(), "font database ready");
    Arc::new(db)
}

pub fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) -> usize {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return 0;
    };

    let mut loaded = 0;
    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() || !is_font_file(&path) {
            continue;
        }
        match db.load_font_file(&path) {
            Ok(()) => loaded += 1,
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font"),
        }
    }
    loaded
}

fn is_font_file(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
        return false;
    };
    matches!(ext.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc")
}

fn query_face(
    db: &usvg::fontdb::Database,
    mut families: Vec<usvg::fontdb::Family<'_>>,
    weight: u16,
    style: usvg::fontdb::Style,
) -> Option<usvg::fontdb::ID> {
    families.push(usvg::fontdb::Family::SansSerif);
    families.push(usvg::fontdb::Family::Serif);

    let query = usvg::fontdb::Query {
        families: &families,
        weight: usvg::fontdb::Weight(weight),
        stretch: usvg::fontdb::Stretch::Normal,
        style,
    };

    if let Some(id) = db.query(&query) {
        return Some(id);
    }
    db.faces().next().map(|f| f.id)
}

/// Face used for caption text in `family`. Agrees with [`font_resolver`], so measured text
/// matches what gets drawn.
pub fn select_face(
    db: &usvg::fontdb::Database,
    family: &str,
    weight: u16,
    italic: bool,
) -> Option<usvg::fontdb::ID> {
    let style = if italic {
        usvg::fontdb::Style::Italic
    } else {
        usvg::fontdb::Style::Normal
    };
    query_face(db, vec![usvg::fontdb::Family::Name(family)], weight, style)
}

/// Resolves the requested family first, then generic families, then any loaded face, so
/// captions still render when a brand font is not installed.
pub fn font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let families = font
                .families()
                .iter()
                .map(|family| match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                })
                .collect();

            let style = match font.style() {
                usvg::FontStyle::Normal => usvg::fontdb::Style::Normal,
                usvg::FontStyle::Italic => usvg::fontdb::Style::Italic,
                usvg::FontStyle::Oblique => usvg::fontdb::Style::Oblique,
            };

            query_face(fontdb, families, font.weight(), style)
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/fonts.rs"]
mod tests;
