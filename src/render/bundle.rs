use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    compose::selector::COMPOSITION_ID,
    foundation::error::{CaptionError, CaptionResult},
    raster::fonts::build_fontdb,
    render::{Bundler, ServeLocation},
    style::CaptionStyle,
};

pub const MANIFEST_FILE: &str = "manifest.json";

/// Record of what a bundle contains, written next to it for inspection.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleManifest {
    pub version: String,
    pub entry_point: PathBuf,
    pub public_dir: PathBuf,
    pub compositions: Vec<String>,
    pub styles: Vec<String>,
    pub font_faces: usize,
    pub font_families: Vec<String>,
}

/// Bundles a project directory laid out as `<entry>/public` (static inputs) plus optional
/// `<entry>/fonts` and `<entry>/public/fonts`.
#[derive(Clone, Copy, Debug)]
pub struct AssetBundler {
    pub system_fonts: bool,
}

impl Default for AssetBundler {
    fn default() -> Self {
        Self { system_fonts: true }
    }
}

impl Bundler for AssetBundler {
    #[tracing::instrument(skip(self))]
    fn bundle(&self, entry_point: &Path, out_dir: &Path) -> CaptionResult<ServeLocation> {
        if !entry_point.is_dir() {
            return Err(CaptionError::bundle(format!(
                "entry point '{}' is not a directory",
                entry_point.display()
            )));
        }

        let public_dir = entry_point.join("public");
        if !public_dir.is_dir() {
            return Err(CaptionError::bundle(format!(
                "entry point '{}' has no public/ directory",
                entry_point.display()
            )));
        }

        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("create bundle directory '{}'", out_dir.display()))?;

        let fontdb = build_fontdb(
            [entry_point.join("fonts"), public_dir.join("fonts")],
            self.system_fonts,
        );

        let mut font_families: Vec<String> = fontdb
            .faces()
            .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
            .collect();
        font_families.sort();
        font_families.dedup();

        let manifest = BundleManifest {
            version: env!("CARGO_PKG_VERSION").to_string(),
            entry_point: entry_point.to_path_buf(),
            public_dir: public_dir.clone(),
            compositions: vec![COMPOSITION_ID.to_string()],
            styles: CaptionStyle::ALL.iter().map(|s| s.tag().to_string()).collect(),
            font_faces: fontdb.len(),
            font_families,
        };
        let manifest_path = out_dir.join(MANIFEST_FILE);
        std::fs::write(&manifest_path, serde_json::to_vec_pretty(&manifest)?)
            .with_context(|| format!("write bundle manifest '{}'", manifest_path.display()))?;

        tracing::info!(
            bundle_dir = %out_dir.display(),
            public_dir = %public_dir.display(),
            font_faces = manifest.font_faces,
            "bundle ready"
        );

        Ok(ServeLocation::new(out_dir, public_dir, fontdb))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/bundle.rs"]
mod tests;
