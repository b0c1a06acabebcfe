use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::foundation::error::{CaptionError, CaptionResult};

/// The prepared bundle shared read-only by every render: where static inputs live and which
/// fonts caption text can use.
#[derive(Clone)]
pub struct ServeLocation {
    bundle_dir: PathBuf,
    public_dir: PathBuf,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for ServeLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServeLocation")
            .field("bundle_dir", &self.bundle_dir)
            .field("public_dir", &self.public_dir)
            .field("font_faces", &self.fontdb.len())
            .finish()
    }
}

impl ServeLocation {
    pub fn new(
        bundle_dir: impl Into<PathBuf>,
        public_dir: impl Into<PathBuf>,
        fontdb: Arc<usvg::fontdb::Database>,
    ) -> Self {
        Self {
            bundle_dir: bundle_dir.into(),
            public_dir: public_dir.into(),
            fontdb,
        }
    }

    pub fn bundle_dir(&self) -> &Path {
        &self.bundle_dir
    }

    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }

    pub fn fontdb(&self) -> Arc<usvg::fontdb::Database> {
        Arc::clone(&self.fontdb)
    }

    /// Path of a static input (such as the base video) inside the public directory.
    pub fn resolve_static(&self, rel: &str) -> CaptionResult<PathBuf> {
        let norm = normalize_rel_path(rel)?;
        Ok(self.public_dir.join(norm))
    }
}

/// Normalize a public-relative path.
///
/// The result uses `/` separators and drops `.` segments. Absolute paths and parent traversals
/// (`..`) are rejected.
pub fn normalize_rel_path(source: &str) -> CaptionResult<String> {
    let s = source.replace('\\', "/");
    if s.is_empty() {
        return Err(CaptionError::validation("video_file must be non-empty"));
    }
    if s.starts_with('/') {
        return Err(CaptionError::validation(format!(
            "video_file '{source}' must be a relative path"
        )));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(CaptionError::validation(format!(
                "video_file '{source}' must not contain '..'"
            )));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(CaptionError::validation(format!(
            "video_file '{source}' must contain a file name"
        )));
    }
    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/render/serve.rs"]
mod tests;
