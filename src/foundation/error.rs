/// Convenience result type used across reelcap.
pub type CaptionResult<T> = Result<T, CaptionError>;

/// Top-level error taxonomy.
///
/// Only request validation and the two IO-bound phases (bundling, rendering) can fail; the
/// per-frame caption evaluation is total over its inputs and never produces an error.
#[derive(thiserror::Error, Debug)]
pub enum CaptionError {
    /// Invalid user-provided request or timing data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Preparing the servable asset bundle failed.
    #[error("bundle error: {0}")]
    Bundle(String),

    /// The requested composition could not be resolved.
    #[error("composition error: {0}")]
    Composition(String),

    /// Rasterizing or encoding frames failed.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CaptionError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn bundle(msg: impl Into<String>) -> Self {
        Self::Bundle(msg.into())
    }

    pub fn composition(msg: impl Into<String>) -> Self {
        Self::Composition(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True for faults caused by the caller's input rather than by the render machinery.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<serde_json::Error> for CaptionError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
