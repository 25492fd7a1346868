/// Convenience result type used across Mémoire.
pub type MemoireResult<T> = Result<T, MemoireError>;

/// Top-level error taxonomy used by the photobooth core.
#[derive(thiserror::Error, Debug)]
pub enum MemoireError {
    /// Invalid caller-provided data (templates, config, session documents).
    #[error("validation error: {0}")]
    Validation(String),

    /// A single image resource could not be fetched or decoded.
    #[error("asset load failed for '{resource}': {reason}")]
    AssetLoad {
        /// Opaque reference of the failing resource.
        resource: String,
        /// Human-readable cause.
        reason: String,
    },

    /// An export render was aborted because one of its resources failed to load.
    #[error("render failed on '{resource}': {reason}")]
    RenderFailed {
        /// Opaque reference of the failing resource.
        resource: String,
        /// Human-readable cause.
        reason: String,
    },

    /// Errors raised while rasterizing or encoding.
    #[error("render error: {0}")]
    Render(String),

    /// Camera acquisition or frame grab failures. Always recoverable.
    #[error("camera error: {0}")]
    Camera(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MemoireError {
    /// Build a [`MemoireError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MemoireError::AssetLoad`] value.
    pub fn asset_load(resource: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::AssetLoad {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`MemoireError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`MemoireError::Camera`] value.
    pub fn camera(msg: impl Into<String>) -> Self {
        Self::Camera(msg.into())
    }

    /// Build a [`MemoireError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Re-tag an asset failure as the render-failed condition surfaced by exports.
    ///
    /// Errors that do not name a resource are returned unchanged.
    pub fn into_render_failed(self) -> Self {
        match self {
            Self::AssetLoad { resource, reason } => Self::RenderFailed { resource, reason },
            other => other,
        }
    }

    /// Resource identity carried by asset/render failures, if any.
    pub fn resource(&self) -> Option<&str> {
        match self {
            Self::AssetLoad { resource, .. } | Self::RenderFailed { resource, .. } => {
                Some(resource.as_str())
            }
            _ => None,
        }
    }
}

impl From<serde_json::Error> for MemoireError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
