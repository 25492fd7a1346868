//! Render and logging configuration.

use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{MemoireError, MemoireResult};

/// Tunables shared by the preview and export renderers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Multiplier applied to the template's reference resolution for exports.
    pub export_scale: f64,
    /// Slot corner radius at reference resolution, before scaling and capping.
    pub slot_corner_radius_px: f64,
    /// Sticker edge length at reference resolution and scale 1.
    pub sticker_base_px: f64,
    /// JPEG quality for exports, `1..=100`.
    pub jpeg_quality: u8,
    /// Multiplier applied to the reference resolution for raster previews.
    pub preview_scale: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            export_scale: 2.0,
            slot_corner_radius_px: 40.0,
            sticker_base_px: 80.0,
            jpeg_quality: 95,
            preview_scale: 0.5,
        }
    }
}

impl RenderConfig {
    /// Defaults with `MEMOIRE_*` environment overrides applied.
    ///
    /// Unparseable values are logged and ignored; the default stays in effect.
    pub fn from_env() -> MemoireResult<Self> {
        let mut cfg = Self::default();
        if let Some(v) = env_parse::<f64>("MEMOIRE_EXPORT_SCALE") {
            cfg.export_scale = v;
        }
        if let Some(v) = env_parse::<u8>("MEMOIRE_JPEG_QUALITY") {
            cfg.jpeg_quality = v;
        }
        if let Some(v) = env_parse::<f64>("MEMOIRE_PREVIEW_SCALE") {
            cfg.preview_scale = v;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load a JSON config file; missing fields take their defaults.
    pub fn from_path(path: &Path) -> MemoireResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read render config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_slice(&bytes)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> MemoireResult<()> {
        if !self.export_scale.is_finite() || self.export_scale < 1.0 {
            return Err(MemoireError::validation("export_scale must be finite and >= 1"));
        }
        if !self.preview_scale.is_finite() || self.preview_scale <= 0.0 {
            return Err(MemoireError::validation("preview_scale must be finite and > 0"));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(MemoireError::validation("jpeg_quality must be in 1..=100"));
        }
        if !self.slot_corner_radius_px.is_finite() || self.slot_corner_radius_px < 0.0 {
            return Err(MemoireError::validation(
                "slot_corner_radius_px must be finite and >= 0",
            ));
        }
        if !self.sticker_base_px.is_finite() || self.sticker_base_px <= 0.0 {
            return Err(MemoireError::validation("sticker_base_px must be finite and > 0"));
        }
        Ok(())
    }
}

/// Logging setup consumed by [`crate::logging::init_logging`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g. `"info"`, `"memoire=debug"`).
    pub level: String,
    /// Emit structured JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    parse_override(key, &raw)
}

fn parse_override<T: std::str::FromStr>(key: &str, raw: &str) -> Option<T> {
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = raw, "ignoring unparseable environment override");
            None
        }
    }
}
