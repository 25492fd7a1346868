use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use image::ImageEncoder;

use crate::compositor::raster::RasterSurface;
use crate::compositor::{Compositor, DrawPolicy, LoadedLayers, RenderInputs, SceneLayout, draw_layers};
use crate::foundation::core::FrameRGBA;
use crate::foundation::error::{MemoireError, MemoireResult};
use crate::layout::theme::ThemeKey;

/// Allows one export at a time. Acquisition never blocks.
#[derive(Debug, Default)]
pub struct ExportGate {
    busy: AtomicBool,
}

impl ExportGate {
    /// Claim the gate, or `None` if an export is already in flight.
    pub fn try_acquire(&self) -> Option<ExportPermit<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ExportPermit { gate: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Held for the duration of one export; releases the gate on drop, including on error paths.
#[derive(Debug)]
pub struct ExportPermit<'a> {
    gate: &'a ExportGate,
}

impl Drop for ExportPermit<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

/// An encoded export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedImage {
    pub width: u32,
    pub height: u32,
    /// JPEG bytes.
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportOutcome {
    Completed(ExportedImage),
    /// Another export was in flight; nothing was rendered.
    Ignored,
}

impl ExportOutcome {
    pub fn into_image(self) -> Option<ExportedImage> {
        match self {
            Self::Completed(img) => Some(img),
            Self::Ignored => None,
        }
    }
}

/// Receives finished exports (download, share sheet, disk).
pub trait DeliverySink {
    fn deliver(&self, file_name: &str, image: &ExportedImage) -> MemoireResult<()>;
}

/// Writes exports into a directory.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DeliverySink for DirectorySink {
    fn deliver(&self, file_name: &str, image: &ExportedImage) -> MemoireResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create delivery dir {}", self.dir.display()))?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, &image.bytes)
            .with_context(|| format!("write export {}", path.display()))?;
        tracing::info!(path = %path.display(), "export delivered");
        Ok(())
    }
}

/// `memoire-<theme-slug>-<unix-millis>.jpg`
pub fn delivery_file_name(theme: ThemeKey, unix_millis: u128) -> String {
    format!("memoire-{}-{unix_millis}.jpg", theme.slug())
}

/// Encode a frame as baseline JPEG, flattening any transparency onto black.
pub fn encode_jpeg(frame: &FrameRGBA, quality: u8) -> MemoireResult<Vec<u8>> {
    if !(1..=100).contains(&quality) {
        return Err(MemoireError::validation("jpeg quality must be in 1..=100"));
    }
    let rgb = frame.to_rgb8_over_black();
    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality)
        .write_image(&rgb, frame.width, frame.height, image::ExtendedColorType::Rgb8)
        .context("encode jpeg")?;
    Ok(out)
}

impl Compositor {
    /// Render and encode at export resolution, unless an export is already running.
    #[tracing::instrument(skip_all, fields(slots = inputs.template.slot_count(), stickers = inputs.stickers.len()))]
    pub fn export(&self, inputs: &RenderInputs<'_>) -> MemoireResult<ExportOutcome> {
        let Some(_permit) = self.gate().try_acquire() else {
            tracing::debug!("export already in flight, ignoring request");
            return Ok(ExportOutcome::Ignored);
        };

        let frame = self.render_export(inputs)?;
        let bytes = encode_jpeg(&frame, self.config().jpeg_quality)?;
        tracing::info!(
            width = frame.width,
            height = frame.height,
            bytes = bytes.len(),
            "export complete"
        );
        Ok(ExportOutcome::Completed(ExportedImage {
            width: frame.width,
            height: frame.height,
            bytes,
        }))
    }

    /// Export and hand the result to `sink` under its delivery file name.
    pub fn export_to(
        &self,
        inputs: &RenderInputs<'_>,
        theme: ThemeKey,
        unix_millis: u128,
        sink: &dyn DeliverySink,
    ) -> MemoireResult<ExportOutcome> {
        let outcome = self.export(inputs)?;
        if let ExportOutcome::Completed(img) = &outcome {
            sink.deliver(&delivery_file_name(theme, unix_millis), img)?;
        }
        Ok(outcome)
    }

    /// Full-resolution render without encoding. Any asset failure aborts with
    /// [`MemoireError::RenderFailed`] naming the resource; no partial frame is produced.
    #[tracing::instrument(skip_all)]
    pub fn render_export(&self, inputs: &RenderInputs<'_>) -> MemoireResult<FrameRGBA> {
        let layout = SceneLayout::compute(
            inputs.template,
            inputs.stickers,
            self.config().export_scale,
            self.config(),
        )?;
        let layers = self
            .load_strict(inputs)
            .map_err(MemoireError::into_render_failed)?;

        let mut surface = RasterSurface::new(layout.canvas)?;
        draw_layers(&mut surface, &layout, inputs, &layers, DrawPolicy::Strict)?;
        Ok(surface.finish())
    }

    fn load_strict(&self, inputs: &RenderInputs<'_>) -> MemoireResult<LoadedLayers> {
        let loader = self.loader();

        let background = loader.load(inputs.background)?;
        tracing::debug!(reference = inputs.background, "background ready");

        let photos = loader.load_all(&inputs.slotted_photos())?;
        tracing::debug!(count = photos.len(), "photos ready");

        let sources = inputs.sticker_sources();
        let decoded = loader.load_all(&sources)?;
        let stickers = inputs
            .stickers
            .iter()
            .map(|s| {
                sources
                    .iter()
                    .position(|src| *src == s.src)
                    .map(|i| decoded[i].clone())
            })
            .collect();

        let frame = loader.load(&inputs.template.frame_image_url)?;

        Ok(LoadedLayers {
            background: Some(background),
            photos: photos.into_iter().map(Some).collect(),
            stickers,
            frame: Some(frame),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/export.rs"]
mod tests;
