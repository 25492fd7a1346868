use std::sync::Arc;

use crate::assets::loader::AssetLoader;
use crate::assets::source::MemoryImageSource;
use crate::capture::camera::{CameraDevice, CameraSession};
use crate::compositor::export::encode_jpeg;
use crate::foundation::core::FrameRGBA;
use crate::foundation::error::{MemoireError, MemoireResult};

/// JPEG quality of captured shots.
pub const CAPTURE_JPEG_QUALITY: u8 = 90;

/// Result of keeping the pending shot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeepOutcome {
    NothingPending,
    Kept { count: usize, target: usize },
    /// The roll reached its target; these are the photos in capture order.
    Complete(Vec<String>),
}

/// A guided sequence of camera shots, one per template slot.
///
/// Each shot lands in a pending preview first; it is either kept (appended to the roll) or
/// retaken. Shots are stored in a shared [`MemoryImageSource`] and referenced by string; a
/// discarded shot is removed from the store and, when attached, from the loader's cache.
#[derive(Debug)]
pub struct CaptureRoll {
    target: usize,
    kept: Vec<String>,
    pending: Option<String>,
    store: Arc<MemoryImageSource>,
    loader: Option<Arc<AssetLoader>>,
}

impl CaptureRoll {
    /// Start a roll aiming for `target` shots, continuing from `existing`.
    pub fn new(target: usize, existing: Vec<String>, store: Arc<MemoryImageSource>) -> Self {
        Self {
            target,
            kept: existing,
            pending: None,
            store,
            loader: None,
        }
    }

    /// Evict discarded shots from `loader` as well as the store.
    pub fn with_loader(mut self, loader: Arc<AssetLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn photos(&self) -> &[String] {
        &self.kept
    }

    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.kept.len() >= self.target
    }

    /// Fraction of the target already kept, `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.target == 0 {
            return 1.0;
        }
        (self.kept.len() as f64 / self.target as f64).min(1.0)
    }

    /// Take a shot into the pending preview, replacing any previous pending shot.
    ///
    /// Returns `Ok(None)` when the roll is already complete or the camera has not produced a
    /// sized frame yet.
    pub fn take<D: CameraDevice>(
        &mut self,
        camera: &mut CameraSession<D>,
    ) -> MemoireResult<Option<String>> {
        if self.is_complete() {
            return Ok(None);
        }
        camera.acquire()?;
        self.discard_pending();

        let frame = camera.grab()?;
        if frame.width == 0 || frame.height == 0 {
            tracing::debug!("camera frame has no size yet, skipping shot");
            return Ok(None);
        }
        let bytes = encode_jpeg(&mirror_horizontal(&frame)?, CAPTURE_JPEG_QUALITY)?;
        let reference = self.store.put(bytes)?;
        tracing::debug!(reference = %reference, "shot captured");
        self.pending = Some(reference.clone());
        Ok(Some(reference))
    }

    /// Throw away the pending shot.
    pub fn retake(&mut self) {
        self.discard_pending();
    }

    /// Append the pending shot to the roll.
    pub fn keep(&mut self) -> KeepOutcome {
        let Some(reference) = self.pending.take() else {
            return KeepOutcome::NothingPending;
        };
        self.kept.push(reference);
        if self.is_complete() {
            KeepOutcome::Complete(self.kept.clone())
        } else {
            KeepOutcome::Kept {
                count: self.kept.len(),
                target: self.target,
            }
        }
    }

    /// Drop the most recently kept shot (and any pending one).
    pub fn retake_last(&mut self) -> Option<String> {
        let last = self.kept.pop()?;
        self.discard_pending();
        self.discard(&last);
        Some(last)
    }

    pub fn into_photos(mut self) -> Vec<String> {
        self.discard_pending();
        std::mem::take(&mut self.kept)
    }

    fn discard_pending(&mut self) {
        if let Some(r) = self.pending.take() {
            self.discard(&r);
        }
    }

    fn discard(&self, reference: &str) {
        self.store.remove(reference);
        if let Some(loader) = &self.loader {
            loader.forget(reference);
        }
    }
}

/// Selfie-style horizontal flip.
pub fn mirror_horizontal(frame: &FrameRGBA) -> MemoireResult<FrameRGBA> {
    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.data.clone())
        .ok_or_else(|| MemoireError::camera("camera frame byte length mismatch"))?;
    let flipped = image::imageops::flip_horizontal(&img);
    Ok(FrameRGBA {
        width: frame.width,
        height: frame.height,
        data: flipped.into_raw(),
        premultiplied: frame.premultiplied,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/capture/roll.rs"]
mod tests;
