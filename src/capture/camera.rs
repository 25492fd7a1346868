//! Camera access behind a scoped session.
//!
//! Devices are platform glue, so they sit behind [`CameraDevice`]. [`CameraSession`] owns at most
//! one open stream, reuses it while it is live and stops it when the session is dropped.

use crate::foundation::core::FrameRGBA;
use crate::foundation::error::{MemoireError, MemoireResult};

/// Something that can open a live video stream.
pub trait CameraDevice: Send {
    fn open(&mut self) -> MemoireResult<Box<dyn CameraStream>>;
}

/// An open video stream.
pub trait CameraStream: Send {
    /// Whether the stream is still delivering frames.
    fn is_active(&self) -> bool;

    /// The current frame as straight RGBA8. A stream that has not produced metadata yet may
    /// return a zero-sized frame.
    fn grab(&mut self) -> MemoireResult<FrameRGBA>;

    /// Stop all tracks. Must be idempotent.
    fn stop(&mut self);
}

/// Whether the capture screen currently has a live camera feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedState {
    Live,
    /// No stream, either never acquired or acquisition failed with `reason`.
    NoFeed { reason: Option<String> },
}

pub struct CameraSession<D: CameraDevice> {
    device: D,
    stream: Option<Box<dyn CameraStream>>,
    last_error: Option<String>,
}

impl<D: CameraDevice> CameraSession<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            stream: None,
            last_error: None,
        }
    }

    /// Make sure a live stream is open, reusing the current one when it is still active.
    ///
    /// On failure the session stays usable in the no-feed state and may be retried.
    pub fn acquire(&mut self) -> MemoireResult<()> {
        if self.stream.as_ref().is_some_and(|s| s.is_active()) {
            return Ok(());
        }
        if let Some(mut stale) = self.stream.take() {
            stale.stop();
        }
        match self.device.open() {
            Ok(stream) => {
                tracing::debug!("camera stream acquired");
                self.stream = Some(stream);
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "camera unavailable");
                self.last_error = Some(e.to_string());
                Err(match e {
                    MemoireError::Camera(_) => e,
                    other => MemoireError::camera(other.to_string()),
                })
            }
        }
    }

    pub fn feed_state(&self) -> FeedState {
        match &self.stream {
            Some(s) if s.is_active() => FeedState::Live,
            _ => FeedState::NoFeed {
                reason: self.last_error.clone(),
            },
        }
    }

    /// Grab the current frame from the live stream.
    pub fn grab(&mut self) -> MemoireResult<FrameRGBA> {
        match self.stream.as_mut() {
            Some(s) if s.is_active() => s.grab(),
            _ => Err(MemoireError::camera("no live camera feed")),
        }
    }

    /// Stop and drop the stream, if any.
    pub fn release(&mut self) {
        if let Some(mut s) = self.stream.take() {
            s.stop();
            tracing::debug!("camera stream released");
        }
    }

    pub fn device(&self) -> &D {
        &self.device
    }
}

impl<D: CameraDevice> Drop for CameraSession<D> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<D: CameraDevice> std::fmt::Debug for CameraSession<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSession")
            .field("feed", &self.feed_state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/camera.rs"]
pub(crate) mod tests;
