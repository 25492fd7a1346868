use crate::foundation::error::{MemoireError, MemoireResult};

/// Direction for [`UploadTray::move_photo`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shift {
    Up,
    Down,
}

/// Photos picked from disk before they are placed into slots.
///
/// Holds at most `max` references; continuing requires at least `min`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadTray {
    min: usize,
    max: usize,
    photos: Vec<String>,
}

impl UploadTray {
    pub fn new(min: usize, max: usize) -> MemoireResult<Self> {
        if min > max {
            return Err(MemoireError::validation(format!(
                "upload minimum {min} exceeds maximum {max}"
            )));
        }
        Ok(Self {
            min,
            max,
            photos: Vec::new(),
        })
    }

    /// Tray sized for a template: exactly `slots` photos.
    pub fn for_slots(slots: usize) -> Self {
        Self {
            min: slots,
            max: slots,
            photos: Vec::new(),
        }
    }

    pub fn photos(&self) -> &[String] {
        &self.photos
    }

    pub fn remaining(&self) -> usize {
        self.max.saturating_sub(self.photos.len())
    }

    /// Append as many of `references` as fit; the rest are dropped. Returns how many were added.
    pub fn add<I, S>(&mut self, references: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let room = self.remaining();
        let before = self.photos.len();
        self.photos
            .extend(references.into_iter().take(room).map(Into::into));
        self.photos.len() - before
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.photos.len()).then(|| self.photos.remove(index))
    }

    /// Swap the photo at `index` with its neighbour. Moves past either end are no-ops.
    pub fn move_photo(&mut self, index: usize, shift: Shift) -> bool {
        let target = match shift {
            Shift::Up => index.checked_sub(1),
            Shift::Down => index.checked_add(1),
        };
        match target {
            Some(t) if t < self.photos.len() && index < self.photos.len() => {
                self.photos.swap(index, t);
                true
            }
            _ => false,
        }
    }

    pub fn can_continue(&self) -> bool {
        self.photos.len() >= self.min
    }

    /// Hand the photos over, if there are enough of them.
    pub fn finish(self) -> MemoireResult<Vec<String>> {
        if !self.can_continue() {
            return Err(MemoireError::validation(format!(
                "need at least {} photos, have {}",
                self.min,
                self.photos.len()
            )));
        }
        Ok(self.photos)
    }
}
