use serde::{Deserialize, Serialize};

use crate::foundation::core::Point;

/// Lower bound of a sticker's scale multiplier.
pub const MIN_STICKER_SCALE: f64 = 0.2;
/// Upper bound of a sticker's scale multiplier.
pub const MAX_STICKER_SCALE: f64 = 4.0;

/// Clamp a scale multiplier into the allowed sticker range.
pub fn clamp_scale(scale: f64) -> f64 {
    scale.clamp(MIN_STICKER_SCALE, MAX_STICKER_SCALE)
}

/// Session-unique sticker identity.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StickerId(pub String);

impl StickerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StickerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One user-placed sticker.
///
/// `x`/`y` are the centre in percent of canvas width/height, `rotation` is in degrees and
/// unbounded, `scale` is a multiplier of the base sticker size.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StickerInstance {
    pub id: StickerId,
    pub src: String,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub scale: f64,
}

impl StickerInstance {
    pub fn center_percent(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn transform(&self) -> StickerTransform {
        StickerTransform {
            x: self.x,
            y: self.y,
            rotation: self.rotation,
            scale: self.scale,
        }
    }

    pub fn apply(&mut self, t: StickerTransform) {
        self.x = t.x;
        self.y = t.y;
        self.rotation = t.rotation;
        self.scale = clamp_scale(t.scale);
    }
}

/// The mutable part of a sticker, snapshotted at gesture start.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StickerTransform {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub scale: f64,
}

/// Ordered sticker collection; order is z-order, last drawn on top.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StickerList {
    items: Vec<StickerInstance>,
    next_seq: u64,
}

impl StickerList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a list from stored instances, keeping order. Scales are clamped.
    pub fn from_instances(items: Vec<StickerInstance>) -> Self {
        let mut list = Self::default();
        for mut s in items {
            s.scale = clamp_scale(s.scale);
            list.items.push(s);
        }
        list
    }

    /// Append a new sticker centred on the canvas at scale 1 and return its id.
    pub fn add(&mut self, src: impl Into<String>) -> StickerId {
        let id = self.fresh_id();
        self.items.push(StickerInstance {
            id: id.clone(),
            src: src.into(),
            x: 50.0,
            y: 50.0,
            rotation: 0.0,
            scale: 1.0,
        });
        id
    }

    pub fn get(&self, id: &StickerId) -> Option<&StickerInstance> {
        self.items.iter().find(|s| &s.id == id)
    }

    pub fn get_mut(&mut self, id: &StickerId) -> Option<&mut StickerInstance> {
        self.items.iter_mut().find(|s| &s.id == id)
    }

    /// Apply `t` to sticker `id`. Returns `false` when the id is unknown.
    pub fn update(&mut self, id: &StickerId, t: StickerTransform) -> bool {
        match self.get_mut(id) {
            Some(s) => {
                s.apply(t);
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &StickerId) -> Option<StickerInstance> {
        let idx = self.items.iter().position(|s| &s.id == id)?;
        Some(self.items.remove(idx))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StickerInstance> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[StickerInstance] {
        &self.items
    }

    fn fresh_id(&mut self) -> StickerId {
        loop {
            self.next_seq += 1;
            let id = StickerId(format!("stk-{}", self.next_seq));
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

impl<'a> IntoIterator for &'a StickerList {
    type Item = &'a StickerInstance;
    type IntoIter = std::slice::Iter<'a, StickerInstance>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/sticker.rs"]
mod tests;
