//! Pointer-driven sticker manipulation.
//!
//! [`OverlayEngine`] owns the current selection and a table of in-flight gestures keyed by
//! pointer id. It never owns the stickers: every call takes the caller's [`StickerList`] and
//! mutates it in place, so the sticker list is always the single source of truth.
//!
//! Lifecycle per pointer: `press` starts a gesture in one of three modes (chosen by what was hit),
//! `move` updates the sticker from the snapshot taken at press, `release`/`cancel` return the
//! pointer to idle keeping the last update.

use std::collections::BTreeMap;

use crate::foundation::core::{Point, Rect, Size, Vec2};
use crate::foundation::space::{percent_to_screen, screen_delta_to_percent};
use crate::overlay::hit::{HitTarget, hit_test};
use crate::overlay::sticker::{StickerId, StickerList, StickerTransform, clamp_scale};

/// Radii below this are treated as this, so a press on the exact centre cannot divide by zero.
const MIN_RADIUS_PX: f64 = 1.0;

pub type PointerId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    Press,
    Move,
    Release,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub pointer: PointerId,
    pub position: Point,
    pub phase: PointerPhase,
}

impl PointerEvent {
    pub fn new(pointer: PointerId, position: impl Into<Point>, phase: PointerPhase) -> Self {
        Self {
            pointer,
            position: position.into(),
            phase,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GestureMode {
    #[default]
    Idle,
    Move,
    Scale,
    Rotate,
}

impl GestureMode {
    fn for_target(target: HitTarget) -> Option<Self> {
        match target {
            HitTarget::Body => Some(Self::Move),
            HitTarget::Scale(_) => Some(Self::Scale),
            HitTarget::Rotate => Some(Self::Rotate),
            HitTarget::Remove => None,
        }
    }
}

/// What an input call did to the session.
#[derive(Clone, Debug, PartialEq)]
pub enum GestureOutcome {
    /// Nothing changed.
    Ignored,
    /// The sticker became selected but no gesture started.
    Selected(StickerId),
    /// The sticker became selected and a gesture started for the pointer.
    Started { id: StickerId, mode: GestureMode },
    /// The sticker's transform changed.
    Updated { id: StickerId, transform: StickerTransform },
    /// The pointer's gesture finished.
    Ended(StickerId),
    /// The sticker was deleted.
    Removed(StickerId),
}

#[derive(Clone, Debug)]
struct ActiveGesture {
    sticker: StickerId,
    mode: GestureMode,
    start: StickerTransform,
    start_pointer: Point,
    center: Point,
    start_radius: f64,
    start_angle: f64,
}

#[derive(Clone, Debug)]
pub struct OverlayEngine {
    reference: Size,
    base_px: f64,
    selected: Option<StickerId>,
    gestures: BTreeMap<PointerId, ActiveGesture>,
}

impl OverlayEngine {
    /// Engine for a template of `reference` size drawing stickers `base_px` wide at scale 1.
    pub fn new(reference: Size, base_px: f64) -> Self {
        Self {
            reference,
            base_px,
            selected: None,
            gestures: BTreeMap::new(),
        }
    }

    pub fn reference(&self) -> Size {
        self.reference
    }

    /// Switch to a new template geometry. In-flight gestures are dropped.
    pub fn set_reference(&mut self, reference: Size) {
        self.reference = reference;
        self.gestures.clear();
    }

    pub fn selected(&self) -> Option<&StickerId> {
        self.selected.as_ref()
    }

    pub fn select(&mut self, id: StickerId) {
        self.selected = Some(id);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Drop selection and every gesture.
    pub fn reset(&mut self) {
        self.selected = None;
        self.gestures.clear();
    }

    /// Current mode of `pointer`.
    pub fn mode(&self, pointer: PointerId) -> GestureMode {
        self.gestures
            .get(&pointer)
            .map_or(GestureMode::Idle, |g| g.mode)
    }

    /// Mode of the gesture currently driving `id`, if any.
    pub fn mode_for(&self, id: &StickerId) -> GestureMode {
        self.gestures
            .values()
            .find(|g| &g.sticker == id)
            .map_or(GestureMode::Idle, |g| g.mode)
    }

    pub fn active_gestures(&self) -> usize {
        self.gestures.len()
    }

    /// Route one pointer event. Presses are hit-tested against `stickers` on `surface`; without a
    /// measured surface presses and moves are ignored.
    pub fn handle(
        &mut self,
        stickers: &mut StickerList,
        event: PointerEvent,
        surface: Option<Rect>,
    ) -> GestureOutcome {
        match event.phase {
            PointerPhase::Press => match surface {
                Some(surface) => self.pointer_down(stickers, event.pointer, event.position, surface),
                None => GestureOutcome::Ignored,
            },
            PointerPhase::Move => self.pointer_move(stickers, event.pointer, event.position, surface),
            PointerPhase::Release | PointerPhase::Cancel => self.pointer_up(event.pointer),
        }
    }

    /// Hit-test `position` and act on whatever part of which sticker it lands on.
    ///
    /// Presses on empty space leave the selection untouched.
    pub fn pointer_down(
        &mut self,
        stickers: &mut StickerList,
        pointer: PointerId,
        position: Point,
        surface: Rect,
    ) -> GestureOutcome {
        let Some(hit) = hit_test(
            position,
            stickers.as_slice(),
            self.selected.as_ref(),
            surface,
            self.reference,
            self.base_px,
        ) else {
            return GestureOutcome::Ignored;
        };
        match GestureMode::for_target(hit.target) {
            Some(mode) => self.press(stickers, pointer, hit.id, mode, position, Some(surface)),
            None => self.remove(stickers, &hit.id),
        }
    }

    /// Start a `mode` gesture on a sticker the caller already resolved.
    ///
    /// The sticker is selected first. If `surface` is missing (or unmeasurable) no gesture
    /// starts. A second pointer pressing a sticker that already has a gesture is ignored.
    pub fn press(
        &mut self,
        stickers: &StickerList,
        pointer: PointerId,
        id: StickerId,
        mode: GestureMode,
        position: Point,
        surface: Option<Rect>,
    ) -> GestureOutcome {
        let Some(sticker) = stickers.get(&id) else {
            return GestureOutcome::Ignored;
        };
        if self
            .gestures
            .iter()
            .any(|(p, g)| *p != pointer && g.sticker == id)
        {
            return GestureOutcome::Ignored;
        }
        self.selected = Some(id.clone());

        let Some(surface) = surface.filter(|s| s.width() > 0.0 && s.height() > 0.0) else {
            return GestureOutcome::Selected(id);
        };
        if mode == GestureMode::Idle {
            self.gestures.remove(&pointer);
            return GestureOutcome::Selected(id);
        }

        let center = percent_to_screen(sticker.center_percent(), surface);
        let offset = position - center;
        self.gestures.insert(
            pointer,
            ActiveGesture {
                sticker: id.clone(),
                mode,
                start: sticker.transform(),
                start_pointer: position,
                center,
                start_radius: offset.hypot().max(MIN_RADIUS_PX),
                start_angle: offset.y.atan2(offset.x),
            },
        );
        tracing::debug!(sticker = %id, ?mode, pointer, "gesture started");
        GestureOutcome::Started { id, mode }
    }

    /// Apply the pointer's gesture for its new `position`.
    pub fn pointer_move(
        &mut self,
        stickers: &mut StickerList,
        pointer: PointerId,
        position: Point,
        surface: Option<Rect>,
    ) -> GestureOutcome {
        let Some(g) = self.gestures.get(&pointer) else {
            return GestureOutcome::Ignored;
        };
        let Some(surface) = surface.filter(|s| s.width() > 0.0 && s.height() > 0.0) else {
            return GestureOutcome::Ignored;
        };

        let mut t = g.start;
        match g.mode {
            GestureMode::Idle => return GestureOutcome::Ignored,
            GestureMode::Move => {
                let d = screen_delta_to_percent(position - g.start_pointer, surface.size());
                t.x = g.start.x + d.x;
                t.y = g.start.y + d.y;
            }
            GestureMode::Scale => {
                let r = (position - g.center).hypot().max(MIN_RADIUS_PX);
                t.scale = clamp_scale(g.start.scale * r / g.start_radius);
            }
            GestureMode::Rotate => {
                let v: Vec2 = position - g.center;
                let angle = v.y.atan2(v.x);
                t.rotation = g.start.rotation + (angle - g.start_angle).to_degrees();
            }
        }

        let id = g.sticker.clone();
        if !stickers.update(&id, t) {
            self.gestures.remove(&pointer);
            return GestureOutcome::Ignored;
        }
        GestureOutcome::Updated { id, transform: t }
    }

    /// End the pointer's gesture, keeping whatever was last applied.
    pub fn pointer_up(&mut self, pointer: PointerId) -> GestureOutcome {
        match self.gestures.remove(&pointer) {
            Some(g) => {
                tracing::debug!(sticker = %g.sticker, pointer, "gesture ended");
                GestureOutcome::Ended(g.sticker)
            }
            None => GestureOutcome::Ignored,
        }
    }

    /// End the pointer's gesture and put the sticker back where it was at press.
    pub fn cancel_gesture(&mut self, stickers: &mut StickerList, pointer: PointerId) -> GestureOutcome {
        let Some(g) = self.gestures.remove(&pointer) else {
            return GestureOutcome::Ignored;
        };
        if stickers.update(&g.sticker, g.start) {
            GestureOutcome::Updated {
                id: g.sticker,
                transform: g.start,
            }
        } else {
            GestureOutcome::Ignored
        }
    }

    /// Delete a sticker, clearing selection and any gesture that referenced it.
    pub fn remove(&mut self, stickers: &mut StickerList, id: &StickerId) -> GestureOutcome {
        if stickers.remove(id).is_none() {
            return GestureOutcome::Ignored;
        }
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        self.gestures.retain(|_, g| &g.sticker != id);
        GestureOutcome::Removed(id.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/gesture.rs"]
mod tests;
