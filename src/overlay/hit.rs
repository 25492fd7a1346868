use crate::foundation::core::{Affine, Point, Rect, Size, Vec2};
use crate::foundation::space::{CanvasSpace, percent_to_screen};
use crate::overlay::sticker::{StickerId, StickerInstance};

/// Side of a corner scale handle, in unscaled sticker pixels.
pub const HANDLE_SIZE: f64 = 10.0;
/// Distance from the sticker's top edge to the top of the rotate handle.
pub const ROTATE_OFFSET: f64 = 24.0;
/// Diameter of the rotate handle.
pub const ROTATE_SIZE: f64 = 14.0;
/// Side of the remove button, centred on the top-right corner.
pub const REMOVE_SIZE: f64 = 24.0;

/// One of the four scale handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    fn signs(self) -> Vec2 {
        match self {
            Self::TopLeft => Vec2::new(-1.0, -1.0),
            Self::TopRight => Vec2::new(1.0, -1.0),
            Self::BottomLeft => Vec2::new(-1.0, 1.0),
            Self::BottomRight => Vec2::new(1.0, 1.0),
        }
    }
}

/// Which part of a sticker a point landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
    Body,
    Scale(Corner),
    Rotate,
    Remove,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hit {
    pub id: StickerId,
    pub target: HitTarget,
}

/// Screen-space placement of one sticker on a measured preview surface.
///
/// Local coordinates have their origin at the sticker centre, are unrotated and unscaled, so the
/// box spans `[-side/2, side/2]` on both axes with `side = base_px * surface factor`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StickerFrame {
    pub center: Point,
    pub side: f64,
    pub rotation_deg: f64,
    pub scale: f64,
}

impl StickerFrame {
    /// Place `sticker` on `surface` (screen rect of the preview) for a template of `reference`
    /// size. Returns `None` when the surface has no measurable area.
    pub fn on_surface(
        sticker: &StickerInstance,
        surface: Rect,
        reference: Size,
        base_px: f64,
    ) -> Option<Self> {
        let space = CanvasSpace::new(reference, surface.size()).ok()?;
        Some(Self {
            center: percent_to_screen(sticker.center_percent(), surface),
            side: space.length_to_target(base_px),
            rotation_deg: sticker.rotation,
            scale: sticker.scale,
        })
    }

    /// Local sticker space to screen space.
    pub fn to_screen(&self) -> Affine {
        Affine::translate(self.center.to_vec2())
            * Affine::rotate(self.rotation_deg.to_radians())
            * Affine::scale(self.scale)
    }

    pub fn to_local(&self, p: Point) -> Point {
        self.to_screen().inverse() * p
    }

    /// Unrotated bounding box of the sticker body in local coordinates.
    pub fn body(&self) -> Rect {
        let h = self.side / 2.0;
        Rect::new(-h, -h, h, h)
    }

    pub fn handle(&self, corner: Corner) -> Rect {
        let h = self.side / 2.0;
        let s = corner.signs();
        Rect::from_center_size((s.x * h, s.y * h), (HANDLE_SIZE, HANDLE_SIZE))
    }

    pub fn rotate_handle_center(&self) -> Point {
        Point::new(0.0, -self.side / 2.0 - ROTATE_OFFSET + ROTATE_SIZE / 2.0)
    }

    pub fn remove_button(&self) -> Rect {
        let h = self.side / 2.0;
        Rect::from_center_size((h, -h), (REMOVE_SIZE, REMOVE_SIZE))
    }

    /// Resolve `p` (screen) against this sticker. Controls are only live when `selected`.
    ///
    /// Controls stack rotate handle over scale handles over the remove button over the body.
    pub fn hit(&self, p: Point, selected: bool) -> Option<HitTarget> {
        let local = self.to_local(p);
        if selected {
            if (local - self.rotate_handle_center()).hypot() <= ROTATE_SIZE / 2.0 {
                return Some(HitTarget::Rotate);
            }
            for corner in Corner::ALL {
                if self.handle(corner).contains(local) {
                    return Some(HitTarget::Scale(corner));
                }
            }
            if self.remove_button().contains(local) {
                return Some(HitTarget::Remove);
            }
        }
        self.body().contains(local).then_some(HitTarget::Body)
    }
}

/// Find the sticker part under `p`.
///
/// The selected sticker is drawn above the others so it is tested first; the rest are tested
/// top-most (last in list order) first.
pub fn hit_test(
    p: Point,
    stickers: &[StickerInstance],
    selected: Option<&StickerId>,
    surface: Rect,
    reference: Size,
    base_px: f64,
) -> Option<Hit> {
    let selected_sticker = selected.and_then(|id| stickers.iter().find(|s| &s.id == id));
    let ordered = selected_sticker.into_iter().chain(
        stickers
            .iter()
            .rev()
            .filter(|s| Some(&s.id) != selected),
    );
    for s in ordered {
        let Some(frame) = StickerFrame::on_surface(s, surface, reference, base_px) else {
            return None;
        };
        let is_selected = Some(&s.id) == selected;
        if let Some(target) = frame.hit(p, is_selected) {
            return Some(Hit {
                id: s.id.clone(),
                target,
            });
        }
    }
    None
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/hit.rs"]
mod tests;
