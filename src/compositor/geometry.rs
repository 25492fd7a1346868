//! Layout math shared by preview and export.
//!
//! [`SceneLayout::compute`] is the only place slot rects, clip radii and sticker placements are
//! derived. Both render passes call it with their own scale factor.

use kurbo::{RoundedRect, Shape};

use crate::config::RenderConfig;
use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Size};
use crate::foundation::error::MemoireResult;
use crate::foundation::space::CanvasSpace;
use crate::layout::template::LayoutTemplate;
use crate::overlay::sticker::{StickerId, StickerInstance};

const CLIP_TOLERANCE: f64 = 0.1;

/// Destination rect that covers `slot` with an image of `image` size.
///
/// Uniform scale `max(slot.w / img.w, slot.h / img.h)`, centred, so the overflow is cropped
/// equally on both sides of the overflowing axis and no part of the slot is left uncovered.
pub fn cover_fit(image: Size, slot: Rect) -> Rect {
    if image.width <= 0.0 || image.height <= 0.0 {
        return slot;
    }
    let k = (slot.width() / image.width).max(slot.height() / image.height);
    Rect::from_center_size(slot.center(), image * k)
}

/// Destination rect that fits `image` entirely inside a `side`-wide square centred at the
/// origin.
pub fn contain_fit_square(image: Size, side: f64) -> Rect {
    if image.width <= 0.0 || image.height <= 0.0 {
        return Rect::from_center_size(Point::ZERO, (side, side));
    }
    let k = side / image.width.max(image.height);
    Rect::from_center_size(Point::ZERO, image * k)
}

/// Corner radius for a slot drawn at `factor`: `nominal * factor`, never more than half the
/// slot's shorter side.
pub fn clip_radius(nominal: f64, factor: f64, rect: Rect) -> f64 {
    (nominal * factor)
        .min(rect.width() / 2.0)
        .min(rect.height() / 2.0)
        .max(0.0)
}

pub fn rounded_slot_path(rect: Rect, radius: f64) -> BezPath {
    RoundedRect::from_rect(rect, radius).to_path(CLIP_TOLERANCE)
}

/// A slot placed on the target surface.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotPlacement {
    pub index: usize,
    pub rect: Rect,
    pub radius: f64,
}

impl SlotPlacement {
    pub fn clip_path(&self) -> BezPath {
        rounded_slot_path(self.rect, self.radius)
    }
}

/// A sticker placed on the target surface.
#[derive(Clone, Debug, PartialEq)]
pub struct StickerPlacement {
    pub id: StickerId,
    pub src: String,
    /// Centre in target pixels.
    pub center: Point,
    /// Side of the square the sticker image is contain-fitted into.
    pub side: f64,
    pub rotation_rad: f64,
}

impl StickerPlacement {
    /// Transform mapping image pixel space `(0,0)-(w,h)` onto the surface.
    pub fn image_transform(&self, image: Size) -> Affine {
        let dest = contain_fit_square(image, self.side);
        let k = if image.width > 0.0 {
            dest.width() / image.width
        } else {
            1.0
        };
        Affine::translate(self.center.to_vec2())
            * Affine::rotate(self.rotation_rad)
            * Affine::translate(dest.origin().to_vec2())
            * Affine::scale(k)
    }
}

/// Everything the draw pass needs to know about where things go.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneLayout {
    pub canvas: Canvas,
    pub factor: f64,
    pub slots: Vec<SlotPlacement>,
    pub stickers: Vec<StickerPlacement>,
}

impl SceneLayout {
    /// Lay out `template` and `stickers` at `factor` times the reference resolution.
    pub fn compute(
        template: &LayoutTemplate,
        stickers: &[StickerInstance],
        factor: f64,
        config: &RenderConfig,
    ) -> MemoireResult<Self> {
        let canvas = Canvas::new(template.canvas_width, template.canvas_height)?.scaled(factor)?;
        let space = CanvasSpace::new(template.reference_size(), canvas.size())?;
        let length_factor = space.length_factor();

        let slots = template
            .slots
            .iter()
            .enumerate()
            .map(|(index, slot)| {
                let rect = space.rect_to_target(slot.rect());
                SlotPlacement {
                    index,
                    rect,
                    radius: clip_radius(config.slot_corner_radius_px, length_factor, rect),
                }
            })
            .collect();

        let stickers = stickers
            .iter()
            .map(|s| StickerPlacement {
                id: s.id.clone(),
                src: s.src.clone(),
                center: space.percent_to_target(s.center_percent()),
                side: space.length_to_target(config.sticker_base_px) * s.scale,
                rotation_rad: s.rotation.to_radians(),
            })
            .collect();

        Ok(Self {
            canvas,
            factor: length_factor,
            slots,
            stickers,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/geometry.rs"]
mod tests;
