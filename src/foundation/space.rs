//! Coordinate-space conversions shared by preview and export.
//!
//! Every piece of layout math that maps template geometry onto a concrete surface goes through
//! [`CanvasSpace`]. Preview and export differ only in the target size they construct it with, so
//! the two passes cannot drift apart.

use crate::foundation::core::{Point, Rect, Size, Vec2};
use crate::foundation::error::{MemoireError, MemoireResult};

/// Mapping from a template's reference resolution onto a target surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasSpace {
    reference: Size,
    target: Size,
}

impl CanvasSpace {
    /// Map `reference` onto `target`. Both sizes must be finite and positive.
    pub fn new(reference: Size, target: Size) -> MemoireResult<Self> {
        for (name, s) in [("reference", reference), ("target", target)] {
            if !(s.width.is_finite() && s.height.is_finite()) || s.width <= 0.0 || s.height <= 0.0
            {
                return Err(MemoireError::validation(format!(
                    "{name} size must be finite and > 0, got {}x{}",
                    s.width, s.height
                )));
            }
        }
        Ok(Self { reference, target })
    }

    /// Uniform scaling of `reference` by `factor` (export scale, preview scale).
    pub fn scaled(reference: Size, factor: f64) -> MemoireResult<Self> {
        Self::new(reference, reference * factor)
    }

    pub fn reference(&self) -> Size {
        self.reference
    }

    pub fn target(&self) -> Size {
        self.target
    }

    /// Per-axis factors `target / reference`.
    pub fn factors(&self) -> Vec2 {
        Vec2::new(
            self.target.width / self.reference.width,
            self.target.height / self.reference.height,
        )
    }

    /// Scalar factor for lengths that are not tied to one axis (corner radii, sticker sizes).
    pub fn length_factor(&self) -> f64 {
        let f = self.factors();
        f.x.min(f.y)
    }

    /// Scale a reference-resolution rectangle onto the target surface.
    pub fn rect_to_target(&self, r: Rect) -> Rect {
        let f = self.factors();
        Rect::new(r.x0 * f.x, r.y0 * f.y, r.x1 * f.x, r.y1 * f.y)
    }

    pub fn length_to_target(&self, v: f64) -> f64 {
        v * self.length_factor()
    }

    /// Percent-of-canvas position (0..=100 on both axes) to target pixels.
    pub fn percent_to_target(&self, p: Point) -> Point {
        Point::new(
            p.x / 100.0 * self.target.width,
            p.y / 100.0 * self.target.height,
        )
    }

    /// Target pixels back to percent-of-canvas.
    pub fn target_to_percent(&self, p: Point) -> Point {
        Point::new(
            p.x / self.target.width * 100.0,
            p.y / self.target.height * 100.0,
        )
    }
}

/// Convert a pointer delta in screen pixels to a percent delta on a surface of `surface` size.
pub fn screen_delta_to_percent(delta: Vec2, surface: Size) -> Vec2 {
    Vec2::new(
        delta.x / surface.width * 100.0,
        delta.y / surface.height * 100.0,
    )
}

/// Position of a percent-of-canvas point on a surface laid out at `surface` in screen space.
pub fn percent_to_screen(p: Point, surface: Rect) -> Point {
    Point::new(
        surface.x0 + p.x / 100.0 * surface.width(),
        surface.y0 + p.y / 100.0 * surface.height(),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/space.rs"]
mod tests;
