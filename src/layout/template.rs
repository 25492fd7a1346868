use serde::{Deserialize, Serialize};

use crate::foundation::core::{Rect, Size};
use crate::foundation::error::{MemoireError, MemoireResult};

/// A photo slot in reference-resolution canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Slot {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

/// A layout template: reference canvas size, ordered slots and its decorative frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutTemplate {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub frame_image_url: String,
    pub preview_image_url: String,
    pub slots: Vec<Slot>,
}

impl LayoutTemplate {
    /// Build a template, checking that every slot sits inside the canvas.
    pub fn new(
        canvas_width: u32,
        canvas_height: u32,
        frame_image_url: impl Into<String>,
        preview_image_url: impl Into<String>,
        slots: Vec<Slot>,
    ) -> MemoireResult<Self> {
        let tpl = Self {
            canvas_width,
            canvas_height,
            frame_image_url: frame_image_url.into(),
            preview_image_url: preview_image_url.into(),
            slots,
        };
        tpl.validate()?;
        Ok(tpl)
    }

    pub fn reference_size(&self) -> Size {
        Size::new(f64::from(self.canvas_width), f64::from(self.canvas_height))
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn validate(&self) -> MemoireResult<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(MemoireError::validation(
                "template canvas dimensions must be > 0",
            ));
        }
        let bounds = Rect::from_origin_size((0.0, 0.0), self.reference_size());
        for (i, slot) in self.slots.iter().enumerate() {
            let r = slot.rect();
            let finite = [slot.x, slot.y, slot.width, slot.height]
                .iter()
                .all(|v| v.is_finite());
            if !finite || slot.width <= 0.0 || slot.height <= 0.0 {
                return Err(MemoireError::validation(format!(
                    "slot {i} must have finite, positive dimensions"
                )));
            }
            if r.x0 < bounds.x0 || r.y0 < bounds.y0 || r.x1 > bounds.x1 || r.y1 > bounds.y1 {
                return Err(MemoireError::validation(format!(
                    "slot {i} lies outside the {}x{} canvas",
                    self.canvas_width, self.canvas_height
                )));
            }
        }
        Ok(())
    }
}

/// The fixed template catalog.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateKey {
    #[default]
    #[serde(rename = "vertical-2")]
    Vertical2,
    #[serde(rename = "vertical-3")]
    Vertical3,
    #[serde(rename = "vertical-4")]
    Vertical4,
    #[serde(rename = "staggered-2x2")]
    Staggered2x2,
    #[serde(rename = "grid-2x2")]
    Grid2x2,
}

impl TemplateKey {
    /// Templates offered in the layout picker, in display order.
    pub const AVAILABLE: [TemplateKey; 4] = [
        TemplateKey::Vertical2,
        TemplateKey::Vertical3,
        TemplateKey::Vertical4,
        TemplateKey::Staggered2x2,
    ];

    pub const ALL: [TemplateKey; 5] = [
        TemplateKey::Vertical2,
        TemplateKey::Vertical3,
        TemplateKey::Vertical4,
        TemplateKey::Staggered2x2,
        TemplateKey::Grid2x2,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vertical2 => "vertical-2",
            Self::Vertical3 => "vertical-3",
            Self::Vertical4 => "vertical-4",
            Self::Staggered2x2 => "staggered-2x2",
            Self::Grid2x2 => "grid-2x2",
        }
    }

    pub fn template(self) -> LayoutTemplate {
        let (frame, preview, slots): (&str, &str, &[Slot]) = match self {
            Self::Vertical2 => (
                "assets/frames/vertical2.png",
                "assets/layouts/vertical2.png",
                &VERTICAL_2_SLOTS,
            ),
            Self::Vertical3 => (
                "assets/frames/vertical3.png",
                "assets/layouts/vertical3.png",
                &VERTICAL_3_SLOTS,
            ),
            Self::Vertical4 => (
                "assets/frames/vertical4.png",
                "assets/layouts/vertical4.png",
                &VERTICAL_4_SLOTS,
            ),
            // Shares the 2x2 grid frame until a dedicated staggered frame exists.
            Self::Staggered2x2 => (
                "assets/frames/grid2x2.png",
                "assets/layouts/grid2x2.png",
                &STAGGERED_2X2_SLOTS,
            ),
            Self::Grid2x2 => (
                "assets/frames/grid2x2.png",
                "assets/layouts/grid2x2.png",
                &GRID_2X2_SLOTS,
            ),
        };
        LayoutTemplate {
            canvas_width: REFERENCE_WIDTH,
            canvas_height: REFERENCE_HEIGHT,
            frame_image_url: frame.to_string(),
            preview_image_url: preview.to_string(),
            slots: slots.to_vec(),
        }
    }
}

impl std::str::FromStr for TemplateKey {
    type Err = MemoireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| MemoireError::validation(format!("unknown template '{s}'")))
    }
}

const REFERENCE_WIDTH: u32 = 1080;
const REFERENCE_HEIGHT: u32 = 1920;

const VERTICAL_2_SLOTS: [Slot; 2] = [
    Slot::new(123.0, 212.0, 834.0, 728.0),
    Slot::new(123.0, 1020.0, 834.0, 728.0),
];

const VERTICAL_3_SLOTS: [Slot; 3] = [
    Slot::new(108.0, 192.0, 864.0, 480.0),
    Slot::new(108.0, 702.0, 864.0, 480.0),
    Slot::new(108.0, 1212.0, 864.0, 480.0),
];

const VERTICAL_4_SLOTS: [Slot; 4] = [
    Slot::new(108.0, 192.0, 864.0, 360.0),
    Slot::new(108.0, 582.0, 864.0, 360.0),
    Slot::new(108.0, 972.0, 864.0, 360.0),
    Slot::new(108.0, 1362.0, 864.0, 360.0),
];

const STAGGERED_2X2_SLOTS: [Slot; 4] = [
    Slot::new(108.0, 215.0, 417.0, 650.0),
    Slot::new(108.0, 895.0, 417.0, 650.0),
    Slot::new(555.0, 375.0, 417.0, 650.0),
    Slot::new(555.0, 1055.0, 417.0, 650.0),
];

const GRID_2X2_SLOTS: [Slot; 4] = [
    Slot::new(108.0, 192.0, 414.0, 414.0),
    Slot::new(558.0, 192.0, 414.0, 414.0),
    Slot::new(108.0, 642.0, 414.0, 414.0),
    Slot::new(558.0, 642.0, 414.0, 414.0),
];

#[cfg(test)]
#[path = "../../tests/unit/layout/template.rs"]
mod tests;
