use crate::foundation::error::{MemoireError, MemoireResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};

/// Pixel dimensions of a drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> MemoireResult<Self> {
        if width == 0 || height == 0 {
            return Err(MemoireError::validation("canvas dimensions must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub fn size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    pub fn rect(self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.size())
    }

    /// Scale both dimensions by `factor`, rounding to the nearest pixel.
    pub fn scaled(self, factor: f64) -> MemoireResult<Self> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(MemoireError::validation("canvas scale must be finite and > 0"));
        }
        let w = (f64::from(self.width) * factor).round();
        let h = (f64::from(self.height) * factor).round();
        Self::new(w.max(1.0) as u32, h.max(1.0) as u32)
    }
}

/// A rendered frame read back from a CPU surface.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Drop alpha, flattening onto black.
    ///
    /// For premultiplied data this is exactly the colour channels; straight data is multiplied
    /// through first.
    pub fn to_rgb8_over_black(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity((self.width as usize) * (self.height as usize) * 3);
        for px in self.data.chunks_exact(4) {
            if self.premultiplied {
                out.extend_from_slice(&px[..3]);
            } else {
                let a = u16::from(px[3]);
                for &c in &px[..3] {
                    out.push(((u16::from(c) * a + 127) / 255) as u8);
                }
            }
        }
        out
    }
}
