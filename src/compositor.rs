//! Layered compositing of a photobooth strip.
//!
//! Layer order is fixed: background, photos clipped to their slots, stickers in list order, frame.
//! The export pass ([`Compositor::export`]) is strict and all-or-nothing; the preview pass
//! ([`Compositor::render_preview`]) degrades per layer. Both draw from one [`SceneLayout`].

use std::sync::Arc;

use crate::assets::PreparedImage;
use crate::assets::loader::AssetLoader;
use crate::config::RenderConfig;
use crate::foundation::core::Size;
use crate::foundation::error::MemoireResult;
use crate::layout::template::LayoutTemplate;
use crate::overlay::sticker::StickerInstance;

pub mod export;
pub mod geometry;
pub mod preview;
pub mod raster;

pub use export::{DeliverySink, DirectorySink, ExportGate, ExportOutcome, ExportPermit, ExportedImage};
pub use geometry::SceneLayout;
pub use preview::PreviewFrame;

use geometry::cover_fit;
use raster::RasterSurface;

/// Everything a render reads. Borrowed from the caller's session state.
#[derive(Clone, Copy, Debug)]
pub struct RenderInputs<'a> {
    pub template: &'a LayoutTemplate,
    /// Reference of the active background image.
    pub background: &'a str,
    /// Photo references by slot index. Extra photos are ignored, missing ones leave the slot empty.
    pub photos: &'a [String],
    pub stickers: &'a [StickerInstance],
}

impl RenderInputs<'_> {
    /// Photo references that land in a slot.
    fn slotted_photos(&self) -> Vec<&str> {
        self.photos
            .iter()
            .take(self.template.slot_count())
            .map(String::as_str)
            .collect()
    }

    /// Distinct sticker sources in first-use order.
    fn sticker_sources(&self) -> Vec<&str> {
        let mut out = Vec::<&str>::new();
        for s in self.stickers {
            if !out.contains(&s.src.as_str()) {
                out.push(&s.src);
            }
        }
        out
    }
}

/// Renders previews and exports from session inputs.
pub struct Compositor {
    loader: Arc<AssetLoader>,
    config: RenderConfig,
    gate: ExportGate,
}

impl Compositor {
    pub fn new(loader: Arc<AssetLoader>, config: RenderConfig) -> MemoireResult<Self> {
        config.validate()?;
        Ok(Self {
            loader,
            config,
            gate: ExportGate::default(),
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn loader(&self) -> &Arc<AssetLoader> {
        &self.loader
    }

    /// Re-entry guard for exports.
    pub fn gate(&self) -> &ExportGate {
        &self.gate
    }
}

/// Decoded layer images, indexed like the scene they belong to.
#[derive(Default)]
struct LoadedLayers {
    background: Option<PreparedImage>,
    /// By slot index.
    photos: Vec<Option<PreparedImage>>,
    /// By sticker list index.
    stickers: Vec<Option<PreparedImage>>,
    frame: Option<PreparedImage>,
}

/// Per-layer draw failure policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DrawPolicy {
    Strict,
    Lenient,
}

fn image_size(img: &PreparedImage) -> Size {
    Size::new(f64::from(img.width), f64::from(img.height))
}

/// Draw `layers` onto `surface` in z-order. Returns the references that failed to draw under
/// [`DrawPolicy::Lenient`].
fn draw_layers(
    surface: &mut RasterSurface,
    layout: &SceneLayout,
    inputs: &RenderInputs<'_>,
    layers: &LoadedLayers,
    policy: DrawPolicy,
) -> MemoireResult<Vec<String>> {
    let mut skipped = Vec::new();
    let mut check = |reference: &str, r: MemoireResult<()>| -> MemoireResult<()> {
        match (r, policy) {
            (Ok(()), _) => Ok(()),
            (Err(e), DrawPolicy::Strict) => Err(e),
            (Err(e), DrawPolicy::Lenient) => {
                tracing::warn!(reference, error = %e, "skipping layer in preview");
                skipped.push(reference.to_string());
                Ok(())
            }
        }
    };
    let full = layout.canvas.rect();

    if let Some(bg) = &layers.background {
        check(inputs.background, surface.draw_stretched(bg, full))?;
    }

    for slot in &layout.slots {
        let Some(Some(photo)) = layers.photos.get(slot.index) else {
            continue;
        };
        let dest = cover_fit(image_size(photo), slot.rect);
        let r = surface.draw_clipped(photo, dest, &slot.clip_path());
        check(&inputs.photos[slot.index], r)?;
    }

    for (placement, img) in layout.stickers.iter().zip(&layers.stickers) {
        let Some(img) = img else {
            continue;
        };
        let r = surface.draw_image(img, placement.image_transform(image_size(img)));
        check(&placement.src, r)?;
    }

    if let Some(frame) = &layers.frame {
        check(
            &inputs.template.frame_image_url,
            surface.draw_stretched(frame, full),
        )?;
    }

    Ok(skipped)
}

#[cfg(test)]
#[path = "../tests/unit/compositor.rs"]
mod tests;
