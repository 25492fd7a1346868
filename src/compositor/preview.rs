use crate::assets::PreparedImage;
use crate::compositor::raster::RasterSurface;
use crate::compositor::{Compositor, DrawPolicy, LoadedLayers, RenderInputs, SceneLayout, draw_layers};
use crate::foundation::core::FrameRGBA;
use crate::foundation::error::MemoireResult;

/// A best-effort preview render.
#[derive(Clone, Debug)]
pub struct PreviewFrame {
    pub frame: FrameRGBA,
    /// References that failed to load or draw and were left out.
    pub degraded: Vec<String>,
}

impl PreviewFrame {
    pub fn is_complete(&self) -> bool {
        self.degraded.is_empty()
    }
}

impl Compositor {
    /// Render at the configured preview scale.
    pub fn render_preview(&self, inputs: &RenderInputs<'_>) -> MemoireResult<PreviewFrame> {
        self.render_preview_scaled(inputs, self.config().preview_scale)
    }

    /// Render at `factor` times the reference resolution. Layers and slots whose image cannot be
    /// loaded are skipped; only invalid geometry is an error.
    #[tracing::instrument(skip(self, inputs))]
    pub fn render_preview_scaled(
        &self,
        inputs: &RenderInputs<'_>,
        factor: f64,
    ) -> MemoireResult<PreviewFrame> {
        let layout = SceneLayout::compute(inputs.template, inputs.stickers, factor, self.config())?;
        let mut degraded = Vec::new();
        let layers = self.load_lenient(inputs, &mut degraded);

        let mut surface = RasterSurface::new(layout.canvas)?;
        let skipped = draw_layers(&mut surface, &layout, inputs, &layers, DrawPolicy::Lenient)?;
        degraded.extend(skipped);

        Ok(PreviewFrame {
            frame: surface.finish(),
            degraded,
        })
    }

    fn load_lenient(&self, inputs: &RenderInputs<'_>, degraded: &mut Vec<String>) -> LoadedLayers {
        let loader = self.loader();
        let mut keep = |reference: &str, r: MemoireResult<PreparedImage>| match r {
            Ok(img) => Some(img),
            Err(e) => {
                tracing::warn!(reference, error = %e, "preview layer unavailable");
                if !degraded.iter().any(|d| d == reference) {
                    degraded.push(reference.to_string());
                }
                None
            }
        };

        let background = keep(inputs.background, loader.load(inputs.background));

        let photo_refs = inputs.slotted_photos();
        let photos = photo_refs
            .iter()
            .zip(loader.load_each(&photo_refs))
            .map(|(r, img)| keep(*r, img))
            .collect();

        let sticker_refs: Vec<&str> = inputs.stickers.iter().map(|s| s.src.as_str()).collect();
        let stickers = sticker_refs
            .iter()
            .zip(loader.load_each(&sticker_refs))
            .map(|(r, img)| keep(*r, img))
            .collect();

        let frame_ref = inputs.template.frame_image_url.as_str();
        let frame = keep(frame_ref, loader.load(frame_ref));

        LoadedLayers {
            background,
            photos,
            stickers,
            frame,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compositor/preview.rs"]
mod tests;
