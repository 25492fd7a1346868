//! Caller-owned session state and the operations that mutate it.
//!
//! A [`Session`] ties the template, theme, photos and stickers together and routes pointer input
//! through its [`OverlayEngine`]. Rendering services ([`Compositor`]) and image storage are
//! separate so one set of services can serve any session.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::assets::loader::AssetLoader;
use crate::assets::source::MemoryImageSource;
use crate::capture::roll::CaptureRoll;
use crate::capture::upload::UploadTray;
use crate::compositor::{Compositor, ExportOutcome, ExportedImage, PreviewFrame, RenderInputs};
use crate::config::RenderConfig;
use crate::foundation::core::Rect;
use crate::foundation::error::{MemoireError, MemoireResult};
use crate::layout::template::{LayoutTemplate, TemplateKey};
use crate::layout::theme::{BackgroundVariant, ThemeConfig, ThemeKey};
use crate::overlay::gesture::{GestureOutcome, OverlayEngine, PointerEvent, PointerId};
use crate::overlay::sticker::{StickerId, StickerInstance, StickerList};

/// Serializable snapshot of a session. Selection is deliberately absent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionDocument {
    pub template: TemplateKey,
    /// Overrides `template` with explicit geometry when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_template: Option<LayoutTemplate>,
    pub theme: ThemeKey,
    pub background: BackgroundVariant,
    pub photos: Vec<String>,
    pub stickers: Vec<StickerInstance>,
}

impl SessionDocument {
    pub fn from_json(bytes: &[u8]) -> MemoireResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn from_path(path: &Path) -> MemoireResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read session document '{}'", path.display()))?;
        Self::from_json(&bytes)
    }

    pub fn to_json_pretty(&self) -> MemoireResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Clone, Debug)]
pub struct Session {
    template_key: Option<TemplateKey>,
    template: LayoutTemplate,
    theme: ThemeConfig,
    background: BackgroundVariant,
    photos: Vec<String>,
    stickers: StickerList,
    overlay: OverlayEngine,
    last_export: Option<ExportedImage>,
    loader: Option<Arc<AssetLoader>>,
}

impl Session {
    /// A fresh session on the default template and theme.
    pub fn new(config: &RenderConfig) -> Self {
        let template = TemplateKey::default().template();
        Self {
            template_key: Some(TemplateKey::default()),
            overlay: OverlayEngine::new(template.reference_size(), config.sticker_base_px),
            template,
            theme: ThemeKey::default().config(),
            background: BackgroundVariant::default(),
            photos: Vec::new(),
            stickers: StickerList::new(),
            last_export: None,
            loader: None,
        }
    }

    /// Release dropped photos through `loader`.
    ///
    /// Whenever a photo leaves the session (reset, template change, a replaced photo set) its
    /// decoded copy is evicted and captured `memory:` bytes are freed from the loader's source.
    pub fn with_loader(mut self, loader: Arc<AssetLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn from_document(doc: SessionDocument, config: &RenderConfig) -> MemoireResult<Self> {
        let mut s = Self::new(config);
        match doc.custom_template {
            Some(tpl) => s.choose_custom_template(tpl)?,
            None => s.choose_template(doc.template),
        }
        s.choose_theme(doc.theme);
        s.set_background(doc.background);
        s.accept_photos(doc.photos);
        s.stickers = StickerList::from_instances(doc.stickers);
        Ok(s)
    }

    pub fn to_document(&self) -> SessionDocument {
        SessionDocument {
            template: self.template_key.unwrap_or_default(),
            custom_template: match self.template_key {
                Some(_) => None,
                None => Some(self.template.clone()),
            },
            theme: self.theme.key,
            background: self.background,
            photos: self.photos.clone(),
            stickers: self.stickers.as_slice().to_vec(),
        }
    }

    /// Back to a fresh session: default template and theme, no photos, stickers or selection.
    pub fn reset(&mut self) {
        self.choose_template(TemplateKey::default());
        self.theme = ThemeKey::default().config();
        self.background = BackgroundVariant::default();
        self.last_export = None;
    }

    /// Switch layout. Photos and stickers belong to the old layout and are cleared.
    pub fn choose_template(&mut self, key: TemplateKey) {
        self.template_key = Some(key);
        self.install_template(key.template());
    }

    /// Switch to explicit template geometry, clearing content like [`Session::choose_template`].
    pub fn choose_custom_template(&mut self, template: LayoutTemplate) -> MemoireResult<()> {
        template.validate()?;
        self.template_key = None;
        self.install_template(template);
        Ok(())
    }

    fn install_template(&mut self, template: LayoutTemplate) {
        self.overlay.set_reference(template.reference_size());
        self.overlay.reset();
        self.template = template;
        self.release_photos(&[]);
        self.stickers.clear();
    }

    /// Drop every current photo not in `keep`, releasing it when a loader is attached.
    fn release_photos(&mut self, keep: &[String]) {
        let dropped = std::mem::take(&mut self.photos);
        let Some(loader) = &self.loader else {
            return;
        };
        for reference in dropped.iter().filter(|r| !keep.contains(r)) {
            loader.release(reference);
        }
    }

    pub fn choose_theme(&mut self, key: ThemeKey) {
        self.theme = key.config();
    }

    pub fn set_background(&mut self, variant: BackgroundVariant) {
        self.background = variant;
    }

    pub fn template_key(&self) -> Option<TemplateKey> {
        self.template_key
    }

    pub fn template(&self) -> &LayoutTemplate {
        &self.template
    }

    pub fn theme(&self) -> &ThemeConfig {
        &self.theme
    }

    pub fn background(&self) -> BackgroundVariant {
        self.background
    }

    pub fn background_url(&self) -> &str {
        self.theme.background_url(self.background)
    }

    pub fn photos(&self) -> &[String] {
        &self.photos
    }

    /// Replace the photo set wholesale (capture or upload finished).
    pub fn accept_photos(&mut self, photos: Vec<String>) {
        if photos.len() > self.template.slot_count() {
            tracing::debug!(
                photos = photos.len(),
                slots = self.template.slot_count(),
                "more photos than slots; extras are not drawn"
            );
        }
        self.release_photos(&photos);
        self.photos = photos;
    }

    /// A capture roll targeting this template's slot count, continuing from the current photos.
    pub fn capture_roll(&self, store: Arc<MemoryImageSource>) -> CaptureRoll {
        let roll = CaptureRoll::new(self.template.slot_count(), self.photos.clone(), store);
        match &self.loader {
            Some(loader) => roll.with_loader(loader.clone()),
            None => roll,
        }
    }

    pub fn upload_tray(&self) -> UploadTray {
        UploadTray::for_slots(self.template.slot_count())
    }

    pub fn stickers(&self) -> &StickerList {
        &self.stickers
    }

    pub fn selected_sticker(&self) -> Option<&StickerId> {
        self.overlay.selected()
    }

    pub fn overlay(&self) -> &OverlayEngine {
        &self.overlay
    }

    /// Add a sticker at the canvas centre and select it.
    pub fn add_sticker(&mut self, src: impl Into<String>) -> StickerId {
        let id = self.stickers.add(src);
        self.overlay.select(id.clone());
        id
    }

    /// Add the theme's `index`-th sticker.
    pub fn add_theme_sticker(&mut self, index: usize) -> MemoireResult<StickerId> {
        let src = self.theme.stickers.get(index).cloned().ok_or_else(|| {
            MemoireError::validation(format!(
                "theme '{}' has no sticker #{index}",
                self.theme.key.as_str()
            ))
        })?;
        Ok(self.add_sticker(src))
    }

    pub fn remove_sticker(&mut self, id: &StickerId) -> bool {
        matches!(
            self.overlay.remove(&mut self.stickers, id),
            GestureOutcome::Removed(_)
        )
    }

    /// Route a pointer event on a preview laid out at `surface` (screen space), or `None` when the
    /// preview cannot be measured.
    pub fn pointer(&mut self, event: PointerEvent, surface: Option<Rect>) -> GestureOutcome {
        self.overlay.handle(&mut self.stickers, event, surface)
    }

    /// Abort the pointer's gesture, restoring the sticker to where it was at press.
    pub fn cancel_gesture(&mut self, pointer: PointerId) -> GestureOutcome {
        self.overlay.cancel_gesture(&mut self.stickers, pointer)
    }

    pub fn render_inputs(&self) -> RenderInputs<'_> {
        RenderInputs {
            template: &self.template,
            background: self.background_url(),
            photos: &self.photos,
            stickers: self.stickers.as_slice(),
        }
    }

    pub fn preview(&self, compositor: &Compositor) -> MemoireResult<PreviewFrame> {
        compositor.render_preview(&self.render_inputs())
    }

    /// Export the session. A completed export is remembered as the session's result.
    pub fn export(&mut self, compositor: &Compositor) -> MemoireResult<ExportOutcome> {
        let outcome = compositor.export(&self.render_inputs())?;
        if let ExportOutcome::Completed(img) = &outcome {
            self.last_export = Some(img.clone());
        }
        Ok(outcome)
    }

    pub fn last_export(&self) -> Option<&ExportedImage> {
        self.last_export.as_ref()
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
