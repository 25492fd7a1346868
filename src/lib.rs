//! Mémoire is the compositing and sticker-gesture core of a photobooth.
//!
//! It turns a layout template, a theme, N photos and a list of user-placed stickers into one
//! flattened image, and keeps the on-screen preview in proportion with the export:
//!
//! - Pick a [`TemplateKey`] and [`ThemeKey`] and build a [`Session`]
//! - Feed pointer input through [`Session::pointer`] to move, scale and rotate stickers
//! - Render previews and exports with a [`Compositor`]
#![forbid(unsafe_code)]

pub mod assets;
pub mod capture;
pub mod compositor;
pub mod config;
pub mod foundation;
pub mod layout;
pub mod logging;
pub mod overlay;
pub mod session;

pub use crate::assets::loader::AssetLoader;
pub use crate::assets::source::{ChainSource, FsImageSource, ImageSource, MemoryImageSource};
pub use crate::capture::camera::{CameraDevice, CameraSession, CameraStream, FeedState};
pub use crate::capture::roll::{CaptureRoll, KeepOutcome};
pub use crate::capture::upload::{Shift, UploadTray};
pub use crate::compositor::{
    Compositor, DeliverySink, DirectorySink, ExportOutcome, ExportedImage, PreviewFrame,
    RenderInputs,
};
pub use crate::config::{LoggingConfig, RenderConfig};
pub use crate::foundation::core::{Affine, Canvas, FrameRGBA, Point, Rect, Size, Vec2};
pub use crate::foundation::error::{MemoireError, MemoireResult};
pub use crate::foundation::space::CanvasSpace;
pub use crate::layout::template::{LayoutTemplate, Slot, TemplateKey};
pub use crate::layout::theme::{BackgroundVariant, ThemeConfig, ThemeKey};
pub use crate::overlay::gesture::{
    GestureMode, GestureOutcome, OverlayEngine, PointerEvent, PointerId, PointerPhase,
};
pub use crate::overlay::hit::{Corner, HitTarget};
pub use crate::overlay::sticker::{StickerId, StickerInstance, StickerList, StickerTransform};
pub use crate::session::{Session, SessionDocument};
