use std::io::Cursor;

use super::*;
use crate::assets::source::MemoryImageSource;
use crate::foundation::core::FrameRGBA;
use crate::layout::template::Slot;
use crate::overlay::sticker::StickerList;

pub(crate) const RED: [u8; 4] = [255, 0, 0, 255];
pub(crate) const GREEN: [u8; 4] = [0, 255, 0, 255];
pub(crate) const BLUE: [u8; 4] = [0, 0, 255, 255];
pub(crate) const YELLOW: [u8; 4] = [255, 255, 0, 255];

pub(crate) fn png_solid(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    encode_png(image::RgbaImage::from_pixel(w, h, image::Rgba(rgba)))
}

/// Opaque `rgba` border `border` px wide around a transparent centre.
pub(crate) fn png_frame(w: u32, h: u32, border: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_fn(w, h, |x, y| {
        let edge = x < border || y < border || x >= w - border || y >= h - border;
        image::Rgba(if edge { rgba } else { [0, 0, 0, 0] })
    });
    encode_png(img)
}

/// Pixel comparison tolerant of resampling rounding.
pub(crate) fn assert_px(frame: &FrameRGBA, x: u32, y: u32, expected: [u8; 4]) {
    let got = frame.pixel(x, y).unwrap();
    let close = got
        .iter()
        .zip(expected)
        .all(|(g, e)| (i16::from(*g) - i16::from(e)).abs() <= 2);
    assert!(close, "pixel ({x}, {y}) = {got:?}, expected {expected:?}");
}

fn encode_png(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

/// A 100x100 single-slot scene drawn at scale 1 with 20 px stickers.
pub(crate) struct Fixture {
    pub template: LayoutTemplate,
    pub photos: Vec<String>,
    pub stickers: StickerList,
    pub source: Arc<MemoryImageSource>,
    pub compositor: Compositor,
}

impl Fixture {
    pub fn new() -> Self {
        let template = LayoutTemplate::new(
            100,
            100,
            "frame.png",
            "thumb.png",
            vec![Slot::new(20.0, 20.0, 60.0, 60.0)],
        )
        .unwrap();

        let source = Arc::new(MemoryImageSource::new());
        source.insert("bg.png", png_solid(10, 10, RED)).unwrap();
        source.insert("photo.png", png_solid(30, 20, GREEN)).unwrap();
        source.insert("sticker.png", png_solid(8, 8, BLUE)).unwrap();
        source.insert("frame.png", png_frame(100, 100, 5, YELLOW)).unwrap();

        let mut stickers = StickerList::new();
        stickers.add("sticker.png");

        let config = RenderConfig {
            export_scale: 1.0,
            slot_corner_radius_px: 10.0,
            sticker_base_px: 20.0,
            jpeg_quality: 95,
            preview_scale: 0.5,
        };
        let loader = Arc::new(AssetLoader::new(source.clone()));
        Self {
            template,
            photos: vec!["photo.png".to_string()],
            stickers,
            source,
            compositor: Compositor::new(loader, config).unwrap(),
        }
    }

    pub fn inputs(&self) -> RenderInputs<'_> {
        RenderInputs {
            template: &self.template,
            background: "bg.png",
            photos: &self.photos,
            stickers: self.stickers.as_slice(),
        }
    }
}

#[test]
fn layers_stack_background_photo_sticker_frame() {
    let fx = Fixture::new();
    let frame = fx.compositor.render_export(&fx.inputs()).unwrap();
    assert_eq!((frame.width, frame.height), (100, 100));

    assert_px(&frame, 2, 2, YELLOW);
    assert_px(&frame, 10, 50, RED);
    assert_px(&frame, 25, 50, GREEN);
    assert_px(&frame, 50, 50, BLUE);
    // Rounded slot corner shows the background.
    assert_px(&frame, 20, 20, RED);
}

#[test]
fn later_stickers_draw_on_top() {
    let mut fx = Fixture::new();
    fx.source.insert("green.png", png_solid(4, 4, GREEN)).unwrap();
    fx.stickers.add("green.png");
    let frame = fx.compositor.render_export(&fx.inputs()).unwrap();
    assert_px(&frame, 50, 50, GREEN);
}

#[test]
fn empty_slots_show_the_background() {
    let mut fx = Fixture::new();
    fx.photos.clear();
    let frame = fx.compositor.render_export(&fx.inputs()).unwrap();
    assert_px(&frame, 25, 50, RED);
}

#[test]
fn inputs_only_load_slotted_photos_and_distinct_stickers() {
    let mut fx = Fixture::new();
    fx.photos.push("extra.png".to_string());
    fx.stickers.add("sticker.png");
    let inputs = fx.inputs();
    assert_eq!(inputs.slotted_photos(), vec!["photo.png"]);
    assert_eq!(inputs.sticker_sources(), vec!["sticker.png"]);

    // The unused photo is never fetched, so the export still succeeds.
    fx.compositor.render_export(&fx.inputs()).unwrap();
}
