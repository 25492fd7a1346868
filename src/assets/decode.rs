use std::io::Cursor;
use std::sync::Arc;

use anyhow::Context;
use image::ImageDecoder;

use crate::assets::PreparedImage;
use crate::foundation::error::{MemoireError, MemoireResult};

/// SVGs are rasterized so their longer side is at least this many pixels.
///
/// The largest sticker draw is `80 * 4.0 * 2` = 640 px, so this keeps vector art sharp at every
/// legal scale.
pub const SVG_RASTER_MIN_LONG_SIDE: f64 = 1024.0;

const MAX_SVG_DIM: u32 = 8192;

/// Decode raster or SVG bytes into a premultiplied image.
pub fn decode_asset(bytes: &[u8]) -> MemoireResult<PreparedImage> {
    if looks_like_svg(bytes) {
        let tree = parse_svg(bytes)?;
        rasterize_svg(&tree)
    } else {
        decode_image(bytes)
    }
}

/// Decode raster bytes, applying any EXIF orientation so pixels come out upright.
pub fn decode_image(bytes: &[u8]) -> MemoireResult<PreparedImage> {
    let mut decoder = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("guess image format")?
        .into_decoder()
        .context("open image decoder")?;
    let orientation = decoder.orientation().context("read image orientation")?;
    let mut dyn_img =
        image::DynamicImage::from_decoder(decoder).context("decode image from memory")?;
    dyn_img.apply_orientation(orientation);
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

pub fn parse_svg(bytes: &[u8]) -> MemoireResult<usvg::Tree> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(tree)
}

/// Rasterize an SVG at its intrinsic aspect ratio, upscaled to [`SVG_RASTER_MIN_LONG_SIDE`].
pub fn rasterize_svg(tree: &usvg::Tree) -> MemoireResult<PreparedImage> {
    let size = tree.size();
    let (w, h) = (f64::from(size.width()), f64::from(size.height()));
    if !(w.is_finite() && h.is_finite()) || w <= 0.0 || h <= 0.0 {
        return Err(MemoireError::render("svg has invalid width/height"));
    }
    let k = (SVG_RASTER_MIN_LONG_SIDE / w.max(h)).max(1.0);
    let width = ((w * k).ceil() as u32).clamp(1, MAX_SVG_DIM);
    let height = ((h * k).ceil() as u32).clamp(1, MAX_SVG_DIM);

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| MemoireError::render("failed to allocate svg pixmap"))?;
    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    resvg::render(
        tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    // tiny-skia pixmaps are already premultiplied.
    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.take()),
    })
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = ((*c as u16 * a + 127) / 255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
