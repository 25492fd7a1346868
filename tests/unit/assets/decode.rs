use std::io::Cursor;

use super::*;

fn png_bytes(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100, 50, 200, 128]).unwrap();
    let prepared = decode_asset(&png_bytes(img)).unwrap();
    assert_eq!((prepared.width, prepared.height), (1, 1));
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

/// A 40x20 JPEG, red on the left half and blue on the right, tagged with EXIF `orientation`.
fn jpeg_with_orientation(orientation: u8) -> Vec<u8> {
    let img = image::RgbImage::from_fn(40, 20, |x, _| {
        if x < 20 {
            image::Rgb([255, 0, 0])
        } else {
            image::Rgb([0, 0, 255])
        }
    });
    let mut jpeg = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)
        .unwrap();

    // Big-endian TIFF with a single IFD entry: Orientation (0x0112), SHORT, count 1.
    let mut exif = b"Exif\0\0MM\0\x2a\0\0\0\x08".to_vec();
    exif.extend_from_slice(&[0, 1]);
    exif.extend_from_slice(&[0x01, 0x12, 0, 3, 0, 0, 0, 1, 0, orientation, 0, 0]);
    exif.extend_from_slice(&[0, 0, 0, 0]);

    let len = u16::try_from(exif.len() + 2).unwrap().to_be_bytes();
    let mut app1 = vec![0xFF, 0xE1, len[0], len[1]];
    app1.extend_from_slice(&exif);

    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    jpeg.splice(2..2, app1);
    jpeg
}

#[test]
fn exif_orientation_is_applied() {
    let prepared = decode_asset(&jpeg_with_orientation(6)).unwrap();
    assert_eq!((prepared.width, prepared.height), (20, 40));

    // Rotated 90 degrees clockwise: the red left half is now on top.
    let px = |x: u32, y: u32| {
        let i = ((y * prepared.width + x) * 4) as usize;
        [prepared.rgba8_premul[i], prepared.rgba8_premul[i + 2]]
    };
    let [r, b] = px(10, 5);
    assert!(r > 200 && b < 60, "top should be red, got r={r} b={b}");
    let [r, b] = px(10, 35);
    assert!(b > 200 && r < 60, "bottom should be blue, got r={r} b={b}");
}

#[test]
fn upright_jpegs_keep_their_shape() {
    let prepared = decode_asset(&jpeg_with_orientation(1)).unwrap();
    assert_eq!((prepared.width, prepared.height), (40, 20));
}

#[test]
fn transparent_pixels_lose_their_colour() {
    let mut px = vec![255, 10, 20, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![0, 0, 0, 0]);
}

#[test]
fn svg_is_sniffed_and_rasterized_upscaled() {
    let svg = br##"<?xml version="1.0"?>
<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10">
  <rect width="20" height="10" fill="#ff0000"/>
</svg>"##;
    let prepared = decode_asset(svg).unwrap();
    assert_eq!(prepared.width, 1024);
    assert_eq!(prepared.height, 512);
    let mid = ((256 * 1024 + 512) * 4) as usize;
    assert_eq!(&prepared.rgba8_premul[mid..mid + 4], &[255, 0, 0, 255]);
}

#[test]
fn garbage_bytes_fail_to_decode() {
    assert!(decode_asset(b"not an image").is_err());
    assert!(parse_svg(b"<svg").is_err());
}
