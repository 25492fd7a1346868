use super::*;
use crate::compositor::geometry::rounded_slot_path;
use crate::compositor::tests::assert_px;

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> PreparedImage {
    let data = (0..w * h).flat_map(|_| rgba).collect::<Vec<u8>>();
    PreparedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(data),
    }
}

#[test]
fn stretched_image_covers_destination() {
    let mut surface = RasterSurface::new(Canvas::new(10, 10).unwrap()).unwrap();
    surface
        .draw_stretched(&solid(2, 2, [255, 0, 0, 255]), Rect::new(0.0, 0.0, 10.0, 5.0))
        .unwrap();
    let frame = surface.finish();
    assert_px(&frame, 5, 2, [255, 0, 0, 255]);
    assert_px(&frame, 5, 8, [0, 0, 0, 0]);
}

#[test]
fn clipped_draw_leaves_rounded_corners_empty() {
    let mut surface = RasterSurface::new(Canvas::new(40, 40).unwrap()).unwrap();
    let slot = Rect::new(0.0, 0.0, 40.0, 40.0);
    surface
        .draw_clipped(
            &solid(4, 4, [0, 0, 255, 255]),
            slot,
            &rounded_slot_path(slot, 20.0),
        )
        .unwrap();
    let frame = surface.finish();
    assert_px(&frame, 0, 0, [0, 0, 0, 0]);
    assert_px(&frame, 20, 20, [0, 0, 255, 255]);
}

#[test]
fn malformed_images_are_rejected() {
    let mut surface = RasterSurface::new(Canvas::new(4, 4).unwrap()).unwrap();
    let bad = PreparedImage {
        width: 2,
        height: 2,
        rgba8_premul: Arc::new(vec![0; 3]),
    };
    assert!(surface.draw_image(&bad, Affine::IDENTITY).is_err());
    assert!(RasterSurface::new(Canvas::new(70_000, 1).unwrap()).is_err());
}
