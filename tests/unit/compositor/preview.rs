use crate::compositor::tests::{BLUE, Fixture, GREEN, RED, YELLOW, assert_px};

#[test]
fn preview_renders_at_preview_scale() {
    let fx = Fixture::new();
    let preview = fx.compositor.render_preview(&fx.inputs()).unwrap();
    assert!(preview.is_complete());
    assert_eq!((preview.frame.width, preview.frame.height), (50, 50));

    assert_px(&preview.frame, 1, 1, YELLOW);
    assert_px(&preview.frame, 5, 25, RED);
    assert_px(&preview.frame, 13, 25, GREEN);
    assert_px(&preview.frame, 25, 25, BLUE);
}

#[test]
fn missing_assets_degrade_instead_of_failing() {
    let mut fx = Fixture::new();
    fx.photos = vec!["missing.png".to_string()];
    fx.source.remove("frame.png");

    let preview = fx.compositor.render_preview(&fx.inputs()).unwrap();
    assert!(!preview.is_complete());
    assert!(preview.degraded.contains(&"missing.png".to_string()));
    assert!(preview.degraded.contains(&"frame.png".to_string()));

    // Slot falls back to the background; no frame border.
    assert_px(&preview.frame, 13, 25, RED);
    assert_px(&preview.frame, 1, 1, RED);
    assert_px(&preview.frame, 25, 25, BLUE);
}

#[test]
fn broken_sticker_is_skipped_in_preview_only() {
    let mut fx = Fixture::new();
    fx.source.insert("bad.png", b"garbage".to_vec()).unwrap();
    fx.stickers.add("bad.png");

    let preview = fx.compositor.render_preview(&fx.inputs()).unwrap();
    assert_eq!(preview.degraded, vec!["bad.png".to_string()]);
    assert_px(&preview.frame, 25, 25, BLUE);

    assert!(fx.compositor.render_export(&fx.inputs()).is_err());
}
