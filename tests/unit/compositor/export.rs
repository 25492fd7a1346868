use super::*;
use crate::compositor::tests::Fixture;

#[test]
fn export_encodes_a_jpeg_at_export_size() {
    let fx = Fixture::new();
    let img = fx
        .compositor
        .export(&fx.inputs())
        .unwrap()
        .into_image()
        .unwrap();
    assert_eq!((img.width, img.height), (100, 100));
    assert_eq!(&img.bytes[..2], &[0xFF, 0xD8]);

    let decoded = image::load_from_memory(&img.bytes).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (100, 100));
    let bg = decoded.get_pixel(10, 50).0;
    assert!(bg[0] > 230 && bg[1] < 30 && bg[2] < 30, "{bg:?}");
    let sticker = decoded.get_pixel(50, 50).0;
    assert!(sticker[2] > 230 && sticker[0] < 30, "{sticker:?}");
}

#[test]
fn second_export_while_one_is_in_flight_is_ignored() {
    let fx = Fixture::new();
    let permit = fx.compositor.gate().try_acquire().unwrap();
    assert!(fx.compositor.gate().try_acquire().is_none());
    assert_eq!(
        fx.compositor.export(&fx.inputs()).unwrap(),
        ExportOutcome::Ignored
    );

    drop(permit);
    assert!(!fx.compositor.gate().is_busy());
    assert!(matches!(
        fx.compositor.export(&fx.inputs()).unwrap(),
        ExportOutcome::Completed(_)
    ));
}

#[test]
fn asset_failure_aborts_with_render_failed_and_releases_gate() {
    let mut fx = Fixture::new();
    fx.photos = vec!["missing.png".to_string()];
    let err = fx.compositor.export(&fx.inputs()).unwrap_err();
    assert!(matches!(err, MemoireError::RenderFailed { .. }), "{err}");
    assert_eq!(err.resource(), Some("missing.png"));
    assert!(!fx.compositor.gate().is_busy());
}

#[test]
fn broken_sticker_and_frame_fail_the_export() {
    let fx = Fixture::new();
    fx.source.insert("sticker.png", b"garbage".to_vec()).unwrap();
    let err = fx.compositor.render_export(&fx.inputs()).unwrap_err();
    assert_eq!(err.resource(), Some("sticker.png"));

    let fx = Fixture::new();
    fx.source.remove("frame.png");
    let err = fx.compositor.render_export(&fx.inputs()).unwrap_err();
    assert_eq!(err.resource(), Some("frame.png"));
}

#[test]
fn delivery_names_and_directory_sink() {
    assert_eq!(
        delivery_file_name(ThemeKey::SummerFruits, 1_700_000_000_123),
        "memoire-summerfruits-1700000000123.jpg"
    );

    let dir = std::env::temp_dir().join(format!("memoire-sink-{}", std::process::id()));
    let fx = Fixture::new();
    let outcome = fx
        .compositor
        .export_to(&fx.inputs(), ThemeKey::Coquette, 42, &DirectorySink::new(&dir))
        .unwrap();
    let img = outcome.into_image().unwrap();
    let written = std::fs::read(dir.join("memoire-coquette-42.jpg")).unwrap();
    assert_eq!(written, img.bytes);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn jpeg_quality_is_validated() {
    let frame = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![0, 0, 0, 255],
        premultiplied: true,
    };
    assert!(encode_jpeg(&frame, 0).is_err());
    assert!(encode_jpeg(&frame, 90).is_ok());
}
