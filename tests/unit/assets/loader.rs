use std::io::Cursor;

use super::*;
use crate::assets::source::MemoryImageSource;

fn png(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn loader_with(entries: &[(&str, Vec<u8>)]) -> AssetLoader {
    let mem = MemoryImageSource::new();
    for (k, v) in entries {
        mem.insert(*k, v.clone()).unwrap();
    }
    AssetLoader::new(Arc::new(mem))
}

#[test]
fn load_all_preserves_order() {
    let loader = loader_with(&[("a", png(3, 1)), ("b", png(1, 5))]);
    let imgs = loader.load_all(&["b", "a", "b"]).unwrap();
    let dims: Vec<_> = imgs.iter().map(|i| (i.width, i.height)).collect();
    assert_eq!(dims, vec![(1, 5), (3, 1), (1, 5)]);
}

#[test]
fn decode_failure_names_the_reference() {
    let loader = loader_with(&[("ok", png(1, 1)), ("broken", b"nope".to_vec())]);
    let err = loader.load_all(&["ok", "broken", "missing"]).unwrap_err();
    assert_eq!(err.resource(), Some("broken"));

    let err = loader.load("missing").unwrap_err();
    assert_eq!(err.resource(), Some("missing"));
}

#[test]
fn decoded_images_are_cached() {
    let mem = Arc::new(MemoryImageSource::new());
    mem.insert("a", png(2, 2)).unwrap();
    let loader = AssetLoader::new(mem.clone());
    loader.load("a").unwrap();

    mem.remove("a");
    assert_eq!(loader.load("a").unwrap().width, 2);

    loader.forget("a");
    assert!(loader.load("a").is_err());
}

#[test]
fn release_frees_captured_photos_but_not_named_assets() {
    let mem = Arc::new(MemoryImageSource::new());
    mem.insert("frame.png", png(2, 2)).unwrap();
    let shot = mem.put(png(3, 3)).unwrap();
    let loader = AssetLoader::new(Arc::new(
        crate::assets::source::ChainSource::new().with(mem.clone()),
    ));
    loader.load_all(&["frame.png", shot.as_str()]).unwrap();
    assert_eq!(loader.cached_len(), 2);

    loader.release(&shot);
    loader.release("frame.png");
    assert_eq!(loader.cached_len(), 0);
    assert!(!mem.contains(&shot));
    assert!(mem.contains("frame.png"));
    assert!(loader.load(&shot).is_err());
}
