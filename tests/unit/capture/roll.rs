use super::*;
use crate::assets::source::ImageSource;
use crate::capture::camera::tests::FakeDevice;

fn roll(target: usize) -> (CaptureRoll, Arc<MemoryImageSource>) {
    let store = Arc::new(MemoryImageSource::new());
    (CaptureRoll::new(target, Vec::new(), store.clone()), store)
}

#[test]
fn shots_are_mirrored_jpegs() {
    let (device, _) = FakeDevice::new(8, 4);
    let mut camera = CameraSession::new(device);
    let (mut roll, store) = roll(2);

    let reference = roll.take(&mut camera).unwrap().unwrap();
    assert_eq!(roll.pending(), Some(reference.as_str()));

    let bytes = store.fetch(&reference).unwrap();
    let img = image::load_from_memory(&bytes).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (8, 4));
    // The camera's left half is red; after mirroring it is on the right.
    let left = img.get_pixel(0, 2).0;
    let right = img.get_pixel(7, 2).0;
    assert!(left[2] > 200 && left[0] < 60, "{left:?}");
    assert!(right[0] > 200 && right[2] < 60, "{right:?}");
}

#[test]
fn keep_appends_and_completes_at_target() {
    let (device, _) = FakeDevice::new(4, 4);
    let mut camera = CameraSession::new(device);
    let (mut roll, _) = roll(2);

    assert_eq!(roll.keep(), KeepOutcome::NothingPending);
    roll.take(&mut camera).unwrap();
    assert_eq!(roll.keep(), KeepOutcome::Kept { count: 1, target: 2 });
    assert_eq!(roll.progress(), 0.5);

    roll.take(&mut camera).unwrap();
    let KeepOutcome::Complete(photos) = roll.keep() else {
        panic!("roll should be complete");
    };
    assert_eq!(photos.len(), 2);
    assert!(roll.take(&mut camera).unwrap().is_none());
}

#[test]
fn retake_discards_pending_and_retake_last_pops() {
    let (device, _) = FakeDevice::new(4, 4);
    let mut camera = CameraSession::new(device);
    let (mut roll, store) = roll(3);

    let first = roll.take(&mut camera).unwrap().unwrap();
    roll.retake();
    assert!(roll.pending().is_none());
    assert!(!store.contains(&first));

    roll.take(&mut camera).unwrap();
    roll.keep();
    roll.take(&mut camera).unwrap();
    roll.keep();
    let last = roll.photos()[1].clone();
    assert_eq!(roll.retake_last(), Some(last));
    assert_eq!(roll.photos().len(), 1);
    assert_eq!(store.len(), 1);
}

#[test]
fn discarded_shots_leave_the_loader_cache() {
    let (device, _) = FakeDevice::new(4, 4);
    let mut camera = CameraSession::new(device);
    let store = Arc::new(MemoryImageSource::new());
    let loader = Arc::new(AssetLoader::new(store.clone()));
    let mut roll = CaptureRoll::new(2, Vec::new(), store.clone()).with_loader(loader.clone());

    let retaken = roll.take(&mut camera).unwrap().unwrap();
    loader.load(&retaken).unwrap();
    roll.retake();
    assert_eq!(loader.cached_len(), 0);
    assert!(loader.load(&retaken).is_err());

    let kept = roll.take(&mut camera).unwrap().unwrap();
    roll.keep();
    loader.load(&kept).unwrap();
    assert_eq!(roll.retake_last(), Some(kept.clone()));
    assert!(!store.contains(&kept));
    assert!(loader.load(&kept).is_err());
    assert_eq!(loader.cached_len(), 0);
    assert!(store.is_empty());
}

#[test]
fn zero_sized_frames_are_skipped() {
    let (device, _) = FakeDevice::new(0, 0);
    let mut camera = CameraSession::new(device);
    let (mut roll, store) = roll(1);
    assert!(roll.take(&mut camera).unwrap().is_none());
    assert!(store.is_empty());
}

#[test]
fn camera_failure_is_reported_and_roll_stays_usable() {
    let (device, counters) = FakeDevice::new(4, 4);
    counters.fail.store(true, std::sync::atomic::Ordering::SeqCst);
    let mut camera = CameraSession::new(device);
    let (mut roll, _) = roll(1);

    assert!(roll.take(&mut camera).is_err());
    counters.fail.store(false, std::sync::atomic::Ordering::SeqCst);
    assert!(roll.take(&mut camera).unwrap().is_some());
}
