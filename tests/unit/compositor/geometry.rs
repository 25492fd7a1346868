use super::*;
use crate::layout::template::TemplateKey;
use crate::overlay::sticker::StickerList;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn cover_fit_wide_image_into_square_slot() {
    let dest = cover_fit(Size::new(1600.0, 900.0), Rect::new(0.0, 0.0, 400.0, 400.0));
    assert!(approx(dest.height(), 400.0));
    assert!((dest.width() - 711.1).abs() < 0.05);
    assert!((dest.x0 - (-155.6)).abs() < 0.05);
    assert!(approx(dest.y0, 0.0));
    assert!(approx(dest.center().x, 200.0));
}

#[test]
fn cover_fit_never_leaves_gaps() {
    let slot = Rect::new(10.0, 20.0, 110.0, 320.0);
    for img in [(50.0, 50.0), (1000.0, 10.0), (10.0, 1000.0), (100.0, 300.0)] {
        let dest = cover_fit(Size::new(img.0, img.1), slot);
        assert!(dest.x0 <= slot.x0 + 1e-9 && dest.x1 >= slot.x1 - 1e-9);
        assert!(dest.y0 <= slot.y0 + 1e-9 && dest.y1 >= slot.y1 - 1e-9);
        assert!(approx(dest.width() / dest.height(), img.0 / img.1));
    }
}

#[test]
fn clip_radius_is_capped_by_half_the_short_side() {
    let big = Rect::new(0.0, 0.0, 1668.0, 1456.0);
    assert!(approx(clip_radius(40.0, 2.0, big), 80.0));
    let thin = Rect::new(0.0, 0.0, 60.0, 100.0);
    assert!(approx(clip_radius(40.0, 2.0, thin), 30.0));
}

#[test]
fn rounded_clip_stays_inside_its_slot() {
    let rect = Rect::new(100.0, 200.0, 300.0, 500.0);
    let path = rounded_slot_path(rect, 40.0);
    let bbox = path.bounding_box();
    assert!(bbox.x0 >= rect.x0 - 1e-6 && bbox.x1 <= rect.x1 + 1e-6);
    assert!(bbox.y0 >= rect.y0 - 1e-6 && bbox.y1 <= rect.y1 + 1e-6);
    assert!(!path.contains(Point::new(rect.x0 + 2.0, rect.y0 + 2.0)));
    assert!(path.contains(rect.center()));
}

#[test]
fn export_layout_scales_slots_and_stickers() {
    let tpl = TemplateKey::Vertical2.template();
    let mut list = StickerList::new();
    let id = list.add("heart.png");
    let mut t = list.get(&id).unwrap().transform();
    t.scale = 1.5;
    t.rotation = 90.0;
    list.update(&id, t);

    let layout = SceneLayout::compute(&tpl, list.as_slice(), 2.0, &RenderConfig::default()).unwrap();
    assert_eq!((layout.canvas.width, layout.canvas.height), (2160, 3840));
    assert_eq!(layout.slots[0].rect, Rect::new(246.0, 424.0, 1914.0, 1880.0));
    assert!(approx(layout.slots[0].radius, 80.0));

    let s = &layout.stickers[0];
    assert_eq!(s.center, Point::new(1080.0, 1920.0));
    assert!(approx(s.side, 240.0));
    assert!(approx(s.rotation_rad, std::f64::consts::FRAC_PI_2));
}

#[test]
fn preview_and_export_layouts_are_proportional() {
    let tpl = TemplateKey::Staggered2x2.template();
    let mut list = StickerList::new();
    let id = list.add("star.png");
    let mut t = list.get(&id).unwrap().transform();
    t.x = 31.0;
    t.y = 72.5;
    list.update(&id, t);
    let cfg = RenderConfig::default();

    let preview = SceneLayout::compute(&tpl, list.as_slice(), cfg.preview_scale, &cfg).unwrap();
    let export = SceneLayout::compute(&tpl, list.as_slice(), cfg.export_scale, &cfg).unwrap();
    let ratio = export.canvas.size().width / preview.canvas.size().width;
    assert!(approx(ratio, 4.0));

    for (p, e) in preview.slots.iter().zip(&export.slots) {
        assert!(approx(p.rect.x0 * ratio, e.rect.x0));
        assert!(approx(p.rect.height() * ratio, e.rect.height()));
        assert!(approx(p.radius * ratio, e.radius));
    }
    let (p, e) = (&preview.stickers[0], &export.stickers[0]);
    assert!(approx(p.center.x * ratio, e.center.x));
    assert!(approx(p.center.y * ratio, e.center.y));
    assert!(approx(p.side * ratio, e.side));
}

#[test]
fn sticker_image_is_contain_fitted_around_its_centre() {
    let placement = StickerPlacement {
        id: StickerId("stk-1".to_string()),
        src: "wide.png".to_string(),
        center: Point::new(50.0, 50.0),
        side: 80.0,
        rotation_rad: 0.0,
    };
    let xf = placement.image_transform(Size::new(200.0, 100.0));
    let tl = xf * Point::new(0.0, 0.0);
    let br = xf * Point::new(200.0, 100.0);
    assert!(approx(tl.x, 10.0) && approx(tl.y, 30.0));
    assert!(approx(br.x, 90.0) && approx(br.y, 70.0));
}
