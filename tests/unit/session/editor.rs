use super::*;
use crate::document::input::{Capture, StripeDraft, TextDeviceDraft};

fn fixture_root(name: &str) -> PathBuf {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("target")
        .join("ribbon-unit")
        .join("editor")
        .join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_png(path: &Path, w: u32, h: u32, px: [u8; 4]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    image::RgbaImage::from_pixel(w, h, image::Rgba(px))
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

fn red_stripe() -> Stripe {
    Stripe::new(100, 50, Rgb8::new(255, 0, 0))
}

#[test]
fn undo_restores_previous_states() {
    let mut ed = Editor::new(AssetLibrary::default());
    ed.add_stripe(red_stripe()).unwrap();
    ed.set_background(Rgb8::new(1, 2, 3));
    ed.toggle_stripe_mirror(0).unwrap();
    assert_eq!(ed.undo_depth(), 3);

    assert!(ed.undo());
    assert!(!ed.document().stripes[0].mirrored);
    assert!(ed.undo());
    assert_eq!(ed.document().background, Rgb8::BLACK);
    assert!(ed.undo());
    assert!(ed.document().stripes.is_empty());
    assert!(!ed.undo());
}

#[test]
fn failed_mutation_records_nothing() {
    let mut ed = Editor::new(AssetLibrary::default());
    assert!(ed.remove_stripe(0).is_err());
    assert!(ed.add_stripe(Stripe::new(0, 0, Rgb8::BLACK)).is_err());
    assert_eq!(ed.undo_depth(), 0);
    assert_eq!(ed.document(), &RibbonDocument::default());
}

#[test]
fn cancelled_capture_is_a_no_op() {
    let mut ed = Editor::new(AssetLibrary::default());
    assert_eq!(ed.add_stripe_capture(Capture::Cancelled).unwrap(), None);
    assert_eq!(ed.add_text_device_capture(Capture::Cancelled).unwrap(), None);
    assert_eq!(ed.edit_stripe_capture(5, Capture::Cancelled).unwrap(), None);
    assert_eq!(ed.undo_depth(), 0);
    assert_eq!(ed.document(), &RibbonDocument::default());
}

#[test]
fn confirmed_capture_is_validated_then_recorded() {
    let mut ed = Editor::new(AssetLibrary::default());
    let stripe = StripeDraft {
        offset: 10,
        width: 20,
        color: Rgb8::new(0, 0, 255),
        mirrored: false,
    };
    assert_eq!(
        ed.add_stripe_capture(Capture::Confirmed(stripe)).unwrap(),
        Some(0)
    );
    let out_of_range = StripeDraft {
        offset: 2000,
        ..stripe
    };
    assert!(ed.add_stripe_capture(Capture::Confirmed(out_of_range)).is_err());
    assert!(
        ed.edit_stripe_capture(0, Capture::Confirmed(out_of_range))
            .is_err()
    );

    let label = TextDeviceDraft {
        name: "V".into(),
        color: Rgb8::new(255, 255, 255),
        x: 500,
        y: 150,
    };
    assert_eq!(
        ed.add_text_device_capture(Capture::Confirmed(label)).unwrap(),
        Some(0)
    );
    assert_eq!(ed.undo_depth(), 2);
    assert_eq!(ed.document().stripes[0].offset, 10);
}

#[test]
fn clear_is_undoable() {
    let mut ed = Editor::new(AssetLibrary::default());
    ed.add_stripe(red_stripe()).unwrap();
    ed.clear();
    assert!(ed.document().stripes.is_empty());
    assert!(ed.undo());
    assert_eq!(ed.document().stripes.len(), 1);
}

#[test]
fn frame_without_asset_falls_back_to_none() {
    let root = fixture_root("frame_fallback");
    write_png(&root.join("frames/gold.png"), 4, 2, [255, 215, 0, 255]);
    let mut ed = Editor::new(AssetLibrary::new(&root));

    assert_eq!(ed.set_frame(Some(FrameKind::Gold)), Some(FrameKind::Gold));
    assert_eq!(ed.document().frame, Some(FrameKind::Gold));

    assert_eq!(ed.set_frame(Some(FrameKind::Silver)), None);
    assert_eq!(ed.document().frame, None);
}

#[test]
fn render_resets_frame_when_overlay_vanished() {
    let root = fixture_root("frame_vanished");
    let gold = root.join("frames/gold.png");
    write_png(&gold, 4, 2, [255, 215, 0, 255]);
    let mut ed = Editor::new(AssetLibrary::new(&root));
    ed.set_frame(Some(FrameKind::Gold));

    std::fs::remove_file(&gold).unwrap();
    let rendered = ed.preview().unwrap();
    assert!(
        rendered
            .warnings
            .iter()
            .any(|w| matches!(w, Warning::MissingFrame { .. }))
    );
    assert_eq!(ed.document().frame, None);
}

#[test]
fn library_device_is_sized_from_icon_aspect() {
    let root = fixture_root("library_device");
    write_png(&root.join("devices/oak.png"), 20, 10, [0, 128, 0, 255]);
    let mut ed = Editor::new(AssetLibrary::new(&root));

    let i = ed.add_library_device("OAK").unwrap();
    let Device::Image(d) = &ed.document().devices[i] else {
        panic!("expected image device");
    };
    assert_eq!(d.name, "oak");
    assert_eq!((d.width, d.height), (Some(168), Some(84)));

    assert!(ed.add_library_device("missing").is_err());
    assert_eq!(ed.document().devices.len(), 1);
}

#[test]
fn library_logo_must_exist() {
    let root = fixture_root("library_logo");
    let mut ed = Editor::new(AssetLibrary::new(&root));
    assert!(ed.use_library_logo().is_err());
    assert_eq!(ed.undo_depth(), 0);

    write_png(&root.join("logo/logo.png"), 2, 2, [1, 1, 1, 255]);
    let path = ed.use_library_logo().unwrap();
    assert!(path.is_absolute());
    assert_eq!(ed.document().logo.as_deref(), Some(path.as_path()));
}

#[test]
fn failed_import_keeps_current_document() {
    let root = fixture_root("import");
    let bad = root.join("bad.json");
    std::fs::write(&bad, "[1, 2").unwrap();

    let mut ed = Editor::new(AssetLibrary::new(&root));
    ed.add_stripe(red_stripe()).unwrap();
    let before = ed.document().clone();

    assert!(ed.import(&bad).is_err());
    assert!(ed.import(root.join("missing.json")).is_err());
    assert_eq!(ed.document(), &before);
    assert_eq!(ed.undo_depth(), 1);
}

#[test]
fn save_then_import_round_trips() {
    let root = fixture_root("save_import");
    let file = root.join("ribbon.json");

    let mut ed = Editor::new(AssetLibrary::new(&root));
    ed.add_stripe(red_stripe().with_mirrored(true)).unwrap();
    ed.add_device(Device::text("V", Rgb8::new(255, 255, 255), 10, 200))
        .unwrap();
    ed.set_ribbon_info("Name", "Award", "Device");
    ed.save(&file).unwrap();

    let mut other = Editor::new(AssetLibrary::new(&root));
    let warnings = other.import(&file).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(other.document(), ed.document());
    assert!(other.undo());
    assert_eq!(other.document(), &RibbonDocument::default());
}

#[test]
fn export_writes_png_at_requested_size() {
    let root = fixture_root("export");
    let out = root.join("out").join("ribbon.png");
    let mut ed = Editor::new(AssetLibrary::new(&root));
    ed.add_stripe(red_stripe()).unwrap();

    let warnings = ed.export_png(&out, &ExportOpts::default()).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(image::image_dimensions(&out).unwrap(), (512, 141));
}
