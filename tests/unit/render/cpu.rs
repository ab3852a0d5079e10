use super::*;
use crate::{
    assets::store::PreparedImage,
    compile::plan::{RenderOpts, compile_ribbon},
    document::model::{Device, RibbonDocument, Stripe},
    render::passes::execute_plan,
};

fn px(frame: &FrameRGBA, x: u32, y: u32) -> [u8; 4] {
    frame.pixel(x, y).unwrap()
}

fn render_doc(doc: &RibbonDocument, assets: &PreparedAssets, canvas: Canvas) -> FrameRGBA {
    let plan = compile_ribbon(doc, assets, canvas, &RenderOpts::default()).unwrap();
    let mut backend = CpuBackend::new();
    execute_plan(&mut backend, &plan, assets).unwrap()
}

#[test]
fn background_and_mirrored_stripe_pixels() {
    let mut doc = RibbonDocument::new();
    doc.add_stripe(Stripe::new(100, 50, Rgb8::new(255, 0, 0)).with_mirrored(true))
        .unwrap();
    let frame = render_doc(&doc, &PreparedAssets::new(), Canvas::canonical());

    assert_eq!((frame.width, frame.height), (1024, 282));
    assert!(frame.premultiplied);
    let red = [255, 0, 0, 255];
    let black = [0, 0, 0, 255];
    assert_eq!(px(&frame, 99, 0), black);
    assert_eq!(px(&frame, 100, 0), red);
    assert_eq!(px(&frame, 149, 281), red);
    assert_eq!(px(&frame, 150, 10), black);
    assert_eq!(px(&frame, 873, 10), black);
    assert_eq!(px(&frame, 874, 10), red);
    assert_eq!(px(&frame, 923, 140), red);
    assert_eq!(px(&frame, 924, 140), black);
}

#[test]
fn texture_darkens_every_second_row() {
    let mut doc = RibbonDocument::new();
    doc.set_background(Rgb8::new(255, 255, 255));
    doc.set_texture(true);
    let frame = render_doc(&doc, &PreparedAssets::new(), Canvas::new(8, 6).unwrap());
    for x in 0..8 {
        assert_eq!(px(&frame, x, 0), [235, 235, 235, 255]);
        assert_eq!(px(&frame, x, 1), [255, 255, 255, 255]);
        assert_eq!(px(&frame, x, 4), [235, 235, 235, 255]);
        assert_eq!(px(&frame, x, 5), [255, 255, 255, 255]);
    }
}

#[test]
fn image_device_lands_in_its_row_slot() {
    let mut doc = RibbonDocument::new();
    doc.add_device(Device::image("oak", "/icons/oak.png", (0, 0), (84, 84)));
    let mut assets = PreparedAssets::new();
    assets.insert_image(
        "/icons/oak.png",
        PreparedImage {
            width: 4,
            height: 4,
            rgba8_premul: Arc::new([0u8, 255, 0, 255].repeat(16)),
        },
    );

    let frame = render_doc(&doc, &assets, Canvas::canonical());
    assert_eq!(px(&frame, 512, 141), [0, 255, 0, 255]);
    assert_eq!(px(&frame, 471, 100), [0, 255, 0, 255]);
    assert_eq!(px(&frame, 460, 141), [0, 0, 0, 255]);
    assert_eq!(px(&frame, 512, 90), [0, 0, 0, 255]);
}

#[test]
fn readback_without_begin_fails() {
    let plan = compile_ribbon(
        &RibbonDocument::new(),
        &PreparedAssets::new(),
        Canvas::canonical(),
        &RenderOpts::default(),
    )
    .unwrap();
    let mut backend = CpuBackend::new();
    assert!(backend.readback_rgba8(&plan).is_err());
}

#[test]
fn premul_bytes_to_pixmap_checks_length() {
    assert!(image_premul_bytes_to_pixmap(&[0u8; 8], 1, 1).is_err());
    assert!(image_premul_bytes_to_pixmap(&[0u8; 4], 1, 1).is_ok());
}

fn fixture_font_bytes() -> Vec<u8> {
    std::fs::read(Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/fonts/DejaVuSans.ttf"))
        .unwrap()
}

fn is_black(p: [u8; 4]) -> bool {
    p == [0, 0, 0, 255]
}

#[test]
fn text_device_inks_above_its_baseline_in_its_color() {
    let mut doc = RibbonDocument::new();
    doc.add_device(Device::text("VV", Rgb8::new(255, 0, 0), 100, 150));
    let mut assets = PreparedAssets::new();
    assets.set_font(fixture_font_bytes());

    let frame = render_doc(&doc, &assets, Canvas::canonical());

    let mut inked = 0;
    for y in 0..frame.height {
        for x in 0..frame.width {
            let p = px(&frame, x, y);
            if is_black(p) {
                continue;
            }
            assert!(
                (95..200).contains(&x) && (115..=152).contains(&y),
                "ink outside the label at ({x}, {y}): {p:?}"
            );
            assert_eq!((p[1], p[2], p[3]), (0, 0, 255), "non-red ink at ({x}, {y})");
            inked += 1;
        }
    }
    assert!(inked > 50, "label drew only {inked} pixels");
    assert!(
        (95..200)
            .flat_map(|x| (115..=152).map(move |y| (x, y)))
            .any(|(x, y)| px(&frame, x, y)[0] > 200)
    );
}

#[test]
fn unparsable_font_skips_text_without_failing() {
    let mut doc = RibbonDocument::new();
    doc.set_background(Rgb8::new(0, 0, 255));
    doc.add_device(Device::text("V", Rgb8::new(255, 0, 0), 100, 150));
    let mut assets = PreparedAssets::new();
    assets.set_font(b"not a font".to_vec());

    let frame = render_doc(&doc, &assets, Canvas::preview());
    assert!(frame.data.chunks_exact(4).all(|p| p == [0, 0, 255, 255]));
}

#[test]
fn smooth_resample_keeps_channels_within_alpha() {
    let (w, h) = (8u32, 8u32);
    let mut bytes = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            let on = (x + y) % 2 == 0;
            bytes.extend_from_slice(if on { &[255, 255, 255, 255] } else { &[0, 0, 0, 0] });
        }
    }
    let img = PreparedImage {
        width: w,
        height: h,
        rgba8_premul: Arc::new(bytes),
    };

    for (tw, th) in [(3, 3), (13, 5), (20, 20)] {
        let out = resample_premul(&img, tw, th, true).unwrap();
        assert_eq!(out.len(), (tw * th * 4) as usize);
        assert!(out.chunks_exact(4).all(|p| p[..3].iter().all(|&c| c <= p[3])));
    }

    let same = resample_premul(&img, w, h, true).unwrap();
    assert_eq!(same.as_slice(), img.rgba8_premul.as_slice());
}
