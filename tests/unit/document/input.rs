use super::*;

fn draft(offset: i64, width: i64) -> StripeDraft {
    StripeDraft {
        offset,
        width,
        color: Rgb8::new(255, 0, 0),
        mirrored: true,
    }
}

#[test]
fn stripe_draft_range_checks() {
    let s = draft(100, 50).into_stripe().unwrap();
    assert_eq!((s.offset, s.width, s.mirrored), (100, 50, true));

    assert!(draft(0, 1).into_stripe().is_ok());
    assert!(draft(1024, 1024).into_stripe().is_ok());
    assert!(draft(-1, 10).into_stripe().is_err());
    assert!(draft(1025, 10).into_stripe().is_err());
    assert!(draft(0, 0).into_stripe().is_err());
    assert!(draft(0, 1025).into_stripe().is_err());
}

#[test]
fn text_device_draft_requires_name_and_position_on_canvas() {
    let ok = TextDeviceDraft {
        name: "  V  ".into(),
        color: Rgb8::new(255, 255, 255),
        x: 500,
        y: 282,
    }
    .into_device()
    .unwrap();
    assert_eq!(ok, Device::text("V", Rgb8::new(255, 255, 255), 500, 282));

    let empty = TextDeviceDraft {
        name: "   ".into(),
        color: Rgb8::BLACK,
        x: 0,
        y: 0,
    };
    assert!(empty.into_device().is_err());

    let off = TextDeviceDraft {
        name: "V".into(),
        color: Rgb8::BLACK,
        x: 0,
        y: 283,
    };
    assert!(off.into_device().is_err());
}

#[test]
fn image_device_draft_sizes_from_aspect_and_centers() {
    assert_eq!(DEVICE_HEIGHT, 84);

    let d = ImageDeviceDraft {
        name: "oak".into(),
        path: PathBuf::from("/icons/oak.png"),
    }
    .into_device(200, 100)
    .unwrap();
    let Device::Image(img) = d else {
        panic!("expected image device");
    };
    assert_eq!((img.width, img.height), (Some(168), Some(84)));
    assert_eq!(img.x, (1024 - 168) / 2);
    assert_eq!(img.y, (282 - 84) / 2);

    let zero = ImageDeviceDraft {
        name: "x".into(),
        path: PathBuf::from("/x.png"),
    };
    assert!(zero.into_device(0, 10).is_err());
}

#[test]
fn cancelled_capture_never_runs_the_action() {
    let mut calls = 0;
    let out = Capture::<StripeDraft>::Cancelled
        .apply(|d| {
            calls += 1;
            d.into_stripe()
        })
        .unwrap();
    assert_eq!(out, None);
    assert_eq!(calls, 0);

    let out = Capture::Confirmed(draft(1, 2))
        .apply(StripeDraft::into_stripe)
        .unwrap();
    assert_eq!(out.map(|s| s.width), Some(2));
}

#[test]
fn capture_from_option_and_map() {
    let c: Capture<i32> = Some(3).into();
    assert_eq!(c.clone().map(|v| v * 2).confirmed(), Some(6));
    let none: Capture<i32> = None.into();
    assert_eq!(none, Capture::Cancelled);
    assert_eq!(none.confirmed(), None);
}

#[test]
fn oversized_icon_is_centered_with_floor_division() {
    let d = ImageDeviceDraft {
        name: "banner".into(),
        path: PathBuf::from("/icons/banner.png"),
    }
    .into_device(1051, 64)
    .unwrap();
    let Device::Image(img) = d else {
        panic!("expected image device");
    };
    assert_eq!(img.width, Some(1379));
    assert_eq!(img.x, -178);
}
