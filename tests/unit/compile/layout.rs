use super::*;
use crate::foundation::core::Rgb8;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn mirrored_stripe_spans_on_canonical_canvas() {
    let s = Stripe::new(100, 50, Rgb8::new(255, 0, 0)).with_mirrored(true);
    let spans = stripe_spans(&s, Canvas::canonical());
    assert_eq!(spans.primary, Rect::new(100.0, 0.0, 150.0, 282.0));
    assert_eq!(spans.mirror, Some(Rect::new(874.0, 0.0, 924.0, 282.0)));
}

#[test]
fn stripe_spans_scale_to_preview() {
    let s = Stripe::new(100, 50, Rgb8::BLACK).with_mirrored(true);
    let spans = stripe_spans(&s, Canvas::preview());
    assert_eq!(spans.primary, Rect::new(50.0, 0.0, 75.0, 141.0));
    assert_eq!(spans.mirror, Some(Rect::new(437.0, 0.0, 462.0, 141.0)));

    let plain = stripe_spans(&Stripe::new(0, 10, Rgb8::BLACK), Canvas::preview());
    assert_eq!(plain.mirror, None);
}

#[test]
fn wide_row_is_shrunk_by_one_shared_factor() {
    let canvas = Canvas::canonical();
    let boxes = [
        DeviceBox {
            index: 0,
            width: 400.0,
            height: 84.0,
        },
        DeviceBox {
            index: 2,
            width: 200.0,
            height: 84.0,
        },
        DeviceBox {
            index: 5,
            width: 600.0,
            height: 84.0,
        },
    ];
    let row = layout_device_row(&boxes, canvas);
    assert_eq!(
        row.iter().map(|(i, _)| *i).collect::<Vec<_>>(),
        [0, 2, 5]
    );

    let total: f64 = row.iter().map(|(_, r)| r.width()).sum();
    assert!(approx(total, 1024.0 * 0.8));

    let factor = 0.8 * 1024.0 / 1200.0;
    for ((_, r), b) in row.iter().zip(&boxes) {
        assert!(approx(r.width(), b.width * factor));
        assert!(approx(r.height(), b.height * factor));
        assert!(approx(r.y0, (282.0 - r.height()) / 2.0));
    }

    assert!(approx(row[0].1.x0, (1024.0 - total) / 2.0));
    assert!(approx(row[0].1.x1, row[1].1.x0));
    assert!(approx(row[1].1.x1, row[2].1.x0));
}

#[test]
fn narrow_row_keeps_natural_size() {
    let row = layout_device_row(
        &[DeviceBox {
            index: 0,
            width: 84.0,
            height: 84.0,
        }],
        Canvas::canonical(),
    );
    assert_eq!(row.len(), 1);
    let r = row[0].1;
    assert!(approx(r.width(), 84.0));
    assert!(approx(r.x0, (1024.0 - 84.0) / 2.0));
    assert!(approx(r.y0, 99.0));
}

#[test]
fn tall_device_is_capped_at_a_third_of_the_height() {
    let row = layout_device_row(
        &[DeviceBox {
            index: 0,
            width: 100.0,
            height: 200.0,
        }],
        Canvas::canonical(),
    );
    let r = row[0].1;
    assert!(approx(r.height(), 94.0));
    assert!(approx(r.width(), 47.0));
    assert!(approx(r.y0, 94.0));
}

#[test]
fn empty_row_is_empty() {
    assert!(layout_device_row(&[], Canvas::canonical()).is_empty());
}

#[test]
fn logo_fills_height_minus_margins() {
    let r = logo_rect(100, 50, Canvas::canonical()).unwrap();
    assert_eq!(r, Rect::new(270.0, 20.0, 754.0, 262.0));

    let p = logo_rect(100, 50, Canvas::preview()).unwrap();
    assert!(approx(p.y0, 10.0));
    assert!(approx(p.height(), 121.0));

    assert_eq!(logo_rect(0, 50, Canvas::canonical()), None);
}

#[test]
fn snap_keeps_neighbours_abutting() {
    let a = snap(Rect::new(10.4, 0.6, 20.5, 9.4));
    let b = snap(Rect::new(20.5, 0.6, 30.2, 9.4));
    assert_eq!(a.x1, b.x0);
    assert_eq!(a, Rect::new(10.0, 1.0, 21.0, 9.0));
}

#[test]
fn outline_dash_pattern() {
    let dashes = outline_dashes(Canvas::new(12, 8).unwrap());
    assert_eq!(dashes.len(), 8);
    assert!(dashes.contains(&Rect::new(0.0, 0.0, 4.0, 1.0)));
    assert!(dashes.contains(&Rect::new(6.0, 0.0, 10.0, 1.0)));
    assert!(dashes.contains(&Rect::new(6.0, 7.0, 10.0, 8.0)));
    assert!(dashes.contains(&Rect::new(0.0, 6.0, 1.0, 8.0)));
    assert!(dashes.contains(&Rect::new(11.0, 0.0, 12.0, 4.0)));
}
