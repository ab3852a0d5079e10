use super::*;

#[test]
fn canvas_new_rejects_zero_and_oversized() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, 0).is_err());
    assert!(Canvas::new(70_000, 10).is_err());
    assert_eq!(
        Canvas::new(512, 141).unwrap(),
        Canvas {
            width: 512,
            height: 141
        }
    );
}

#[test]
fn canvas_scales_from_canonical_units() {
    let c = Canvas::canonical();
    assert_eq!(c.scale_x(), 1.0);
    assert_eq!(c.scale_y(), 1.0);

    let p = Canvas::preview();
    assert_eq!((p.width, p.height), (512, 141));
    assert_eq!(p.scale_x(), 0.5);
    assert_eq!(p.scale_y(), 0.5);
    assert_eq!(p.byte_len(), 512 * 141 * 4);
}

#[test]
fn rgb8_hex_parse_and_format() {
    let c: Rgb8 = "#FF8000".parse().unwrap();
    assert_eq!(c, Rgb8::new(255, 128, 0));
    assert_eq!(c.to_hex(), "#ff8000");
    assert_eq!(c.to_string(), "#ff8000");

    assert_eq!("00ff00".parse::<Rgb8>().unwrap(), Rgb8::new(0, 255, 0));
    assert_eq!(
        "#11223344".parse::<Rgb8>().unwrap(),
        Rgb8::new(0x11, 0x22, 0x33)
    );
    assert!("#12345".parse::<Rgb8>().is_err());
    assert!("#gg0000".parse::<Rgb8>().is_err());
}

#[test]
fn rgb8_serde_accepts_hex_object_and_array() {
    let hex: Rgb8 = serde_json::from_str(r##""#0a0b0c""##).unwrap();
    let obj: Rgb8 = serde_json::from_str(r#"{"r":10,"g":11,"b":12}"#).unwrap();
    let arr: Rgb8 = serde_json::from_str("[10,11,12]").unwrap();
    assert_eq!(hex, obj);
    assert_eq!(obj, arr);
    assert_eq!(serde_json::to_string(&hex).unwrap(), r##""#0a0b0c""##);
}

#[test]
fn rgba8_premul_from_straight() {
    let p = Rgba8Premul::from_straight_rgba(255, 128, 0, 128);
    assert_eq!(p.to_array(), [128, 64, 0, 128]);
    assert_eq!(Rgba8Premul::opaque(Rgb8::new(1, 2, 3)).to_array(), [1, 2, 3, 255]);
    assert_eq!(Rgba8Premul::transparent().a, 0);
}
