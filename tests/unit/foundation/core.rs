use super::*;
use serde_json::json;

#[test]
fn canvas_origin_is_centered_at_one_third_height() {
    let c = Canvas::default();
    assert_eq!(c.origin(), Point::new(400.0, 200.0));
}

#[test]
fn canvas_rejects_degenerate_sizes() {
    assert!(Canvas::new(0, 10).is_err());
    assert!(Canvas::new(10, Canvas::MAX_SIDE + 1).is_err());
    assert!(Canvas::new(64, 48).is_ok());
}

#[test]
fn parses_hex_rgb_and_rgba() {
    assert_eq!(Rgba8::from_hex("#2196F3").unwrap(), Rgba8::STROKE_BLUE);
    assert_eq!(
        Rgba8::from_hex("ff000080").unwrap(),
        Rgba8 {
            r: 255,
            g: 0,
            b: 0,
            a: 128
        }
    );
    assert!(Rgba8::from_hex("#12345").is_err());
    assert!(Rgba8::from_hex("#GG0000").is_err());
}

#[test]
fn serde_accepts_hex_and_arrays() {
    let c: Rgba8 = serde_json::from_value(json!("#FF4444")).unwrap();
    assert_eq!(c, Rgba8::MARKER_RED);

    let c: Rgba8 = serde_json::from_value(json!([1, 2, 3])).unwrap();
    assert_eq!(c, Rgba8::opaque(1, 2, 3));

    let c: Rgba8 = serde_json::from_value(json!([1, 2, 3, 4])).unwrap();
    assert_eq!(c.a, 4);

    assert!(serde_json::from_value::<Rgba8>(json!([1, 2])).is_err());
    assert_eq!(serde_json::to_value(Rgba8::WHITE).unwrap(), json!("#FFFFFF"));
}

#[test]
fn rng_is_deterministic() {
    let mut a = Rng64::new(123);
    let mut b = Rng64::new(123);
    for _ in 0..10 {
        assert_eq!(a.next_u64(), b.next_u64());
    }
}

#[test]
fn rng_range_and_pick_stay_in_bounds() {
    let mut rng = Rng64::new(7);
    for _ in 0..1000 {
        let v = rng.range_f64(0.2, 0.8);
        assert!((0.2..0.8).contains(&v));
        assert!(PALETTE.contains(rng.pick(&PALETTE).unwrap()));
    }
    assert!(rng.pick::<u8>(&[]).is_none());
}
