use super::*;

#[test]
fn visible_starts_after_last_clear() {
    let mut s = RecordingSurface::new(Canvas::default());
    s.draw_line(
        Point::new(0.0, 0.0),
        Point::new(1.0, 1.0),
        Rgba8::STROKE_BLUE,
        2.0,
    );
    s.clear(Rgba8::WHITE);
    draw_origin_marker(&mut s, Point::new(5.0, 5.0));
    s.draw_line(
        Point::new(5.0, 5.0),
        Point::new(6.0, 6.0),
        Rgba8::STROKE_BLUE,
        2.0,
    );

    assert_eq!(s.visible().len(), 3);
    assert_eq!(s.visible_lines(), 1);
    assert_eq!(s.total_lines(), 2);
}

#[test]
fn origin_marker_is_red_then_white() {
    let mut s = RecordingSurface::new(Canvas::default());
    let at = Point::new(10.0, 20.0);
    draw_origin_marker(&mut s, at);
    assert_eq!(
        s.calls(),
        [
            DrawCall::Circle {
                center: at,
                radius: ORIGIN_OUTER_RADIUS,
                color: Rgba8::MARKER_RED
            },
            DrawCall::Circle {
                center: at,
                radius: ORIGIN_INNER_RADIUS,
                color: Rgba8::WHITE
            },
        ]
    );
}

#[test]
fn export_is_recorded_without_io() {
    let mut s = RecordingSurface::new(Canvas::default());
    let p = s.export_image(Path::new("nowhere/out.png")).unwrap();
    assert_eq!(p, PathBuf::from("nowhere/out.png"));
    assert!(matches!(s.calls().last(), Some(DrawCall::Export(_))));
}
