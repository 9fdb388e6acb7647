use super::*;

const RED: Rgba8 = Rgba8::new(255, 0, 0, 255);

#[test]
fn rejects_sizes_beyond_raster_limit() {
    assert!(CpuSurface::new(Canvas::new(70_000, 10)).is_err());
    assert!(CpuSurface::new(Canvas::new(10, 70_000)).is_err());
    assert!(CpuSurface::new(Canvas::new(16, 16)).is_ok());
}

#[test]
fn fresh_surface_reads_back_transparent() {
    let mut s = CpuSurface::new(Canvas::new(8, 6)).unwrap();
    let f = s.read_frame().unwrap();
    assert_eq!((f.width, f.height), (8, 6));
    assert_eq!(f.data.len(), 8 * 6 * 4);
    assert!(f.premultiplied);
    assert_eq!(f.count_visible(), 0);
}

#[test]
fn full_canvas_fill_is_exact() {
    let canvas = Canvas::new(12, 9);
    let mut s = CpuSurface::new(canvas).unwrap();
    s.fill_rect(canvas.bounds(), RED);
    let f = s.read_frame().unwrap();
    assert_eq!(f.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(f.pixel(11, 8), Some([255, 0, 0, 255]));
    assert_eq!(f.count_visible(), 12 * 9);
}

#[test]
fn stroke_draws_visible_pixels() {
    let mut s = CpuSurface::new(Canvas::new(32, 32)).unwrap();
    s.stroke_polyline(
        &[Point::new(2.0, 16.0), Point::new(30.0, 16.0)],
        2.0,
        RED,
    );
    let f = s.read_frame().unwrap();
    assert!(f.count_visible() > 20);
    assert_eq!(f.pixel(16, 0).map(|p| p[3]), Some(0));
}

#[test]
fn circle_covers_its_center() {
    let mut s = CpuSurface::new(Canvas::new(20, 20)).unwrap();
    s.fill_circle(Point::new(10.0, 10.0), 4.0, RED);
    let f = s.read_frame().unwrap();
    assert_eq!(f.pixel(10, 10), Some([255, 0, 0, 255]));
    assert_eq!(f.pixel(0, 0).map(|p| p[3]), Some(0));
}

#[test]
fn clear_erases_earlier_content() {
    let canvas = Canvas::new(10, 10);
    let mut s = CpuSurface::new(canvas).unwrap();
    s.fill_rect(canvas.bounds(), RED);
    s.read_frame().unwrap();
    s.clear();
    assert_eq!(s.read_frame().unwrap().count_visible(), 0);
}

#[test]
fn content_persists_across_readbacks() {
    let canvas = Canvas::new(10, 10);
    let mut s = CpuSurface::new(canvas).unwrap();
    let half = Rgba8::new(0, 0, 0, 128);
    s.fill_rect(canvas.bounds(), half);
    let first = s.read_frame().unwrap().pixel(5, 5).unwrap()[3];
    assert!((126..=130).contains(&first));

    s.fill_rect(canvas.bounds(), half);
    let second = s.read_frame().unwrap().pixel(5, 5).unwrap()[3];
    assert!((185..=200).contains(&second), "alpha {second}");

    // A readback with nothing new drawn is stable.
    let third = s.read_frame().unwrap().pixel(5, 5).unwrap()[3];
    assert_eq!(second, third);
}

#[test]
fn block_glyphs_render_without_font() {
    let mut s = CpuSurface::new(Canvas::new(40, 40)).unwrap();
    assert!(!s.has_font());
    s.fill_glyph('A', Point::new(20.0, 20.0), 20.0, RED);
    let f = s.read_frame().unwrap();
    assert!(f.count_visible() > 0);
    assert_eq!(f.pixel(20, 20), Some([255, 0, 0, 255]));
}

#[test]
fn resize_changes_readback_size() {
    let mut s = CpuSurface::new(Canvas::new(10, 10)).unwrap();
    s.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), RED);
    s.resize(Canvas::new(6, 4));
    let f = s.read_frame().unwrap();
    assert_eq!((f.width, f.height), (6, 4));
    assert_eq!(f.count_visible(), 0);

    s.resize(Canvas::new(0, 4));
    let f = s.read_frame().unwrap();
    assert_eq!((f.width, f.height), (0, 4));
    assert!(f.data.is_empty());
}

#[test]
fn transparent_draws_are_skipped() {
    let canvas = Canvas::new(4, 4);
    let mut s = CpuSurface::new(canvas).unwrap();
    s.fill_rect(canvas.bounds(), Rgba8::TRANSPARENT);
    s.fill_circle(Point::new(2.0, 2.0), 1.0, Rgba8::TRANSPARENT);
    assert_eq!(s.pending, 0);
}
