use super::*;

fn still_params() -> WaveParams {
    WaveParams {
        speed_x: 0.02,
        speed_y: 0.01,
        amp_x: 0.0,
        amp_y: 0.0,
        friction: 0.9,
        tension: 0.01,
        radius: 120.0,
        noise_scale: 0.005,
        pointer_force: 0.5,
    }
}

#[test]
fn sizing_matches_formula() {
    let g = WaveGrid::new(Canvas::new(120, 72), 12.0, 36.0).unwrap();
    assert_eq!(g.cols(), 11);
    assert_eq!(g.rows(), 3);
    assert_eq!(g.points().len(), 33);
    assert_eq!(g.point(2, 10).unwrap().origin, Point::new(120.0, 72.0));
}

#[test]
fn rest_point_without_noise_or_pointer_never_drifts() {
    let mut g = WaveGrid::new(Canvas::new(120, 72), 12.0, 36.0).unwrap();
    let noise = Noise2D::new(1);
    // Pointer far away and still.
    let pointer = Pointer::at(Point::new(-10_000.0, -10_000.0));
    for t in 1..=500 {
        g.step(t as f64, &noise, &still_params(), &pointer);
    }
    for p in g.points() {
        assert_eq!(p.pos, p.origin);
        assert_eq!(p.vel, Vec2::ZERO);
    }
}

#[test]
fn still_pointer_inside_radius_applies_no_force() {
    let mut g = WaveGrid::new(Canvas::new(24, 24), 12.0, 12.0).unwrap();
    let noise = Noise2D::new(1);
    let pointer = Pointer::at(Point::new(12.0, 12.0));
    g.step(1.0, &noise, &still_params(), &pointer);
    assert!(g.points().iter().all(|p| p.pos == p.origin));
}

#[test]
fn spring_converges_to_displaced_target() {
    let mut g = WaveGrid::new(Canvas::new(1, 1), 10.0, 10.0).unwrap();
    // Displace every point by (30, -20) from its origin; the target is the origin.
    for p in g.points_mut() {
        p.pos = p.origin + Vec2::new(30.0, -20.0);
    }
    let noise = Noise2D::new(2);
    let pointer = Pointer::at(Point::new(1e6, 1e6));
    let params = WaveParams {
        tension: 0.05,
        friction: 0.8,
        ..still_params()
    };
    let start = 30.0_f64.hypot(20.0);
    let mut max_seen: f64 = 0.0;
    for t in 1..=2000 {
        g.step(t as f64, &noise, &params, &pointer);
        for p in g.points() {
            max_seen = max_seen.max((p.pos - p.origin).hypot());
        }
    }
    for p in g.points() {
        assert!((p.pos - p.origin).hypot() < 1e-6);
    }
    assert!(max_seen <= start + 1e-9);
}

#[test]
fn moving_pointer_pushes_nearby_points() {
    let mut g = WaveGrid::new(Canvas::new(120, 72), 12.0, 36.0).unwrap();
    let noise = Noise2D::new(3);
    let mut pointer = Pointer::at(Point::new(60.0, 36.0));
    pointer.move_to(Point::new(64.0, 36.0));
    assert_eq!(pointer.vel, Vec2::new(4.0, 0.0));

    g.step(1.0, &noise, &still_params(), &pointer);
    let near = g.point(1, 5).unwrap();
    assert!(near.vel.x > 0.0);
    assert!(near.pos.x > near.origin.x);

    // A point outside the radius only feels the spring, which is zero here.
    let mut far_grid = WaveGrid::new(Canvas::new(600, 72), 12.0, 36.0).unwrap();
    far_grid.step(1.0, &noise, &still_params(), &pointer);
    let far = far_grid.point(0, 50).unwrap();
    assert_eq!(far.pos, far.origin);
}

#[test]
fn pointer_velocity_is_delta_of_samples() {
    let mut p = Pointer::at(Point::new(10.0, 10.0));
    p.move_to(Point::new(13.0, 6.0));
    assert_eq!(p.vel, Vec2::new(3.0, -4.0));
    p.move_to(Point::new(13.0, 6.0));
    assert_eq!(p.vel, Vec2::ZERO);
}

#[test]
fn rebuild_origins_stay_within_bounds_plus_one_cell() {
    for &(w, h, xg, yg) in &[
        (120u32, 72u32, 12.0, 36.0),
        (333, 101, 12.0, 36.0),
        (1, 1, 12.0, 36.0),
        (1920, 1080, 7.5, 13.0),
    ] {
        let canvas = Canvas::new(w, h);
        let g = WaveGrid::new(canvas, xg, yg).unwrap();
        let (cols, rows) = WaveGrid::dims_for(canvas, xg, yg);
        assert_eq!((g.cols(), g.rows()), (cols, rows));
        assert_eq!(
            cols,
            (f64::from(w) / xg).ceil() as usize + 1,
            "{w}x{h}"
        );
        for p in g.points() {
            assert!(p.origin.x >= 0.0 && p.origin.x <= f64::from(w) + xg);
            assert!(p.origin.y >= 0.0 && p.origin.y <= f64::from(h) + yg);
            assert_eq!(p.vel, Vec2::ZERO);
        }
    }
}

#[test]
fn row_and_column_polylines() {
    let g = WaveGrid::new(Canvas::new(120, 72), 12.0, 36.0).unwrap();
    let row = g.row_positions(1);
    assert_eq!(row.len(), 11);
    assert_eq!(row[0], Point::new(0.0, 36.0));
    let col = g.col_positions(3);
    assert_eq!(col.len(), 3);
    assert_eq!(col[2], Point::new(36.0, 72.0));
}

#[test]
fn vanishing_gaps_exceed_the_point_limit() {
    let canvas = Canvas::new(100, 100);
    assert_eq!(WaveGrid::point_count(canvas, 12.0, 36.0), Some(10 * 4));
    assert_eq!(WaveGrid::point_count(canvas, 1e-12, 1e-12), None);
    assert_eq!(WaveGrid::point_count(canvas, 0.01, 0.01), None);
    assert!(matches!(
        WaveGrid::new(canvas, 1e-12, 1e-12),
        Err(GlitchwaveError::Validation(_))
    ));
}
