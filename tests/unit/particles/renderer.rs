use super::*;
use crate::host::stage::Stage;
use crate::render::recording::{DrawCmd, RecordingSurface};

fn seeded(count: usize) -> ParticleOpts {
    ParticleOpts {
        count,
        seed: Some(11),
        ..ParticleOpts::default()
    }
}

#[test]
fn defaults_validate_and_bad_values_are_rejected() {
    ParticleOpts::default().validate().unwrap();
    let cases = [
        ParticleOpts {
            colors: Vec::new(),
            ..ParticleOpts::default()
        },
        ParticleOpts {
            camera_distance: 0.0,
            ..ParticleOpts::default()
        },
        ParticleOpts {
            pixel_ratio: 0.0,
            ..ParticleOpts::default()
        },
        ParticleOpts {
            speed: f64::INFINITY,
            ..ParticleOpts::default()
        },
        ParticleOpts {
            spread: -1.0,
            ..ParticleOpts::default()
        },
    ];
    for opts in cases {
        assert!(ParticleRenderer::new(opts).is_err());
    }
}

#[test]
fn default_palette_matches_warm_tones() {
    let opts = ParticleOpts::default();
    let rgba: Vec<Rgba8> = opts.colors.iter().map(|c| c.to_rgba8()).collect();
    assert_eq!(
        rgba,
        vec![
            Rgba8::new(0xFF, 0x7A, 0x64, 255),
            Rgba8::new(0xff, 0x8f, 0x7d, 255),
            Rgba8::new(0xfb, 0x92, 0x3c, 255),
        ]
    );
}

#[test]
fn pointer_maps_to_ndc_only_with_hover() {
    let mut r = ParticleRenderer::new(ParticleOpts {
        move_on_hover: true,
        ..seeded(3)
    })
    .unwrap();
    r.resize(Canvas::new(200, 100));
    r.pointer_move(Point::new(150.0, 25.0));
    assert_eq!(r.mouse_ndc(), (0.5, 0.5));
    r.pointer_move(Point::new(0.0, 100.0));
    assert_eq!(r.mouse_ndc(), (-1.0, -1.0));

    let mut still = ParticleRenderer::new(seeded(3)).unwrap();
    still.resize(Canvas::new(200, 100));
    still.pointer_move(Point::new(150.0, 25.0));
    assert_eq!(still.mouse_ndc(), (0.0, 0.0));
}

#[test]
fn solid_particles_draw_one_disc_each() {
    let canvas = Canvas::new(160, 120);
    let mut r = ParticleRenderer::new(seeded(25)).unwrap();
    r.resize(canvas);
    let mut s = RecordingSurface::new(canvas);
    r.draw(0.0, &mut s);
    let summary = s.summary();
    assert_eq!(summary.circles, 25);
    assert_eq!(summary.rects, 0);
    assert_eq!(s.clear_count(), 1);
    for cmd in s.commands() {
        match cmd {
            DrawCmd::FillCircle { radius, color, .. } => {
                assert!(*radius >= 0.5);
                assert_eq!(color.a, 255);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

#[test]
fn soft_particles_stack_translucent_layers_inward() {
    let canvas = Canvas::new(160, 120);
    let mut r = ParticleRenderer::new(ParticleOpts {
        alpha_particles: true,
        ..seeded(2)
    })
    .unwrap();
    r.resize(canvas);
    let mut s = RecordingSurface::new(canvas);
    r.draw(0.0, &mut s);
    assert_eq!(s.summary().circles, 2 * SOFT_LAYERS as u64);

    let radii: Vec<f64> = s.commands()[..SOFT_LAYERS]
        .iter()
        .map(|c| match c {
            DrawCmd::FillCircle { radius, color, .. } => {
                assert!(color.a < 255);
                *radius
            }
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert!(radii.windows(2).all(|w| w[0] > w[1]));
}

#[test]
fn empty_canvas_only_clears() {
    let mut r = ParticleRenderer::new(seeded(5)).unwrap();
    r.resize(Canvas::new(0, 0));
    let mut s = RecordingSurface::new(Canvas::new(0, 0));
    r.draw(10.0, &mut s);
    assert!(s.commands().is_empty());
    assert_eq!(s.clear_count(), 1);
}

#[test]
fn frames_spin_the_cloud_unless_disabled() {
    let canvas = Canvas::new(64, 64);
    let mut stage = Stage::mount(
        ParticleRenderer::new(seeded(4)).unwrap(),
        RecordingSurface::new(canvas),
        canvas,
    );
    for _ in 0..10 {
        stage.advance(16.0);
    }
    let rotation = stage.effect().unwrap().cloud().rotation();
    assert!((rotation - 0.01).abs() < 1e-12);
    assert_eq!(stage.surface().unwrap().summary().circles, 4);

    let mut fixed = Stage::mount(
        ParticleRenderer::new(ParticleOpts {
            disable_rotation: true,
            ..seeded(4)
        })
        .unwrap(),
        RecordingSurface::new(canvas),
        canvas,
    );
    for _ in 0..10 {
        fixed.advance(16.0);
    }
    assert_eq!(fixed.effect().unwrap().cloud().rotation(), 0.0);
}

#[test]
fn pixel_ratio_scales_diameter() {
    let canvas = Canvas::new(100, 100);
    let mut a = ParticleRenderer::new(seeded(6)).unwrap();
    let mut b = ParticleRenderer::new(ParticleOpts {
        pixel_ratio: 2.0,
        ..seeded(6)
    })
    .unwrap();
    a.resize(canvas);
    b.resize(canvas);
    for (pa, pb) in a.projected(0.0).iter().zip(&b.projected(0.0)) {
        assert!((pb.diameter - 2.0 * pa.diameter).abs() < 1e-9);
        assert_eq!(pa.center, pb.center);
    }
}

#[test]
fn seeded_clouds_are_repeatable() {
    let a = ParticleRenderer::new(seeded(30)).unwrap();
    let b = ParticleRenderer::new(seeded(30)).unwrap();
    assert_eq!(a.cloud().particles(), b.cloud().particles());
}

#[test]
fn oversized_clouds_are_rejected_before_allocation() {
    seeded(MAX_PARTICLES).validate().unwrap();
    assert!(matches!(
        ParticleRenderer::new(seeded(usize::MAX / 8)),
        Err(GlitchwaveError::Validation(_))
    ));
    assert!(ParticleRenderer::new(seeded(MAX_PARTICLES + 1)).is_err());
}
