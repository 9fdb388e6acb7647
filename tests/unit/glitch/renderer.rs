use super::*;
use crate::host::stage::Stage;
use crate::render::recording::{DrawCmd, RecordingSurface};

/// Scripted source that always returns the same sample.
struct Fixed(f64);

impl RandomSource for Fixed {
    fn next_f64(&mut self) -> f64 {
        self.0
    }
}

fn hello(outer: bool, center: bool, smooth: bool) -> GlitchOpts {
    GlitchOpts {
        text: "HELLO".to_owned(),
        outer_vignette: outer,
        center_vignette: center,
        smooth,
        seed: Some(11),
        ..GlitchOpts::default()
    }
}

#[test]
fn defaults_validate() {
    GlitchOpts::default().validate().unwrap();
    assert_eq!(GlitchOpts::default().glitch_speed_ms, 50.0);
}

#[test]
fn rejects_bad_options() {
    let bad = GlitchOpts {
        glitch_speed_ms: 0.0,
        ..GlitchOpts::default()
    };
    assert!(bad.validate().is_err());
    let bad = GlitchOpts {
        resample_probability: 1.5,
        ..GlitchOpts::default()
    };
    assert!(bad.validate().is_err());
    let bad = GlitchOpts {
        charset: "x".to_owned(),
        ..GlitchOpts::default()
    };
    assert!(GlitchRenderer::new(bad).is_err());
}

#[test]
fn empty_canvas_defers_drawing() {
    let mut r = GlitchRenderer::new(hello(true, false, true)).unwrap();
    r.resize(Canvas::new(0, 240));
    let mut s = RecordingSurface::new(Canvas::new(0, 240));
    r.draw(&mut s);
    assert!(r.grid().is_none());
    assert!(s.commands().is_empty());
    assert_eq!(r.force_scramble(), 0);
}

#[test]
fn caption_renders_at_full_opacity_in_every_mode() {
    for (outer, center, smooth) in [
        (true, false, true),
        (true, true, false),
        (false, true, true),
        (false, true, false),
        (false, false, true),
    ] {
        let mut r = GlitchRenderer::new(hello(outer, center, smooth)).unwrap();
        let canvas = Canvas::new(640, 360);
        r.resize(canvas);
        let mut s = RecordingSurface::new(canvas);
        r.draw(&mut s);

        let caption_color = r.opts().caption_color.to_rgba8();
        let grid = r.grid().unwrap();
        let l = *grid.layout();
        for (i, expected) in "HELLO".chars().enumerate() {
            let center_pt = l.cell_center(l.center_row, l.start_col as usize + i);
            let (ch, _, color) = s
                .glyphs()
                .find(|(_, p, _)| *p == center_pt)
                .expect("caption glyph drawn");
            assert_eq!(ch, expected);
            assert_eq!(color, caption_color);
            assert_eq!(color.a, 255);
        }
    }
}

#[test]
fn background_cells_follow_vignette() {
    let mut r = GlitchRenderer::new(hello(true, false, false)).unwrap();
    let canvas = Canvas::new(640, 360);
    r.resize(canvas);
    let mut s = RecordingSurface::new(canvas);
    r.draw(&mut s);
    let l = *r.grid().unwrap().layout();

    let corner = l.cell_center(0, 0);
    let (_, _, color) = s.glyphs().find(|(_, p, _)| *p == corner).unwrap();
    let expected = Vignette::Outer.opacity(false, l.normalized_distance(corner));
    assert_eq!(color, Rgba8::new(255, 122, 100, 255).with_opacity(expected));
}

#[test]
fn frame_draws_background_every_cell_and_scanlines() {
    let mut r = GlitchRenderer::new(hello(true, false, true)).unwrap();
    let canvas = Canvas::new(640, 360);
    r.resize(canvas);
    let mut s = RecordingSurface::new(canvas);
    r.draw(&mut s);

    let cells = r.grid().unwrap().cells().len();
    let sum = s.summary();
    assert_eq!(sum.glyphs as usize, cells);
    assert_eq!(sum.rects, 1 + 180);
    assert_eq!(
        s.commands().first(),
        Some(&DrawCmd::FillRect {
            rect: canvas.bounds(),
            color: Rgba8::new(10, 10, 10, 255),
        })
    );
    assert!(s.commands().iter().any(|c| matches!(
        c,
        DrawCmd::FillRect { color, .. } if *color == SCANLINE
    )));
}

#[test]
fn hello_forced_scramble_changes_every_background_cell() {
    let mut r = GlitchRenderer::new(hello(true, false, true)).unwrap();
    r.resize(Canvas::new(800, 450));
    let before = r.grid().unwrap().cells().to_vec();

    let changed = r.force_scramble();

    let after = r.grid().unwrap().cells();
    assert_eq!(changed, before.iter().filter(|c| !c.is_caption).count());
    for (a, b) in before.iter().zip(after) {
        assert_eq!(a.is_caption, b.is_caption);
        if a.is_caption {
            assert_eq!(a.ch, b.ch);
        } else {
            assert_ne!(a.ch, b.ch);
        }
    }
    assert_eq!(r.grid().unwrap().visible_caption(), "HELLO");
}

#[test]
fn scramble_tick_is_gated_by_probability() {
    let mut hit = GlitchRenderer::with_rng(hello(true, false, true), Fixed(0.05)).unwrap();
    hit.resize(Canvas::new(320, 180));
    assert!(hit.on_scramble_tick());

    let mut miss = GlitchRenderer::with_rng(hello(true, false, true), Fixed(0.5)).unwrap();
    miss.resize(Canvas::new(320, 180));
    let before = miss.grid().unwrap().cells().to_vec();
    assert!(!miss.on_scramble_tick());
    assert_eq!(before, miss.grid().unwrap().cells());
}

#[test]
fn stage_drives_scramble_timer() {
    let opts = GlitchOpts {
        scramble_probability: 1.0,
        resample_probability: 0.0,
        ..hello(true, false, true)
    };
    let renderer = GlitchRenderer::new(opts).unwrap();
    assert_eq!(
        renderer.timers(),
        vec![TimerSpec::every(SCRAMBLE_TIMER, 50.0)]
    );

    let canvas = Canvas::new(320, 180);
    let mut stage = Stage::mount(renderer, RecordingSurface::new(canvas), canvas);
    stage.advance(0.0);
    let before = stage.effect().unwrap().grid().unwrap().cells().to_vec();

    stage.advance(50.0);
    let after = stage.effect().unwrap().grid().unwrap().cells().to_vec();
    for (a, b) in before.iter().zip(&after) {
        if !a.is_caption {
            assert_ne!(a.ch, b.ch);
        }
    }
}

#[test]
fn opts_deserialize_with_defaults() {
    let opts: GlitchOpts =
        serde_json::from_str(r##"{"text": "HI", "smooth": false, "caption_color": "#00ff00"}"##)
            .unwrap();
    assert_eq!(opts.text, "HI");
    assert!(!opts.smooth);
    assert!(opts.outer_vignette);
    assert_eq!(opts.caption_color.to_rgba8(), Rgba8::new(0, 255, 0, 255));
    assert!(serde_json::from_str::<GlitchOpts>(r#"{"bogus": 1}"#).is_err());
}
