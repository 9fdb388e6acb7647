use super::*;

/// A system font when one is installed; font-dependent tests return early otherwise.
fn system_font() -> Option<Vec<u8>> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/Library/Fonts/Arial Unicode.ttf",
    ]
    .iter()
    .find_map(|p| std::fs::read(p).ok())
}

#[test]
fn garbage_bytes_are_not_a_font() {
    assert!(GlyphAtlas::from_bytes(b"definitely not a font".to_vec()).is_err());
}

#[test]
fn missing_font_file_is_reported() {
    let err = GlyphAtlas::from_path(Path::new("/nonexistent/font.ttf")).unwrap_err();
    assert!(err.to_string().contains("read font"));
}

#[test]
fn shaping_is_cached_and_centered() {
    let Some(bytes) = system_font() else {
        return;
    };
    let mut atlas = GlyphAtlas::from_bytes(bytes).unwrap();
    assert!(!atlas.family().is_empty());

    let a = atlas.shape('A', 24.0).unwrap().clone();
    assert_eq!(a.glyphs.len(), 1);
    assert!(a.width > 0.0 && a.height > 0.0);
    assert!(a.glyphs[0].x.abs() <= a.width);
    let again = atlas.shape('A', 24.0).unwrap().clone();
    assert_eq!(a, again);

    assert!(atlas.shape('A', 0.0).is_err());
    assert!(atlas.shape('A', f32::NAN).is_err());
}

#[test]
fn block_glyph_stays_inside_its_cell() {
    let center = Point::new(50.0, 40.0);
    let rects = block_glyph_rects('Q', center, 20.0);
    assert!(!rects.is_empty());
    let cell = Rect::new(44.0, 32.0, 56.0, 48.0);
    for r in &rects {
        assert!(r.x0 >= cell.x0 - 1e-9 && r.x1 <= cell.x1 + 1e-9);
        assert!(r.y0 >= cell.y0 - 1e-9 && r.y1 <= cell.y1 + 1e-9);
    }
    // Middle cell is always lit.
    assert!(rects.iter().any(|r| r.contains(center)));
}

#[test]
fn block_glyphs_differ_between_characters() {
    let c = Point::new(0.0, 0.0);
    assert_eq!(block_glyph_rects('x', c, 10.0), block_glyph_rects('x', c, 10.0));
    let distinct: std::collections::HashSet<u32> =
        "ABCDEFGH".chars().map(block_pattern).collect();
    assert!(distinct.len() > 1);
}

#[test]
fn whitespace_and_bad_sizes_draw_nothing() {
    assert!(block_glyph_rects(' ', Point::ZERO, 10.0).is_empty());
    assert!(block_glyph_rects('a', Point::ZERO, 0.0).is_empty());
    assert!(block_glyph_rects('a', Point::ZERO, f64::NAN).is_empty());
}
