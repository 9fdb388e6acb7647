use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;

use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{GlitchwaveError, GlitchwaveResult};

/// One glyph of a shaped character, relative to the center of the character's layout box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedGlyph {
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

/// A character shaped at one font size.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapedChar {
    pub glyphs: Vec<PlacedGlyph>,
    pub font_size: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GlyphKey {
    ch: char,
    size_bits: u32,
}

/// Shapes single characters from one font with parley and caches the result per size.
pub struct GlyphAtlas {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family: String,
    font: vello_cpu::peniko::FontData,
    cache: HashMap<GlyphKey, ShapedChar>,
}

impl std::fmt::Debug for GlyphAtlas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphAtlas")
            .field("family", &self.family)
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl GlyphAtlas {
    pub fn from_path(path: &Path) -> GlitchwaveResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font '{}'", path.display()))?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> GlitchwaveResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            GlitchwaveError::validation("no font families registered from font bytes")
        })?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| GlitchwaveError::validation("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0);
        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
            font,
            cache: HashMap::new(),
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn font(&self) -> &vello_cpu::peniko::FontData {
        &self.font
    }

    /// Shape `ch` at `font_size` pixels, reusing an earlier result when possible.
    pub fn shape(&mut self, ch: char, font_size: f32) -> GlitchwaveResult<&ShapedChar> {
        if !font_size.is_finite() || font_size <= 0.0 {
            return Err(GlitchwaveError::validation(
                "glyph font size must be finite and > 0",
            ));
        }
        let key = GlyphKey {
            ch,
            size_bits: font_size.to_bits(),
        };
        if !self.cache.contains_key(&key) {
            let shaped = self.layout_char(ch, font_size);
            self.cache.insert(key, shaped);
        }
        self.cache
            .get(&key)
            .ok_or_else(|| GlitchwaveError::render("glyph cache miss after insert"))
    }

    fn layout_char(&mut self, ch: char, font_size: f32) -> ShapedChar {
        let mut buf = [0u8; 4];
        let text: &str = ch.encode_utf8(&mut buf);

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font_size));
        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);

        let width = layout.width();
        let height = layout.height();
        let mut glyphs = Vec::new();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                glyphs.extend(run.glyphs().map(|g| PlacedGlyph {
                    id: g.id,
                    x: g.x - width * 0.5,
                    y: g.y - height * 0.5,
                }));
            }
        }
        ShapedChar {
            glyphs,
            font_size,
            width,
            height,
        }
    }
}

const BLOCK_COLS: u32 = 3;
const BLOCK_ROWS: u32 = 5;

/// Pixel-block stand-in for `ch` when no font is loaded: a 3x5 pattern derived from the code
/// point, sized like a monospace cell and centered on `center`. Whitespace yields nothing.
pub fn block_glyph_rects(ch: char, center: Point, font_size: f64) -> Vec<Rect> {
    if ch.is_whitespace() || !(font_size.is_finite() && font_size > 0.0) {
        return Vec::new();
    }
    let bits = block_pattern(ch);
    let cell_w = font_size * 0.6 / f64::from(BLOCK_COLS);
    let cell_h = font_size * 0.8 / f64::from(BLOCK_ROWS);
    let x0 = center.x - cell_w * f64::from(BLOCK_COLS) * 0.5;
    let y0 = center.y - cell_h * f64::from(BLOCK_ROWS) * 0.5;

    let mut rects = Vec::new();
    for row in 0..BLOCK_ROWS {
        for col in 0..BLOCK_COLS {
            if bits & (1 << (row * BLOCK_COLS + col)) == 0 {
                continue;
            }
            let x = x0 + f64::from(col) * cell_w;
            let y = y0 + f64::from(row) * cell_h;
            rects.push(Rect::new(x, y, x + cell_w, y + cell_h));
        }
    }
    rects
}

/// 15-bit pattern for `ch`. The middle cell is always lit.
fn block_pattern(ch: char) -> u32 {
    let mut h = u32::from(ch).wrapping_mul(0x9E37_79B9);
    h ^= h >> 15;
    h = h.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 13;
    (h & 0x7FFF) | (1 << 7)
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
