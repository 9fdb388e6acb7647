use crate::foundation::core::{Canvas, Point, Rect, Rgba8};
use crate::render::surface::Surface;

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCmd {
    FillRect {
        rect: Rect,
        color: Rgba8,
    },
    FillGlyph {
        ch: char,
        center: Point,
        font_size: f64,
        color: Rgba8,
    },
    StrokePolyline {
        points: Vec<Point>,
        width: f64,
        color: Rgba8,
    },
    FillCircle {
        center: Point,
        radius: f64,
        color: Rgba8,
    },
}

/// Surface that keeps the draw calls issued since the last `clear`.
///
/// Used by tests and by `glitchwave inspect` to look at a frame without rasterizing it.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    canvas: Canvas,
    cmds: Vec<DrawCmd>,
    clears: u64,
}

impl RecordingSurface {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            cmds: Vec::new(),
            clears: 0,
        }
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.cmds
    }

    pub fn take_commands(&mut self) -> Vec<DrawCmd> {
        std::mem::take(&mut self.cmds)
    }

    /// Number of `clear` calls seen over the surface's lifetime.
    pub fn clear_count(&self) -> u64 {
        self.clears
    }

    /// Characters drawn since the last clear, in draw order.
    pub fn glyphs(&self) -> impl Iterator<Item = (char, Point, Rgba8)> + '_ {
        self.cmds.iter().filter_map(|c| match c {
            DrawCmd::FillGlyph {
                ch, center, color, ..
            } => Some((*ch, *center, *color)),
            _ => None,
        })
    }

    pub fn summary(&self) -> DrawSummary {
        let mut s = DrawSummary {
            width: self.canvas.width,
            height: self.canvas.height,
            ..DrawSummary::default()
        };
        for cmd in &self.cmds {
            match cmd {
                DrawCmd::FillRect { .. } => s.rects += 1,
                DrawCmd::FillGlyph { ch, .. } => {
                    s.glyphs += 1;
                    if !s.distinct_chars.contains(ch) {
                        s.distinct_chars.push(*ch);
                    }
                }
                DrawCmd::StrokePolyline { points, .. } => {
                    s.polylines += 1;
                    s.polyline_points += points.len() as u64;
                }
                DrawCmd::FillCircle { .. } => s.circles += 1,
            }
        }
        s.distinct_chars.sort_unstable();
        s
    }
}

impl Surface for RecordingSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn resize(&mut self, canvas: Canvas) {
        self.canvas = canvas;
        self.cmds.clear();
    }

    fn clear(&mut self) {
        self.cmds.clear();
        self.clears += 1;
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.cmds.push(DrawCmd::FillRect { rect, color });
    }

    fn fill_glyph(&mut self, ch: char, center: Point, font_size: f64, color: Rgba8) {
        self.cmds.push(DrawCmd::FillGlyph {
            ch,
            center,
            font_size,
            color,
        });
    }

    fn stroke_polyline(&mut self, points: &[Point], width: f64, color: Rgba8) {
        if points.len() < 2 {
            return;
        }
        self.cmds.push(DrawCmd::StrokePolyline {
            points: points.to_vec(),
            width,
            color,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        self.cmds.push(DrawCmd::FillCircle {
            center,
            radius,
            color,
        });
    }
}

/// Counts of what a frame drew, printed by `glitchwave inspect`.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct DrawSummary {
    pub width: u32,
    pub height: u32,
    pub rects: u64,
    pub glyphs: u64,
    pub distinct_chars: Vec<char>,
    pub polylines: u64,
    pub polyline_points: u64,
    pub circles: u64,
}

#[cfg(test)]
#[path = "../../tests/unit/render/recording.rs"]
mod tests;
