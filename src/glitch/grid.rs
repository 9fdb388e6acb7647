use std::ops::Range;

use crate::foundation::core::{Canvas, Point};
use crate::foundation::rng::RandomSource;
use crate::glitch::charset::CharSampler;

/// Cell width as a fraction of the font size (monospace advance).
pub const CELL_WIDTH_RATIO: f64 = 0.6;

/// Grid geometry derived from the container size and the caption length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlitchLayout {
    pub canvas: Canvas,
    pub font_size: f64,
    pub cols: usize,
    pub rows: usize,
    pub center_row: usize,
    /// First caption column; negative when the caption is wider than the grid.
    pub start_col: i64,
    pub caption_len: usize,
}

impl GlitchLayout {
    /// Returns `None` for an empty container; grid construction is deferred until a real size
    /// is observed.
    pub fn for_canvas(canvas: Canvas, caption_len: usize) -> Option<Self> {
        if canvas.is_empty() {
            return None;
        }
        let w = canvas.width_f64();
        let h = canvas.height_f64();
        let font_size = (w / 8.0).min(h / 3.0);
        let cols = ((w / (font_size * CELL_WIDTH_RATIO)).ceil() as usize).max(1);
        let rows = ((h / font_size).ceil() as usize).max(1);
        let center_row = rows / 2;
        let start_col = (cols as i64 - caption_len as i64).div_euclid(2);
        Some(Self {
            canvas,
            font_size,
            cols,
            rows,
            center_row,
            start_col,
            caption_len,
        })
    }

    pub fn cell_count(&self) -> usize {
        self.cols * self.rows
    }

    pub fn cell_center(&self, row: usize, col: usize) -> Point {
        let fs = self.font_size;
        Point::new(
            col as f64 * fs * CELL_WIDTH_RATIO + fs * CELL_WIDTH_RATIO / 2.0,
            row as f64 * fs + fs * 0.5,
        )
    }

    /// Index into the caption for a cell, if that cell shows caption text.
    pub fn caption_char_index(&self, row: usize, col: usize) -> Option<usize> {
        if row != self.center_row {
            return None;
        }
        let offset = col as i64 - self.start_col;
        (offset >= 0 && (offset as usize) < self.caption_len).then_some(offset as usize)
    }

    /// Caption columns clipped to `[0, cols)`.
    pub fn visible_caption_cols(&self) -> Range<usize> {
        let start = self.start_col.clamp(0, self.cols as i64) as usize;
        let end = (self.start_col + self.caption_len as i64).clamp(0, self.cols as i64) as usize;
        start..end
    }

    /// Distance from the canvas center, normalized by the center-to-corner distance.
    pub fn normalized_distance(&self, p: Point) -> f64 {
        let center = self.canvas.center();
        let max = center.to_vec2().hypot();
        if max <= 0.0 {
            return 0.0;
        }
        (p - center).hypot() / max
    }
}

/// Opacity falloff applied to non-caption cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vignette {
    /// Fade toward the edges.
    Outer,
    /// Fade toward the center.
    Center,
    /// Uniform low opacity.
    Flat,
}

impl Vignette {
    /// Outer wins when both flags are set.
    pub fn from_flags(outer: bool, center: bool) -> Self {
        if outer {
            Self::Outer
        } else if center {
            Self::Center
        } else {
            Self::Flat
        }
    }

    pub fn opacity(self, smooth: bool, normalized_distance: f64) -> f32 {
        let d = normalized_distance.clamp(0.0, 1.0);
        let a = match (self, smooth) {
            (Self::Outer, true) => (1.0 - d).powi(2) * 0.3,
            (Self::Outer, false) => {
                if d < 0.7 {
                    0.3
                } else {
                    0.1
                }
            }
            (Self::Center, true) => d.powi(2) * 0.3,
            (Self::Center, false) => {
                if d > 0.3 {
                    0.3
                } else {
                    0.1
                }
            }
            (Self::Flat, _) => 0.2,
        };
        a as f32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharCell {
    pub ch: char,
    /// Caption cells keep their character for the lifetime of the grid.
    pub is_caption: bool,
}

/// Row-major character grid with the caption embedded on the center row.
#[derive(Clone, Debug)]
pub struct CellGrid {
    layout: GlitchLayout,
    cells: Vec<CharCell>,
}

impl CellGrid {
    pub fn new(
        layout: GlitchLayout,
        caption: &[char],
        sampler: &CharSampler,
        rng: &mut impl RandomSource,
    ) -> Self {
        debug_assert_eq!(layout.caption_len, caption.len());
        let mut cells = Vec::with_capacity(layout.cell_count());
        for row in 0..layout.rows {
            for col in 0..layout.cols {
                let cell = match layout.caption_char_index(row, col) {
                    Some(i) => CharCell {
                        ch: caption[i],
                        is_caption: true,
                    },
                    None => CharCell {
                        ch: sampler.sample(rng),
                        is_caption: false,
                    },
                };
                cells.push(cell);
            }
        }
        Self { layout, cells }
    }

    pub fn layout(&self) -> &GlitchLayout {
        &self.layout
    }

    pub fn cells(&self) -> &[CharCell] {
        &self.cells
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CharCell> {
        if row >= self.layout.rows || col >= self.layout.cols {
            return None;
        }
        self.cells.get(row * self.layout.cols + col)
    }

    /// Iterate `(row, col, cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &CharCell)> {
        let cols = self.layout.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (i / cols, i % cols, c))
    }

    /// The caption as currently shown (after clipping).
    pub fn visible_caption(&self) -> String {
        let row = self.layout.center_row;
        self.layout
            .visible_caption_cols()
            .filter_map(|col| self.cell(row, col).map(|c| c.ch))
            .collect()
    }

    /// Per-frame trickle: each non-caption cell independently resamples with probability `p`.
    /// Returns the number of cells that were resampled.
    pub fn resample_step(
        &mut self,
        p: f64,
        sampler: &CharSampler,
        rng: &mut impl RandomSource,
    ) -> usize {
        let mut n = 0;
        for cell in self.cells.iter_mut().filter(|c| !c.is_caption) {
            if rng.chance(p) {
                cell.ch = sampler.sample(rng);
                n += 1;
            }
        }
        n
    }

    /// Forced surge: every non-caption cell takes a new, different character.
    pub fn scramble(&mut self, sampler: &CharSampler, rng: &mut impl RandomSource) -> usize {
        let mut n = 0;
        for cell in self.cells.iter_mut().filter(|c| !c.is_caption) {
            cell.ch = sampler.sample_other(rng, cell.ch);
            n += 1;
        }
        n
    }
}

#[cfg(test)]
#[path = "../../tests/unit/glitch/grid.rs"]
mod tests;
