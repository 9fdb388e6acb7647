use crate::foundation::core::{Canvas, Point, Rect, Rgba8};

/// A rendered frame in RGBA8, tightly packed, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Fully transparent frame of the given size.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
            premultiplied: true,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Number of pixels with non-zero alpha.
    pub fn count_visible(&self) -> usize {
        self.data.chunks_exact(4).filter(|px| px[3] != 0).count()
    }
}

/// Immediate-mode 2D drawing target owned by exactly one renderer.
///
/// Draw calls are infallible: a surface that cannot honor a call drops it. Readback (where a
/// surface supports it) is the only fallible operation and lives on the concrete type.
pub trait Surface {
    fn canvas(&self) -> Canvas;

    /// Match the backing store to a new container size. Previous content is discarded.
    fn resize(&mut self, canvas: Canvas);

    /// Reset every pixel to transparent.
    fn clear(&mut self);

    fn fill_rect(&mut self, rect: Rect, color: Rgba8);

    /// Draw a single character centered on `center` with the given em size.
    fn fill_glyph(&mut self, ch: char, center: Point, font_size: f64, color: Rgba8);

    /// Stroke an open polyline through `points`. Fewer than two points draws nothing.
    fn stroke_polyline(&mut self, points: &[Point], width: f64, color: Rgba8);

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8);
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn canvas(&self) -> Canvas {
        (**self).canvas()
    }

    fn resize(&mut self, canvas: Canvas) {
        (**self).resize(canvas)
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        (**self).fill_rect(rect, color)
    }

    fn fill_glyph(&mut self, ch: char, center: Point, font_size: f64, color: Rgba8) {
        (**self).fill_glyph(ch, center, font_size, color)
    }

    fn stroke_polyline(&mut self, points: &[Point], width: f64, color: Rgba8) {
        (**self).stroke_polyline(points, width, color)
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        (**self).fill_circle(center, radius, color)
    }
}
