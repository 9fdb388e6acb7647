use std::sync::Arc;

use vello_cpu::kurbo::Shape;

use crate::foundation::core::{Canvas, Point, Rect, Rgba8};
use crate::foundation::error::{GlitchwaveError, GlitchwaveResult};
use crate::render::surface::{FrameRGBA, Surface};
use crate::render::text::{GlyphAtlas, block_glyph_rects};

/// Draw calls buffered in the render context before they are rasterized into the pixmap.
const BAKE_AFTER_OPS: usize = 50_000;

/// Raster surface backed by `vello_cpu`.
///
/// Content persists across frames until `clear`, so translucent fills leave trails. Glyphs come
/// from a [`GlyphAtlas`] when a font is loaded and from pixel blocks otherwise.
pub struct CpuSurface {
    canvas: Canvas,
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
    /// Everything rasterized so far; drawn back as the first layer after each bake.
    pixmap: vello_cpu::Pixmap,
    has_base: bool,
    pending: usize,
    atlas: Option<GlyphAtlas>,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("canvas", &self.canvas)
            .field("pending", &self.pending)
            .field("atlas", &self.atlas)
            .finish_non_exhaustive()
    }
}

impl CpuSurface {
    pub fn new(canvas: Canvas) -> GlitchwaveResult<Self> {
        let (width, height) = raster_dims(canvas)?;
        Ok(Self {
            canvas,
            width,
            height,
            ctx: vello_cpu::RenderContext::new(width, height),
            pixmap: vello_cpu::Pixmap::new(width, height),
            has_base: false,
            pending: 0,
            atlas: None,
        })
    }

    pub fn with_atlas(mut self, atlas: GlyphAtlas) -> Self {
        self.atlas = Some(atlas);
        self
    }

    pub fn has_font(&self) -> bool {
        self.atlas.is_some()
    }

    /// Rasterize everything drawn so far and return it as premultiplied RGBA8.
    pub fn read_frame(&mut self) -> GlitchwaveResult<FrameRGBA> {
        if self.canvas.is_empty() {
            return Ok(FrameRGBA::transparent(self.canvas.width, self.canvas.height));
        }
        self.bake();
        let data = self.pixmap.data_as_u8_slice().to_vec();
        let expected = self.canvas.width as usize * self.canvas.height as usize * 4;
        if data.len() != expected {
            return Err(GlitchwaveError::render(format!(
                "pixmap holds {} bytes, expected {expected}",
                data.len()
            )));
        }
        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data,
            premultiplied: true,
        })
    }

    /// Flush pending draw calls into the pixmap and restart the context with the pixmap as its
    /// base layer.
    fn bake(&mut self) {
        if self.pending == 0 && self.has_base {
            return;
        }
        clear_pixmap(&mut self.pixmap);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);
        self.ctx.reset();

        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(self.pixmap.clone())),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        });
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
        self.has_base = true;
        self.pending = 0;
    }

    fn begin_op(&mut self, color: Rgba8) {
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color_to_cpu(color));
    }

    fn end_op(&mut self) {
        self.pending += 1;
        if self.pending >= BAKE_AFTER_OPS {
            self.bake();
        }
    }
}

impl Surface for CpuSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn resize(&mut self, canvas: Canvas) {
        let (canvas, (width, height)) = match raster_dims(canvas) {
            Ok(dims) => (canvas, dims),
            Err(err) => {
                tracing::warn!(%err, "clamping surface to the raster limit");
                let w = canvas.width.min(u32::from(u16::MAX)) as u16;
                let h = canvas.height.min(u32::from(u16::MAX)) as u16;
                (
                    Canvas::new(u32::from(w), u32::from(h)),
                    (w.max(1), h.max(1)),
                )
            }
        };
        self.canvas = canvas;
        self.width = width;
        self.height = height;
        self.ctx = vello_cpu::RenderContext::new(width, height);
        self.pixmap = vello_cpu::Pixmap::new(width, height);
        self.has_base = false;
        self.pending = 0;
    }

    fn clear(&mut self) {
        self.ctx.reset();
        clear_pixmap(&mut self.pixmap);
        self.has_base = false;
        self.pending = 0;
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        if color.is_transparent() {
            return;
        }
        self.begin_op(color);
        self.ctx.fill_rect(&rect_to_cpu(rect));
        self.end_op();
    }

    fn fill_glyph(&mut self, ch: char, center: Point, font_size: f64, color: Rgba8) {
        if color.is_transparent() {
            return;
        }
        if self.atlas.is_none() {
            for r in block_glyph_rects(ch, center, font_size) {
                self.fill_rect(r, color);
            }
            return;
        }
        let Some(atlas) = self.atlas.as_mut() else {
            return;
        };
        let glyphs: Vec<vello_cpu::Glyph> = match atlas.shape(ch, font_size as f32) {
            Ok(shaped) => shaped
                .glyphs
                .iter()
                .map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: center.x as f32 + g.x,
                    y: center.y as f32 + g.y,
                })
                .collect(),
            Err(err) => {
                tracing::debug!(%err, %ch, "glyph dropped");
                return;
            }
        };
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx
            .glyph_run(atlas.font())
            .font_size(font_size as f32)
            .fill_glyphs(glyphs.into_iter());
        self.end_op();
    }

    fn stroke_polyline(&mut self, points: &[Point], width: f64, color: Rgba8) {
        let [first, rest @ ..] = points else {
            return;
        };
        if rest.is_empty() || color.is_transparent() {
            return;
        }
        let mut path = vello_cpu::kurbo::BezPath::new();
        path.move_to(point_to_cpu(*first));
        for p in rest {
            path.line_to(point_to_cpu(*p));
        }
        self.begin_op(color);
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_path(&path);
        self.end_op();
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        if color.is_transparent() || radius.is_nan() || radius <= 0.0 {
            return;
        }
        let path = vello_cpu::kurbo::Circle::new(point_to_cpu(center), radius).to_path(0.1);
        self.begin_op(color);
        self.ctx.fill_path(&path);
        self.end_op();
    }
}

/// Backing store size for `canvas`. Empty canvases keep a 1x1 store.
fn raster_dims(canvas: Canvas) -> GlitchwaveResult<(u16, u16)> {
    let width: u16 = canvas
        .width
        .max(1)
        .try_into()
        .map_err(|_| GlitchwaveError::render("surface width exceeds u16"))?;
    let height: u16 = canvas
        .height
        .max(1)
        .try_into()
        .map_err(|_| GlitchwaveError::render("surface height exceeds u16"))?;
    Ok((width, height))
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
