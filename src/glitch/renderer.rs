use std::path::PathBuf;

use crate::assets::color::ColorDef;
use crate::foundation::core::{Canvas, Rect, Rgba8};
use crate::foundation::error::{GlitchwaveError, GlitchwaveResult};
use crate::foundation::rng::{RandomSource, Rng64};
use crate::glitch::charset::{CharSampler, DEFAULT_CHARSET};
use crate::glitch::grid::{CellGrid, GlitchLayout, Vignette};
use crate::host::stage::{Effect, FrameTick};
use crate::host::timer::{TimerId, TimerSpec};
use crate::render::surface::Surface;

/// Timer that drives forced scrambles.
pub const SCRAMBLE_TIMER: TimerId = TimerId(0);

/// Scanline overlay: `rgba(0,0,0,0.03)`, 1px tall, every 2px.
const SCANLINE: Rgba8 = Rgba8::new(0, 0, 0, 8);
const SCANLINE_PERIOD: u32 = 2;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlitchOpts {
    pub text: String,
    /// Interval of the forced-scramble timer.
    pub glitch_speed_ms: f64,
    pub center_vignette: bool,
    pub outer_vignette: bool,
    /// Continuous falloff when set, two-level step otherwise.
    pub smooth: bool,
    pub background: ColorDef,
    pub caption_color: ColorDef,
    /// Alpha is replaced by the per-cell vignette opacity.
    pub glyph_color: ColorDef,
    pub resample_probability: f64,
    pub scramble_probability: f64,
    pub charset: String,
    pub seed: Option<u64>,
    /// TTF/OTF used by raster surfaces; block glyphs are drawn without one.
    pub font: Option<PathBuf>,
}

impl Default for GlitchOpts {
    fn default() -> Self {
        Self {
            text: "GLITCH".to_owned(),
            glitch_speed_ms: 50.0,
            center_vignette: false,
            outer_vignette: true,
            smooth: true,
            background: ColorDef::rgba8(0x0a, 0x0a, 0x0a, 1.0),
            caption_color: ColorDef::rgba8(0xFF, 0x7A, 0x64, 1.0),
            glyph_color: ColorDef::rgba8(255, 122, 100, 1.0),
            resample_probability: 0.02,
            scramble_probability: 0.1,
            charset: DEFAULT_CHARSET.to_owned(),
            seed: None,
            font: None,
        }
    }
}

impl GlitchOpts {
    pub fn validate(&self) -> GlitchwaveResult<()> {
        if !self.glitch_speed_ms.is_finite() || self.glitch_speed_ms <= 0.0 {
            return Err(GlitchwaveError::validation(
                "glitch_speed_ms must be finite and > 0",
            ));
        }
        for (name, p) in [
            ("resample_probability", self.resample_probability),
            ("scramble_probability", self.scramble_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(GlitchwaveError::validation(format!(
                    "{name} must be within [0, 1], got {p}"
                )));
            }
        }
        CharSampler::new(&self.charset)?;
        Ok(())
    }
}

/// Animated character field with a fixed caption on the middle row.
pub struct GlitchRenderer<R: RandomSource = Rng64> {
    opts: GlitchOpts,
    caption: Vec<char>,
    sampler: CharSampler,
    vignette: Vignette,
    background: Rgba8,
    caption_color: Rgba8,
    glyph_color: Rgba8,
    grid: Option<CellGrid>,
    rng: R,
}

impl GlitchRenderer<Rng64> {
    /// Seeded from `opts.seed`, or from fresh entropy when unset.
    pub fn new(opts: GlitchOpts) -> GlitchwaveResult<Self> {
        let rng = Rng64::from_seed_or_entropy(opts.seed);
        Self::with_rng(opts, rng)
    }
}

impl<R: RandomSource> GlitchRenderer<R> {
    pub fn with_rng(opts: GlitchOpts, rng: R) -> GlitchwaveResult<Self> {
        opts.validate()?;
        let sampler = CharSampler::new(&opts.charset)?;
        Ok(Self {
            caption: opts.text.chars().collect(),
            sampler,
            vignette: Vignette::from_flags(opts.outer_vignette, opts.center_vignette),
            background: opts.background.to_rgba8(),
            caption_color: opts.caption_color.to_rgba8(),
            glyph_color: opts.glyph_color.to_rgba8(),
            grid: None,
            rng,
            opts,
        })
    }

    pub fn opts(&self) -> &GlitchOpts {
        &self.opts
    }

    /// `None` until a non-empty size has been observed.
    pub fn grid(&self) -> Option<&CellGrid> {
        self.grid.as_ref()
    }

    /// Rebuild the grid for `canvas`. An empty canvas drops the grid and defers drawing.
    pub fn resize(&mut self, canvas: Canvas) {
        self.grid = GlitchLayout::for_canvas(canvas, self.caption.len())
            .map(|layout| CellGrid::new(layout, &self.caption, &self.sampler, &mut self.rng));
        if let Some(g) = &self.grid {
            let l = g.layout();
            tracing::debug!(
                cols = l.cols,
                rows = l.rows,
                font_size = l.font_size,
                start_col = l.start_col,
                "glitch grid rebuilt"
            );
        }
    }

    /// One scramble-timer firing: with `scramble_probability`, resample every non-caption cell.
    /// Returns whether a scramble happened.
    pub fn on_scramble_tick(&mut self) -> bool {
        if self.grid.is_none() || !self.rng.chance(self.opts.scramble_probability) {
            return false;
        }
        self.force_scramble();
        true
    }

    /// Give every non-caption cell a new, different character.
    pub fn force_scramble(&mut self) -> usize {
        match self.grid.as_mut() {
            Some(g) => g.scramble(&self.sampler, &mut self.rng),
            None => 0,
        }
    }

    /// Trickle-resample, then paint background, cells and scanlines.
    pub fn draw(&mut self, surface: &mut dyn Surface) {
        let Some(grid) = self.grid.as_mut() else {
            return;
        };
        grid.resample_step(self.opts.resample_probability, &self.sampler, &mut self.rng);

        let layout = *grid.layout();
        if self.background.a == u8::MAX {
            surface.clear();
        }
        surface.fill_rect(layout.canvas.bounds(), self.background);

        for (row, col, cell) in grid.iter() {
            let center = layout.cell_center(row, col);
            let color = if cell.is_caption {
                self.caption_color
            } else {
                let d = layout.normalized_distance(center);
                self.glyph_color
                    .with_opacity(self.vignette.opacity(self.opts.smooth, d))
            };
            surface.fill_glyph(cell.ch, center, layout.font_size, color);
        }

        let w = layout.canvas.width_f64();
        for y in (0..layout.canvas.height).step_by(SCANLINE_PERIOD as usize) {
            let y = f64::from(y);
            surface.fill_rect(Rect::new(0.0, y, w, y + 1.0), SCANLINE);
        }
    }
}

impl<R: RandomSource> Effect for GlitchRenderer<R> {
    fn timers(&self) -> Vec<TimerSpec> {
        vec![TimerSpec::every(SCRAMBLE_TIMER, self.opts.glitch_speed_ms)]
    }

    fn on_resize(&mut self, canvas: Canvas) {
        self.resize(canvas);
    }

    fn on_timer(&mut self, id: TimerId) {
        if id == SCRAMBLE_TIMER {
            self.on_scramble_tick();
        }
    }

    fn on_frame(&mut self, _tick: FrameTick, surface: &mut dyn Surface) {
        self.draw(surface);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/glitch/renderer.rs"]
mod tests;
