use crate::assets::color::ColorDef;
use crate::foundation::core::{Canvas, Point, Rgba8};
use crate::foundation::error::{GlitchwaveError, GlitchwaveResult};
use crate::host::stage::{Effect, FrameTick};
use crate::render::surface::Surface;
use crate::wave::field::{Pointer, WaveGrid, WaveParams};
use crate::wave::noise::Noise2D;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WaveOpts {
    pub line_color: ColorDef,
    /// `transparent` clears each frame instead of filling.
    pub background: ColorDef,
    pub wave_speed_x: f64,
    pub wave_speed_y: f64,
    pub wave_amp_x: f64,
    pub wave_amp_y: f64,
    pub friction: f64,
    pub tension: f64,
    /// Pointer influence radius in pixels.
    pub max_cursor_move: f64,
    pub x_gap: f64,
    pub y_gap: f64,
    pub noise_scale: f64,
    pub pointer_force: f64,
    pub line_width: f64,
    pub seed: Option<u64>,
}

impl Default for WaveOpts {
    fn default() -> Self {
        Self {
            line_color: ColorDef::rgba8(255, 122, 100, 0.3),
            background: ColorDef::TRANSPARENT,
            wave_speed_x: 0.02,
            wave_speed_y: 0.01,
            wave_amp_x: 40.0,
            wave_amp_y: 20.0,
            friction: 0.9,
            tension: 0.01,
            max_cursor_move: 120.0,
            x_gap: 12.0,
            y_gap: 36.0,
            noise_scale: 0.005,
            pointer_force: 0.5,
            line_width: 1.0,
            seed: None,
        }
    }
}

impl WaveOpts {
    pub fn validate(&self) -> GlitchwaveResult<()> {
        let finite = [
            ("wave_speed_x", self.wave_speed_x),
            ("wave_speed_y", self.wave_speed_y),
            ("wave_amp_x", self.wave_amp_x),
            ("wave_amp_y", self.wave_amp_y),
            ("friction", self.friction),
            ("tension", self.tension),
            ("max_cursor_move", self.max_cursor_move),
            ("x_gap", self.x_gap),
            ("y_gap", self.y_gap),
            ("noise_scale", self.noise_scale),
            ("pointer_force", self.pointer_force),
            ("line_width", self.line_width),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(GlitchwaveError::validation(format!(
                "wave option {name} must be finite"
            )));
        }
        if !(self.tension > 0.0 && self.tension <= 1.0) {
            return Err(GlitchwaveError::validation("tension must be within (0, 1]"));
        }
        if !(0.0..1.0).contains(&self.friction) {
            return Err(GlitchwaveError::validation("friction must be within [0, 1)"));
        }
        if self.x_gap <= 0.0 || self.y_gap <= 0.0 {
            return Err(GlitchwaveError::validation("x_gap and y_gap must be > 0"));
        }
        if self.max_cursor_move < 0.0 {
            return Err(GlitchwaveError::validation("max_cursor_move must be >= 0"));
        }
        if self.line_width <= 0.0 {
            return Err(GlitchwaveError::validation("line_width must be > 0"));
        }
        Ok(())
    }

    pub fn params(&self) -> WaveParams {
        WaveParams {
            speed_x: self.wave_speed_x,
            speed_y: self.wave_speed_y,
            amp_x: self.wave_amp_x,
            amp_y: self.wave_amp_y,
            friction: self.friction,
            tension: self.tension,
            radius: self.max_cursor_move,
            noise_scale: self.noise_scale,
            pointer_force: self.pointer_force,
        }
    }
}

/// Spring-damped mesh driven by coherent noise and pointer motion.
pub struct WaveRenderer {
    opts: WaveOpts,
    params: WaveParams,
    noise: Noise2D,
    line_color: Rgba8,
    background: Option<Rgba8>,
    canvas: Canvas,
    grid: Option<WaveGrid>,
    /// `None` until the first non-empty size, which places it at the canvas center.
    pointer: Option<Pointer>,
    time: u64,
}

impl WaveRenderer {
    /// Noise is seeded from `opts.seed`, or from fresh entropy when unset.
    pub fn new(opts: WaveOpts) -> GlitchwaveResult<Self> {
        opts.validate()?;
        let noise = match opts.seed {
            Some(seed) => Noise2D::new(seed),
            None => Noise2D::from_entropy(),
        };
        let background = (!opts.background.is_transparent()).then(|| opts.background.to_rgba8());
        Ok(Self {
            params: opts.params(),
            line_color: opts.line_color.to_rgba8(),
            background,
            noise,
            canvas: Canvas::default(),
            grid: None,
            pointer: None,
            time: 0,
            opts,
        })
    }

    pub fn opts(&self) -> &WaveOpts {
        &self.opts
    }

    pub fn grid(&self) -> Option<&WaveGrid> {
        self.grid.as_ref()
    }

    pub fn pointer(&self) -> Option<&Pointer> {
        self.pointer.as_ref()
    }

    /// Frames simulated so far.
    pub fn time(&self) -> u64 {
        self.time
    }

    /// Replace the grid for the new size; all velocity is dropped.
    pub fn resize(&mut self, canvas: Canvas) {
        self.canvas = canvas;
        if canvas.is_empty() {
            self.grid = None;
            return;
        }
        if self.pointer.is_none() {
            self.pointer = Some(Pointer::at(canvas.center()));
        }
        let grid = match WaveGrid::new(canvas, self.opts.x_gap, self.opts.y_gap) {
            Ok(grid) => grid,
            Err(err) => {
                tracing::warn!(%err, "wave grid deferred");
                self.grid = None;
                return;
            }
        };
        tracing::debug!(
            cols = grid.cols(),
            rows = grid.rows(),
            width = canvas.width,
            height = canvas.height,
            "wave grid rebuilt"
        );
        self.grid = Some(grid);
    }

    pub fn pointer_move(&mut self, p: Point) {
        match self.pointer.as_mut() {
            Some(ptr) => ptr.move_to(p),
            None => self.pointer = Some(Pointer::at(p)),
        }
    }

    /// One simulation step. The frame clock advances even while no grid exists.
    pub fn step(&mut self) {
        self.time += 1;
        let (Some(grid), Some(pointer)) = (self.grid.as_mut(), self.pointer.as_ref()) else {
            return;
        };
        grid.step(self.time as f64, &self.noise, &self.params, pointer);
    }

    /// Clear or fill, then stroke every row and every column through the live positions.
    pub fn draw(&self, surface: &mut dyn Surface) {
        match self.background {
            Some(bg) => {
                // A translucent fill leaves trails of earlier frames.
                if bg.a == u8::MAX {
                    surface.clear();
                }
                surface.fill_rect(self.canvas.bounds(), bg);
            }
            None => surface.clear(),
        }
        let Some(grid) = self.grid.as_ref() else {
            return;
        };
        let width = self.opts.line_width;
        for row in 0..grid.rows() {
            surface.stroke_polyline(&grid.row_positions(row), width, self.line_color);
        }
        for col in 0..grid.cols() {
            surface.stroke_polyline(&grid.col_positions(col), width, self.line_color);
        }
    }
}

impl Effect for WaveRenderer {
    fn on_resize(&mut self, canvas: Canvas) {
        self.resize(canvas);
    }

    fn on_pointer_move(&mut self, p: Point) {
        self.pointer_move(p);
    }

    fn on_frame(&mut self, _tick: FrameTick, surface: &mut dyn Surface) {
        self.step();
        self.draw(surface);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/wave/renderer.rs"]
mod tests;
