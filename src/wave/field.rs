use crate::foundation::core::{Canvas, Point, Vec2};
use crate::foundation::error::{GlitchwaveError, GlitchwaveResult};
use crate::wave::noise::Noise2D;

/// A lattice vertex pulled toward a noise-displaced target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WavePoint {
    pub origin: Point,
    pub pos: Point,
    pub vel: Vec2,
}

impl WavePoint {
    pub fn at_rest(origin: Point) -> Self {
        Self {
            origin,
            pos: origin,
            vel: Vec2::ZERO,
        }
    }
}

/// Latest pointer sample. Velocity is the delta between the two most recent samples and is only
/// refreshed on movement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pointer {
    pub pos: Point,
    pub prev: Point,
    pub vel: Vec2,
}

impl Pointer {
    pub fn at(p: Point) -> Self {
        Self {
            pos: p,
            prev: p,
            vel: Vec2::ZERO,
        }
    }

    pub fn move_to(&mut self, p: Point) {
        self.pos = p;
        self.vel = p - self.prev;
        self.prev = p;
    }
}

/// Per-step constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveParams {
    pub speed_x: f64,
    pub speed_y: f64,
    pub amp_x: f64,
    pub amp_y: f64,
    pub friction: f64,
    pub tension: f64,
    /// Pointer influence radius.
    pub radius: f64,
    pub noise_scale: f64,
    pub pointer_force: f64,
}

/// Largest grid a canvas may build; finer gaps leave the canvas empty.
pub const MAX_WAVE_POINTS: usize = 4_000_000;

/// Row-major grid of spring-damped points covering a canvas plus one cell of slack.
#[derive(Clone, Debug)]
pub struct WaveGrid {
    cols: usize,
    rows: usize,
    x_gap: f64,
    y_gap: f64,
    points: Vec<WavePoint>,
}

impl WaveGrid {
    /// `(cols, rows)` for a canvas: `ceil(w/x_gap)+1` by `ceil(h/y_gap)+1`. Saturates instead of
    /// overflowing for vanishing gaps.
    pub fn dims_for(canvas: Canvas, x_gap: f64, y_gap: f64) -> (usize, usize) {
        let cols = ((canvas.width_f64() / x_gap).ceil() as usize).saturating_add(1);
        let rows = ((canvas.height_f64() / y_gap).ceil() as usize).saturating_add(1);
        (cols, rows)
    }

    /// Point count for a canvas, or `None` when it exceeds [`MAX_WAVE_POINTS`].
    pub fn point_count(canvas: Canvas, x_gap: f64, y_gap: f64) -> Option<usize> {
        let (cols, rows) = Self::dims_for(canvas, x_gap, y_gap);
        cols.checked_mul(rows).filter(|&n| n <= MAX_WAVE_POINTS)
    }

    /// All points start at rest on their origin. Gaps must be positive.
    pub fn new(canvas: Canvas, x_gap: f64, y_gap: f64) -> GlitchwaveResult<Self> {
        let count = Self::point_count(canvas, x_gap, y_gap).ok_or_else(|| {
            GlitchwaveError::validation(format!(
                "wave grid for {}x{} with gaps {x_gap}x{y_gap} exceeds {MAX_WAVE_POINTS} points",
                canvas.width, canvas.height
            ))
        })?;
        let (cols, rows) = Self::dims_for(canvas, x_gap, y_gap);
        let mut points = Vec::with_capacity(count);
        for row in 0..rows {
            for col in 0..cols {
                points.push(WavePoint::at_rest(Point::new(
                    col as f64 * x_gap,
                    row as f64 * y_gap,
                )));
            }
        }
        Ok(Self {
            cols,
            rows,
            x_gap,
            y_gap,
            points,
        })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn gaps(&self) -> (f64, f64) {
        (self.x_gap, self.y_gap)
    }

    pub fn points(&self) -> &[WavePoint] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [WavePoint] {
        &mut self.points
    }

    pub fn point(&self, row: usize, col: usize) -> Option<&WavePoint> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.points.get(row * self.cols + col)
    }

    /// Live positions along one row, left to right.
    pub fn row_positions(&self, row: usize) -> Vec<Point> {
        self.points[row * self.cols..(row + 1) * self.cols]
            .iter()
            .map(|p| p.pos)
            .collect()
    }

    /// Live positions along one column, top to bottom.
    pub fn col_positions(&self, col: usize) -> Vec<Point> {
        (0..self.rows)
            .map(|row| self.points[row * self.cols + col].pos)
            .collect()
    }

    /// Advance every point by one frame at integer frame time `time`.
    ///
    /// Order per point: noise target, pointer impulse, spring, friction, integrate.
    pub fn step(&mut self, time: f64, noise: &Noise2D, params: &WaveParams, pointer: &Pointer) {
        let s = params.noise_scale;
        for p in &mut self.points {
            let nx = noise.sample(p.origin.x * s + time * params.speed_x, p.origin.y * s);
            let ny = noise.sample(p.origin.x * s, p.origin.y * s + time * params.speed_y);
            let target = Point::new(
                p.origin.x + nx * params.amp_x,
                p.origin.y + ny * params.amp_y,
            );

            let dist = (pointer.pos - p.pos).hypot();
            if dist < params.radius {
                let force = (1.0 - dist / params.radius) * params.pointer_force;
                p.vel += pointer.vel * force;
            }

            p.vel += (target - p.pos) * params.tension;
            p.vel *= params.friction;
            p.pos += p.vel;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/wave/field.rs"]
mod tests;
