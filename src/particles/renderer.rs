use crate::assets::color::ColorDef;
use crate::foundation::core::{Canvas, Point, Rgba8};
use crate::foundation::error::{GlitchwaveError, GlitchwaveResult};
use crate::foundation::math::smoothstep;
use crate::foundation::rng::Rng64;
use crate::host::stage::{Effect, FrameTick};
use crate::particles::field::{ParticleCloud, Projected, Projection};
use crate::render::surface::Surface;

/// Concentric discs used to approximate the soft radial falloff.
const SOFT_LAYERS: usize = 8;

/// Largest cloud a scene may request.
pub const MAX_PARTICLES: usize = 100_000;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParticleOpts {
    pub count: usize,
    pub spread: f64,
    pub speed: f64,
    pub colors: Vec<ColorDef>,
    pub move_on_hover: bool,
    pub hover_factor: f64,
    /// Soft radial alpha instead of solid discs.
    pub alpha_particles: bool,
    pub base_size: f64,
    pub size_randomness: f64,
    pub camera_distance: f64,
    pub disable_rotation: bool,
    pub pixel_ratio: f64,
    pub seed: Option<u64>,
}

impl Default for ParticleOpts {
    fn default() -> Self {
        Self {
            count: 200,
            spread: 10.0,
            speed: 0.1,
            colors: vec![
                ColorDef::rgba8(0xFF, 0x7A, 0x64, 1.0),
                ColorDef::rgba8(0xff, 0x8f, 0x7d, 1.0),
                ColorDef::rgba8(0xfb, 0x92, 0x3c, 1.0),
            ],
            move_on_hover: false,
            hover_factor: 2.0,
            alpha_particles: false,
            base_size: 100.0,
            size_randomness: 1.0,
            camera_distance: 20.0,
            disable_rotation: false,
            pixel_ratio: 1.0,
            seed: None,
        }
    }
}

impl ParticleOpts {
    pub fn validate(&self) -> GlitchwaveResult<()> {
        for (name, v) in [
            ("spread", self.spread),
            ("speed", self.speed),
            ("hover_factor", self.hover_factor),
            ("base_size", self.base_size),
            ("size_randomness", self.size_randomness),
            ("camera_distance", self.camera_distance),
            ("pixel_ratio", self.pixel_ratio),
        ] {
            if !v.is_finite() {
                return Err(GlitchwaveError::validation(format!(
                    "particle option {name} must be finite"
                )));
            }
        }
        if self.camera_distance <= 0.0 {
            return Err(GlitchwaveError::validation("camera_distance must be > 0"));
        }
        if self.pixel_ratio <= 0.0 {
            return Err(GlitchwaveError::validation("pixel_ratio must be > 0"));
        }
        if self.spread < 0.0 || self.base_size < 0.0 || self.size_randomness < 0.0 {
            return Err(GlitchwaveError::validation(
                "spread, base_size and size_randomness must be >= 0",
            ));
        }
        if self.count > MAX_PARTICLES {
            return Err(GlitchwaveError::validation(format!(
                "particle count must be <= {MAX_PARTICLES}, got {}",
                self.count
            )));
        }
        if self.colors.is_empty() {
            return Err(GlitchwaveError::validation(
                "particle palette must not be empty",
            ));
        }
        Ok(())
    }
}

/// Drifting, slowly rotating point cloud projected onto the canvas.
pub struct ParticleRenderer {
    opts: ParticleOpts,
    cloud: ParticleCloud,
    canvas: Canvas,
    /// Pointer in NDC (`y` up).
    mouse_ndc: (f64, f64),
}

impl ParticleRenderer {
    pub fn new(opts: ParticleOpts) -> GlitchwaveResult<Self> {
        opts.validate()?;
        let palette: Vec<Rgba8> = opts.colors.iter().map(|c| c.to_rgba8()).collect();
        let mut rng = Rng64::from_seed_or_entropy(opts.seed);
        let cloud = ParticleCloud::scatter(
            opts.count,
            opts.spread,
            opts.size_randomness,
            &palette,
            &mut rng,
        );
        Ok(Self {
            opts,
            cloud,
            canvas: Canvas::default(),
            mouse_ndc: (0.0, 0.0),
        })
    }

    pub fn opts(&self) -> &ParticleOpts {
        &self.opts
    }

    pub fn cloud(&self) -> &ParticleCloud {
        &self.cloud
    }

    pub fn mouse_ndc(&self) -> (f64, f64) {
        self.mouse_ndc
    }

    pub fn resize(&mut self, canvas: Canvas) {
        self.canvas = canvas;
    }

    /// Track the pointer in NDC; ignored unless hover is enabled.
    pub fn pointer_move(&mut self, p: Point) {
        if !self.opts.move_on_hover || self.canvas.is_empty() {
            return;
        }
        let x = (p.x / self.canvas.width_f64()) * 2.0 - 1.0;
        let y = -((p.y / self.canvas.height_f64()) * 2.0 - 1.0);
        self.mouse_ndc = (x, y);
    }

    /// Projected particles at `elapsed_ms` for the current rotation.
    pub fn projected(&self, elapsed_ms: f64) -> Vec<Projected> {
        let t = elapsed_ms * 0.001 * self.opts.speed;
        let hover_offset = if self.opts.move_on_hover {
            (
                self.mouse_ndc.0 * self.opts.hover_factor,
                self.mouse_ndc.1 * self.opts.hover_factor,
            )
        } else {
            (0.0, 0.0)
        };
        self.cloud.project(
            t,
            &Projection {
                canvas: self.canvas,
                camera_distance: self.opts.camera_distance,
                point_scale: self.opts.base_size * self.opts.pixel_ratio,
                hover_offset,
            },
        )
    }

    pub fn draw(&self, elapsed_ms: f64, surface: &mut dyn Surface) {
        surface.clear();
        if self.canvas.is_empty() {
            return;
        }
        for p in self.projected(elapsed_ms) {
            if self.opts.alpha_particles {
                draw_soft_disc(surface, &p);
            } else {
                surface.fill_circle(p.center, p.diameter * 0.5, p.color);
            }
        }
    }
}

/// Stack discs from the rim inward so the composited alpha at normalized distance `d` from the
/// center follows `smoothstep(0.5, 0, d)`.
fn draw_soft_disc(surface: &mut dyn Surface, p: &Projected) {
    let radius = p.diameter * 0.5;
    let mut covered = 0.0;
    for layer in 0..SOFT_LAYERS {
        // Band `layer` spans normalized radii [inner, outer]; sample the falloff at its middle.
        let outer = 0.5 * (SOFT_LAYERS - layer) as f64 / SOFT_LAYERS as f64;
        let inner = 0.5 * (SOFT_LAYERS - layer - 1) as f64 / SOFT_LAYERS as f64;
        let target = smoothstep(0.5, 0.0, (outer + inner) * 0.5);
        let a = if covered >= 1.0 {
            0.0
        } else {
            1.0 - (1.0 - target) / (1.0 - covered)
        };
        covered = target;
        if a <= 0.0 {
            continue;
        }
        let alpha = f32::from(p.color.a) / 255.0 * a as f32;
        surface.fill_circle(p.center, radius * outer * 2.0, p.color.with_opacity(alpha));
    }
}

impl Effect for ParticleRenderer {
    fn on_resize(&mut self, canvas: Canvas) {
        self.resize(canvas);
    }

    fn on_pointer_move(&mut self, p: Point) {
        self.pointer_move(p);
    }

    fn on_frame(&mut self, tick: FrameTick, surface: &mut dyn Surface) {
        if !self.opts.disable_rotation {
            self.cloud.spin();
        }
        self.draw(tick.elapsed_ms, surface);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/renderer.rs"]
mod tests;
