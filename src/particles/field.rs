use std::f64::consts::TAU;

use crate::foundation::core::{Canvas, Point, Rgba8};
use crate::foundation::rng::RandomSource;

/// Point in the particle cloud's model space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn rotate_x(self, a: f64) -> Self {
        let (s, c) = a.sin_cos();
        Self::new(self.x, self.y * c - self.z * s, self.y * s + self.z * c)
    }

    fn rotate_y(self, a: f64) -> Self {
        let (s, c) = a.sin_cos();
        Self::new(self.x * c + self.z * s, self.y, -self.x * s + self.z * c)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Anchor inside the spread cube.
    pub base: Vec3,
    /// Per-axis phase offsets in `[0, 2π)`.
    pub phase: Vec3,
    /// Size multiplier, `rand * size_randomness + 0.5`.
    pub size: f64,
    pub color: Rgba8,
}

/// A particle after drift, rotation and projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub center: Point,
    pub diameter: f64,
    pub color: Rgba8,
}

/// Camera and sizing inputs for [`ParticleCloud::project`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub canvas: Canvas,
    pub camera_distance: f64,
    /// Pixel size of a particle with size multiplier 1.
    pub point_scale: f64,
    /// Pointer in NDC, already multiplied by the hover factor. Zero when hover is off.
    pub hover_offset: (f64, f64),
}

#[derive(Clone, Debug)]
pub struct ParticleCloud {
    particles: Vec<Particle>,
    rotation: f64,
}

impl ParticleCloud {
    /// Scatter `count` particles uniformly in `[-spread/2, spread/2]^3`.
    pub fn scatter(
        count: usize,
        spread: f64,
        size_randomness: f64,
        palette: &[Rgba8],
        rng: &mut impl RandomSource,
    ) -> Self {
        let mut particles = Vec::with_capacity(count);
        for _ in 0..count {
            let base = Vec3::new(
                (rng.next_f64() - 0.5) * spread,
                (rng.next_f64() - 0.5) * spread,
                (rng.next_f64() - 0.5) * spread,
            );
            let phase = Vec3::new(
                rng.next_f64() * TAU,
                rng.next_f64() * TAU,
                rng.next_f64() * TAU,
            );
            let size = rng.next_f64() * size_randomness + 0.5;
            let color = if palette.is_empty() {
                Rgba8::new(255, 255, 255, 255)
            } else {
                palette[rng.next_index(palette.len())]
            };
            particles.push(Particle {
                base,
                phase,
                size,
                color,
            });
        }
        Self {
            particles,
            rotation: 0.0,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Spin by the fixed per-frame increment.
    pub fn spin(&mut self) {
        self.rotation += 0.001;
    }

    /// Drifted model-space position at shader time `t`.
    pub fn drifted(p: &Particle, t: f64) -> Vec3 {
        Vec3::new(
            p.base.x + (t * 0.3 + p.phase.x).sin() * 0.5,
            p.base.y + (t * 0.2 + p.phase.y).cos() * 0.5,
            p.base.z + (t * 0.4 + p.phase.z).sin() * 0.5,
        )
    }

    /// Cloud rotation `(x, y) = (r/2, r)` in `XYZ` Euler order: the matrix is `Rx * Ry`, so the
    /// `y` turn applies first.
    pub fn orient(pos: Vec3, rotation: f64) -> Vec3 {
        pos.rotate_y(rotation).rotate_x(rotation * 0.5)
    }

    /// Project every particle to pixels. Drift and hover happen in model space, then the cloud
    /// rotation (`y = r`, `x = r/2`) is applied.
    pub fn project(&self, t: f64, proj: &Projection) -> Vec<Projected> {
        let w = proj.canvas.width_f64();
        let h = proj.canvas.height_f64();
        let cd = proj.camera_distance;
        self.particles
            .iter()
            .map(|p| {
                let mut pos = Self::drifted(p, t);
                pos.x += proj.hover_offset.0;
                pos.y += proj.hover_offset.1;
                let pos = Self::orient(pos, self.rotation);

                let ndc_x = pos.x / cd;
                let ndc_y = pos.y / cd;
                Projected {
                    center: Point::new((ndc_x + 1.0) * 0.5 * w, (1.0 - ndc_y) * 0.5 * h),
                    diameter: (p.size * proj.point_scale).max(1.0),
                    color: p.color,
                }
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/particles/field.rs"]
mod tests;
