use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange};
use crate::foundation::error::{GlitchwaveError, GlitchwaveResult};
use crate::glitch::renderer::GlitchOpts;
use crate::particles::renderer::ParticleOpts;
use crate::scene::events::{EventKind, SceneEvent};
use crate::wave::renderer::WaveOpts;

/// Which renderer a scene mounts, with its options.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "params", rename_all = "snake_case")]
pub enum EffectDef {
    Glitch(GlitchOpts),
    Waves(WaveOpts),
    Particles(ParticleOpts),
}

impl EffectDef {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Glitch(_) => "glitch",
            Self::Waves(_) => "waves",
            Self::Particles(_) => "particles",
        }
    }

    pub fn validate(&self) -> GlitchwaveResult<()> {
        match self {
            Self::Glitch(o) => o.validate(),
            Self::Waves(o) => o.validate(),
            Self::Particles(o) => o.validate(),
        }
    }

    pub fn seed(&self) -> Option<u64> {
        match self {
            Self::Glitch(o) => o.seed,
            Self::Waves(o) => o.seed,
            Self::Particles(o) => o.seed,
        }
    }

    /// Fill the effect seed from `seed` when the effect does not set its own.
    pub fn with_fallback_seed(mut self, seed: Option<u64>) -> Self {
        let slot = match &mut self {
            Self::Glitch(o) => &mut o.seed,
            Self::Waves(o) => &mut o.seed,
            Self::Particles(o) => &mut o.seed,
        };
        if slot.is_none() {
            *slot = seed;
        }
        self
    }
}

fn default_fps() -> Fps {
    Fps { num: 60, den: 1 }
}

fn default_duration() -> u64 {
    120
}

/// A renderer, its container size, a frame count and scripted host input.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_fps")]
    pub fps: Fps,
    /// Frames to render.
    #[serde(default = "default_duration")]
    pub duration: u64,
    /// Seed for effects that do not carry their own.
    #[serde(default)]
    pub seed: Option<u64>,
    pub effect: EffectDef,
    /// Sorted by frame; each is applied before the frame at its index.
    #[serde(default)]
    pub events: Vec<SceneEvent>,
}

impl Scene {
    /// Parse a scene from a JSON reader. The result is not validated.
    pub fn from_reader<R: std::io::Read>(r: R) -> GlitchwaveResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| GlitchwaveError::serde(format!("parse scene JSON: {e}")))
    }

    pub fn from_json_str(s: &str) -> GlitchwaveResult<Self> {
        serde_json::from_str(s).map_err(|e| GlitchwaveError::serde(format!("parse scene JSON: {e}")))
    }

    /// Load and validate a scene file.
    pub fn from_path(path: impl AsRef<Path>) -> GlitchwaveResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            GlitchwaveError::scene(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        let scene = Self::from_reader(BufReader::new(f))?;
        scene.validate()?;
        tracing::debug!(
            path = %path.display(),
            effect = scene.effect.kind(),
            frames = scene.duration,
            "scene loaded"
        );
        Ok(scene)
    }

    pub fn to_json_pretty(&self) -> GlitchwaveResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| GlitchwaveError::serde(e.to_string()))
    }

    pub fn validate(&self) -> GlitchwaveResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GlitchwaveError::validation(
                "scene width and height must be > 0",
            ));
        }
        check_raster_size(self.width, self.height)?;
        Fps::new(self.fps.num, self.fps.den)?;
        if self.duration == 0 {
            return Err(GlitchwaveError::validation("scene duration must be > 0"));
        }
        if let Some(w) = self.events.windows(2).find(|w| w[0].frame > w[1].frame) {
            return Err(GlitchwaveError::validation(format!(
                "scene events must be sorted by frame ({} comes after {})",
                w[1].frame, w[0].frame
            )));
        }
        for e in &self.events {
            if e.frame >= self.duration {
                return Err(GlitchwaveError::validation(format!(
                    "event at frame {} is past the scene duration {}",
                    e.frame, self.duration
                )));
            }
            match e.kind {
                EventKind::Pointer { x, y } if !(x.is_finite() && y.is_finite()) => {
                    return Err(GlitchwaveError::validation(format!(
                        "pointer event at frame {} is not finite",
                        e.frame
                    )));
                }
                EventKind::Resize { width, height } => check_raster_size(width, height)?,
                EventKind::Pointer { .. } => {}
            }
        }
        self.effect.validate()
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }

    pub fn duration_frames(&self) -> u64 {
        self.duration
    }

    pub fn frame_range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.duration),
        }
    }

    pub fn has_resize_events(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e.kind, EventKind::Resize { .. }))
    }

    /// The effect definition with the scene seed applied.
    pub fn seeded_effect(&self) -> EffectDef {
        self.effect.clone().with_fallback_seed(self.seed)
    }
}

fn check_raster_size(width: u32, height: u32) -> GlitchwaveResult<()> {
    if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
        return Err(GlitchwaveError::validation(format!(
            "size {width}x{height} exceeds the raster limit of {}",
            u16::MAX
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
