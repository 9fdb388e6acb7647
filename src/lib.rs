//! Glitchwave renders generative backdrops: a glitching character grid with a fixed caption, a
//! noise-driven wave mesh and a drifting particle cloud.
//!
//! Each renderer is an [`host::stage::Effect`] driven by a [`Stage`] that owns its frame loop,
//! timers and drawing [`Surface`]. For offline output:
//!
//! - Load and validate a [`Scene`]
//! - Create a [`RenderSession`]
//! - Render single frames or stream a range into a [`FrameSink`]
#![forbid(unsafe_code)]

mod assets;
mod foundation;

/// Frame sinks.
pub mod encode;
pub mod glitch;
pub mod host;
pub mod particles;
pub mod render;
/// JSON scene model.
pub mod scene;
/// Session-oriented rendering API.
pub mod session;
pub mod wave;

pub use crate::assets::color::ColorDef;
pub use crate::foundation::core::{
    BezPath, Canvas, Fps, FrameIndex, FrameRange, Point, Rect, Rgba8, Rgba8Premul, Vec2,
};
pub use crate::foundation::error::{GlitchwaveError, GlitchwaveResult};
pub use crate::foundation::rng::{RandomSource, Rng64};

pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::png::PngSequenceSink;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::glitch::renderer::{GlitchOpts, GlitchRenderer};
pub use crate::host::stage::{Effect, FrameTick, Stage};
pub use crate::particles::renderer::{ParticleOpts, ParticleRenderer};
pub use crate::render::cpu::CpuSurface;
pub use crate::render::recording::{DrawCmd, DrawSummary, RecordingSurface};
pub use crate::render::surface::{FrameRGBA, Surface};
pub use crate::scene::events::{EventKind, SceneEvent};
pub use crate::scene::model::{EffectDef, Scene};
pub use crate::session::render_session::{
    AnyEffect, RenderSession, RenderSessionOpts, RenderStats,
};
pub use crate::wave::renderer::{WaveOpts, WaveRenderer};
