use std::path::PathBuf;
use std::sync::mpsc;

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex, FrameRange, Point};
use crate::foundation::error::{GlitchwaveError, GlitchwaveResult};
use crate::glitch::renderer::GlitchRenderer;
use crate::host::stage::{Effect, FrameTick, Stage};
use crate::host::timer::{TimerId, TimerSpec};
use crate::particles::renderer::ParticleRenderer;
use crate::render::cpu::CpuSurface;
use crate::render::recording::{DrawSummary, RecordingSurface};
use crate::render::surface::{FrameRGBA, Surface};
use crate::render::text::GlyphAtlas;
use crate::scene::events::{EventCursor, EventKind, SceneEvent};
use crate::scene::model::{EffectDef, Scene};
use crate::wave::renderer::WaveRenderer;

/// Options for [`RenderSession`].
#[derive(Clone, Debug)]
pub struct RenderSessionOpts {
    /// Font for glyph rendering. Overrides the glitch effect's own `font`.
    pub font_path: Option<PathBuf>,
    /// Bounded channel capacity between the render loop and the encoder thread.
    pub channel_capacity: usize,
}

impl Default for RenderSessionOpts {
    fn default() -> Self {
        Self {
            font_path: None,
            channel_capacity: 4,
        }
    }
}

/// Range render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames in the requested range.
    pub frames_total: u64,
    /// Frames handed to the sink.
    pub frames_rendered: u64,
    /// Frames simulated without readback to reach the range start.
    pub frames_simulated: u64,
}

/// Any of the built-in renderers, chosen by a scene's effect kind.
pub enum AnyEffect {
    Glitch(GlitchRenderer),
    Waves(WaveRenderer),
    Particles(ParticleRenderer),
}

impl AnyEffect {
    pub fn from_def(def: &EffectDef) -> GlitchwaveResult<Self> {
        Ok(match def {
            EffectDef::Glitch(o) => Self::Glitch(GlitchRenderer::new(o.clone())?),
            EffectDef::Waves(o) => Self::Waves(WaveRenderer::new(o.clone())?),
            EffectDef::Particles(o) => Self::Particles(ParticleRenderer::new(o.clone())?),
        })
    }

    fn inner(&mut self) -> &mut dyn Effect {
        match self {
            Self::Glitch(e) => e,
            Self::Waves(e) => e,
            Self::Particles(e) => e,
        }
    }
}

impl Effect for AnyEffect {
    fn timers(&self) -> Vec<TimerSpec> {
        match self {
            Self::Glitch(e) => e.timers(),
            Self::Waves(e) => e.timers(),
            Self::Particles(e) => e.timers(),
        }
    }

    fn on_resize(&mut self, canvas: Canvas) {
        self.inner().on_resize(canvas);
    }

    fn on_pointer_move(&mut self, p: Point) {
        self.inner().on_pointer_move(p);
    }

    fn on_timer(&mut self, id: TimerId) {
        self.inner().on_timer(id);
    }

    fn on_frame(&mut self, tick: FrameTick, surface: &mut dyn Surface) {
        self.inner().on_frame(tick, surface);
    }
}

/// Steps one stage through a scene's frames, applying scripted events on the way.
struct Driver<S: Surface> {
    stage: Stage<AnyEffect, S>,
    /// Frames already delivered.
    next_frame: u64,
    next_event: usize,
}

impl<S: Surface> Driver<S> {
    fn mount(def: &EffectDef, surface: S, canvas: Canvas) -> GlitchwaveResult<Self> {
        Ok(Self {
            stage: Stage::mount(AnyEffect::from_def(def)?, surface, canvas),
            next_frame: 0,
            next_event: 0,
        })
    }

    /// Restart from frame 0 with a fresh effect, reusing the surface.
    fn rewind(&mut self, def: &EffectDef, canvas: Canvas) -> GlitchwaveResult<()> {
        let (_, mut surface) = self
            .stage
            .unmount()
            .ok_or_else(|| GlitchwaveError::render("stage is not mounted"))?;
        surface.clear();
        *self = Self::mount(def, surface, canvas)?;
        Ok(())
    }

    /// Deliver frames until `frame` has run. Events at a frame are applied before it.
    fn run_through(&mut self, frame: u64, events: &[SceneEvent], frame_ms: f64) {
        let mut cursor = EventCursor::resume(events, self.next_event);
        while self.next_frame <= frame {
            let idx = self.next_frame;
            for e in cursor.take_through(idx) {
                match e.kind {
                    EventKind::Pointer { x, y } => {
                        self.stage.pointer_move(Point::new(x, y), Point::ZERO)
                    }
                    EventKind::Resize { width, height } => {
                        self.stage.resize(Canvas::new(width, height))
                    }
                }
            }
            let dt = if idx == 0 { 0.0 } else { frame_ms };
            self.stage.advance(dt);
            self.next_frame += 1;
        }
        self.next_event = cursor.position();
    }
}

/// Renders a scene frame by frame on a CPU surface.
///
/// Effects are simulations, so frame `n` is reached by running frames `0..=n` in order. Asking
/// for an earlier frame than the last one rendered restarts the simulation.
pub struct RenderSession {
    scene: Scene,
    effect: EffectDef,
    fps: Fps,
    opts: RenderSessionOpts,
    driver: Driver<CpuSurface>,
}

impl RenderSession {
    #[tracing::instrument(skip_all, fields(effect = scene.effect.kind(), width = scene.width, height = scene.height))]
    pub fn new(scene: &Scene, opts: RenderSessionOpts) -> GlitchwaveResult<Self> {
        scene.validate()?;
        let fps = Fps::new(scene.fps.num, scene.fps.den)?;
        // Pin a seed so restarts replay the same frames.
        let effect = scene
            .seeded_effect()
            .with_fallback_seed(Some(rand::random::<u64>()));

        let font = opts.font_path.clone().or_else(|| match &effect {
            EffectDef::Glitch(o) => o.font.clone(),
            _ => None,
        });
        let mut surface = CpuSurface::new(scene.canvas())?;
        if let Some(path) = font {
            surface = surface.with_atlas(GlyphAtlas::from_path(&path)?);
        }
        let driver = Driver::mount(&effect, surface, scene.canvas())?;
        Ok(Self {
            scene: scene.clone(),
            effect,
            fps,
            opts,
            driver,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The effect definition actually mounted, with its seed resolved.
    pub fn effect(&self) -> &EffectDef {
        &self.effect
    }

    /// Current surface size; changes when resize events have been applied.
    pub fn canvas(&self) -> Canvas {
        self.driver
            .stage
            .surface()
            .map(|s| s.canvas())
            .unwrap_or_default()
    }

    fn check_frame(&self, frame: FrameIndex) -> GlitchwaveResult<()> {
        if frame.0 >= self.scene.duration {
            return Err(GlitchwaveError::validation(format!(
                "frame {} is outside the scene duration {}",
                frame.0, self.scene.duration
            )));
        }
        Ok(())
    }

    /// Simulate up to `frame` without reading it back.
    fn seek(&mut self, frame: FrameIndex) -> GlitchwaveResult<u64> {
        self.check_frame(frame)?;
        // The surface still holds frame `next_frame - 1`; anything earlier needs a replay.
        if frame.0 + 1 < self.driver.next_frame {
            tracing::debug!(frame = frame.0, "restarting simulation");
            self.driver.rewind(&self.effect, self.scene.canvas())?;
        }
        let before = self.driver.next_frame;
        self.driver
            .run_through(frame.0, &self.scene.events, self.fps.frame_duration_ms());
        Ok(self.driver.next_frame - before)
    }

    /// Render frame `frame`, simulating every earlier frame that has not run yet.
    pub fn render_frame(&mut self, frame: FrameIndex) -> GlitchwaveResult<FrameRGBA> {
        self.seek(frame)?;
        self.driver
            .stage
            .surface_mut()
            .ok_or_else(|| GlitchwaveError::render("stage is not mounted"))?
            .read_frame()
    }

    /// Render `range` and stream the frames into `sink` from an encoder thread.
    ///
    /// The sink sees frames in strictly increasing index order.
    #[tracing::instrument(skip(self, sink), fields(start = range.start.0, end = range.end.0))]
    pub fn render_range(
        &mut self,
        range: FrameRange,
        sink: &mut dyn FrameSink,
    ) -> GlitchwaveResult<RenderStats> {
        if range.is_empty() {
            return Err(GlitchwaveError::validation(
                "render_range range must be non-empty",
            ));
        }
        if range.end.0 > self.scene.duration {
            return Err(GlitchwaveError::validation(
                "render_range range must be within the scene duration",
            ));
        }

        let cfg = SinkConfig {
            width: self.scene.width,
            height: self.scene.height,
            fps: self.fps,
        };
        let mut stats = RenderStats {
            frames_total: range.len_frames(),
            ..RenderStats::default()
        };
        if range.start.0 > 0 {
            stats.frames_simulated = self.seek(FrameIndex(range.start.0 - 1))?;
        }

        let cap = self.opts.channel_capacity.max(1);
        std::thread::scope(|scope| -> GlitchwaveResult<RenderStats> {
            let (tx, rx) = mpsc::sync_channel::<(FrameIndex, FrameRGBA)>(cap);
            let enc = scope.spawn(move || -> GlitchwaveResult<u64> {
                sink.begin(cfg)?;
                let mut pushed = 0;
                for (idx, frame) in rx {
                    sink.push_frame(idx, &frame)?;
                    pushed += 1;
                }
                sink.end()?;
                Ok(pushed)
            });

            let mut render_err = None;
            for f in range.start.0..range.end.0 {
                match self.render_frame(FrameIndex(f)) {
                    Ok(frame) => {
                        // A closed channel means the encoder failed; its error is reported below.
                        if tx.send((FrameIndex(f), frame)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        render_err = Some(e);
                        break;
                    }
                }
            }
            drop(tx);

            let pushed = enc
                .join()
                .map_err(|_| GlitchwaveError::encode("encoder thread panicked"))?;
            if let Some(e) = render_err {
                return Err(e);
            }
            stats.frames_rendered = pushed?;
            Ok(stats)
        })
    }

    /// Summarize the draw calls of `frame` without rasterizing. Runs a separate simulation, so
    /// the session's own position is untouched.
    ///
    /// Only the calls issued by `frame` itself are counted, even when the effect paints over
    /// earlier frames without clearing.
    pub fn inspect_frame(&self, frame: FrameIndex) -> GlitchwaveResult<DrawSummary> {
        self.check_frame(frame)?;
        let canvas = self.scene.canvas();
        let frame_ms = self.fps.frame_duration_ms();
        let mut driver = Driver::mount(&self.effect, RecordingSurface::new(canvas), canvas)?;
        for f in 0..frame.0 {
            driver.run_through(f, &self.scene.events, frame_ms);
            if let Some(s) = driver.stage.surface_mut() {
                s.take_commands();
            }
        }
        driver.run_through(frame.0, &self.scene.events, frame_ms);
        driver
            .stage
            .surface()
            .map(RecordingSurface::summary)
            .ok_or_else(|| GlitchwaveError::render("stage is not mounted"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/render_session.rs"]
mod tests;
