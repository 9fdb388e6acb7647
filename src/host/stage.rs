use crate::foundation::core::{Canvas, Point};
use crate::host::timer::{TimerId, TimerQueue, TimerSpec};
use crate::render::surface::Surface;

/// Per-frame data handed to [`Effect::on_frame`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    /// Number of frames delivered before this one.
    pub index: u64,
    /// Virtual clock at this frame, in milliseconds since mount.
    pub elapsed_ms: f64,
    /// Time since the previous frame.
    pub dt_ms: f64,
}

/// A renderer driven by a [`Stage`].
///
/// Every callback runs on the stage's thread and never overlaps another callback, so an effect
/// can mutate its grid from both the timer and the frame path without synchronization.
pub trait Effect {
    /// Interval timers to register on mount.
    fn timers(&self) -> Vec<TimerSpec> {
        Vec::new()
    }

    /// Container size changed (also delivered once on mount). May be empty.
    fn on_resize(&mut self, canvas: Canvas);

    /// Pointer moved; `p` is canvas-local.
    fn on_pointer_move(&mut self, _p: Point) {}

    fn on_timer(&mut self, _id: TimerId) {}

    fn on_frame(&mut self, tick: FrameTick, surface: &mut dyn Surface);
}

impl<E: Effect + ?Sized> Effect for Box<E> {
    fn timers(&self) -> Vec<TimerSpec> {
        (**self).timers()
    }

    fn on_resize(&mut self, canvas: Canvas) {
        (**self).on_resize(canvas)
    }

    fn on_pointer_move(&mut self, p: Point) {
        (**self).on_pointer_move(p)
    }

    fn on_timer(&mut self, id: TimerId) {
        (**self).on_timer(id)
    }

    fn on_frame(&mut self, tick: FrameTick, surface: &mut dyn Surface) {
        (**self).on_frame(tick, surface)
    }
}

struct Mounted<E, S> {
    effect: E,
    surface: S,
    timers: TimerQueue,
    clock_ms: f64,
    frames: u64,
}

/// Host loop for one effect and the surface it draws into.
///
/// A stage owns the frame registration, the effect's timers and the surface. All of them are
/// released by a single teardown, after which every entry point is a no-op.
pub struct Stage<E: Effect, S: Surface> {
    mounted: Option<Mounted<E, S>>,
}

impl<E: Effect, S: Surface> Stage<E, S> {
    /// Register the effect's timers and deliver the initial container size.
    pub fn mount(mut effect: E, mut surface: S, canvas: Canvas) -> Self {
        let mut timers = TimerQueue::new();
        for spec in effect.timers() {
            timers.register(spec, 0.0);
        }
        surface.resize(canvas);
        effect.on_resize(canvas);
        tracing::debug!(
            width = canvas.width,
            height = canvas.height,
            timers = timers.len(),
            "stage mounted"
        );
        Self {
            mounted: Some(Mounted {
                effect,
                surface,
                timers,
                clock_ms: 0.0,
                frames: 0,
            }),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    pub fn effect(&self) -> Option<&E> {
        self.mounted.as_ref().map(|m| &m.effect)
    }

    pub fn effect_mut(&mut self) -> Option<&mut E> {
        self.mounted.as_mut().map(|m| &mut m.effect)
    }

    pub fn surface(&self) -> Option<&S> {
        self.mounted.as_ref().map(|m| &m.surface)
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.mounted.as_mut().map(|m| &mut m.surface)
    }

    /// Virtual clock in milliseconds; `None` after teardown.
    pub fn clock_ms(&self) -> Option<f64> {
        self.mounted.as_ref().map(|m| m.clock_ms)
    }

    /// Resize the surface and rebuild the effect before the next frame.
    pub fn resize(&mut self, canvas: Canvas) {
        let Some(m) = self.mounted.as_mut() else {
            return;
        };
        m.surface.resize(canvas);
        m.effect.on_resize(canvas);
    }

    /// Deliver a pointer event in client coordinates; `bounds_origin` is the top-left corner of
    /// the surface in the same space.
    pub fn pointer_move(&mut self, client: Point, bounds_origin: Point) {
        let Some(m) = self.mounted.as_mut() else {
            return;
        };
        let local = Point::new(client.x - bounds_origin.x, client.y - bounds_origin.y);
        m.effect.on_pointer_move(local);
    }

    /// Advance the clock by `dt_ms`, fire due timers in deadline order, then run one frame.
    ///
    /// Returns the tick that was delivered, or `None` once unmounted.
    pub fn advance(&mut self, dt_ms: f64) -> Option<FrameTick> {
        let m = self.mounted.as_mut()?;
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        m.clock_ms += dt_ms;
        for id in m.timers.drain_due(m.clock_ms) {
            m.effect.on_timer(id);
        }
        let tick = FrameTick {
            index: m.frames,
            elapsed_ms: m.clock_ms,
            dt_ms,
        };
        m.effect.on_frame(tick, &mut m.surface);
        m.frames += 1;
        Some(tick)
    }

    /// Tear down: cancel the frame registration and every timer and hand back the parts.
    /// Returns `None` when already unmounted.
    pub fn unmount(&mut self) -> Option<(E, S)> {
        let mut m = self.mounted.take()?;
        m.timers.clear();
        tracing::debug!(frames = m.frames, "stage unmounted");
        Some((m.effect, m.surface))
    }
}

impl<E: Effect, S: Surface> Drop for Stage<E, S> {
    fn drop(&mut self) {
        let _ = self.unmount();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/stage.rs"]
mod tests;
