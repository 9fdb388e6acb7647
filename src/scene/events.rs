use crate::foundation::core::{Canvas, Point};

/// Host input scheduled before a given frame.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneEvent {
    pub frame: u64,
    #[serde(flatten)]
    pub kind: EventKind,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    /// Pointer position in canvas-local pixels.
    Pointer { x: f64, y: f64 },
    /// New container size. Zero sides are allowed and defer the renderer's grid.
    Resize { width: u32, height: u32 },
}

impl EventKind {
    pub fn pointer(self) -> Option<Point> {
        match self {
            Self::Pointer { x, y } => Some(Point::new(x, y)),
            Self::Resize { .. } => None,
        }
    }

    pub fn canvas(self) -> Option<Canvas> {
        match self {
            Self::Resize { width, height } => Some(Canvas::new(width, height)),
            Self::Pointer { .. } => None,
        }
    }
}

/// Walks a frame-sorted event list, handing out each event exactly once.
#[derive(Clone, Debug)]
pub struct EventCursor<'a> {
    events: &'a [SceneEvent],
    next: usize,
}

impl<'a> EventCursor<'a> {
    pub fn new(events: &'a [SceneEvent]) -> Self {
        Self { events, next: 0 }
    }

    /// Events scheduled at or before `frame` that have not been handed out yet.
    pub fn take_through(&mut self, frame: u64) -> &'a [SceneEvent] {
        let start = self.next;
        let len = self.events[start..]
            .iter()
            .take_while(|e| e.frame <= frame)
            .count();
        self.next = start + len;
        &self.events[start..self.next]
    }

    /// Continue a walk that had already handed out `position` events.
    pub fn resume(events: &'a [SceneEvent], position: usize) -> Self {
        Self {
            events,
            next: position.min(events.len()),
        }
    }

    pub fn position(&self) -> usize {
        self.next
    }

    pub fn rewind(&mut self) {
        self.next = 0;
    }

    pub fn remaining(&self) -> usize {
        self.events.len() - self.next
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/events.rs"]
mod tests;
