/// Identifier an effect picks for one of its interval timers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u32);

/// Repeating timer registration, the `setInterval` analog.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimerSpec {
    pub id: TimerId,
    pub interval_ms: f64,
}

impl TimerSpec {
    pub fn every(id: TimerId, interval_ms: f64) -> Self {
        Self { id, interval_ms }
    }
}

/// Smallest interval a timer may run at; shorter (or non-finite) intervals are raised to this.
pub const MIN_INTERVAL_MS: f64 = 1.0;

/// Most firings one timer delivers per drain.
pub const MAX_CATCH_UP: usize = 64;

#[derive(Clone, Debug)]
struct Entry {
    id: TimerId,
    interval_ms: f64,
    next_due_ms: f64,
}

/// Interval timers on a virtual millisecond clock.
#[derive(Clone, Debug, Default)]
pub struct TimerQueue {
    entries: Vec<Entry>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `spec` with its first deadline one interval after `now_ms`.
    pub fn register(&mut self, spec: TimerSpec, now_ms: f64) {
        let interval_ms = if spec.interval_ms.is_finite() {
            spec.interval_ms.max(MIN_INTERVAL_MS)
        } else {
            MIN_INTERVAL_MS
        };
        self.entries.retain(|e| e.id != spec.id);
        self.entries.push(Entry {
            id: spec.id,
            interval_ms,
            next_due_ms: now_ms + interval_ms,
        });
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        before != self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pop every occurrence due at or before `now_ms`, in deadline order. A timer that fell
    /// behind fires once per missed interval, up to [`MAX_CATCH_UP`] times; older deadlines are
    /// skipped. Ties keep registration order.
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<TimerId> {
        let mut fired: Vec<(f64, usize, TimerId)> = Vec::new();
        for (slot, e) in self.entries.iter_mut().enumerate() {
            let behind = ((now_ms - e.next_due_ms) / e.interval_ms).floor();
            if behind >= MAX_CATCH_UP as f64 {
                let skipped = behind - (MAX_CATCH_UP - 1) as f64;
                e.next_due_ms += skipped * e.interval_ms;
                tracing::debug!(timer = e.id.0, skipped, "timer fell behind");
            }
            while e.next_due_ms <= now_ms {
                fired.push((e.next_due_ms, slot, e.id));
                e.next_due_ms += e.interval_ms;
            }
        }
        fired.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        fired.into_iter().map(|(_, _, id)| id).collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/host/timer.rs"]
mod tests;
