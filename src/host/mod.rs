//! Frame loop, interval timers and teardown for one mounted effect.

pub mod stage;
pub mod timer;
