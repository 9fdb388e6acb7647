//! Animated character grid with a fixed caption and a vignette falloff.

/// Character pools and sampling.
pub mod charset;
/// Grid geometry and cell state.
pub mod grid;
/// Options, timers and drawing.
pub mod renderer;
