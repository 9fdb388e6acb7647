//! Drawing targets for the renderers.

/// `vello_cpu` raster surface.
pub mod cpu;
/// Draw-call recorder used for inspection and tests.
pub mod recording;
/// The `Surface` trait and frame buffers.
pub mod surface;
/// Glyph shaping with parley.
pub mod text;
