//! Frame sinks.
//!
//! Sinks consume rendered frames in frame order and are used by `RenderSession::render_range`.

/// `ffmpeg`-based MP4 output via the system `ffmpeg`.
pub mod ffmpeg;
/// PNG files via `image`.
pub mod png;
/// The sink trait and the in-memory sink.
pub mod sink;
