/// Scene rendering over a CPU surface.
pub mod render_session;
