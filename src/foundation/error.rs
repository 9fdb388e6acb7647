/// Convenience result type used across glitchwave.
pub type GlitchwaveResult<T> = Result<T, GlitchwaveError>;

/// Top-level error taxonomy for fallible glitchwave APIs.
///
/// Renderer draw paths never fail; a degenerate frame is skipped instead. Errors come from option
/// validation, scene loading, surface readback and frame sinks.
#[derive(thiserror::Error, Debug)]
pub enum GlitchwaveError {
    /// Invalid user-provided options or scene data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while loading or stepping a scene.
    #[error("scene error: {0}")]
    Scene(String),

    /// Errors raised by a rendering surface.
    #[error("render error: {0}")]
    Render(String),

    /// Errors raised by a frame sink while encoding output.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GlitchwaveError {
    /// Build a [`GlitchwaveError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GlitchwaveError::Scene`] value.
    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene(msg.into())
    }

    /// Build a [`GlitchwaveError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`GlitchwaveError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`GlitchwaveError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
