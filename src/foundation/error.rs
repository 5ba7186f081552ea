/// Convenience result type used across scrollfx.
pub type ScrollFxResult<T> = Result<T, ScrollFxError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Runtime paths (sampling, stepping, frame dispatch) do not fail; they clamp or skip.
/// Errors surface only when building configuration or rasterizing to pixels.
#[derive(thiserror::Error, Debug)]
pub enum ScrollFxError {
    /// Invalid user-provided configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid interpolation tables, keyframe tracks or spring parameters.
    #[error("animation error: {0}")]
    Animation(String),

    /// Invalid particle field parameters.
    #[error("simulation error: {0}")]
    Simulation(String),

    /// Errors while rasterizing or writing frames.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ScrollFxError {
    /// Build a [`ScrollFxError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ScrollFxError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`ScrollFxError::Simulation`] value.
    pub fn simulation(msg: impl Into<String>) -> Self {
        Self::Simulation(msg.into())
    }

    /// Build a [`ScrollFxError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ScrollFxError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for ScrollFxError {
    fn from(e: serde_json::Error) -> Self {
        Self::serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
