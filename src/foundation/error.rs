/// Convenience result type used across brewscroll.
pub type PlayerResult<T> = Result<T, PlayerError>;

/// Top-level error taxonomy used by player APIs.
///
/// Individual frame fetch failures are not surfaced through this type during a load; they are
/// masked by placeholder frames inside the frame store.
#[derive(thiserror::Error, Debug)]
pub enum PlayerError {
    /// Invalid user-provided configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while fetching or decoding a frame.
    #[error("asset error: {0}")]
    Asset(String),

    /// Errors while preparing or drawing the canvas surface.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while reading or parsing player configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlayerError {
    /// Build a [`PlayerError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PlayerError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`PlayerError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`PlayerError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
