/// Convenience result type used across Depthloop.
pub type DepthloopResult<T> = Result<T, DepthloopError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum DepthloopError {
    /// Source image bytes could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Invalid user-provided data or parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rendering or evaluating a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors in the capture pipeline (sink setup, frame streaming, finalize).
    #[error("capture error: {0}")]
    Capture(String),

    /// None of the supported video encoders is available in the system `ffmpeg`.
    #[error("unsupported codec: {0}")]
    UnsupportedCodec(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DepthloopError {
    /// Build a [`DepthloopError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`DepthloopError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DepthloopError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`DepthloopError::Capture`] value.
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture(msg.into())
    }

    /// Build a [`DepthloopError::UnsupportedCodec`] value.
    pub fn unsupported_codec(msg: impl Into<String>) -> Self {
        Self::UnsupportedCodec(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
