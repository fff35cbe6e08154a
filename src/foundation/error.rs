/// Convenience result type used across ringburst.
pub type RingburstResult<T> = Result<T, RingburstError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum RingburstError {
    /// Invalid user-provided parameters (params file, canvas, fps, encoder options).
    #[error("validation error: {0}")]
    Validation(String),

    /// `ffprobe` is missing, failed, or produced output we could not use.
    #[error("probe error: {0}")]
    Probe(String),

    /// `ffmpeg` is missing, exited early or non-zero, or its stdin closed unexpectedly.
    #[error("encoder error: {0}")]
    Encoder(String),

    /// The rasterizer could not produce a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RingburstError {
    /// Build a [`RingburstError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RingburstError::Probe`] value.
    pub fn probe(msg: impl Into<String>) -> Self {
        Self::Probe(msg.into())
    }

    /// Build a [`RingburstError::Encoder`] value.
    pub fn encoder(msg: impl Into<String>) -> Self {
        Self::Encoder(msg.into())
    }

    /// Build a [`RingburstError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
