/// Convenience result type used across figport.
pub type FigportResult<T> = Result<T, FigportError>;

/// Top-level error taxonomy used by importer APIs.
///
/// Only [`FigportError::MalformedDocument`] and [`FigportError::Cancelled`]
/// unwind a whole import; everything else is reported at the point of
/// occurrence and the import continues with partial results.
#[derive(thiserror::Error, Debug)]
pub enum FigportError {
    /// Missing or empty top-level document structure; aborts the import.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// The image-export endpoint returned no URL for a reference.
    #[error("image resolution error: {0}")]
    Resolution(String),

    /// Non-rate-limit HTTP failure; abandons the affected request.
    #[error("transport error: {0}")]
    Transport(String),

    /// HTTP 429 signal; consumed by the backoff-retry loop, never surfaced.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Errors when serializing or deserializing wire data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// User-initiated cancellation observed at a checkpoint.
    #[error("import cancelled")]
    Cancelled,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FigportError {
    /// Build a [`FigportError::MalformedDocument`] value.
    pub fn malformed_document(msg: impl Into<String>) -> Self {
        Self::MalformedDocument(msg.into())
    }

    /// Build a [`FigportError::Resolution`] value.
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    /// Build a [`FigportError::Transport`] value.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Build a [`FigportError::RateLimited`] value.
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Build a [`FigportError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
