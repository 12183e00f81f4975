/// Result alias used across the crate.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors surfaced by the editor, its renderers and its persistence layer.
#[derive(thiserror::Error, Debug)]
pub enum CanvasError {
    /// Input rejected before it reached the model.
    #[error("validation error: {0}")]
    Validation(String),

    /// An image reference could not be read or decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// A renderer call failed.
    #[error("render error: {0}")]
    Render(String),

    /// A session blob could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serde(String),

    /// The key-value store failed to read or write.
    #[error("persistence error: {0}")]
    Persist(String),

    /// Anything else, with its context chain.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CanvasError {
    /// Build a [`CanvasError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CanvasError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`CanvasError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CanvasError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`CanvasError::Persist`].
    pub fn persist(msg: impl Into<String>) -> Self {
        Self::Persist(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
