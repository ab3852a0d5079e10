/// Convenience result type used across the crate.
pub type RibbonResult<T> = Result<T, RibbonError>;

/// Top-level error taxonomy used by document, codec and render APIs.
#[derive(thiserror::Error, Debug)]
pub enum RibbonError {
    /// Invalid user-provided or document data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Index into an ordered document list that is out of range.
    #[error("index error: {kind} index {index} out of range (len {len})")]
    Index {
        /// Which list was addressed (`"stripe"` or `"device"`).
        kind: &'static str,
        /// Requested index.
        index: usize,
        /// Current list length.
        len: usize,
    },

    /// Errors while decoding or rasterizing assets.
    #[error("asset error: {0}")]
    Asset(String),

    /// Errors when serializing or deserializing documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RibbonError {
    /// Build a [`RibbonError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RibbonError::Index`] value.
    pub fn index(kind: &'static str, index: usize, len: usize) -> Self {
        Self::Index { kind, index, len }
    }

    /// Build a [`RibbonError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`RibbonError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
