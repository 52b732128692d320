/// Convenience result type used across zvis.
pub type ZvisResult<T> = Result<T, ZvisError>;

/// Top-level error taxonomy used by the load and render phases.
///
/// Every variant is fatal for the run that hits it: there is no partial-success mode and nothing is
/// retried.
#[derive(thiserror::Error, Debug)]
pub enum ZvisError {
    /// Missing or malformed configuration (sections, keys, unmatched layer signals, divisors).
    #[error("configuration error: {0}")]
    Config(String),

    /// Audio file missing, unreadable, or corrupt.
    #[error("audio decode error: {0}")]
    Decode(String),

    /// Referenced image missing, unreadable, or unusable.
    #[error("image error: {0}")]
    Image(String),

    /// Output location not writable.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ZvisError {
    /// Build a [`ZvisError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`ZvisError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`ZvisError::Image`] value.
    pub fn image(msg: impl Into<String>) -> Self {
        Self::Image(msg.into())
    }

    /// Build a [`ZvisError::Io`] value.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
