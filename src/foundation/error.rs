/// Convenience result type used across the engine.
pub type SignageResult<T> = Result<T, SignageError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Asset failures and blocked autoplay are deliberately absent: they are recovered inside
/// the sequencers and never reach callers.
#[derive(thiserror::Error, Debug)]
pub enum SignageError {
    /// Upstream contract violation (invalid canvas, malformed element geometry).
    #[error("domain error: {0}")]
    Domain(String),

    /// Invalid user-provided project or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A project or element lookup found nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// A uniqueness constraint rejected a write.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Every publish code attempt collided with an existing code.
    #[error("failed to generate a unique publish code after {attempts} attempts")]
    PublishCodeExhausted {
        /// Number of attempts made before giving up.
        attempts: u32,
    },

    /// Engine configuration could not be loaded.
    #[error("config error: {0}")]
    Config(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SignageError {
    /// Build a [`SignageError::Domain`] value.
    pub fn domain(msg: impl Into<String>) -> Self {
        Self::Domain(msg.into())
    }

    /// Build a [`SignageError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SignageError::NotFound`] value.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Build a [`SignageError::Conflict`] value.
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Build a [`SignageError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`SignageError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// `true` for errors a publisher may resolve by retrying with a different code.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<serde_json::Error> for SignageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
