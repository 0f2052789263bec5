/// Convenience result type used across typeswarm.
pub type SwarmResult<T> = Result<T, SwarmError>;

/// Top-level error taxonomy used by the engine's fallible edges.
///
/// The per-frame loop itself has no error path; these variants cover configuration,
/// quote storage and font loading.
#[derive(thiserror::Error, Debug)]
pub enum SwarmError {
    /// Invalid user-provided parameters or data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while loading or validating scene configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Errors while loading or registering font data.
    #[error("font error: {0}")]
    Font(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SwarmError {
    /// Build a [`SwarmError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SwarmError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`SwarmError::Font`] value.
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// Build a [`SwarmError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
