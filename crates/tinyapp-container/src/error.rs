//! Error types for container operations.

/// Errors raised by [`Container`](crate::Container) operations.
///
/// Resolution never swallows failures: a `ContainerError` raised anywhere in a
/// chain of factories reaches the outermost caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// The key was never registered.
    #[error("Key \"{0}\" is not defined")]
    KeyNotFound(String),

    /// The key is frozen: it already holds a value or a factory, or it has
    /// been resolved and can no longer be removed.
    #[error("Key \"{0}\" has already been set")]
    KeyAlreadySet(String),

    /// Resolution re-entered a key whose factory is still running.
    #[error("Recursion in dependencies detected: key \"{0}\"")]
    CircularDependency(String),

    /// The stored value is not of the requested type.
    #[error("Key \"{key}\" does not hold a value of type {expected}")]
    TypeMismatch {
        /// The key that was looked up
        key: String,
        /// Name of the requested type
        expected: &'static str,
    },

    /// A factory failed with an error of its own.
    #[error("Factory for key \"{key}\" failed")]
    Factory {
        /// The key whose factory failed
        key: String,
        /// The factory's error
        #[source]
        source: anyhow::Error,
    },
}

impl ContainerError {
    /// Returns the key this error is about.
    pub fn key(&self) -> &str {
        match self {
            ContainerError::KeyNotFound(key)
            | ContainerError::KeyAlreadySet(key)
            | ContainerError::CircularDependency(key) => key,
            ContainerError::TypeMismatch { key, .. } | ContainerError::Factory { key, .. } => key,
        }
    }
}

/// Result alias for container operations.
pub type ContainerResult<T> = Result<T, ContainerError>;
