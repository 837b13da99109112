use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying medium.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store cannot be reached or refused the operation.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Human readable description of the failed operation.
        message: String,
        /// Underlying backend failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A value could not be serialized for storage.
    #[error("failed to encode `{key}` for storage")]
    Encode {
        /// Key the value was being written under.
        key: String,
        /// Serialization failure.
        #[source]
        source: serde_json::Error,
    },
    /// A stored value could not be deserialized.
    #[error("failed to decode `{key}` from storage")]
    Decode {
        /// Key the value was read from.
        key: String,
        /// Deserialization failure.
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}
