//! Error types for the client store.

/// Errors raised by a [`ProfileStore`](crate::auth::store::ProfileStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The key is not usable by this backend.
    #[error("Invalid key '{0}'")]
    InvalidKey(String),

    /// A lock guarding shared storage was poisoned by a panicking writer.
    #[error("Storage lock poisoned")]
    Poisoned,

    /// Generic backend failure.
    #[error("Storage error: {0}")]
    Backend(String),
}
