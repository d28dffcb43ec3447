//! Client store trait.

use crate::auth::error::StoreError;

/// Key-value store scoped to one browser profile.
///
/// This is where the application keeps its short-lived client-side values:
/// the session credential under `token` and one anti-forgery token per
/// provider under `{provider}_state`. Handshake logic only talks to this
/// trait, so the backing store can be swapped without touching it.
pub trait ProfileStore: Send {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove the value stored under `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Get the name of this storage backend.
    fn name(&self) -> &str;
}
