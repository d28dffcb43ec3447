//! Client store implementations.

pub mod cookie;
pub mod memory;
pub mod trait_def;

// Re-exports
pub use cookie::CookieStore;
pub use memory::MemoryStore;
pub use trait_def::ProfileStore;

use crate::auth::error::StoreError;

/// Key holding the first-party session credential.
pub const SESSION_KEY: &str = "token";

/// Anti-forgery token access over a [`ProfileStore`], bound to one
/// provider's state key.
///
/// Keys are `{provider}_state`, so one pending flow per provider and profile
/// exists at a time; a newer flow overwrites an older one.
pub struct AntiForgeryStore<'a> {
    inner: &'a mut dyn ProfileStore,
    key: &'a str,
}

impl<'a> AntiForgeryStore<'a> {
    pub fn new(inner: &'a mut dyn ProfileStore, key: &'a str) -> Self {
        Self { inner, key }
    }

    pub fn get(&self) -> Result<Option<String>, StoreError> {
        self.inner.get(self.key)
    }

    pub fn set(&mut self, state: &str) -> Result<(), StoreError> {
        self.inner.set(self.key, state)
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.inner.remove(self.key)
    }
}
