//! First-party session handling and the client-side store.

pub mod error;
pub mod middleware;
pub mod session;
pub mod store;

pub use error::StoreError;
pub use middleware::BearerToken;
pub use session::{SessionCredential, login_redirect, require_session};
