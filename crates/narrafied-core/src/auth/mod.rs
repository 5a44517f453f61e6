//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `Session`: the in-memory bearer token plus the store it persists to
//! - `TokenStore`: persistence backends (`FileTokenStore`, `MemoryTokenStore`)
//! - `KeyringTokenStore`: OS-level token storage via keyring
//!
//! Tokens have no client-side expiry; an expired token is only detected
//! when the server rejects it.

pub mod credentials;
pub mod session;
pub mod store;

pub use credentials::KeyringTokenStore;
pub use session::Session;
pub use store::{FileTokenStore, MemoryTokenStore, StoredSession, TokenStore, TOKEN_KEY};
