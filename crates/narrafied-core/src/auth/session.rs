use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use super::store::{MemoryTokenStore, TokenStore};

/// The client's authentication state.
///
/// A session either holds a bearer token or it does not. The token is set
/// by a successful login (`store_token`) and removed by logout or account
/// deletion (`clear`). Both transitions write through to the backing
/// `TokenStore` so the next run picks up the same state via `initialize`.
#[derive(Clone)]
pub struct Session {
    token: Option<String>,
    store: Arc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { token: None, store }
    }

    /// Session backed by a process-local store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    /// Load a previously persisted token into memory.
    /// Returns whether a token is now held.
    pub fn initialize(&mut self) -> Result<bool> {
        if let Some(token) = self.store.load()? {
            debug!("Loaded persisted session token");
            self.token = Some(token);
        }
        Ok(self.token.is_some())
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Hold `token` in memory and persist it.
    ///
    /// The in-memory token is replaced even if persisting fails.
    pub fn store_token(&mut self, token: String) -> Result<()> {
        let persisted = self.store.save(&token);
        self.token = Some(token);
        persisted
    }

    /// Drop the token from memory and from the store
    pub fn clear(&mut self) -> Result<()> {
        self.token = None;
        self.store.clear()
    }

    pub fn store(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.store)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
