//! Bearer-token session storage.
//!
//! The client takes an injected token store instead of reading ambient
//! state; a 401 from the backend triggers the single invalidation hook
//! (`clear`) before the error is surfaced to the caller.

use std::sync::Mutex;

/// Durable storage for the session's bearer token.
///
/// Implementations use interior mutability so the client can invalidate
/// the session from shared references.
pub trait TokenStore: Send + Sync + std::fmt::Debug {
    /// Current token, if a session exists.
    fn read(&self) -> Option<String>;

    /// Store a token after a successful login.
    fn write(&self, token: &str);

    /// Invalidation hook: drop the stored token.
    fn clear(&self);
}

/// In-memory token store for tests and anonymous sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        match self.token.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn read(&self) -> Option<String> {
        self.lock().clone()
    }

    fn write(&self, token: &str) {
        *self.lock() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.lock() = None;
    }
}
