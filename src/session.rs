//! In-memory session credentials.
//!
//! Holds the short-lived access token and nothing else. The long-lived
//! refresh token is an HTTP-only cookie managed by the backend and the
//! reqwest cookie jar; this module never sees it. The token is zeroed in
//! memory whenever it is cleared or replaced.

use std::sync::Arc;
use tokio::sync::RwLock;
use zeroize::Zeroize;

/// Callback invoked when the access token changes due to an internal
/// refresh, so application-level session state can mirror it.
pub type TokenListener = Box<dyn Fn(&str) + Send + Sync>;

/// Thread-safe holder for the current access token.
///
/// Mutated in place so all in-flight and future requests observe the latest
/// value; there is one `Session` per `ApiClient` for the life of the process.
#[derive(Clone, Default)]
pub struct Session {
    /// Current access token (memory only, never persisted).
    token: Arc<RwLock<Option<String>>>,

    /// Listener fired on internal refresh. Set once by the embedding
    /// application; uses std::sync::RwLock because registration is
    /// synchronous.
    listener: Arc<std::sync::RwLock<Option<TokenListener>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current access token.
    pub async fn current(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Store a new access token, wiping the previous one.
    pub async fn set_token(&self, token: String) {
        let mut guard = self.token.write().await;
        if let Some(ref mut old) = *guard {
            old.zeroize();
        }
        *guard = Some(token);
    }

    /// Clear the access token (logout). The old value is zeroed.
    pub async fn clear_token(&self) {
        let mut guard = self.token.write().await;
        if let Some(ref mut old) = *guard {
            old.zeroize();
        }
        *guard = None;
    }

    /// Register the refresh listener. Replaces any previous listener.
    pub fn set_listener(&self, listener: TokenListener) {
        if let Ok(mut slot) = self.listener.write() {
            *slot = Some(listener);
        }
    }

    /// Store a token obtained from a transparent refresh and notify the
    /// registered listener. Explicit `set_token`/`clear_token` calls do not
    /// notify; only internal refreshes do.
    pub async fn replace_from_refresh(&self, token: String) {
        self.set_token(token.clone()).await;
        if let Ok(slot) = self.listener.read() {
            if let Some(ref listener) = *slot {
                listener(&token);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_set_and_clear_token() {
        let session = Session::new();
        assert_eq!(session.current().await, None);

        session.set_token("abc".to_string()).await;
        assert_eq!(session.current().await.as_deref(), Some("abc"));

        session.clear_token().await;
        assert_eq!(session.current().await, None);
    }

    #[tokio::test]
    async fn test_listener_fires_on_refresh_only() {
        let session = Session::new();
        let calls = Arc::new(AtomicU32::new(0));

        let seen = calls.clone();
        session.set_listener(Box::new(move |token| {
            assert_eq!(token, "fresh");
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        // Explicit assignment: no notification.
        session.set_token("initial".to_string()).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        // Internal refresh: exactly one notification.
        session.replace_from_refresh("fresh".to_string()).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.current().await.as_deref(), Some("fresh"));

        // Clearing does not notify either.
        session.clear_token().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
