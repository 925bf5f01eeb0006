//! Authenticated session state.
//!
//! A [`Session`] owns the credential pair and the cached user profile. It is
//! restored from a [`TokenStore`] on startup, mirrored back to the store on
//! every change, and torn down on logout or when a credential can no longer
//! be refreshed.
//!
//! Refresh is a small state machine:
//!
//! ```text
//! LoggedOut ──establish──▶ Authenticated ──begin_refresh──▶ Refreshing
//!     ▲                          ▲                              │
//!     │                          └───────complete_refresh───────┤
//!     └──────────────────────────teardown───────────────────────┘
//! ```
//!
//! Every credential carries a generation number. A request that saw a 401
//! compares the generation it sent with the current one to tell whether
//! another request already refreshed in the meantime.

mod store;

pub use store::{FileTokenStore, MemoryTokenStore, PersistedSession, StoreError, TokenStore};

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::{debug, warn};

use crate::types::UserProfile;

/// Externally visible phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthPhase {
    LoggedOut,
    Authenticated,
    Refreshing,
}

/// Access token attached to a request, tagged with its generation.
#[derive(Debug, Clone)]
pub struct BearerToken {
    pub token: SecretString,
    pub generation: u64,
}

#[derive(Debug, Clone)]
struct Credentials {
    access: SecretString,
    refresh: Option<SecretString>,
}

#[derive(Debug)]
enum AuthState {
    LoggedOut,
    Authenticated { creds: Credentials, generation: u64 },
    Refreshing { creds: Credentials, generation: u64 },
}

/// Shared, cloneable handle to the signed-in state.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    store: Arc<dyn TokenStore>,
    state: RwLock<AuthState>,
    user: RwLock<Option<UserProfile>>,
    /// Serialises refreshes so at most one is in flight.
    refresh_gate: Mutex<()>,
    next_generation: AtomicU64,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

impl Session {
    /// Restore a session from persisted storage.
    ///
    /// A stored access token makes the session start `Authenticated`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be read.
    pub fn restore(store: Arc<dyn TokenStore>) -> Result<Self, StoreError> {
        let persisted = store.load()?;
        let next_generation = AtomicU64::new(1);

        let state = match persisted.access_token {
            Some(access) if !access.is_empty() => AuthState::Authenticated {
                creds: Credentials {
                    access: SecretString::from(access),
                    refresh: persisted
                        .refresh_token
                        .filter(|t| !t.is_empty())
                        .map(SecretString::from),
                },
                generation: next_generation.fetch_add(1, Ordering::Relaxed),
            },
            _ => AuthState::LoggedOut,
        };

        Ok(Self {
            inner: Arc::new(SessionInner {
                store,
                state: RwLock::new(state),
                user: RwLock::new(persisted.user),
                refresh_gate: Mutex::new(()),
                next_generation,
            }),
        })
    }

    /// Fresh logged-out session backed by memory only.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(SessionInner {
                store: Arc::new(MemoryTokenStore::new()),
                state: RwLock::new(AuthState::LoggedOut),
                user: RwLock::new(None),
                refresh_gate: Mutex::new(()),
                next_generation: AtomicU64::new(1),
            }),
        }
    }

    /// Current phase.
    pub async fn phase(&self) -> AuthPhase {
        match *self.inner.state.read().await {
            AuthState::LoggedOut => AuthPhase::LoggedOut,
            AuthState::Authenticated { .. } => AuthPhase::Authenticated,
            AuthState::Refreshing { .. } => AuthPhase::Refreshing,
        }
    }

    /// Whether a credential is held.
    pub async fn is_authenticated(&self) -> bool {
        self.phase().await != AuthPhase::LoggedOut
    }

    /// Access token to attach to the next request, if any.
    pub async fn bearer(&self) -> Option<BearerToken> {
        match &*self.inner.state.read().await {
            AuthState::LoggedOut => None,
            AuthState::Authenticated { creds, generation }
            | AuthState::Refreshing { creds, generation } => Some(BearerToken {
                token: creds.access.clone(),
                generation: *generation,
            }),
        }
    }

    /// Whether a refresh token is held.
    pub async fn has_refresh_token(&self) -> bool {
        match &*self.inner.state.read().await {
            AuthState::LoggedOut => false,
            AuthState::Authenticated { creds, .. } | AuthState::Refreshing { creds, .. } => {
                creds.refresh.is_some()
            }
        }
    }

    /// The current refresh token, used by logout to revoke it server-side.
    pub(crate) async fn refresh_token(&self) -> Option<SecretString> {
        match &*self.inner.state.read().await {
            AuthState::LoggedOut => None,
            AuthState::Authenticated { creds, .. } | AuthState::Refreshing { creds, .. } => {
                creds.refresh.clone()
            }
        }
    }

    /// Install a freshly issued credential pair and persist it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the credentials cannot be persisted. The
    /// in-memory session is updated either way.
    pub async fn establish(
        &self,
        access: SecretString,
        refresh: Option<SecretString>,
    ) -> Result<BearerToken, StoreError> {
        let generation = self.next_generation();
        let bearer = BearerToken {
            token: access.clone(),
            generation,
        };
        *self.inner.state.write().await = AuthState::Authenticated {
            creds: Credentials { access, refresh },
            generation,
        };
        debug!(generation, "Session established");
        self.persist().await?;
        Ok(bearer)
    }

    /// Cached user profile.
    pub async fn user(&self) -> Option<UserProfile> {
        self.inner.user.read().await.clone()
    }

    /// Cache the user profile and persist it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the profile cannot be persisted.
    pub async fn set_user(&self, user: UserProfile) -> Result<(), StoreError> {
        *self.inner.user.write().await = Some(user);
        self.persist().await
    }

    /// Discard all credentials, in memory and in the store.
    ///
    /// Store failures are logged; the in-memory session is always cleared.
    pub async fn teardown(&self) {
        *self.inner.state.write().await = AuthState::LoggedOut;
        *self.inner.user.write().await = None;
        if let Err(e) = self.inner.store.clear() {
            warn!(error = %e, "Failed to clear persisted session");
        }
        warn!("Session torn down");
    }

    /// Take the refresh gate. Held across the whole refresh exchange.
    pub(crate) async fn lock_refresh(&self) -> MutexGuard<'_, ()> {
        self.inner.refresh_gate.lock().await
    }

    /// Move `Authenticated → Refreshing` and hand out the refresh token.
    ///
    /// Returns `None` (state unchanged) when there is no refresh token or
    /// the session is not `Authenticated`.
    pub async fn begin_refresh(&self) -> Option<SecretString> {
        let mut state = self.inner.state.write().await;
        let AuthState::Authenticated { creds, generation } = &*state else {
            return None;
        };
        let refresh = creds.refresh.clone()?;
        let (creds, generation) = (creds.clone(), *generation);
        *state = AuthState::Refreshing { creds, generation };
        debug!(generation, "Refreshing access token");
        Some(refresh)
    }

    /// Move `Refreshing → Authenticated` with a new access token.
    ///
    /// A rotated refresh token replaces the old one. Returns `None` if the
    /// session was torn down while the refresh was in flight.
    pub async fn complete_refresh(
        &self,
        access: SecretString,
        rotated_refresh: Option<SecretString>,
    ) -> Option<BearerToken> {
        let bearer = {
            let mut state = self.inner.state.write().await;
            let AuthState::Refreshing { creds, .. } = &*state else {
                return None;
            };
            let refresh = rotated_refresh.or_else(|| creds.refresh.clone());
            let generation = self.next_generation();
            *state = AuthState::Authenticated {
                creds: Credentials {
                    access: access.clone(),
                    refresh,
                },
                generation,
            };
            BearerToken {
                token: access,
                generation,
            }
        };

        debug!(generation = bearer.generation, "Access token refreshed");
        if let Err(e) = self.persist().await {
            warn!(error = %e, "Failed to persist refreshed token");
        }
        Some(bearer)
    }

    /// Put a `Refreshing` session back to `Authenticated` with its old
    /// credential, for an exchange that will never complete.
    ///
    /// Does not wait for the state lock; returns `false` if the lock is busy
    /// or there was nothing to undo.
    pub(crate) fn abandon_refresh(&self) -> bool {
        match self.inner.state.try_write() {
            Ok(mut state) => revert_refresh(&mut state),
            Err(_) => false,
        }
    }

    /// Undo a refresh left unfinished by a dropped request.
    ///
    /// Must be called with the refresh gate held: no exchange can be in
    /// flight then, so any `Refreshing` state is stale.
    pub(crate) async fn reclaim_abandoned_refresh(&self) {
        let mut state = self.inner.state.write().await;
        if revert_refresh(&mut state) {
            warn!("Recovered an abandoned token refresh");
        }
    }

    fn next_generation(&self) -> u64 {
        self.inner.next_generation.fetch_add(1, Ordering::Relaxed)
    }

    async fn persist(&self) -> Result<(), StoreError> {
        let snapshot = {
            let state = self.inner.state.read().await;
            let user = self.inner.user.read().await.clone();
            match &*state {
                AuthState::LoggedOut => PersistedSession {
                    user,
                    ..PersistedSession::default()
                },
                AuthState::Authenticated { creds, .. } | AuthState::Refreshing { creds, .. } => {
                    PersistedSession {
                        access_token: Some(creds.access.expose_secret().to_string()),
                        refresh_token: creds
                            .refresh
                            .as_ref()
                            .map(|t| t.expose_secret().to_string()),
                        user,
                    }
                }
            }
        };
        self.inner.store.save(&snapshot)
    }
}

fn revert_refresh(state: &mut AuthState) -> bool {
    let AuthState::Refreshing { creds, generation } = &*state else {
        return false;
    };
    let (creds, generation) = (creds.clone(), *generation);
    *state = AuthState::Authenticated { creds, generation };
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::from(s)
    }

    #[tokio::test]
    async fn test_restore_from_store() {
        let store = MemoryTokenStore::with_session(PersistedSession {
            access_token: Some("a".to_string()),
            refresh_token: Some("r".to_string()),
            user: None,
        });
        let session = Session::restore(Arc::new(store)).unwrap();
        assert_eq!(session.phase().await, AuthPhase::Authenticated);
        assert_eq!(session.bearer().await.unwrap().token.expose_secret(), "a");
        assert!(session.has_refresh_token().await);
    }

    #[tokio::test]
    async fn test_restore_empty_store_is_logged_out() {
        let session = Session::restore(Arc::new(MemoryTokenStore::new())).unwrap();
        assert_eq!(session.phase().await, AuthPhase::LoggedOut);
        assert!(session.bearer().await.is_none());
    }

    #[tokio::test]
    async fn test_establish_persists() {
        let store = MemoryTokenStore::new();
        let session = Session::restore(Arc::new(store.clone())).unwrap();
        session
            .establish(secret("access"), Some(secret("refresh")))
            .await
            .unwrap();

        let persisted = store.snapshot();
        assert_eq!(persisted.access_token.as_deref(), Some("access"));
        assert_eq!(persisted.refresh_token.as_deref(), Some("refresh"));
    }

    #[tokio::test]
    async fn test_refresh_cycle_bumps_generation() {
        let store = MemoryTokenStore::new();
        let session = Session::restore(Arc::new(store.clone())).unwrap();
        let first = session
            .establish(secret("old"), Some(secret("refresh")))
            .await
            .unwrap();

        let refresh = session.begin_refresh().await.unwrap();
        assert_eq!(refresh.expose_secret(), "refresh");
        assert_eq!(session.phase().await, AuthPhase::Refreshing);
        // A second refresh cannot start while one is in flight
        assert!(session.begin_refresh().await.is_none());

        let second = session.complete_refresh(secret("new"), None).await.unwrap();
        assert!(second.generation > first.generation);
        assert_eq!(session.phase().await, AuthPhase::Authenticated);
        assert_eq!(store.snapshot().access_token.as_deref(), Some("new"));
        assert_eq!(store.snapshot().refresh_token.as_deref(), Some("refresh"));
    }

    #[tokio::test]
    async fn test_begin_refresh_without_refresh_token() {
        let session = Session::in_memory();
        session.establish(secret("a"), None).await.unwrap();
        assert!(session.begin_refresh().await.is_none());
        assert_eq!(session.phase().await, AuthPhase::Authenticated);
    }

    #[tokio::test]
    async fn test_complete_refresh_after_teardown() {
        let session = Session::in_memory();
        session
            .establish(secret("a"), Some(secret("r")))
            .await
            .unwrap();
        session.begin_refresh().await.unwrap();
        session.teardown().await;
        assert!(session.complete_refresh(secret("b"), None).await.is_none());
        assert_eq!(session.phase().await, AuthPhase::LoggedOut);
    }

    #[tokio::test]
    async fn test_abandoned_refresh_can_be_retried() {
        let session = Session::in_memory();
        let first = session
            .establish(secret("a"), Some(secret("r")))
            .await
            .unwrap();
        session.begin_refresh().await.unwrap();

        assert!(session.abandon_refresh());
        assert_eq!(session.phase().await, AuthPhase::Authenticated);
        assert_eq!(session.bearer().await.unwrap().generation, first.generation);
        assert!(!session.abandon_refresh());

        assert!(session.begin_refresh().await.is_some());
        session.reclaim_abandoned_refresh().await;
        assert_eq!(session.phase().await, AuthPhase::Authenticated);
        assert_eq!(
            session.begin_refresh().await.unwrap().expose_secret(),
            "r"
        );
    }

    #[tokio::test]
    async fn test_teardown_clears_store() {
        let store = MemoryTokenStore::new();
        let session = Session::restore(Arc::new(store.clone())).unwrap();
        session
            .establish(secret("a"), Some(secret("r")))
            .await
            .unwrap();
        session.teardown().await;

        assert_eq!(store.snapshot(), PersistedSession::default());
        assert!(session.user().await.is_none());
        assert!(!session.is_authenticated().await);
    }
}
