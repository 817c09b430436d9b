use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use shared_api::TokenSource;
use shared_models::auth::Identity;
use shared_utils::jwt;

use crate::models::{Session, IDENTITY_KEY, TOKEN_KEY};
use crate::services::storage::{MemoryStorage, SessionStorage};

/// Process-wide holder of the authenticated [`Session`].
///
/// The only mutators are [`login`](Self::login), [`logout`](Self::logout),
/// [`restore`](Self::restore) and [`invalidate`](Self::invalidate). Every
/// mutation updates memory before touching durable storage, and readers that
/// need to react to changes hold a [`watch::Receiver`] from
/// [`subscribe`](Self::subscribe). None of these operations fail: storage
/// problems are logged and memory stays authoritative.
pub struct SessionStore {
    state: watch::Sender<Session>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    /// Starts logged out; call [`restore`](Self::restore) to pick up a persisted session.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let (state, _) = watch::channel(Session::anonymous());
        Self { state, storage }
    }

    pub fn restored(storage: Arc<dyn SessionStorage>) -> Self {
        let store = Self::new(storage);
        store.restore();
        store
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub fn login(&self, identity: Identity, token: String) {
        if token.trim().is_empty() {
            warn!("Refusing to store a session with an empty token for {}", identity.email);
            return;
        }

        let identity_json = match serde_json::to_string(&identity) {
            Ok(json) => Some(json),
            Err(e) => {
                warn!("Failed to serialize identity, session will not survive a restart: {}", e);
                None
            }
        };

        info!("Session started for {} ({})", identity.email, identity.role);
        self.replace(Session::authenticated(identity, token.clone()));

        if let Some(identity_json) = identity_json {
            self.write_key(TOKEN_KEY, &token);
            self.write_key(IDENTITY_KEY, &identity_json);
        }
    }

    /// Clears the session. Calling it while logged out changes nothing.
    pub fn logout(&self) {
        if self.replace(Session::anonymous()) {
            info!("Session ended");
        } else {
            debug!("Logout requested with no active session");
        }
        self.clear_storage();
    }

    /// Logout caused by the backend rejecting the token.
    pub fn invalidate(&self, reason: &str) {
        if self.is_authenticated() {
            warn!("Invalidating session: {}", reason);
        }
        self.logout();
    }

    /// Rebuilds the session from durable storage.
    ///
    /// Both keys must be present, the identity must decode and a JWT token
    /// must not already be expired. Anything else leaves the client logged
    /// out with storage cleared.
    pub fn restore(&self) -> Session {
        let token = self.read_key(TOKEN_KEY);
        let identity_raw = self.read_key(IDENTITY_KEY);

        let restored = match (token, identity_raw) {
            (None, None) => {
                debug!("No persisted session found");
                self.replace(Session::anonymous());
                return Session::anonymous();
            }
            (Some(token), Some(raw)) if !token.trim().is_empty() => {
                match serde_json::from_str::<Identity>(&raw) {
                    Ok(identity) if jwt::is_expired(&token) == Some(true) => {
                        warn!("Persisted token for {} has expired", identity.email);
                        None
                    }
                    Ok(identity) => Some(Session::authenticated(identity, token)),
                    Err(e) => {
                        warn!("Persisted identity is unreadable: {}", e);
                        None
                    }
                }
            }
            _ => {
                warn!("Persisted session is incomplete, treating it as logged out");
                None
            }
        };

        match restored {
            Some(session) => {
                if let Some(identity) = session.identity() {
                    info!("Restored session for {} ({})", identity.email, identity.role);
                }
                self.replace(session.clone());
                session
            }
            None => {
                self.replace(Session::anonymous());
                self.clear_storage();
                Session::anonymous()
            }
        }
    }

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity().cloned()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token().map(str::to_string)
    }

    /// Returns whether subscribers were notified.
    fn replace(&self, next: Session) -> bool {
        self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        })
    }

    fn read_key(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read {} from session storage: {}", key, e);
                None
            }
        }
    }

    fn write_key(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            warn!("Failed to persist {}: {}", key, e);
        }
    }

    fn clear_storage(&self) {
        for key in [TOKEN_KEY, IDENTITY_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!("Failed to remove {} from session storage: {}", key, e);
            }
        }
    }
}

impl TokenSource for SessionStore {
    fn bearer_token(&self) -> Option<String> {
        self.token()
    }

    /// Only the token still in use can end the session; a late 401 for a
    /// replaced token is ignored.
    fn token_rejected(&self, token: &str) {
        if self.token().as_deref() == Some(token) {
            self.invalidate("backend rejected the session token");
        } else {
            debug!("Ignoring rejection of a token that is no longer current");
        }
    }
}
