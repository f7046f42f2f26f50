use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::models::UserProfile;
use crate::storage::{KeyValueStore, StorageError, TOKEN_KEY, USER_KEY};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Cannot log in with an empty token")]
    EmptyToken,

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Failed to persist session: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to serialize user profile: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The logged-in user and the credential proving it. Always replaced as a pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionData {
    pub user: UserProfile,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Anonymous,
    Authenticated(SessionData),
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

impl From<Option<SessionData>> for SessionState {
    fn from(data: Option<SessionData>) -> Self {
        match data {
            Some(data) => SessionState::Authenticated(data),
            None => SessionState::Anonymous,
        }
    }
}

/// Single owner of "who is logged in".
///
/// Storage holds a mirror of the in-memory session under the `user` and
/// `token` keys. Every mutation writes storage and memory under one lock.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStore>,
    state: watch::Sender<Option<SessionData>>,
    write_lock: Mutex<()>,
    initialized: AtomicBool,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            storage,
            state,
            write_lock: Mutex::new(()),
            initialized: AtomicBool::new(false),
        }
    }

    /// Restore the session from storage. Only the first call reads storage.
    pub fn initialize(&self) -> SessionState {
        if self.initialized.swap(true, Ordering::SeqCst) {
            debug!("Session store already initialized");
            return self.state();
        }

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let stored = (self.storage.get(USER_KEY), self.storage.get(TOKEN_KEY));
        let (user_raw, token_raw) = match stored {
            (Ok(user), Ok(token)) => (user, token),
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "Failed to read stored session");
                return SessionState::Anonymous;
            }
        };

        match (user_raw, token_raw) {
            (None, None) => {
                debug!("No stored session");
            }
            (Some(user_raw), Some(token)) if !token.is_empty() => {
                match serde_json::from_str::<UserProfile>(&user_raw) {
                    Ok(user) => {
                        debug!(user_id = user.id, email = %user.email, "Restored session from storage");
                        self.state.send_replace(Some(SessionData { user, token }));
                    }
                    Err(e) => {
                        warn!(error = %e, "Stored user is malformed, discarding session");
                        self.discard_stored();
                    }
                }
            }
            _ => {
                warn!("Stored session is incomplete, discarding it");
                self.discard_stored();
            }
        }

        self.state()
    }

    /// Replace the session with a freshly authenticated user.
    ///
    /// Storage is written first; if that fails the in-memory session is unchanged.
    pub fn login(&self, user: UserProfile, token: impl Into<String>) -> Result<(), SessionError> {
        let token = token.into();
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }

        let user_json = serde_json::to_string(&user)?;

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.storage
            .set_many(&[(USER_KEY, user_json.as_str()), (TOKEN_KEY, token.as_str())])?;

        info!(user_id = user.id, email = %user.email, "User logged in");
        self.state.send_replace(Some(SessionData { user, token }));
        self.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Clear the session. Calling it while logged out is a no-op.
    pub fn logout(&self) -> Result<(), SessionError> {
        let was_authenticated = self.clear()?;
        if was_authenticated {
            info!("User logged out");
        } else {
            debug!("Logout while already anonymous");
        }
        Ok(())
    }

    /// Clear the session because the server rejected its credential.
    /// User and token are dropped together.
    pub fn expire(&self) -> Result<(), SessionError> {
        if self.clear()? {
            warn!("Session expired, credentials purged");
        }
        Ok(())
    }

    /// Memory is cleared even if storage fails, so a rejected token is never reused.
    fn clear(&self) -> Result<bool, SessionError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let removed = self.storage.remove_many(&[USER_KEY, TOKEN_KEY]);
        let previous = self.state.send_replace(None);
        removed?;
        Ok(previous.is_some())
    }

    fn discard_stored(&self) {
        if let Err(e) = self.storage.remove_many(&[USER_KEY, TOKEN_KEY]) {
            warn!(error = %e, "Failed to discard stored session");
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone().into()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Get the bearer token if logged in
    pub fn token(&self) -> Option<String> {
        self.state.borrow().as_ref().map(|d| d.token.clone())
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.state.borrow().as_ref().map(|d| d.user.clone())
    }

    /// Watch session changes. The receiver starts at the current value.
    pub fn subscribe(&self) -> watch::Receiver<Option<SessionData>> {
        self.state.subscribe()
    }
}
