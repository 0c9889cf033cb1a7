// =============================================================================
// Session Store
// =============================================================================
//
// Holds the authenticated session: who is behind the counter and the
// bearer token the gateway sends with every request. The session is
// persisted locally under the `auth-storage` document, so a restart picks
// up where the last shift left off without logging in again.
//
// =============================================================================

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use mostrador_api::Gateway;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StoreResult;
use crate::storage::Storage;

/// Document name the session persists under.
const SESSION_DOC: &str = "auth-storage";

/// An authenticated operator session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token the backend issued.
    pub token: String,
    /// Display name of the operator.
    pub user_name: String,
    /// When the session was established.
    pub logged_in_at: DateTime<Utc>,
}

/// Cloneable handle to session state.
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: Storage,
    gateway: Gateway,
    inner: Arc<Mutex<Option<Session>>>,
}

impl SessionStore {
    /// Create the store, restoring any persisted session and installing
    /// its token into the gateway.
    pub fn new(storage: Storage, gateway: Gateway) -> StoreResult<Self> {
        let restored: Option<Session> = storage.load(SESSION_DOC)?;
        if let Some(session) = &restored {
            debug!(user = %session.user_name, "Session restored");
            gateway.set_bearer(Some(session.token.clone()));
        }
        Ok(SessionStore {
            storage,
            gateway,
            inner: Arc::new(Mutex::new(restored)),
        })
    }

    /// Establish a session with a token obtained from the backend login
    /// endpoint. Persists it and installs the token into the gateway.
    pub fn login(&self, token: impl Into<String>, user_name: impl Into<String>) -> StoreResult<Session> {
        let session = Session {
            token: token.into(),
            user_name: user_name.into(),
            logged_in_at: Utc::now(),
        };

        self.storage.save(SESSION_DOC, &session)?;
        self.gateway.set_bearer(Some(session.token.clone()));
        *self.lock() = Some(session.clone());

        info!(user = %session.user_name, "Logged in");
        Ok(session)
    }

    /// End the session: forget it in memory, on disk and in the gateway.
    pub fn logout(&self) -> StoreResult<()> {
        self.storage.remove(SESSION_DOC)?;
        self.gateway.set_bearer(None);
        *self.lock() = None;

        info!("Logged out");
        Ok(())
    }

    /// The current session, if any.
    pub fn current(&self) -> Option<Session> {
        self.lock().clone()
    }

    /// Whether somebody is logged in.
    pub fn is_authenticated(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        self.inner.lock().expect("Session mutex poisoned")
    }
}

// =============================================================================
// Tests
// =============================================================================
