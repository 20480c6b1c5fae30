//! Session context
//!
//! The bearer token and cached profile are the only state shared between
//! components. They live in one [`SessionContext`] that is handed to whoever
//! needs it. Reads are open to everyone; writes are crate-private and only
//! the auth service performs them (login, register, logout, reset).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tokio::fs;
use tracing::{debug, warn};

use crate::error::{AppResult, AuthError, SessionError};
use crate::models::{Role, UserProfile};

/// Token plus the profile it was issued for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub role: Role,
    pub user: UserProfile,
}

/// Durable storage for the session (one JSON file)
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when nothing is stored
    pub async fn load(&self) -> AppResult<Option<Session>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SessionError::ReadFailed {
                    path: self.path.display().to_string(),
                    source,
                }
                .into())
            }
        };
        let session = serde_json::from_str(&content).map_err(|source| SessionError::Corrupt {
            path: self.path.display().to_string(),
            source,
        })?;
        Ok(Some(session))
    }

    pub async fn save(&self, session: &Session) -> AppResult<()> {
        let json = serde_json::to_string_pretty(session).map_err(|source| SessionError::Corrupt {
            path: self.path.display().to_string(),
            source,
        })?;
        fs::write(&self.path, json).await.map_err(|source| SessionError::WriteFailed {
            path: self.path.display().to_string(),
            source,
        })?;
        Ok(())
    }

    /// Removes the file; a missing file is not an error
    pub async fn clear(&self) -> AppResult<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::WriteFailed {
                path: self.path.display().to_string(),
                source,
            }
            .into()),
        }
    }
}

/// Shared, cloneable handle to the current session
#[derive(Debug, Clone)]
pub struct SessionContext {
    current: Arc<RwLock<Option<Session>>>,
    store: SessionStore,
}

impl SessionContext {
    /// Logged out, without reading the store
    pub fn new(store: SessionStore) -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
            store,
        }
    }

    /// Restores whatever the store holds
    ///
    /// A corrupt or unreadable file is discarded and the user starts logged out.
    pub async fn restore(store: SessionStore) -> Self {
        let current = match store.load().await {
            Ok(session) => session,
            Err(e) => {
                warn!("⚠️ Discarding stored session: {}", e);
                if let Err(e) = store.clear().await {
                    warn!("⚠️ Could not remove stored session: {}", e);
                }
                None
            }
        };
        if let Some(session) = &current {
            debug!("Restored {} session for {}", session.role, session.user.display_name());
        }
        Self {
            current: Arc::new(RwLock::new(current)),
            store,
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    pub fn role(&self) -> Option<Role> {
        self.read().as_ref().map(|s| s.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    /// Requires a session of the given role
    pub fn require(&self, role: Role) -> AppResult<Session> {
        match self.current() {
            None => Err(AuthError::NotLoggedIn.into()),
            Some(session) if session.role != role => Err(AuthError::WrongRole {
                required: role,
                actual: session.role,
            }
            .into()),
            Some(session) => Ok(session),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Persists first, then publishes
    pub(crate) async fn establish(&self, session: Session) -> AppResult<()> {
        self.store.save(&session).await?;
        *self.write() = Some(session);
        Ok(())
    }

    /// Forgets the session in memory, then removes the file
    pub(crate) async fn end(&self) -> AppResult<()> {
        *self.write() = None;
        self.store.clear().await
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<Session>> {
        self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<Session>> {
        self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
