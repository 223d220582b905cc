//! Session store for corkboard.
//!
//! Each session caches at most one [`User`] snapshot. The snapshot is an
//! immutable `Arc<User>` copy of the persisted record; it is only ever
//! replaced as a whole, never edited in place.
//!
//! Writes to one session are serialized by a per-session mutex. A request
//! that changes the logged-in user takes a [`SessionGuard`] with
//! [`SessionStore::lock`], performs its persisted write, then calls
//! [`SessionGuard::replace`] with the freshly persisted record. Two tabs of
//! the same session therefore never interleave their write/resync pairs.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::debug;
use uuid::Uuid;

use super::permission::AuthorizationError;
use crate::db::User;

/// Session-related errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The session does not exist or was cleared.
    #[error("session {0} not found")]
    NotFound(SessionId),
}

/// Opaque session identifier (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a new random session id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// The identity attached to a session.
#[derive(Debug, Clone, Default)]
pub enum Principal {
    /// No user is logged in.
    #[default]
    Anonymous,
    /// A user is logged in; holds the cached snapshot.
    Authenticated(Arc<User>),
}

impl Principal {
    /// Get the cached user snapshot, if logged in.
    pub fn user(&self) -> Option<&User> {
        match self {
            Principal::Anonymous => None,
            Principal::Authenticated(user) => Some(user),
        }
    }

    /// Get the logged-in user's ID, if any.
    pub fn user_id(&self) -> Option<i64> {
        self.user().map(|u| u.id)
    }

    /// Check if a user is logged in.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Principal::Authenticated(_))
    }
}

#[derive(Debug)]
struct SessionSlot {
    principal: Principal,
    opened_at: DateTime<Utc>,
    authenticated_at: Option<DateTime<Utc>>,
    closed: bool,
}

impl SessionSlot {
    fn new() -> Self {
        Self {
            principal: Principal::Anonymous,
            opened_at: Utc::now(),
            authenticated_at: None,
            closed: false,
        }
    }
}

/// Exclusive access to one session for the duration of a request.
pub struct SessionGuard {
    id: SessionId,
    slot: OwnedMutexGuard<SessionSlot>,
}

impl SessionGuard {
    /// The session this guard holds.
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// The current principal.
    pub fn principal(&self) -> &Principal {
        &self.slot.principal
    }

    /// The logged-in user, or `NotAuthenticated`.
    pub fn user(&self) -> Result<&User, AuthorizationError> {
        super::permission::require_authenticated(&self.slot.principal)
    }

    /// When the session was opened.
    pub fn opened_at(&self) -> DateTime<Utc> {
        self.slot.opened_at
    }

    /// When the current user logged in, if any.
    pub fn authenticated_at(&self) -> Option<DateTime<Utc>> {
        self.slot.authenticated_at
    }

    /// Replace the cached snapshot with a freshly persisted record.
    pub fn replace(&mut self, user: User) {
        let changed_user = self.slot.principal.user_id() != Some(user.id);
        if changed_user {
            self.slot.authenticated_at = Some(Utc::now());
        }
        debug!(session_id = %self.id, user_id = user.id, "Session snapshot replaced");
        self.slot.principal = Principal::Authenticated(Arc::new(user));
    }
}

impl fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionGuard")
            .field("id", &self.id)
            .field("user_id", &self.slot.principal.user_id())
            .finish()
    }
}

/// In-process store of active sessions.
///
/// Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Arc<Mutex<SessionSlot>>>>>,
}

impl SessionStore {
    /// Create an empty session store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new anonymous session.
    pub async fn open(&self) -> SessionId {
        let id = SessionId::new();
        let mut sessions = self.sessions.write().await;
        sessions.insert(id, Arc::new(Mutex::new(SessionSlot::new())));
        debug!(session_id = %id, total = sessions.len(), "Session opened");
        id
    }

    /// Lock a session for a read-modify-resync pipeline.
    pub async fn lock(&self, id: &SessionId) -> Result<SessionGuard, SessionError> {
        let handle = self
            .sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(SessionError::NotFound(*id))?;

        let slot = handle.lock_owned().await;
        if slot.closed {
            return Err(SessionError::NotFound(*id));
        }
        Ok(SessionGuard { id: *id, slot })
    }

    /// Get the session's principal; unknown or cleared sessions are anonymous.
    pub async fn get(&self, id: &SessionId) -> Principal {
        match self.lock(id).await {
            Ok(guard) => guard.principal().clone(),
            Err(_) => Principal::Anonymous,
        }
    }

    /// Store a user snapshot in the session.
    pub async fn set(&self, id: &SessionId, user: User) -> Result<(), SessionError> {
        let mut guard = self.lock(id).await?;
        guard.replace(user);
        Ok(())
    }

    /// Clear the session (logout). The id cannot be reused afterwards.
    ///
    /// Waits for any in-flight request holding the session to finish.
    /// Returns false if the session did not exist.
    pub async fn clear(&self, id: &SessionId) -> bool {
        let handle = self.sessions.write().await.remove(id);
        let Some(handle) = handle else {
            return false;
        };

        let mut slot = handle.lock().await;
        slot.principal = Principal::Anonymous;
        slot.authenticated_at = None;
        slot.closed = true;
        debug!(session_id = %id, "Session cleared");
        true
    }

    /// Get the number of open sessions.
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore").finish()
    }
}
